pub mod assets;
pub mod page;
pub mod ratings;
