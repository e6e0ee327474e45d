//! Local pre-commit checks: forbidden text patterns and dependency pinning
//! over the files about to be committed, plus a report of work markers
//! across the tracked tree.

pub mod git;
pub mod markers;
pub mod patterns;
pub mod pinned;

use clap::ValueEnum;
use git::Selection;
use markers::{find_markers, MarkerHit};
use patterns::{detect_invalid_patterns, PatternHit};
use pinned::unpinned_dependencies;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Check {
    #[value(name = "invalid_patterns")]
    InvalidPatterns,
    #[value(name = "markers")]
    Markers,
    #[value(name = "pinned")]
    Pinned,
}

#[derive(Debug, Default)]
pub struct Report {
    pub invalid_patterns: Vec<PatternHit>,
    pub markers: Vec<MarkerHit>,
    pub unpinned: Vec<String>,
}

impl Report {
    /// Forbidden patterns and unpinned dependencies block a commit; markers are informational.
    pub fn failures(&self) -> usize {
        self.invalid_patterns.len() + self.unpinned.len()
    }

    pub fn exit_code(&self) -> i32 {
        self.failures().min(255) as i32
    }
}

/// Runs every check not listed in `skip`, in a fixed order.
pub fn run_checks(selection: &Selection, manifest: Option<&str>, skip: &[Check]) -> Report {
    let mut report = Report::default();
    let enabled = |check: Check| {
        let on = !skip.contains(&check);
        if !on {
            debug!("{:?} skipped", check);
        }
        on
    };

    if enabled(Check::InvalidPatterns) {
        report.invalid_patterns = detect_invalid_patterns(&selection.files);
    }
    if enabled(Check::Markers) {
        report.markers = find_markers(&selection.root, &selection.tracked);
    }
    if enabled(Check::Pinned) {
        if let Some(manifest) = manifest {
            match unpinned_dependencies(manifest) {
                Ok(unpinned) => report.unpinned = unpinned,
                Err(err) => warn!("Could not read the manifest: {}", err),
            }
        }
    }
    report
}
