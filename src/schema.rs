// The table has no declared key; rows are addressed through SQLite's implicit rowid.
table! {
    #[sql_name = "data"]
    ratings (rowid) {
        rowid -> BigInt,
        secret -> Nullable<Text>,
        who -> Nullable<Text>,
        url -> Nullable<Text>,
        mark -> Nullable<Integer>,
        cats -> Nullable<Text>,
        #[sql_name = "desc"]
        description -> Nullable<Text>,
    }
}
