use config::{Config, ConfigError, File, FileFormat, Value};

/// Names of `[dependencies]` entries whose version requirement is not an
/// exact `=x.y.z` pin. Git and path dependencies carry no version and are
/// not reported.
pub fn unpinned_dependencies(manifest: &str) -> Result<Vec<String>, ConfigError> {
    let manifest = Config::builder()
        .add_source(File::from_str(manifest, FileFormat::Toml))
        .build()?;
    let dependencies = match manifest.get_table("dependencies") {
        Ok(table) => table,
        Err(ConfigError::NotFound(_)) => return Ok(Vec::new()),
        Err(err) => return Err(err),
    };

    let mut unpinned: Vec<String> = dependencies.into_iter()
        .filter(|(_, requirement)| match version_of(requirement.clone()) {
            Some(version) => !version.trim().starts_with('='),
            None => false,
        })
        .map(|(name, _)| name)
        .collect();
    unpinned.sort();
    Ok(unpinned)
}

fn version_of(requirement: Value) -> Option<String> {
    if let Ok(version) = requirement.clone().into_string() {
        return Some(version);
    }
    requirement.into_table()
        .ok()
        .and_then(|mut table| table.remove("version"))
        .and_then(|version| version.into_string().ok())
}
