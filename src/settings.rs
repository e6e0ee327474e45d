use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use config::builder::DefaultState;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::Path;

// Note: within the Settings model, variable names that would normally be
//       written with snake_case (e.g. run_mode) are intentionally written as
//       single, connected words (e.g. runmode). The '_' character separates
//       hierarchy levels in the environment overrides (YONG_SERVER_PORT), so
//       the variable names themselves must not contain it.

const ENV_PREFIX: &str = "yong";
const RUNMODE_VARIABLE: &str = "YONG_SERVER_RUNMODE";

#[derive(Debug, Deserialize)]
pub struct Database {
    pub url: String,
    #[serde(default = "default_pool_size")]
    pub poolsize: u32,
    /// Milliseconds a connection waits on a locked database file.
    #[serde(default = "default_busy_timeout")]
    pub busytimeout: u32,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub interface: String,
    pub port: String,
    #[serde(default)]
    pub runmode: RunMode,
    #[serde(default = "default_favicon_path")]
    pub faviconpath: String,
    /// Upper bound for JSON request bodies, in bytes.
    #[serde(default = "default_max_payload")]
    pub maxpayload: usize,
}

#[derive(Debug, Deserialize, PartialEq)]
pub enum RunMode {
    Default,
    Debug,
}

impl Default for RunMode {
    fn default() -> Self {
        Self::Default
    }
}

#[derive(Debug, Deserialize)]
pub struct Logging {
    pub level: String
}

fn default_pool_size() -> u32 { 4 }

fn default_busy_timeout() -> u32 { 5000 }

fn default_favicon_path() -> String { "favico.ico".to_string() }

fn default_max_payload() -> usize { 16 * 1024 }

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub database: Database,
    pub server: Server,
    pub logging: Logging,
}

impl Settings {
    pub fn init() -> Result<Self, ConfigError> {
        Self::load(Path::new("config"), None)
    }

    /// Layers `<config_dir>/default`, the `YONG_` environment and the
    /// optional run mode file. `vars` replaces the process environment
    /// when given.
    pub fn load(config_dir: &Path, vars: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let runmode = match &vars {
            Some(vars) => vars.get(RUNMODE_VARIABLE).cloned(),
            None => env::var(RUNMODE_VARIABLE).ok(),
        };

        let mut builder = Config::builder()
            .add_source(File::with_name(&config_dir.join("default").to_string_lossy()));

        //this includes all ENV overrides starting with YONG_
        //e.g. set global log-level via YONG_LOGGING_LEVEL=...
        builder = with_environment(builder, vars);

        // Add in optional environment files to enable features or overwrite defaults
        // currently available env. files:
        // * debug
        if let Some(env) = runmode {
            if !env.is_empty() {
                let runmode_file = config_dir.join(env.to_lowercase());
                builder = builder
                    .set_override("server.runmode", capitalize(&env.to_lowercase()))?
                    .add_source(File::with_name(&runmode_file.to_string_lossy()).required(false));
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Builds settings from an inline TOML document, without touching the
    /// file system or the environment.
    pub fn from_toml(document: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(document, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", &self.server.interface, &self.server.port)
    }
}

fn with_environment(builder: ConfigBuilder<DefaultState>, vars: Option<HashMap<String, String>>)
                    -> ConfigBuilder<DefaultState> {
    builder.add_source(Environment::with_prefix(ENV_PREFIX)
        .separator("_")
        .ignore_empty(true)
        .source(vars))
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [server]
        interface = "127.0.0.1"
        port = "8000"

        [database]
        url = ":memory:"

        [logging]
        level = "debug"
    "#;

    #[test]
    fn minimal_document_falls_back_to_defaults() {
        let settings = Settings::from_toml(MINIMAL).unwrap();
        assert_eq!(settings.server.runmode, RunMode::Default);
        assert_eq!(settings.server.faviconpath, "favico.ico");
        assert_eq!(settings.server.maxpayload, 16384);
        assert_eq!(settings.database.poolsize, 4);
        assert_eq!(settings.database.busytimeout, 5000);
        assert_eq!(settings.bind_address(), "127.0.0.1:8000");
    }

    #[test]
    fn explicit_values_win_over_defaults() {
        let settings = Settings::from_toml(r#"
            [server]
            interface = "0.0.0.0"
            port = "9000"
            runmode = "Debug"
            maxpayload = 512

            [database]
            url = "ratings.sqlite3"
            poolsize = 1

            [logging]
            level = "warn"
        "#).unwrap();
        assert_eq!(settings.server.runmode, RunMode::Debug);
        assert_eq!(settings.server.maxpayload, 512);
        assert_eq!(settings.database.poolsize, 1);
        assert_eq!(settings.database.url, "ratings.sqlite3");
    }

    #[test]
    fn missing_section_is_an_error() {
        assert!(Settings::from_toml("[logging]\nlevel = \"info\"").is_err());
    }

    fn config_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("default.toml"), MINIMAL).unwrap();
        std::fs::write(dir.path().join("debug.toml"), "[logging]\nlevel = \"trace\"\n").unwrap();
        dir
    }

    fn vars(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn environment_overrides_the_default_file() {
        let dir = config_dir();
        let settings = Settings::load(dir.path(), vars(&[
            ("YONG_SERVER_PORT", "9000"),
            ("YONG_DATABASE_POOLSIZE", "8"),
            ("UNRELATED_SERVER_PORT", "1"),
        ])).unwrap();
        assert_eq!(settings.server.port, "9000");
        assert_eq!(settings.database.poolsize, 8);
        assert_eq!(settings.server.runmode, RunMode::Default);
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn empty_environment_values_are_ignored() {
        let dir = config_dir();
        let settings = Settings::load(dir.path(), vars(&[("YONG_LOGGING_LEVEL", "")])).unwrap();
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn runmode_loads_its_file_and_is_recorded() {
        let dir = config_dir();
        let settings = Settings::load(dir.path(), vars(&[
            ("YONG_SERVER_RUNMODE", "DEBUG"),
            ("YONG_LOGGING_LEVEL", "warn"),
        ])).unwrap();
        assert_eq!(settings.server.runmode, RunMode::Debug);
        // the run mode file is layered last
        assert_eq!(settings.logging.level, "trace");
    }

    #[test]
    fn runmode_without_a_file_is_fine() {
        let dir = config_dir();
        std::fs::remove_file(dir.path().join("debug.toml")).unwrap();
        let settings = Settings::load(dir.path(), vars(&[("YONG_SERVER_RUNMODE", "debug")])).unwrap();
        assert_eq!(settings.server.runmode, RunMode::Debug);
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn missing_default_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(dir.path(), vars(&[])).is_err());
    }

    #[test]
    fn capitalize_handles_run_modes() {
        assert_eq!(capitalize("debug"), "Debug");
        assert_eq!(capitalize(""), "");
    }
}
