//! Project configuration.
//!
//! Settings live in `<project>/.logistik/config.toml`. Every key is
//! optional. Environment variables override the file:
//!
//! - `LOGISTIK_DB`: database path
//! - `LOGISTIK_AMPEL_RULE`: `completion`, `schedule` or `auto`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ampel::AmpelRule;
use crate::error::{LogistikError, LogistikResult};

/// Directory holding the database and config inside a project.
pub const CONFIG_DIR: &str = ".logistik";
/// Database file name inside [`CONFIG_DIR`].
pub const DB_FILE: &str = "logistik.db";
/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

const ENV_DB: &str = "LOGISTIK_DB";
const ENV_AMPEL_RULE: &str = "LOGISTIK_AMPEL_RULE";

/// Web server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3040,
        }
    }
}

/// Resolved project settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Database path. Relative paths resolve against the project directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
    /// Rule used to turn milestone progress into traffic lights.
    pub ampel_rule: AmpelRule,
    pub server: ServerSettings,
}

impl Settings {
    /// Load settings for a project: config file (if any), then environment.
    pub fn load(project_dir: &Path) -> LogistikResult<Self> {
        let path = project_dir.join(CONFIG_DIR).join(CONFIG_FILE);
        let mut settings = if path.is_file() {
            let raw = std::fs::read_to_string(&path)?;
            tracing::debug!(path = %path.display(), "Loaded config file");
            Self::from_toml_str(&raw)?
        } else {
            Self::default()
        };

        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Parse a config file body.
    pub fn from_toml_str(raw: &str) -> LogistikResult<Self> {
        toml::from_str(raw).map_err(|e| LogistikError::Config(e.to_string()))
    }

    /// Render as TOML, e.g. for `logistik init`.
    pub fn to_toml_string(&self) -> LogistikResult<String> {
        toml::to_string_pretty(self).map_err(|e| LogistikError::Config(e.to_string()))
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> LogistikResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db) = lookup(ENV_DB).filter(|v| !v.trim().is_empty()) {
            self.database = Some(PathBuf::from(db));
        }
        if let Some(rule) = lookup(ENV_AMPEL_RULE).filter(|v| !v.trim().is_empty()) {
            self.ampel_rule = rule
                .parse()
                .map_err(|e: String| LogistikError::Config(format!("{}: {}", ENV_AMPEL_RULE, e)))?;
        }
        Ok(())
    }

    /// Absolute database path for a project.
    pub fn database_path(&self, project_dir: &Path) -> PathBuf {
        match &self.database {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => project_dir.join(path),
            None => project_dir.join(CONFIG_DIR).join(DB_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings.ampel_rule, AmpelRule::Auto);
        assert_eq!(settings.server.port, 3040);
        assert_eq!(
            settings.database_path(Path::new("/srv/lp")),
            PathBuf::from("/srv/lp/.logistik/logistik.db")
        );
    }

    #[test]
    fn test_parse_file() {
        let raw = r#"
            ampel_rule = "schedule"
            database = "data/prod.db"

            [server]
            port = 8080
        "#;
        let settings = Settings::from_toml_str(raw).unwrap();
        assert_eq!(settings.ampel_rule, AmpelRule::Schedule);
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(
            settings.database_path(Path::new("/srv/lp")),
            PathBuf::from("/srv/lp/data/prod.db")
        );
    }

    #[test]
    fn test_bad_rule_is_config_error() {
        let err = Settings::from_toml_str(r#"ampel_rule = "psychic""#).unwrap_err();
        assert!(matches!(err, LogistikError::Config(_)));
    }

    #[test]
    fn test_env_overrides_file() {
        let env: HashMap<&str, &str> =
            HashMap::from([("LOGISTIK_AMPEL_RULE", "completion"), ("LOGISTIK_DB", "/tmp/x.db")]);
        let mut settings = Settings::from_toml_str(r#"ampel_rule = "schedule""#).unwrap();
        settings
            .apply_env(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(settings.ampel_rule, AmpelRule::Completion);
        assert_eq!(settings.database_path(Path::new("/srv")), PathBuf::from("/tmp/x.db"));
    }

    #[test]
    fn test_env_bad_rule() {
        let mut settings = Settings::default();
        let result = settings.apply_env(|k| (k == "LOGISTIK_AMPEL_RULE").then(|| "soon".to_string()));
        assert!(matches!(result, Err(LogistikError::Config(_))));
    }

    #[test]
    fn test_toml_round_trip_of_defaults() {
        let rendered = Settings::default().to_toml_string().unwrap();
        assert!(rendered.contains("ampel_rule = \"auto\""));
        assert_eq!(Settings::from_toml_str(&rendered).unwrap(), Settings::default());
    }
}
