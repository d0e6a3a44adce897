use std::{fs, path::Path};

use serde::Deserialize;
use shared::domain::{DEFAULT_PASSWORD, DEFAULT_USERNAME};

use crate::form::NodeCredentials;

pub const DEFAULT_SETTINGS_FILE: &str = "node_config.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub username: String,
    pub password: String,
    pub log_filter: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            username: DEFAULT_USERNAME.into(),
            password: DEFAULT_PASSWORD.into(),
            log_filter: "info".into(),
        }
    }
}

impl ClientSettings {
    pub fn credentials(&self) -> NodeCredentials {
        NodeCredentials {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    server_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    log_filter: Option<String>,
}

/// Defaults, then the TOML file, then environment variables.
///
/// An explicit `config_path` that cannot be read, or any settings file that
/// cannot be parsed, is skipped and described in the returned warnings. The
/// implicit `node_config.toml` is optional. Settings are loaded before the
/// log subscriber exists, so callers log the warnings once it is installed.
pub fn load_settings(config_path: Option<&Path>) -> (ClientSettings, Vec<String>) {
    let mut settings = ClientSettings::default();
    let mut warnings = Vec::new();

    let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));
    match fs::read_to_string(path) {
        Ok(raw) => match toml::from_str::<SettingsFile>(&raw) {
            Ok(file_cfg) => apply_file(&mut settings, file_cfg),
            Err(err) => warnings.push(format!(
                "ignoring malformed settings file '{}': {err}",
                path.display()
            )),
        },
        Err(err) if config_path.is_some() => {
            warnings.push(format!(
                "could not read settings file '{}': {err}",
                path.display()
            ));
        }
        Err(_) => {}
    }

    apply_env(&mut settings, |name| std::env::var(name).ok());
    (settings, warnings)
}

fn apply_file(settings: &mut ClientSettings, file_cfg: SettingsFile) {
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.username {
        settings.username = v;
    }
    if let Some(v) = file_cfg.password {
        settings.password = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
}

fn apply_env(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(v) = lookup("NODE_CONFIG_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("NODE_CONFIG_USERNAME") {
        settings.username = v;
    }
    if let Some(v) = lookup("NODE_CONFIG_PASSWORD") {
        settings.password = v;
    }
    if let Some(v) = lookup("RUST_LOG") {
        settings.log_filter = v;
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, io::Write};

    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "server_url = \"http://10.0.0.5:5000\"\nusername = \"root\""
        )
        .expect("write");

        let mut settings = ClientSettings::default();
        let raw = fs::read_to_string(file.path()).expect("read");
        apply_file(&mut settings, toml::from_str(&raw).expect("parse"));

        assert_eq!(settings.server_url, "http://10.0.0.5:5000");
        assert_eq!(settings.username, "root");
        assert_eq!(settings.password, DEFAULT_PASSWORD);
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn app_prefixed_env_wins_and_blank_values_are_ignored() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("NODE_CONFIG_SERVER_URL", "http://a:5000"),
            ("APP__SERVER_URL", "http://b:5000"),
            ("NODE_CONFIG_PASSWORD", "  "),
        ]);

        let mut settings = ClientSettings::default();
        apply_env(&mut settings, |name| env.get(name).map(|v| v.to_string()));

        assert_eq!(settings.server_url, "http://b:5000");
        assert_eq!(settings.password, DEFAULT_PASSWORD);
    }

    #[test]
    fn explicit_unreadable_path_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (settings, warnings) = load_settings(Some(&dir.path().join("missing.toml")));
        assert_eq!(settings.username, ClientSettings::default().username);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("could not read settings file"));
    }

    #[test]
    fn malformed_file_is_reported_and_skipped() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "username = \"root\"\nserver_url = [").expect("write");

        let (settings, warnings) = load_settings(Some(file.path()));

        assert_ne!(settings.username, "root");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("ignoring malformed settings file"));
    }

    #[test]
    fn readable_file_produces_no_warnings() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "log_filter = \"debug\"").expect("write");

        let (_, warnings) = load_settings(Some(file.path()));

        assert!(warnings.is_empty());
    }

    #[test]
    fn credentials_come_from_settings() {
        let settings = ClientSettings {
            username: "ops".into(),
            password: "hunter2".into(),
            ..ClientSettings::default()
        };
        let credentials = settings.credentials();
        assert_eq!(credentials.username, "ops");
        assert_eq!(credentials.password, "hunter2");
    }
}
