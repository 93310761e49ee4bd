//! Panel Configuration
//!
//! Routing identifiers, window geometry and the build token baseline,
//! stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::panel::state::FORM_TITLE;
use crate::protocol::events::{DEFAULT_APPLICATION_ID, DEFAULT_DESTINATION, DEFAULT_NAMESPACE};
use crate::protocol::Routing;

/// Panel settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Host channel identifiers
    pub bridge: BridgeSettings,
    /// Window settings
    pub window: WindowSettings,
    /// Build verification settings
    pub verification: VerificationSettings,
}

/// Identifiers used on the host channel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    /// Prefix of every debug event id
    pub namespace: String,
    /// Host application commands are addressed to
    pub destination: String,
    /// Extension id reported with every command
    pub application_id: String,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            destination: DEFAULT_DESTINATION.to_string(),
            application_id: DEFAULT_APPLICATION_ID.to_string(),
        }
    }
}

impl From<&BridgeSettings> for Routing {
    fn from(settings: &BridgeSettings) -> Self {
        Routing {
            namespace: settings.namespace.clone(),
            destination: settings.destination.clone(),
            application_id: settings.application_id.clone(),
        }
    }
}

/// Window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: FORM_TITLE.to_string(),
            width: 560.0,
            height: 240.0,
        }
    }
}

/// Build token the host is expected to report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationSettings {
    /// Unset disables the check
    pub expected_token: Option<String>,
}

/// Default location of the configuration file
pub fn default_config_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "latex2ai", "LaTeX2AI")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    Ok(proj_dirs.config_dir().join("debug_panel.toml"))
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<PanelConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: PanelConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &PanelConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_panel_config() {
        let config = PanelConfig::default();

        assert_eq!(config.bridge.namespace, "com.adobe.csxs.events.latex2ai");
        assert_eq!(config.bridge.destination, "ILST");
        assert_eq!(config.bridge.application_id, "LaTeX2AIUI");

        assert_eq!(config.window.title, FORM_TITLE);
        assert!(config.window.width > 0.0);
        assert!(config.window.height > 0.0);

        assert!(config.verification.expected_token.is_none());
    }

    #[test]
    fn test_routing_from_settings() {
        let settings = BridgeSettings {
            namespace: "org.example".to_string(),
            ..Default::default()
        };
        let routing = Routing::from(&settings);

        assert_eq!(routing.namespace, "org.example");
        assert_eq!(routing.destination, "ILST");
        assert_eq!(Routing::from(&BridgeSettings::default()), Routing::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PanelConfig = toml::from_str(
            r#"
            [verification]
            expected_token = "3f2a9c1"

            [window]
            width = 640.0
            "#,
        )
        .unwrap();

        assert_eq!(config.verification.expected_token.as_deref(), Some("3f2a9c1"));
        assert!((config.window.width - 640.0).abs() < 0.01);
        assert_eq!(config.window.title, FORM_TITLE);
        assert_eq!(config.bridge.destination, "ILST");
    }

    #[test]
    fn test_save_and_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("debug_panel.toml");

        let mut config = PanelConfig::default();
        config.bridge.application_id = "CustomUI".to_string();
        config.verification.expected_token = Some("abc".to_string());

        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();

        assert_eq!(loaded.bridge.application_id, "CustomUI");
        assert_eq!(loaded.verification.expected_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/debug_panel.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }
}
