use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub breadcrumb: BreadcrumbConfig,
    #[serde(default)]
    pub checkout: CheckoutConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to a file under the state directory instead of stderr
    #[serde(default)]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_state_path")]
    pub state: String,
}

fn default_state_path() -> String {
    ".sale-tunnel".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state: default_state_path(),
        }
    }
}

/// Markers for plain-text breadcrumb output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreadcrumbConfig {
    #[serde(default = "default_separator")]
    pub separator: String,
    #[serde(default = "default_current_marker")]
    pub current_marker: String,
    #[serde(default = "default_active_marker")]
    pub active_marker: String,
    #[serde(default = "default_pending_marker")]
    pub pending_marker: String,
}

fn default_separator() -> String {
    " ── ".to_string()
}

fn default_current_marker() -> String {
    "▶".to_string()
}

fn default_active_marker() -> String {
    "●".to_string()
}

fn default_pending_marker() -> String {
    "○".to_string()
}

impl Default for BreadcrumbConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            current_marker: default_current_marker(),
            active_marker: default_active_marker(),
            pending_marker: default_pending_marker(),
        }
    }
}

/// Labels of the checkout tunnel steps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    #[serde(default = "default_validation_label")]
    pub validation_label: String,
    #[serde(default = "default_payment_label")]
    pub payment_label: String,
    #[serde(default = "default_resume_label")]
    pub resume_label: String,
}

fn default_validation_label() -> String {
    "Validation".to_string()
}

fn default_payment_label() -> String {
    "Payment".to_string()
}

fn default_resume_label() -> String {
    "Resume".to_string()
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            validation_label: default_validation_label(),
            payment_label: default_payment_label(),
            resume_label: default_resume_label(),
        }
    }
}

impl Config {
    /// Path to the project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".sale-tunnel/config.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so the tool works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        let project_config = Self::project_config_path();
        if project_config.exists() {
            builder = builder.add_source(config::File::from(project_config));
        }

        // User config in ~/.config/sale-tunnel/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("sale-tunnel").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables, e.g. SALE_TUNNEL__LOGGING__LEVEL=debug
        builder = builder.add_source(
            config::Environment::with_prefix("SALE_TUNNEL")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save config to .sale-tunnel/config.toml
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::project_config_path())
    }

    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(config_path, toml_str).context("Failed to write config file")?;

        Ok(())
    }

    /// Get absolute path to state directory
    pub fn state_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.paths.state);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }

    /// Get absolute path to logs directory
    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.to_file);
        assert_eq!(config.checkout.payment_label, "Payment");
        assert_eq!(config.breadcrumb.current_marker, "▶");
    }

    #[test]
    fn test_load_explicit_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
[checkout]
payment_label = "Paiement"

[breadcrumb]
separator = " > "
"#,
        )
        .unwrap();

        let config = Config::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.checkout.payment_label, "Paiement");
        assert_eq!(config.checkout.resume_label, "Resume");
        assert_eq!(config.breadcrumb.separator, " > ");
        assert_eq!(config.breadcrumb.active_marker, "●");
    }

    #[test]
    fn test_save_round_trips_through_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.logging.level = "debug".to_string();
        config.checkout.resume_label = "Summary".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(loaded.logging.level, "debug");
        assert_eq!(loaded.checkout.resume_label, "Summary");
    }

    #[test]
    fn test_logs_path_under_state() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths.state = temp_dir.path().to_string_lossy().to_string();

        let logs_dir = config.logs_path();
        assert!(logs_dir.ends_with("logs"));
        assert!(logs_dir.starts_with(temp_dir.path()));
    }
}
