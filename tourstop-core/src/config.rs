//! tourstop configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{TourError, TourResult};

static DEFAULT_DATA_DIR: &str = "~/.local/share/tourstop";
static DEFAULT_DOWNLOADS_DIR: &str = "~/Downloads";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_downloads_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DOWNLOADS_DIR)
}

fn default_toast_ms() -> u64 {
    1800
}

/// Configuration at ~/.config/tourstop/config.toml, overridable with
/// `TOURSTOP_*` environment variables (`TOURSTOP_SERVER__PORT=8080`).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TourConfig {
    /// Where the request log and other local state live
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Where exported invites are written
    #[serde(default = "default_downloads_dir")]
    pub downloads_dir: PathBuf,

    /// Optional catalog file (.json or .toml); the built-in schedule otherwise
    pub catalog: Option<PathBuf>,

    /// IANA time zone for invite start times; the system zone otherwise
    pub timezone: Option<String>,

    #[serde(default = "default_toast_ms")]
    pub toast_ms: u64,

    #[serde(default)]
    pub mail: MailSettings,

    #[serde(default)]
    pub invite: InviteSettings,

    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct MailSettings {
    pub to: String,
    pub subject: String,
}

impl Default for MailSettings {
    fn default() -> Self {
        MailSettings {
            to: "hello@universitygolf.com".to_string(),
            subject: "Tour Stop Request".to_string(),
        }
    }
}

/// Accepted invite lengths, in hours.
pub const INVITE_DURATION_HOURS: std::ops::RangeInclusive<i64> = 1..=24;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct InviteSettings {
    pub product_id: String,
    pub description: String,
    /// Placeholder local start hour
    pub start_hour: u32,
    pub duration_hours: i64,
}

impl Default for InviteSettings {
    fn default() -> Self {
        InviteSettings {
            product_id: "-//University Swings//EN".to_string(),
            description: "Mobile golf simulator campus tour".to_string(),
            start_hour: 14,
            duration_hours: 2,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 5173,
        }
    }
}

impl Default for TourConfig {
    fn default() -> Self {
        TourConfig {
            data_dir: default_data_dir(),
            downloads_dir: default_downloads_dir(),
            catalog: None,
            timezone: None,
            toast_ms: default_toast_ms(),
            mail: MailSettings::default(),
            invite: InviteSettings::default(),
            server: ServerSettings::default(),
        }
    }
}

impl TourConfig {
    pub fn config_path() -> TourResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TourError::Config("Could not determine config directory".into()))?
            .join("tourstop");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, creating a commented default file
    /// on first use.
    pub fn load() -> TourResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (which may be missing) plus the environment.
    pub fn load_from(path: &Path) -> TourResult<Self> {
        let config: TourConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("TOURSTOP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| TourError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| TourError::Config(e.to_string()))?;

        if config.invite.start_hour > 23 {
            return Err(TourError::Config(format!(
                "invite.start_hour must be 0-23, got {}",
                config.invite.start_hour
            )));
        }

        if !INVITE_DURATION_HOURS.contains(&config.invite.duration_hours) {
            return Err(TourError::Config(format!(
                "invite.duration_hours must be 1-24, got {}",
                config.invite.duration_hours
            )));
        }

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn data_path(&self) -> PathBuf {
        expand(&self.data_dir)
    }

    pub fn downloads_path(&self) -> PathBuf {
        expand(&self.downloads_dir)
    }

    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.catalog.as_deref().map(expand)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> TourResult<()> {
        let contents = format!(
            "\
# tourstop configuration

# Where the request log is stored:
# data_dir = \"{}\"

# Where exported calendar invites are written:
# downloads_dir = \"{}\"

# Custom tour schedule (.json or .toml):
# catalog = \"~/tour.toml\"

# Time zone for invite start times (defaults to the system zone):
# timezone = \"America/Indiana/Indianapolis\"

# [mail]
# to = \"hello@universitygolf.com\"
# subject = \"Tour Stop Request\"

# [invite]
# start_hour = 14
# duration_hours = 2

# [server]
# host = \"127.0.0.1\"
# port = 5173
",
            DEFAULT_DATA_DIR, DEFAULT_DOWNLOADS_DIR
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TourError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| TourError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
