use std::env;
use std::path::PathBuf;

use crate::constants::{CUSTOM_PUBLIC_DIR_NAME, EMOTICONS_CSV_NAME, EMOTICON_DIR_NAME};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_path: PathBuf,
    pub web_root: PathBuf,
    pub enable_translate: bool,
    pub enable_upload_file: bool,
    pub loader_url: String,
    pub enable_admin_plugins: bool,
    pub registered_endpoints: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "12450".to_string())
                .parse()?,
            data_path: env::var("DATA_PATH")
                .unwrap_or_else(|_| "./data".to_string())
                .into(),
            web_root: env::var("WEB_ROOT")
                .unwrap_or_else(|_| "./frontend/dist".to_string())
                .into(),
            enable_translate: env_flag("ENABLE_TRANSLATE", true),
            enable_upload_file: env_flag("ENABLE_UPLOAD_FILE", true),
            loader_url: env::var("LOADER_URL").unwrap_or_default(),
            enable_admin_plugins: env_flag("ENABLE_ADMIN_PLUGINS", false),
            registered_endpoints: env::var("REGISTERED_ENDPOINTS")
                .map(|raw| parse_list(&raw))
                .unwrap_or_default(),
        })
    }

    /// Directory holding uploaded emoticons, named `<md5>.png`
    pub fn upload_dir(&self) -> PathBuf {
        self.data_path.join(EMOTICON_DIR_NAME)
    }

    pub fn emoticons_csv(&self) -> PathBuf {
        self.data_path.join(EMOTICONS_CSV_NAME)
    }

    /// Operator-managed files, may change at any time
    pub fn custom_public_dir(&self) -> PathBuf {
        self.data_path.join(CUSTOM_PUBLIC_DIR_NAME)
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().to_ascii_lowercase().parse().ok())
        .unwrap_or(default)
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
