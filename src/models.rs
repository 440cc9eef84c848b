use serde::Serialize;
use utoipa::ToSchema;

use crate::config::Config;
use crate::constants::EMOTICON_BASE_URL;

#[derive(Debug, Serialize, ToSchema)]
pub struct ServerInfoResponse {
    #[schema(example = "0.1.0")]
    pub version: String,
    pub config: ClientConfig,
}

/// Subset of the server configuration the frontend needs
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub enable_translate: bool,
    pub enable_upload_file: bool,
    pub loader_url: String,
    pub enable_admin_plugins: bool,
}

impl From<&Config> for ClientConfig {
    fn from(config: &Config) -> Self {
        Self {
            enable_translate: config.enable_translate,
            enable_upload_file: config.enable_upload_file,
            loader_url: config.loader_url.clone(),
            enable_admin_plugins: config.enable_admin_plugins,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EndpointsResponse {
    pub endpoints: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadEmoticonResponse {
    /// Public URL of the stored image
    #[schema(example = "/emoticons/d41d8cd98f00b204e9800998ecf8427e.png")]
    pub url: String,
}

/// One row of `emoticons.csv`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmoticonRecord {
    pub keyword: String,
    pub filename: String,
}

impl EmoticonRecord {
    pub fn url(&self) -> String {
        emoticon_url(&self.filename)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmoticonView {
    #[schema(example = "[dog]")]
    pub keyword: String,
    #[schema(example = "/emoticons/dog.png")]
    pub url: String,
}

impl From<EmoticonRecord> for EmoticonView {
    fn from(record: EmoticonRecord) -> Self {
        let url = record.url();
        Self {
            keyword: record.keyword,
            url,
        }
    }
}

pub fn emoticon_url(filename: &str) -> String {
    format!("{}/{}", EMOTICON_BASE_URL, filename)
}
