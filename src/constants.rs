/// Application-wide constants
/// All magic numbers and constant values should be defined here

/// Maximum emoticon size in bytes (1 MiB)
pub const MAX_EMOTICON_SIZE: usize = 1024 * 1024;

/// Router-wide request body limit, leaves room for multipart framing
pub const MAX_REQUEST_BODY_SIZE: usize = 2 * MAX_EMOTICON_SIZE;

/// Public URL prefix of stored emoticons
pub const EMOTICON_BASE_URL: &str = "/emoticons";

/// Stored emoticons always get this extension, whatever the image format
pub const EMOTICON_EXTENSION: &str = ".png";

pub const EMOTICON_DIR_NAME: &str = "emoticons";
pub const EMOTICONS_CSV_NAME: &str = "emoticons.csv";
pub const CUSTOM_PUBLIC_DIR_NAME: &str = "custom_public";

/// SPA entry document inside the web root
pub const INDEX_FILE: &str = "index.html";
