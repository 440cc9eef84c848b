use crate::config::Config;
use crate::constants::{EMOTICON_EXTENSION, MAX_EMOTICON_SIZE};
use crate::error::{AppError, Result};
use crate::models::{emoticon_url, EmoticonRecord};
use axum::body::Bytes;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct EmoticonService {
    upload_dir: PathBuf,
    csv_path: PathBuf,
}

impl EmoticonService {
    pub fn new(config: &Config) -> Self {
        Self {
            upload_dir: config.upload_dir(),
            csv_path: config.emoticons_csv(),
        }
    }

    /// Store an uploaded image under its content hash and return its public URL.
    ///
    /// Hashing and disk I/O run on the blocking pool; the caller only awaits.
    pub async fn store_emoticon(&self, data: Bytes, client: String) -> Result<String> {
        let upload_dir = self.upload_dir.clone();

        tokio::task::spawn_blocking(move || save_emoticon(&upload_dir, &data, &client))
            .await
            .map_err(|e| AppError::Internal(e.into()))?
    }

    /// Read the keyword table in file order
    pub async fn list_emoticons(&self) -> Result<Vec<EmoticonRecord>> {
        let raw = match fs::read(&self.csv_path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(AppError::NotFound),
            Err(e) => return Err(e.into()),
        };

        parse_emoticon_table(&raw)
    }
}

/// Checks run in this order: size first, then declared type.
pub fn validate_emoticon(size: usize, content_type: Option<&str>) -> Result<()> {
    if size > MAX_EMOTICON_SIZE {
        return Err(AppError::PayloadTooLarge(format!(
            "file is too large, size={}",
            size
        )));
    }

    let is_image = content_type
        .map(|ct| ct.to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false);
    if !is_image {
        return Err(AppError::UnsupportedMediaType);
    }

    Ok(())
}

pub fn emoticon_filename(data: &[u8]) -> String {
    format!("{:x}{}", md5::compute(data), EMOTICON_EXTENSION)
}

fn save_emoticon(upload_dir: &Path, data: &[u8], client: &str) -> Result<String> {
    let filename = emoticon_filename(data);
    let path = upload_dir.join(&filename);
    tracing::info!(
        "client={} uploaded file, path={}, size={}",
        client,
        path.display(),
        data.len()
    );

    std::fs::create_dir_all(upload_dir)?;

    // Unique temp name per writer, then rename over the final path
    let mut tmp = tempfile::Builder::new()
        .prefix(".upload-")
        .suffix(".tmp")
        .tempfile_in(upload_dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(&path).map_err(|e| AppError::Io(e.error))?;

    Ok(emoticon_url(&filename))
}

/// Parse headerless `keyword,filename` rows. Columns past the second are ignored,
/// blank rows are an error like any other short row.
pub fn parse_emoticon_table(raw: &[u8]) -> Result<Vec<EmoticonRecord>> {
    if let Some(line) = find_blank_row(raw) {
        return Err(AppError::Internal(anyhow::anyhow!(
            "emoticons.csv line {} is blank, expected 2 columns",
            line
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(raw);

    let mut emoticons = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        match (row.get(0), row.get(1)) {
            (Some(keyword), Some(filename)) => emoticons.push(EmoticonRecord {
                keyword: keyword.to_string(),
                filename: filename.to_string(),
            }),
            _ => {
                return Err(AppError::Internal(anyhow::anyhow!(
                    "emoticons.csv row {} has {} column(s), expected 2",
                    index + 1,
                    row.len()
                )))
            }
        }
    }

    Ok(emoticons)
}

/// First blank line outside a quoted field, 1-based. The csv reader skips these silently.
fn find_blank_row(raw: &[u8]) -> Option<usize> {
    let mut line = 1;
    let mut line_start = true;
    let mut in_quotes = false;

    for &byte in raw {
        if byte == b'\n' {
            if line_start && !in_quotes {
                return Some(line);
            }
            line += 1;
            line_start = !in_quotes;
            continue;
        }
        match byte {
            b'"' => {
                in_quotes = !in_quotes;
                line_start = false;
            }
            b'\r' => {}
            _ => line_start = false,
        }
    }

    None
}
