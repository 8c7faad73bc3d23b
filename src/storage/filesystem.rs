//! File System Session Storage
//!
//! Each record is a JSON file holding `{key, value}`. Short keys are
//! hex-encoded into the file name; keys whose encoding would exceed
//! `MAX_HEX_NAME` are named by their blake3 hash instead, so any
//! caller-supplied key maps to a single file inside the base directory.

use super::SessionStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Longest hex stem written as a file name; stays well under the common
/// 255-byte `NAME_MAX` once the `.json` extension is added.
const MAX_HEX_NAME: usize = 200;
const HASHED_PREFIX: &str = "b3-";

#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    key: String,
    value: Value,
}

/// Files are stored as {base_path}/{hex(key)}.json or {base_path}/b3-{blake3(key)}.json
pub struct FileSystemStore {
    base_path: PathBuf,
}

impl FileSystemStore {
    pub async fn new(base_path: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_path)
            .await
            .context("Failed to create storage directory")?;

        Ok(Self { base_path })
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", file_stem(key)))
    }
}

fn file_stem(key: &str) -> String {
    let hex = encode_key(key);
    if hex.len() <= MAX_HEX_NAME {
        hex
    } else {
        format!("{}{}", HASHED_PREFIX, blake3::hash(key.as_bytes()).to_hex())
    }
}

fn encode_key(key: &str) -> String {
    key.bytes().fold(String::with_capacity(key.len() * 2), |mut out, b| {
        let _ = write!(out, "{:02x}", b);
        out
    })
}

fn decode_key(stem: &str) -> Option<String> {
    if stem.len() % 2 != 0 {
        return None;
    }
    let bytes = (0..stem.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(stem.get(i..i + 2)?, 16).ok())
        .collect::<Option<Vec<u8>>>()?;
    String::from_utf8(bytes).ok()
}

async fn read_record(path: &Path) -> Result<Option<StoredRecord>> {
    let json = match fs::read_to_string(path).await {
        Ok(json) => json,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).context(format!("Failed to read record file: {:?}", path));
        }
    };

    let record = serde_json::from_str(&json).context("Failed to deserialize record")?;
    Ok(Some(record))
}

#[async_trait]
impl SessionStore for FileSystemStore {
    async fn put(&self, key: &str, value: Value) -> Result<()> {
        let path = self.record_path(key);
        let record = StoredRecord {
            key: key.to_string(),
            value,
        };
        let json = serde_json::to_string_pretty(&record).context("Failed to serialize record")?;

        fs::write(&path, json)
            .await
            .context(format!("Failed to write record file: {:?}", path))?;

        tracing::debug!("[FileSystemStore] Stored record '{}' at {:?}", key, path);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.record_path(key);

        match read_record(&path).await? {
            Some(record) if record.key == key => Ok(Some(record.value)),
            Some(_) => {
                tracing::warn!("[FileSystemStore] Record at {:?} belongs to another key", path);
                Ok(None)
            }
            None => {
                tracing::debug!("[FileSystemStore] Record '{}' does not exist", key);
                Ok(None)
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let path = self.record_path(key);

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("[FileSystemStore] Deleted record '{}' at {:?}", key, path);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).context(format!("Failed to delete record file: {:?}", path)),
        }
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut entries = fs::read_dir(&self.base_path)
            .await
            .context("Failed to read storage directory")?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            if stem.starts_with(HASHED_PREFIX) {
                if let Some(record) = read_record(&path).await? {
                    keys.push(record.key);
                }
            } else if let Some(key) = decode_key(stem) {
                keys.push(key);
            }
        }

        tracing::debug!("[FileSystemStore] Listed {} records", keys.len());
        Ok(keys)
    }
}
