//! Flat-directory store of `<id>.jpg` / `<id>.json` sibling pairs.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tokio::fs;

use crate::types::Item;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("disk error: {0}")]
    Disk(#[from] io::Error),

    #[error("metadata encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Identifiers already materialized in the destination directory: the
    /// base names (extension stripped) of the regular files directly inside.
    /// Read once at startup.
    pub fn known_ids(&self) -> io::Result<HashSet<String>> {
        let mut ids = HashSet::new();
        if !self.root.exists() {
            return Ok(ids);
        }
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.insert(stem.to_string());
            }
        }
        Ok(ids)
    }

    /// Whether either half of the pair is already on disk. A partial prior
    /// write counts as present and blocks a re-fetch; there is no repair.
    pub fn exists(&self, id: &str) -> bool {
        self.asset_path(id).exists() || self.metadata_path(id).exists()
    }

    /// Write the asset (when bytes are present) and then the metadata. Each
    /// file goes through a temp-then-rename; the pair as a whole is not
    /// atomic, so a crash between the two writes leaves a lone sibling.
    pub async fn persist(&self, item: &Item, asset: Option<&[u8]>) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).await?;
        if let Some(bytes) = asset {
            write_file(&self.asset_path(&item.id), bytes).await?;
        }
        let json = to_pretty_json(item)?;
        write_file(&self.metadata_path(&item.id), json.as_bytes()).await?;
        Ok(())
    }

    fn asset_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.jpg"))
    }

    fn metadata_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }
}

async fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut part_name = path.as_os_str().to_os_string();
    part_name.push(".part");
    let part = PathBuf::from(part_name);

    fs::write(&part, contents).await?;
    fs::rename(&part, path).await?;
    Ok(())
}

/// Pretty-print with sorted keys and 4-space indentation. Round-tripping
/// through `Value` sorts the keys (object maps are BTreeMap-backed).
fn to_pretty_json(item: &Item) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(item)?;
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf).expect("serde_json output is valid UTF-8"))
}
