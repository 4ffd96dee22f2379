use std::path::PathBuf;

use btcwill_storage::file_store::FileBlobStore;
use color_eyre::Result;
use dirs::data_dir;
use tracing::debug;

use crate::config::Config;

/// Resolve the default data directory for btcwill.
pub fn default_data_dir() -> Result<PathBuf> {
    let base = data_dir().ok_or_else(|| color_eyre::eyre::eyre!("no data dir available"))?;
    Ok(base.join("btcwill"))
}

/// Build the file store, honoring a `data_dir` override.
pub fn store_from_config(config: &Config) -> Result<FileBlobStore> {
    let root = match &config.data_dir {
        Some(root) => root.clone(),
        None => default_data_dir()?,
    };
    debug!(?root, "initializing file store");
    Ok(FileBlobStore::new(root))
}
