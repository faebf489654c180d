//! CLI command implementations

pub mod accounts;
pub mod status;
pub mod sync;

use std::path::PathBuf;

use anyhow::{Context, Result};
use ledgerlink_core::LedgerlinkContext;

/// Get the ledgerlink directory from environment or default
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LEDGERLINK_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".ledgerlink")
    }
}

/// Get or create ledgerlink context
pub fn get_context() -> Result<LedgerlinkContext> {
    let data_dir = get_data_dir();

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create ledgerlink directory: {:?}", data_dir))?;

    LedgerlinkContext::new(&data_dir).context("Failed to initialize ledgerlink context")
}
