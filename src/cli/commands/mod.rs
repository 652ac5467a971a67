//! Command implementations, one module per command group

pub mod data;
pub mod menu;
pub mod pipe;
pub mod station;

use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::codec;
use crate::core::store::RecordStore;

/// Load the working snapshot, or start empty when the file does not exist yet
pub(crate) fn load_store(global: &GlobalOpts) -> Result<RecordStore> {
    if global.file.exists() {
        codec::load_from_file(&global.file).into_diagnostic()
    } else {
        Ok(RecordStore::new())
    }
}

/// Write the working snapshot back to disk. The working file is used
/// verbatim; extension defaulting applies only to user-named saves.
pub(crate) fn persist_store(store: &RecordStore, global: &GlobalOpts) -> Result<()> {
    std::fs::write(&global.file, codec::encode(store)).into_diagnostic()
}
