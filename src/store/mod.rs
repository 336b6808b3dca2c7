pub mod disk;
pub mod memory;

use anyhow::{Context, Result};
use fjall::Keyspace;
use std::path::Path;

pub use disk::FjallCache;
pub use memory::MemoryCache;

/// Opens the shared keyspace under `path`, creating the directory if
/// needed. Each cache gets its own named partition of it.
pub fn open_keyspace(path: &Path) -> Result<Keyspace> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("Failed to create cache directory: {}", path.display()))?;
    let keyspace = fjall::Config::new(path.join("cache"))
        .open()
        .with_context(|| format!("Failed to open cache store at {}", path.display()))?;
    Ok(keyspace)
}
