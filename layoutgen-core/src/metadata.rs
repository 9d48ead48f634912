use crate::wintime;
use anyhow::{Context, Result};
use std::path::Path;

/// The two facts a layout records about a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
    /// Modification time, nanoseconds since the Unix epoch (negative before 1970).
    pub mtime_ns: i128,
}

/// Source of per-file size and modification time.
pub trait MetadataSource {
    fn stat(&self, path: &Path) -> Result<FileStat>;
}

/// Reads metadata from the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsMetadata;

impl MetadataSource for FsMetadata {
    fn stat(&self, path: &Path) -> Result<FileStat> {
        let md = std::fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
        let modified =
            md.modified().with_context(|| format!("read mtime of {}", path.display()))?;
        Ok(FileStat { size: md.len(), mtime_ns: wintime::system_time_to_nanos(modified) })
    }
}
