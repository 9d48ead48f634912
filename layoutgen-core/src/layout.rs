//! The `layout.json` document: one entry per packaged file.

use crate::metadata::MetadataSource;
use crate::progress::Progress;
use crate::wintime;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ContentEntry {
    /// Relative to the package root, `/`-separated.
    pub path: String,
    pub size: u64,
    /// Modification time in FILETIME units.
    pub date: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutDocument {
    pub content: Vec<ContentEntry>,
}

impl LayoutDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
        serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse {}", path.display()))
    }

    /// Sum of the recorded sizes; a loaded document may hold any values.
    pub fn total_size(&self) -> Result<u64> {
        self.content.iter().try_fold(0u64, |acc, e| {
            acc.checked_add(e.size)
                .with_context(|| format!("recorded sizes overflow at {}", e.path))
        })
    }
}

/// Path of `path` relative to `root`, with every separator written as `/`.
pub fn relative_path(root: &Path, path: &Path) -> Result<String> {
    let Some(rel) = pathdiff::diff_paths(path, root) else {
        bail!("cannot relativize {} against {}", path.display(), root.display());
    };
    let mut parts: Vec<String> = Vec::new();
    for comp in rel.components() {
        match comp {
            Component::Normal(s) => {
                let s = s.to_str().with_context(|| format!("non-UTF-8 path {}", path.display()))?;
                parts.push(s.to_string());
            }
            Component::CurDir => {}
            _ => bail!("{} is not under {}", path.display(), root.display()),
        }
    }
    Ok(parts.join("/"))
}

/// Stat every walked path and build the content list plus the summed size.
///
/// Entries keep the order of `paths`. The first walk or stat error aborts.
pub fn build_layout<I>(
    paths: I,
    meta: &dyn MetadataSource,
    root: &Path,
    progress: &Progress,
) -> Result<(LayoutDocument, u64)>
where
    I: IntoIterator<Item = Result<PathBuf>>,
{
    let mut content = Vec::new();
    let mut total: u64 = 0;
    for p in paths {
        let p = p?;
        let rel = relative_path(root, &p)?;
        let st = meta.stat(&p)?;
        let date = wintime::unix_nanos_to_filetime(st.mtime_ns)
            .with_context(|| format!("convert mtime of {}", p.display()))?;
        total = total
            .checked_add(st.size)
            .with_context(|| format!("total package size overflows at {}", rel))?;
        tracing::debug!(path = %rel, size = st.size, date, "content entry");
        progress.inc_file(st.size);
        content.push(ContentEntry { path: rel, size: st.size, date });
    }
    Ok((LayoutDocument { content }, total))
}
