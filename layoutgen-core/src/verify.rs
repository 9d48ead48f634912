use crate::layout::{relative_path, LayoutDocument};
use crate::metadata::{FsMetadata, MetadataSource};
use crate::path_safety::{validate_path, PathPolicy};
use crate::walk::{walk, WalkOptions};
use crate::wintime;
use crate::LAYOUT_FILE;
use anyhow::{Context, Result};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Size { recorded: u64, actual: u64 },
    Date { recorded: u64, actual: u64 },
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Size { recorded, actual } => write!(f, "size {} -> {}", recorded, actual),
            ChangeKind::Date { recorded, actual } => write!(f, "date {} -> {}", recorded, actual),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub path: String,
    pub kind: ChangeKind,
}

#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    /// Entries read from the existing layout.
    pub checked: usize,
    /// Sum of the sizes recorded in the layout.
    pub recorded_size: u64,
    /// Recorded but no longer on disk.
    pub missing: Vec<String>,
    /// On disk but not recorded.
    pub extra: Vec<String>,
    pub changed: Vec<Change>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty() && self.changed.is_empty()
    }
}

/// Compare `<root>/layout.json` against the tree it describes.
pub fn check(root: &Path, opts: &WalkOptions) -> Result<CheckReport> {
    check_with(root, opts, &FsMetadata)
}

pub fn check_with(root: &Path, opts: &WalkOptions, meta: &dyn MetadataSource) -> Result<CheckReport> {
    let layout_path = root.join(LAYOUT_FILE);
    let layout = LayoutDocument::load(&layout_path)?;
    let policy = PathPolicy { follow_symlinks: opts.follow_symlinks };
    for e in &layout.content {
        validate_path(root, Path::new(&e.path), policy)
            .with_context(|| format!("unsafe entry in {}", layout_path.display()))?;
    }

    let mut on_disk: Vec<String> = Vec::new();
    let mut stats = HashMap::new();
    for p in walk(root, opts)? {
        let p = p?;
        let rel = relative_path(root, &p)?;
        stats.insert(rel.clone(), meta.stat(&p)?);
        on_disk.push(rel);
    }

    let mut report = CheckReport {
        checked: layout.content.len(),
        recorded_size: layout.total_size()?,
        ..Default::default()
    };
    let mut recorded = HashSet::new();
    for e in &layout.content {
        recorded.insert(e.path.as_str());
        let Some(st) = stats.get(&e.path) else {
            report.missing.push(e.path.clone());
            continue;
        };
        if st.size != e.size {
            report.changed.push(Change {
                path: e.path.clone(),
                kind: ChangeKind::Size { recorded: e.size, actual: st.size },
            });
            continue;
        }
        let date = wintime::unix_nanos_to_filetime(st.mtime_ns)?;
        if date != e.date {
            report.changed.push(Change {
                path: e.path.clone(),
                kind: ChangeKind::Date { recorded: e.date, actual: date },
            });
        }
    }
    report.extra = on_disk.into_iter().filter(|p| !recorded.contains(p.as_str())).collect();

    tracing::debug!(
        checked = report.checked,
        missing = report.missing.len(),
        extra = report.extra.len(),
        changed = report.changed.len(),
        "layout check"
    );
    Ok(report)
}
