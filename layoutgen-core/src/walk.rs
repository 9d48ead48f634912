use crate::layout::relative_path;
use crate::RESERVED_NAMES;
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Clone, Debug, Default)]
pub struct WalkOptions {
    /// Extra glob patterns, matched against the `/`-separated relative path.
    pub exclude: Vec<String>,
    /// Visit directory entries in file-name order instead of filesystem order.
    pub sort: bool,
    /// Recurse into symlinked directories.
    pub follow_symlinks: bool,
}

/// True for `layout.json` / `manifest.json` below the root.
pub fn is_reserved(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_name().to_str().map(|n| RESERVED_NAMES.contains(&n)).unwrap_or(false)
}

pub fn build_excludes(patterns: &[String]) -> Result<GlobSet> {
    let mut b = GlobSetBuilder::new();
    for g in patterns {
        b.add(Glob::new(g).with_context(|| format!("bad exclude pattern {:?}", g))?);
    }
    Ok(b.build()?)
}

/// Lazily yield every regular file under `root`, depth first, including
/// symlinks to regular files.
///
/// Reserved names and excluded paths are pruned before descent, so a
/// directory called `manifest.json` hides its whole subtree. Read errors are
/// yielded as `Err` items; callers are expected to stop on the first one.
pub fn walk(root: &Path, opts: &WalkOptions) -> Result<impl Iterator<Item = Result<PathBuf>>> {
    let excludes = build_excludes(&opts.exclude)?;
    let mut wd = WalkDir::new(root).min_depth(1).follow_links(opts.follow_symlinks);
    if opts.sort {
        wd = wd.sort_by_file_name();
    }
    let base = root.to_path_buf();
    let iter = wd
        .into_iter()
        .filter_entry(move |e| {
            if is_reserved(e) {
                return false;
            }
            if excludes.is_empty() {
                return true;
            }
            match relative_path(&base, e.path()) {
                Ok(rel) => !excludes.is_match(&rel),
                Err(_) => true,
            }
        })
        .filter_map(|res| match res {
            Ok(e) if e.file_type().is_file() => Some(Ok(e.into_path())),
            // Unfollowed link: listed when its target is a regular file, as a
            // plain stat would see it. Directory links are only entered when
            // following.
            Ok(e) if e.file_type().is_symlink() => match std::fs::metadata(e.path()) {
                Ok(md) if md.is_file() => Some(Ok(e.into_path())),
                Ok(_) => None,
                Err(err) => Some(Err(
                    anyhow::Error::new(err).context(format!("stat link {}", e.path().display()))
                )),
            },
            Ok(_) => None,
            Err(err) => {
                let at = err.path().map(|p| p.display().to_string()).unwrap_or_default();
                Some(Err(anyhow::Error::new(err).context(format!("walk {}", at))))
            }
        });
    Ok(iter)
}
