use anyhow::{bail, Result};
use std::path::{Component, Path, PathBuf};

#[derive(Clone, Copy, Debug, Default)]
pub struct PathPolicy {
    pub follow_symlinks: bool,
}

/// Resolve a layout path against `root`, refusing anything that could point
/// outside it: absolute paths, `..`, and (unless following) symlinked
/// directories on the way. When following, the directory holding an existing
/// entry must canonicalize under root. A path that does not exist is
/// returned as-is.
pub fn validate_path(root: &Path, rel: &Path, policy: PathPolicy) -> Result<PathBuf> {
    if rel.is_absolute() || rel.has_root() {
        bail!("absolute layout path not allowed: {:?}", rel);
    }
    for comp in rel.components() {
        if matches!(comp, Component::ParentDir | Component::Prefix(_)) {
            bail!("parent traversal not allowed: {:?}", rel);
        }
    }
    let candidate = root.join(rel);
    if !policy.follow_symlinks {
        // The leaf may be a link to a file (the walker lists those); a
        // linked directory on the way is only valid when following.
        let mut cur = root.to_path_buf();
        let mut comps = rel.components().peekable();
        while let Some(comp) = comps.next() {
            cur.push(comp);
            if comps.peek().is_none() {
                break;
            }
            if let Ok(m) = std::fs::symlink_metadata(&cur) {
                if m.file_type().is_symlink() {
                    bail!("symlink in layout path (not following): {:?}", cur);
                }
            }
        }
        return Ok(candidate);
    }
    if std::fs::symlink_metadata(&candidate).is_err() {
        return Ok(candidate);
    }
    let root_can = std::fs::canonicalize(root)?;
    let dir = candidate.parent().unwrap_or(root);
    let dir_can = std::fs::canonicalize(dir)?;
    if !dir_can.starts_with(&root_can) {
        bail!("layout path escapes root: {:?}", rel);
    }
    Ok(candidate)
}
