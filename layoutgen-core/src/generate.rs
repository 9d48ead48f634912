use crate::layout::{build_layout, LayoutDocument};
use crate::manifest::{build_manifest, load_base_manifest, read_package_version, ManifestMap};
use crate::metadata::{FsMetadata, MetadataSource};
use crate::progress::Progress;
use crate::walk::{walk, WalkOptions};
use crate::{LAYOUT_FILE, MANIFEST_FILE};
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_ROOT: &str = "MSFS_C152";
pub const DEFAULT_BASE_MANIFEST: &str = "manifest-base.json";
pub const DEFAULT_PACKAGE: &str = "package.json";

#[derive(Clone, Debug)]
pub struct GenerateConfig {
    /// Package content root; outputs are written here.
    pub root: PathBuf,
    pub base_manifest: PathBuf,
    /// Package metadata; only its `version` is read.
    pub package: PathBuf,
    pub walk: WalkOptions,
    pub dry_run: bool,
    pub progress: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            base_manifest: PathBuf::from(DEFAULT_BASE_MANIFEST),
            package: PathBuf::from(DEFAULT_PACKAGE),
            walk: WalkOptions::default(),
            dry_run: false,
            progress: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GenerateReport {
    pub files: usize,
    pub total_size: u64,
    pub layout_path: PathBuf,
    pub manifest_path: PathBuf,
    /// False on a dry run.
    pub written: bool,
    pub layout: LayoutDocument,
    pub manifest: ManifestMap,
}

pub struct Generator;

impl Generator {
    pub fn generate(cfg: &GenerateConfig) -> Result<GenerateReport> {
        Self::generate_with(cfg, &FsMetadata)
    }

    pub fn generate_with(cfg: &GenerateConfig, meta: &dyn MetadataSource) -> Result<GenerateReport> {
        let root = cfg.root.as_path();
        let md = std::fs::metadata(root).with_context(|| format!("stat root {}", root.display()))?;
        if !md.is_dir() {
            bail!("package root {} is not a directory", root.display());
        }

        // Inputs first, so a bad base manifest or package file writes nothing.
        let base = load_base_manifest(&cfg.base_manifest)?;
        let version = read_package_version(&cfg.package)?;

        let prog = Progress::new(cfg.progress);
        prog.set_stage("Scanning");
        let (layout, total) = build_layout(walk(root, &cfg.walk)?, meta, root, &prog)?;
        prog.finish();

        let manifest = build_manifest(base, &version, total);
        let layout_path = root.join(LAYOUT_FILE);
        let manifest_path = root.join(MANIFEST_FILE);
        if !cfg.dry_run {
            write_json_pretty(&layout_path, &layout)?;
            write_json_pretty(&manifest_path, &manifest)?;
        }
        tracing::info!(
            files = layout.content.len(),
            total_size = total,
            version = %version,
            dry_run = cfg.dry_run,
            "package layout generated"
        );

        Ok(GenerateReport {
            files: layout.content.len(),
            total_size: total,
            layout_path,
            manifest_path,
            written: !cfg.dry_run,
            layout,
            manifest,
        })
    }
}

/// Two-space indented JSON, no trailing newline.
pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, value)
        .with_context(|| format!("write {}", path.display()))?;
    w.flush().with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}
