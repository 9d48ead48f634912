//! The `manifest.json` document: the base manifest overlaid with the
//! computed package fields.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub type ManifestMap = Map<String, Value>;

pub const PACKAGE_VERSION_KEY: &str = "package_version";
pub const TOTAL_PACKAGE_SIZE_KEY: &str = "total_package_size";

/// Width of the zero-padded `total_package_size` string.
pub const TOTAL_SIZE_WIDTH: usize = 20;

/// Only `version` is read; every other field of the package metadata is ignored.
#[derive(Deserialize, Clone, Debug)]
pub struct PackageMetadata {
    pub version: String,
}

/// Load the base manifest. It must be a JSON object; key order is kept.
pub fn load_base_manifest(path: &Path) -> Result<ManifestMap> {
    let f = File::open(path).with_context(|| format!("open base manifest {}", path.display()))?;
    let v: Value = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse base manifest {}", path.display()))?;
    match v {
        Value::Object(m) => Ok(m),
        other => bail!(
            "base manifest {} must be a JSON object, found {}",
            path.display(),
            json_kind(&other)
        ),
    }
}

pub fn read_package_version(path: &Path) -> Result<String> {
    let f = File::open(path).with_context(|| format!("open package metadata {}", path.display()))?;
    let pkg: PackageMetadata = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("read version from {}", path.display()))?;
    Ok(pkg.version)
}

pub fn format_total_size(total: u64) -> String {
    format!("{:0width$}", total, width = TOTAL_SIZE_WIDTH)
}

/// Overlay `package_version` and `total_package_size` on the base manifest.
/// Keys already present keep their position.
pub fn build_manifest(mut base: ManifestMap, version: &str, total: u64) -> ManifestMap {
    base.insert(PACKAGE_VERSION_KEY.to_string(), Value::String(version.to_string()));
    base.insert(TOTAL_PACKAGE_SIZE_KEY.to_string(), Value::String(format_total_size(total)));
    base
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
