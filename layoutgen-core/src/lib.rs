pub mod generate;
pub mod layout;
pub mod localize;
pub mod manifest;
pub mod metadata;
pub mod path_safety;
pub mod progress;
pub mod verify;
pub mod walk;
pub mod wintime;

/// Output file holding the content listing.
pub const LAYOUT_FILE: &str = "layout.json";
/// Output file holding the package metadata.
pub const MANIFEST_FILE: &str = "manifest.json";
/// Names never listed in a layout, at any depth.
pub const RESERVED_NAMES: [&str; 2] = [LAYOUT_FILE, MANIFEST_FILE];
