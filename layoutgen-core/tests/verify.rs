use filetime::{set_file_mtime, FileTime};
use layoutgen_core::generate::{GenerateConfig, Generator};
use layoutgen_core::layout::{ContentEntry, LayoutDocument};
use layoutgen_core::verify::{check, ChangeKind};
use layoutgen_core::walk::WalkOptions;
use std::fs;
use std::path::Path;

fn generate(td: &Path) -> GenerateConfig {
    let root = td.join("pkg");
    fs::create_dir_all(root.join("SimObjects")).unwrap();
    fs::write(root.join("SimObjects/model.bin"), vec![7u8; 2048]).unwrap();
    fs::write(root.join("ContentInfo.txt"), b"info").unwrap();
    fs::write(td.join("manifest-base.json"), r#"{"title":"t"}"#).unwrap();
    fs::write(td.join("package.json"), r#"{"version":"1.0.0"}"#).unwrap();
    let cfg = GenerateConfig {
        root,
        base_manifest: td.join("manifest-base.json"),
        package: td.join("package.json"),
        walk: WalkOptions::default(),
        dry_run: false,
        progress: false,
    };
    Generator::generate(&cfg).unwrap();
    cfg
}

#[test]
fn fresh_layout_is_clean() {
    let td = tempfile::tempdir().unwrap();
    let cfg = generate(td.path());
    let rep = check(&cfg.root, &WalkOptions::default()).unwrap();
    assert!(rep.is_clean(), "{:?}", rep);
    assert_eq!(rep.checked, 2);
    assert_eq!(rep.recorded_size, 2048 + 4);
}

#[test]
fn reports_missing_extra_and_changed() {
    let td = tempfile::tempdir().unwrap();
    let cfg = generate(td.path());
    let root = &cfg.root;
    fs::remove_file(root.join("ContentInfo.txt")).unwrap();
    fs::write(root.join("SimObjects/new.cfg"), b"new").unwrap();
    fs::write(root.join("SimObjects/model.bin"), vec![7u8; 100]).unwrap();

    let rep = check(root, &WalkOptions::default()).unwrap();
    assert!(!rep.is_clean());
    assert_eq!(rep.missing, ["ContentInfo.txt"]);
    assert_eq!(rep.extra, ["SimObjects/new.cfg"]);
    assert_eq!(rep.changed.len(), 1);
    assert_eq!(rep.changed[0].path, "SimObjects/model.bin");
    assert_eq!(rep.changed[0].kind, ChangeKind::Size { recorded: 2048, actual: 100 });
}

#[test]
fn touched_file_reports_date_change() {
    let td = tempfile::tempdir().unwrap();
    let cfg = generate(td.path());
    let target = cfg.root.join("ContentInfo.txt");
    set_file_mtime(&target, FileTime::from_unix_time(1_700_000_000, 0)).unwrap();
    let rep = check(&cfg.root, &WalkOptions::default()).unwrap();
    assert_eq!(rep.changed.len(), 1);
    match &rep.changed[0].kind {
        ChangeKind::Date { actual, .. } => assert_eq!(*actual, 133_444_736_000_000_000),
        other => panic!("unexpected change {:?}", other),
    }
    assert!(rep.changed[0].kind.to_string().starts_with("date "));
}

#[test]
fn missing_layout_is_an_error() {
    let td = tempfile::tempdir().unwrap();
    let err = check(td.path(), &WalkOptions::default()).expect_err("no layout.json");
    assert!(format!("{:#}", err).contains("layout.json"));
}

#[test]
fn traversal_in_layout_is_rejected() {
    let td = tempfile::tempdir().unwrap();
    let cfg = generate(td.path());
    let doc = LayoutDocument {
        content: vec![ContentEntry { path: "../package.json".into(), size: 1, date: 1 }],
    };
    fs::write(cfg.root.join("layout.json"), serde_json::to_string_pretty(&doc).unwrap()).unwrap();
    let err = check(&cfg.root, &WalkOptions::default()).expect_err("expected traversal error");
    assert!(format!("{:#}", err).contains("parent traversal"));
}

#[test]
fn overflowing_recorded_sizes_are_an_error() {
    let td = tempfile::tempdir().unwrap();
    let cfg = generate(td.path());
    let doc = LayoutDocument {
        content: vec![
            ContentEntry { path: "ContentInfo.txt".into(), size: u64::MAX, date: 1 },
            ContentEntry { path: "SimObjects/model.bin".into(), size: 1, date: 1 },
        ],
    };
    assert!(doc.total_size().is_err());
    fs::write(cfg.root.join("layout.json"), serde_json::to_string_pretty(&doc).unwrap()).unwrap();
    let err = check(&cfg.root, &WalkOptions::default()).expect_err("expected overflow");
    assert!(format!("{:#}", err).contains("recorded sizes overflow"));
}

#[cfg(target_family = "unix")]
#[test]
fn linked_file_checks_clean() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path().join("pkg");
    fs::create_dir_all(&root).unwrap();
    fs::write(td.path().join("asset.bin"), vec![1u8; 64]).unwrap();
    std::os::unix::fs::symlink(td.path().join("asset.bin"), root.join("asset.bin")).unwrap();
    fs::write(td.path().join("manifest-base.json"), "{}").unwrap();
    fs::write(td.path().join("package.json"), r#"{"version":"1.0.0"}"#).unwrap();
    let cfg = GenerateConfig {
        root: root.clone(),
        base_manifest: td.path().join("manifest-base.json"),
        package: td.path().join("package.json"),
        walk: WalkOptions::default(),
        dry_run: false,
        progress: false,
    };
    let gen = Generator::generate(&cfg).unwrap();
    assert_eq!(gen.total_size, 64);

    let rep = check(&root, &WalkOptions::default()).unwrap();
    assert!(rep.is_clean(), "{:?}", rep);
    assert_eq!(rep.recorded_size, 64);
}
