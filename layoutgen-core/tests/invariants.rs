use layoutgen_core::layout::relative_path;
use layoutgen_core::manifest::format_total_size;
use layoutgen_core::wintime::{system_time_to_filetime, unix_nanos_to_filetime, EPOCH_OFFSET};
use proptest::prelude::*;
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};

#[test]
fn known_filetime_values() {
    assert_eq!(unix_nanos_to_filetime(1_700_000_000_000_000_000).unwrap(), 133_444_736_000_000_000);
    assert_eq!(unix_nanos_to_filetime(0).unwrap(), EPOCH_OFFSET);
    assert_eq!(unix_nanos_to_filetime(99).unwrap(), EPOCH_OFFSET);
    // Floors towards negative infinity before 1970.
    assert_eq!(unix_nanos_to_filetime(-1).unwrap(), EPOCH_OFFSET - 1);
    assert_eq!(unix_nanos_to_filetime(-100).unwrap(), EPOCH_OFFSET - 1);
    assert_eq!(unix_nanos_to_filetime(-101).unwrap(), EPOCH_OFFSET - 2);
}

#[test]
fn before_1601_is_rejected() {
    let ns = -(EPOCH_OFFSET as i128) * 100 - 100;
    assert!(unix_nanos_to_filetime(ns).is_err());
    assert_eq!(unix_nanos_to_filetime(-(EPOCH_OFFSET as i128) * 100).unwrap(), 0);
}

#[test]
fn system_time_matches_nanos() {
    let t = UNIX_EPOCH + Duration::new(1_700_000_000, 250);
    assert_eq!(system_time_to_filetime(t).unwrap(), 133_444_736_000_000_002);
    let before = UNIX_EPOCH - Duration::from_nanos(150);
    assert_eq!(system_time_to_filetime(before).unwrap(), EPOCH_OFFSET - 2);
}

#[test]
fn nested_paths_use_forward_slashes_throughout() {
    let root = Path::new("pkg");
    let p = root.join("sub").join("dir").join("file.txt");
    assert_eq!(relative_path(root, &p).unwrap(), "sub/dir/file.txt");
    assert!(relative_path(root, Path::new("other/file.txt")).is_err());
}

proptest! {
    #[test]
    fn filetime_is_floor_plus_offset(ns in 0i128..(u64::MAX as i128 / 2)) {
        let ft = unix_nanos_to_filetime(ns).unwrap();
        prop_assert_eq!(ft as i128, ns / 100 + EPOCH_OFFSET as i128);
    }

    #[test]
    fn filetime_is_monotonic(a in -1_000_000_000_000i128..1_000_000_000_000i128, d in 0i128..1_000_000) {
        prop_assert!(unix_nanos_to_filetime(a).unwrap() <= unix_nanos_to_filetime(a + d).unwrap());
    }

    #[test]
    fn total_size_string_is_twenty_digits(total in any::<u64>()) {
        let s = format_total_size(total);
        prop_assert_eq!(s.len(), 20);
        prop_assert!(s.bytes().all(|b| b.is_ascii_digit()));
        prop_assert_eq!(s.parse::<u64>().unwrap(), total);
    }

    #[test]
    fn relative_path_joins_segments(segs in proptest::collection::vec("[a-zA-Z0-9_]{1,8}", 1..6)) {
        let root = Path::new("root");
        let mut p = root.to_path_buf();
        for s in &segs {
            p.push(s);
        }
        prop_assert_eq!(relative_path(root, &p).unwrap(), segs.join("/"));
    }
}
