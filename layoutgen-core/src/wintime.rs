//! Conversion from Unix time to Windows FILETIME units.
//!
//! A FILETIME counts 100-nanosecond intervals since 1601-01-01T00:00:00Z.

use anyhow::{anyhow, Result};
use std::time::{SystemTime, UNIX_EPOCH};

/// 100-ns intervals between 1601-01-01 and 1970-01-01.
pub const EPOCH_OFFSET: u64 = 116_444_736_000_000_000;

/// Nanoseconds per FILETIME tick.
pub const NANOS_PER_TICK: i128 = 100;

/// `floor(ns / 100) + EPOCH_OFFSET`.
///
/// Times before 1970 floor towards negative infinity; times before 1601
/// have no FILETIME representation and are rejected.
pub fn unix_nanos_to_filetime(ns: i128) -> Result<u64> {
    let ticks = ns.div_euclid(NANOS_PER_TICK) + EPOCH_OFFSET as i128;
    u64::try_from(ticks).map_err(|_| anyhow!("timestamp {}ns is outside the FILETIME range", ns))
}

/// Signed nanoseconds since the Unix epoch.
pub fn system_time_to_nanos(t: SystemTime) -> i128 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_nanos() as i128,
        Err(before) => -(before.duration().as_nanos() as i128),
    }
}

pub fn system_time_to_filetime(t: SystemTime) -> Result<u64> {
    unix_nanos_to_filetime(system_time_to_nanos(t))
}
