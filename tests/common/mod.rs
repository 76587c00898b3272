//! Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

/// Route `tracing` output through the test harness (`RUST_LOG=debug` to see it)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// 2025-01-20 13:23:30 UTC
pub fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 20, 13, 23, 30).unwrap()
}

/// `created_at()` with a fixed offset, as stored on records
pub fn created_at_fixed() -> DateTime<FixedOffset> {
    created_at().fixed_offset()
}
