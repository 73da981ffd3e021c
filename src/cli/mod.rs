//! Operator commands run against the configured database outside the server.

pub mod doctor;
pub mod export;
pub mod import;
pub mod legacy;
pub mod reset;
pub mod stats;

use anyhow::Result;
use rusqlite::Connection;

use crate::config::LaneConfig;

/// Open the configured database, creating and migrating it if needed.
fn open(config: &LaneConfig) -> Result<Connection> {
    crate::db::open_database(config.resolved_db_path())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_are_humanized() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
