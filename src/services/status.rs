//! Service status
//!
//! Runtime information reported by `GET /api/status`.

use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Runtime status of the server
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub build: BuildInfo,

    /// `in-memory` or the database file path
    pub database: String,
    pub database_size_bytes: Option<u64>,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Collects runtime information since startup
#[derive(Debug)]
pub struct StatusTracker {
    start_time: Instant,
    database_path: Option<PathBuf>,
}

impl StatusTracker {
    /// `None` means an in-memory database
    pub fn new(database_path: Option<PathBuf>) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    pub fn get_status(&self) -> ServiceStatus {
        let (database, database_size_bytes) = match &self.database_path {
            Some(path) => (
                path.display().to_string(),
                std::fs::metadata(path).ok().map(|m| m.len()),
            ),
            None => ("in-memory".to_owned(), None),
        };

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));
        let memory_usage_bytes = sys.process(Pid::from_u32(pid)).map(|p| p.memory()).unwrap_or(0);

        ServiceStatus {
            build: BuildInfo::current(),
            database,
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_status() {
        let status = StatusTracker::new(None).get_status();
        assert_eq!(status.database, "in-memory");
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
        assert_eq!(status.build.name, "fitcompanion");
    }

    #[test]
    fn test_missing_database_file_has_no_size() {
        let status = StatusTracker::new(Some(PathBuf::from("/nonexistent/fitcompanion.db"))).get_status();
        assert_eq!(status.database, "/nonexistent/fitcompanion.db");
        assert!(status.database_size_bytes.is_none());
    }
}
