//! Result persistence

use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::api::Event;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write `events` as a pretty-printed (2-space) JSON array, replacing any
/// existing file. Parent directories are created when missing.
pub fn write_events<P: AsRef<Path>>(path: P, events: &[Event]) -> Result<(), OutputError> {
    let path = path.as_ref();
    let io_err = |source: std::io::Error| OutputError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let content = serde_json::to_string_pretty(events)?;
    std::fs::write(path, content).map_err(io_err)?;

    info!("All data saved to → {}", path.display());
    Ok(())
}

/// Read a previously written result file
pub fn read_events<P: AsRef<Path>>(path: P) -> Result<Vec<Event>, OutputError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| OutputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_then_read_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let events = vec![
            Event(json!({"event_id": "b", "name": "Second"})),
            Event(json!({"event_id": "a", "name": "First"})),
            Event(json!({"event_id": "b", "name": "Second again"})),
        ];

        write_events(&path, &events).unwrap();

        assert_eq!(read_events(&path).unwrap(), events);
    }

    #[test]
    fn test_empty_array_and_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        write_events(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");

        write_events(&path, &[Event(json!({"event_id": 1}))]).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[\n  {\n    \"event_id\": 1\n  }\n]"
        );
    }

    #[test]
    fn test_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.json");
        write_events(&path, &[]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_failure_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be overwritten as a file
        let err = write_events(dir.path(), &[]).unwrap_err();
        assert!(matches!(err, OutputError::Io { .. }));
        assert!(err.to_string().contains(&dir.path().display().to_string()));
    }
}
