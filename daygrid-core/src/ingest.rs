//! Session list input.
//!
//! The schedule backend exports sessions as a JSON array. Known fields map
//! onto [`Session`]; everything else is kept in the opaque display payload.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Session;

/// Parse a JSON array of sessions.
///
/// Times are not validated here; the layout engine reports bad times when
/// the day containing them is built. Duplicate ids are rejected up front.
pub fn parse_sessions(json: &str) -> Result<Vec<Session>> {
    let sessions: Vec<Session> = serde_json::from_str(json)?;

    let mut seen = HashSet::with_capacity(sessions.len());
    for session in &sessions {
        if !seen.insert(&session.id) {
            return Err(Error::DuplicateSessionId(session.id.to_string()));
        }
    }

    Ok(sessions)
}

/// Read and parse a session file.
pub fn load_sessions(path: impl AsRef<Path>) -> Result<Vec<Session>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let sessions = parse_sessions(&content)?;

    tracing::info!(
        path = %path.display(),
        sessions = sessions.len(),
        "Loaded sessions"
    );

    Ok(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sessions() {
        let json = r#"[
            {"id": "1", "date": "2025-03-10", "start_time": "06:00", "end_time": "07:00", "title": "Swim"},
            {"id": "2", "date": "2025-03-11", "start_time": "18:00", "end_time": "19:30"}
        ]"#;
        let sessions = parse_sessions(json).unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].display.title, "Swim");
        assert!(sessions[1].display.title.is_empty());
        assert!(sessions[1].display.participants.is_empty());
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_sessions("[]").unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_ids() {
        let json = r#"[
            {"id": "1", "date": "2025-03-10", "start_time": "06:00", "end_time": "07:00"},
            {"id": "1", "date": "2025-03-10", "start_time": "08:00", "end_time": "09:00"}
        ]"#;
        assert!(matches!(
            parse_sessions(json),
            Err(Error::DuplicateSessionId(id)) if id == "1"
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_sessions("{"), Err(Error::Json(_))));
        // date is required
        let json = r#"[{"id": "1", "start_time": "06:00", "end_time": "07:00"}]"#;
        assert!(matches!(parse_sessions(json), Err(Error::Json(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_sessions(dir.path().join("missing.json")),
            Err(Error::Io(_))
        ));
    }
}
