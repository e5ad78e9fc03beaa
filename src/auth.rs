//! Anonymous session identity.
//!
//! Every connection gets a stable opaque identifier, issued on the first
//! `Hello` and echoed back by the client on later connections so a browser
//! session keeps its player identity across reconnects. Until `Hello`
//! completes a connection has no identity and every mutation is refused.

use crate::types::PlayerId;

/// True if the string is an identifier this server could have issued.
pub fn is_valid_session(id: &str) -> bool {
    ulid::Ulid::from_string(id).is_ok()
}

/// Resolve the session identity: reuse a well-formed client-supplied id,
/// otherwise issue a fresh one.
pub fn establish(existing: Option<&str>) -> PlayerId {
    match existing {
        Some(id) if is_valid_session(id) => id.to_string(),
        _ => ulid::Ulid::new().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_establish_issues_valid_ids() {
        let id = establish(None);
        assert!(is_valid_session(&id));
    }

    #[test]
    fn test_establish_reuses_wellformed_ids() {
        let first = establish(None);
        let second = establish(Some(&first));
        assert_eq!(first, second);
    }

    #[test]
    fn test_establish_replaces_garbage() {
        let id = establish(Some("not-a-session"));
        assert_ne!(id, "not-a-session");
        assert!(is_valid_session(&id));
    }
}
