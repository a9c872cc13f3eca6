//! Tests for the session and submission identifiers

use core_kernel::{QuoteSessionId, SubmissionId};
use proptest::prelude::*;
use uuid::Uuid;

mod session_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = QuoteSessionId::new();
        let id2 = QuoteSessionId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(QuoteSessionId::prefix(), "QSN");
    }

    #[test]
    fn test_from_str_accepts_bare_uuid() {
        let uuid = Uuid::new_v4();
        let parsed: QuoteSessionId = uuid.to_string().parse().unwrap();
        assert_eq!(*parsed.as_uuid(), uuid);
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!("QSN-not-a-uuid".parse::<QuoteSessionId>().is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = QuoteSessionId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    }
}

mod submission_id_tests {
    use super::*;

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = SubmissionId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = SubmissionId::new_v7();
        let uuid1: Uuid = id1.into();
        let uuid2: Uuid = id2.into();
        assert!(uuid1 < uuid2);
    }

    #[test]
    fn test_display_format() {
        let id = SubmissionId::new();
        assert!(id.to_string().starts_with("SUB-"));
    }
}

proptest! {
    #[test]
    fn prop_display_parse_identity(bytes in any::<[u8; 16]>()) {
        let id = SubmissionId::from_uuid(Uuid::from_bytes(bytes));
        let parsed: SubmissionId = id.to_string().parse().unwrap();
        prop_assert_eq!(id, parsed);
    }
}
