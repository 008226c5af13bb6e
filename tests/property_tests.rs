//! Property-based tests for logtee using proptest

use logtee::adapters::pairs_to_fields;
use logtee::prelude::*;
use logtee::LevelRouter;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
        Just(LogLevel::Panic),
    ]
}

fn any_level_set() -> impl Strategy<Value = BTreeSet<LogLevel>> {
    prop::collection::btree_set(any_level(), 0..=6)
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Upper and lower case names parse back to the same level
    #[test]
    fn test_log_level_str_roundtrip(level in any_level(), upper in any::<bool>()) {
        let name = if upper { level.to_str() } else { level.as_lowercase() };
        let parsed: LogLevel = name.parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Ordering follows severity
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        let val1 = level1 as u8;
        let val2 = level2 as u8;

        prop_assert_eq!(level1 <= level2, val1 <= val2);
        prop_assert_eq!(level1 < level2, val1 < val2);
        prop_assert_eq!(level1 > level2, val1 > val2);
    }

    /// Unknown names are rejected with the offending name
    #[test]
    fn test_unknown_level_rejected(name in "[a-z]{1,12}") {
        prop_assume!(LogLevel::ALL.iter().all(|l| l.as_lowercase() != name) && name != "warning");

        match name.parse::<LogLevel>() {
            Err(LoggerError::InvalidLevel { name: rejected }) => prop_assert_eq!(rejected, name),
            other => prop_assert!(false, "unexpected parse result {:?}", other),
        }
    }
}

// ============================================================================
// Routing Tests
// ============================================================================

proptest! {
    /// A generic router accepts a level iff it meets the threshold and is not excepted
    #[test]
    fn test_at_least_router(threshold in any_level(), except in any_level_set(), level in any_level()) {
        let router = LevelRouter::at_least(threshold).except(except.iter().copied());
        prop_assert_eq!(router.accepts(level), level >= threshold && !except.contains(&level));
    }

    /// A dedicated router accepts exactly its own level
    #[test]
    fn test_exactly_router(target in any_level(), level in any_level()) {
        prop_assert_eq!(LevelRouter::exactly(target).accepts(level), level == target);
    }

    /// Re-thresholding keeps the exception set
    #[test]
    fn test_with_threshold_keeps_exceptions(
        first in any_level(),
        second in any_level(),
        except in any_level_set(),
        level in any_level(),
    ) {
        let router = LevelRouter::at_least(first)
            .except(except.iter().copied())
            .with_threshold(second);
        prop_assert_eq!(router.threshold(), second);
        prop_assert_eq!(router.accepts(level), level >= second && !except.contains(&level));
    }

    /// A generic sink plus one dedicated sink per redirected level delivers
    /// redirected levels exactly once and the rest at most once
    #[test]
    fn test_routing_delivers_once(threshold in any_level(), redirected in any_level_set()) {
        let mut routers = vec![LevelRouter::at_least(threshold).except(redirected.iter().copied())];
        routers.extend(redirected.iter().map(|level| LevelRouter::exactly(*level)));

        for level in LogLevel::ALL {
            let deliveries = routers.iter().filter(|r| r.accepts(level)).count();
            let expected = if redirected.contains(&level) || level >= threshold { 1 } else { 0 };
            prop_assert_eq!(deliveries, expected, "level {}", level);
        }
    }
}

// ============================================================================
// Record Tests
// ============================================================================

proptest! {
    /// Newlines are escaped in log messages (prevents log injection)
    #[test]
    fn test_message_sanitization(message in ".*") {
        let entry = LogEntry::new(LogLevel::Info, &message);

        prop_assert!(!entry.message.contains('\n'));
        prop_assert!(!entry.message.contains('\r'));
        prop_assert!(!entry.message.contains('\t'));
    }

    /// Messages without control characters are kept verbatim
    #[test]
    fn test_plain_message_unchanged(message in "[a-zA-Z0-9 .,:;!?-]*") {
        let entry = LogEntry::new(LogLevel::Warn, &message);
        prop_assert_eq!(entry.message, message);
    }

    /// Alternating key/value lists pair up, an orphan value gets its own field
    #[test]
    fn test_pairs_to_fields_count(values in prop::collection::vec(any::<i64>(), 0..20)) {
        let count = values.len();
        let fields = pairs_to_fields(values.into_iter().map(FieldValue::from));

        prop_assert_eq!(fields.len(), count.div_ceil(2));
        if count % 2 == 1 {
            prop_assert_eq!(&fields[fields.len() - 1].key, &format!("data{}", count));
        }
    }
}

// ============================================================================
// Logger Tests
// ============================================================================

proptest! {
    /// Derived names join with dots; the display name is the last segment
    #[test]
    fn test_derive_name_path(segments in prop::collection::vec("[a-z][a-z0-9_]{0,8}", 1..6)) {
        let mut logger = Logger::detached();
        for segment in &segments {
            logger = logger.derive(segment);
        }

        prop_assert_eq!(logger.name_path(), segments.join("."));
        prop_assert_eq!(logger.name(), segments.last().unwrap().as_str());
    }

    /// A key attached once on a branch is never attached again below it
    #[test]
    fn test_with_when_not_exist_idempotent(key in "[a-z]{1,8}", repeats in 1usize..6) {
        let mut logger = Logger::detached();
        for i in 0..repeats {
            logger = logger
                .derive("step")
                .with_when_not_exist(&key, Field::new(key.clone(), i as i64));
        }

        let attached = logger.fields().iter().filter(|f| f.key == key).count();
        prop_assert_eq!(attached, 1);
    }
}
