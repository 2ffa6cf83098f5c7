//! Integration tests for `DaySet` lookup, snapping, and the registry.
//!
//! Every test builds its own `CalendarRegistry` so none of them touch the
//! process-wide cache.

use td_core::Error;
use td_time::{CalendarRegistry, DayMap, DaySet, MissingPolicy};

/// `{2025: {1: [1, 11, 21], 2: [1, 11, 21]}}`.
fn sparse(reg: &CalendarRegistry) -> DaySet {
    reg.register(
        "sparse",
        [20250101, 20250111, 20250121, 20250201, 20250211, 20250221],
    )
    .unwrap()
}

// ─── Resolution ───────────────────────────────────────────────────────────────

#[test]
fn members_resolve_to_themselves() {
    let reg = CalendarRegistry::new();
    let cal = sparse(&reg);
    for raw in cal.to_compact_dates() {
        for policy in [MissingPolicy::UseNext, MissingPolicy::UseBefore, MissingPolicy::Raise] {
            assert_eq!(reg.date(raw, "sparse", policy).unwrap().as_int(), raw);
        }
    }
}

#[test]
fn missing_policies_snap_or_raise() {
    let reg = CalendarRegistry::new();
    sparse(&reg);
    let before = reg.date(20250105, "sparse", MissingPolicy::UseBefore).unwrap();
    let next = reg.date(20250105, "sparse", MissingPolicy::UseNext).unwrap();
    assert_eq!(before.as_int(), 20250101);
    assert_eq!(next.as_int(), 20250111);
    assert_eq!(
        reg.date(20250105, "sparse", MissingPolicy::Raise).unwrap_err(),
        Error::NotOnCalendar {
            date: 20250105,
            calendar: "sparse".into()
        }
    );
}

#[test]
fn snapping_across_month_boundary() {
    let reg = CalendarRegistry::new();
    sparse(&reg);
    assert_eq!(reg.date("2025-01-25", "sparse", MissingPolicy::UseNext).unwrap(), 20250201_i64);
    assert_eq!(reg.date("20250131", "sparse", MissingPolicy::UseBefore).unwrap(), 20250121_i64);
}

#[test]
fn snapping_past_either_edge_is_out_of_range() {
    let reg = CalendarRegistry::new();
    sparse(&reg);
    let err = reg.date(20250222, "sparse", MissingPolicy::UseNext).unwrap_err();
    match err {
        Error::OutOfRange { start, end, calendar, .. } => {
            assert_eq!((start, end), (20250101, 20250221));
            assert_eq!(calendar, "sparse");
        }
        other => panic!("expected OutOfRange, got {other:?}"),
    }
    assert!(reg
        .date(20241231, "sparse", MissingPolicy::UseBefore)
        .unwrap_err()
        .is_out_of_range());
}

#[test]
fn malformed_input_is_invalid_argument() {
    let reg = CalendarRegistry::new();
    sparse(&reg);
    for raw in ["2025/01/01", "", "202501"] {
        assert!(matches!(
            reg.date(raw, "sparse", MissingPolicy::UseNext),
            Err(Error::InvalidArgument(_))
        ));
    }
}

// ─── Registry ─────────────────────────────────────────────────────────────────

#[test]
fn empty_registration_and_unknown_id_are_invalid() {
    let reg = CalendarRegistry::new();
    assert!(matches!(
        reg.register("empty", Vec::<i64>::new()),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(reg.get("unregistered"), Err(Error::InvalidArgument(_))));
    assert!(!reg.contains("empty"));
}

#[test]
fn reregistration_replaces_data() {
    let reg = CalendarRegistry::new();
    let old = sparse(&reg);
    let held = old.get(20250111).unwrap();
    reg.register("sparse", [20300101]).unwrap();
    assert_eq!(reg.get("sparse").unwrap().to_compact_dates(), vec![20300101]);
    // Dates already handed out keep stepping over the old data.
    assert_eq!(held.add_days(1).unwrap(), 20250121_i64);
}

#[test]
fn register_map_validates() {
    let reg = CalendarRegistry::new();
    let mut days = DayMap::new();
    days.entry(2024).or_default().insert(2, vec![28, 29]);
    assert_eq!(reg.register_map("leap", days).unwrap().len(), 2);

    let mut bad = DayMap::new();
    bad.entry(2025).or_default().insert(2, vec![28, 29]);
    assert!(reg.register_map("bad", bad).is_err());
}

#[test]
fn remove_and_ids() {
    let reg = CalendarRegistry::new();
    reg.register("b", [20250102]).unwrap();
    reg.register("a", [20250102]).unwrap();
    assert_eq!(reg.ids(), vec!["a".to_string(), "b".to_string()]);
    assert!(reg.remove("a").is_some());
    assert!(reg.remove("a").is_none());
    assert_eq!(reg.ids(), vec!["b".to_string()]);
}

#[test]
fn builtin_chinese_calendar() {
    let reg = CalendarRegistry::with_builtin();
    reg.set_span(20240101, 20241231);
    let cal = reg.get("chinese").unwrap();
    // New Year and National Day golden week are closed.
    assert!(!cal.contains(20240101));
    assert!(!cal.contains(20241001));
    assert!(!cal.contains(20241007));
    assert!(cal.contains(20240102));
    assert!(cal.contains(20241008));
    // Weekends are closed.
    assert!(!cal.contains(20240106));
    assert_eq!(cal.start().as_int(), 20240102);
    assert_eq!(cal.end().as_int(), 20241231);
    // Cached: the same data comes back.
    assert_eq!(reg.get("chinese").unwrap().len(), cal.len());
}

#[test]
fn registry_is_shared_across_threads() {
    let reg = CalendarRegistry::with_builtin();
    reg.set_span(20240101, 20240331);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let reg = reg.clone();
            std::thread::spawn(move || reg.get("chinese").map(|c| c.len()))
        })
        .collect();
    let lens: Vec<usize> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();
    assert!(lens.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(reg.ids(), vec!["chinese".to_string()]);
}
