//! Integration tests for `TradingDate` arithmetic and comparison.

use td_core::Error;
use td_time::{CalendarRegistry, DaySet, MissingPolicy, TradingDate, Weekday};

fn january_only(reg: &CalendarRegistry) -> DaySet {
    reg.register("jan", [20250101, 20250111, 20250121]).unwrap()
}

fn two_months(reg: &CalendarRegistry) -> DaySet {
    reg.register(
        "two",
        [20250101, 20250111, 20250121, 20250201, 20250211, 20250221],
    )
    .unwrap()
}

fn at(cal: &DaySet, raw: i64) -> TradingDate {
    cal.get(raw).unwrap()
}

// ─── Month rollover ───────────────────────────────────────────────────────────

#[test]
fn add_past_calendar_end_is_out_of_range() {
    let reg = CalendarRegistry::new();
    let cal = january_only(&reg);
    let d = at(&cal, 20250121);
    assert_eq!((&d - 1).unwrap(), at(&cal, 20250111));
    assert!(matches!(&d + 1, Err(Error::OutOfRange { .. })));
}

#[test]
fn add_rolls_into_next_month() {
    let reg = CalendarRegistry::new();
    let cal = two_months(&reg);
    let d = at(&cal, 20250121);
    assert_eq!((&d + 1).unwrap().as_int(), 20250201);
}

// ─── Arithmetic ───────────────────────────────────────────────────────────────

#[test]
fn multi_month_steps() {
    let reg = CalendarRegistry::new();
    let cal = two_months(&reg);
    let first = cal.start();
    assert_eq!(first.add_days(5).unwrap(), cal.end());
    assert_eq!(cal.end().sub_days(5).unwrap(), first);
    assert!(first.add_days(6).unwrap_err().is_out_of_range());
    assert!(first.sub_days(1).unwrap_err().is_out_of_range());
}

#[test]
fn round_trip_over_whole_calendar() {
    let reg = CalendarRegistry::new();
    let cal = two_months(&reg);
    let all: Vec<TradingDate> = cal.iter().collect();
    for (i, x) in all.iter().enumerate() {
        for n in 0..all.len() as i64 {
            if i as i64 + n < all.len() as i64 {
                let there = x.add_days(n).unwrap();
                assert_eq!(there, all[i + n as usize]);
                assert_eq!(there.sub_days(n).unwrap(), *x);
            }
            if i as i64 - n >= 0 {
                assert_eq!(x.sub_days(n).unwrap().add_days(n).unwrap(), *x);
            }
        }
    }
}

#[test]
fn next_and_last_walk_the_calendar() {
    let reg = CalendarRegistry::new();
    let cal = two_months(&reg);
    let mut forward = vec![cal.start()];
    while let Ok(n) = forward.last().unwrap().next() {
        forward.push(n);
    }
    assert_eq!(
        forward.iter().map(TradingDate::as_int).collect::<Vec<_>>(),
        cal.to_compact_dates()
    );
    let mut backward = vec![cal.end()];
    while let Ok(p) = backward.last().unwrap().last() {
        backward.push(p);
    }
    backward.reverse();
    assert_eq!(backward, forward);
}

// ─── Accessors and comparison ─────────────────────────────────────────────────

#[test]
fn accessors() {
    let reg = CalendarRegistry::new();
    let cal = two_months(&reg);
    let d = at(&cal, 20250211);
    assert_eq!((d.year(), d.month(), d.day()), (2025, 2, 11));
    assert_eq!(d.as_int(), 20250211);
    assert_eq!(d.as_str(), "20250211");
    assert_eq!(d.to_string(), "20250211");
    assert_eq!(d.weekday(), Weekday::Tuesday);
    assert_eq!(d.to_date().to_string(), "2025-02-11");
    assert_eq!(d.calendar().id(), "two");
    assert_eq!(format!("{d:?}"), "TradingDate(20250211, two)");
}

#[test]
fn ordering_follows_encoding() {
    let reg = CalendarRegistry::new();
    let cal = two_months(&reg);
    let a = at(&cal, 20250121);
    let b = at(&cal, 20250201);
    assert!(a < b);
    assert!(a < 20250122_i64);
    assert!(b >= 20250201_i64);
    let mut shuffled = vec![b.clone(), a.clone(), cal.end(), cal.start()];
    shuffled.sort();
    assert_eq!(shuffled.first().unwrap(), &cal.start());
    assert_eq!(shuffled.last().unwrap(), &cal.end());
}

#[test]
fn dates_from_different_calendars_compare_by_value() {
    let reg = CalendarRegistry::new();
    let one = january_only(&reg);
    let two = two_months(&reg);
    assert_eq!(at(&one, 20250111), at(&two, 20250111));
    let resolved = reg.date(20250115, "two", MissingPolicy::UseBefore).unwrap();
    assert_eq!(resolved, at(&one, 20250111));
}
