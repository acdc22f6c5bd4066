//! Display formatting, kept apart from the numeric model.

use crate::allocation::Allocation;
use crate::task::TimeFrame;
use rust_decimal::{Decimal, RoundingStrategy};

/// Round the exact binary value to `dp` places, ties away from zero, and
/// always print `dp` digits: `0.25` -> "0.3", `8.0` -> "8.0".
pub fn to_fixed(v: f64, dp: u32) -> String {
    match Decimal::from_f64_retain(v) {
        Some(d) => {
            let mut rounded = d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(dp);
            rounded.to_string()
        }
        // out of Decimal range or not finite
        None => format!("{v:.*}", dp as usize),
    }
}

/// Shortest decimal form: `8.0` -> "8", `2.5` -> "2.5".
pub fn hours(v: f64) -> String {
    format!("{v}")
}

/// One decimal place.
pub fn fixed1(v: f64) -> String {
    to_fixed(v, 1)
}

pub fn percent(v: f64) -> String {
    format!("{}%", to_fixed(v, 1))
}

pub fn hours_noun(v: f64) -> &'static str {
    if v == 1.0 { "hour" } else { "hours" }
}

/// Summary value for the remaining-time row, e.g. "6.0 hours (Overbooked)".
pub fn remaining_value(alloc: &Allocation) -> String {
    let state = if alloc.is_overbooked {
        "Overbooked"
    } else {
        "Available"
    };
    format!("{} hours ({state})", fixed1(alloc.remaining_time.abs()))
}

pub fn status_line(alloc: &Allocation) -> String {
    if alloc.is_overbooked {
        format!(
            "You're overbooked by {} hours",
            fixed1(alloc.remaining_time.abs())
        )
    } else {
        format!("{} hours remaining", fixed1(alloc.remaining_time))
    }
}

pub fn advice_line(alloc: &Allocation, frame: TimeFrame) -> String {
    if alloc.is_overbooked {
        return "Consider reducing time on some tasks".to_string();
    }
    format!(
        "{}% of your {} time is unallocated",
        to_fixed(alloc.percent_of(alloc.remaining_time), 0),
        frame.adjective()
    )
}

pub fn time_frame_line(frame: TimeFrame) -> String {
    format!("Time frame: {} ({} hours)", frame.label(), frame.nominal_hours())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;

    #[test]
    fn hours_drops_trailing_zero() {
        assert_eq!(hours(8.0), "8");
        assert_eq!(hours(2.5), "2.5");
        assert_eq!(hours(0.25), "0.25");
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(percent(100.0 / 3.0), "33.3%");
        assert_eq!(percent(0.0), "0.0%");
    }

    #[test]
    fn remaining_value_marks_overbooking() {
        let tasks = vec![Task::new(1, "a", 30.0)];
        let a = Allocation::compute(&tasks, 24.0);
        assert_eq!(remaining_value(&a), "6.0 hours (Overbooked)");
        assert_eq!(status_line(&a), "You're overbooked by 6.0 hours");
        assert_eq!(advice_line(&a, TimeFrame::Daily), "Consider reducing time on some tasks");
    }

    #[test]
    fn remaining_value_available() {
        let tasks = vec![Task::new(1, "a", 18.0)];
        let a = Allocation::compute(&tasks, 24.0);
        assert_eq!(remaining_value(&a), "6.0 hours (Available)");
        assert_eq!(status_line(&a), "6.0 hours remaining");
        assert_eq!(
            advice_line(&a, TimeFrame::Weekly),
            "25% of your weekly time is unallocated"
        );
    }

    #[test]
    fn quarter_hour_ties_round_up() {
        assert_eq!(fixed1(0.25), "0.3");
        assert_eq!(fixed1(1.25), "1.3");
        assert_eq!(fixed1(2.25), "2.3");
        assert_eq!(fixed1(0.75), "0.8");
        assert_eq!(fixed1(8.0), "8.0");
        assert_eq!(percent(12.5), "12.5%");
        assert_eq!(to_fixed(12.5, 0), "13");
        assert_eq!(to_fixed(0.0, 0), "0");
    }

    #[test]
    fn float_noise_is_not_a_tie() {
        // 1.005 is stored just below the midpoint
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(fixed1(f64::INFINITY), "inf");
    }

    #[test]
    fn near_full_day_rounds_like_the_web_summary() {
        let a = Allocation::compute(&[Task::new(1, "Work", 23.75)], 24.0);
        assert_eq!(remaining_value(&a), "0.3 hours (Available)");
        assert_eq!(status_line(&a), "0.3 hours remaining");

        let a = Allocation::compute(&[Task::new(1, "Work", 21.0)], 24.0);
        assert_eq!(
            advice_line(&a, TimeFrame::Daily),
            "13% of your daily time is unallocated"
        );
    }

    #[test]
    fn nouns_and_frame_line() {
        assert_eq!(hours_noun(1.0), "hour");
        assert_eq!(hours_noun(1.5), "hours");
        assert_eq!(time_frame_line(TimeFrame::Daily), "Time frame: Daily (24 hours)");
    }
}
