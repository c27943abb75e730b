//! Recurring-installment expansion.
//!
//! A recurring obligation request is expanded into N monthly installments
//! sharing a recurrence group id. Installment 1 is the request itself;
//! installments 2..=N are continuations with issue and due dates advanced by
//! whole calendar months, always created pending.

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

/// Adds `months` calendar months to a date, clamping to the end of the
/// target month when the day does not exist there (Jan 31 + 1 month is
/// Feb 28, or Feb 29 in a leap year — never Mar 3).
#[must_use]
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    #[allow(clippy::cast_possible_wrap)]
    let total = date.year() * 12 + i32::try_from(date.month0()).unwrap_or(0) + months as i32;
    let year = total.div_euclid(12);
    let month = u32::try_from(total.rem_euclid(12)).unwrap_or(0) + 1;
    let day = date.day().min(last_day_of_month(year, month));

    // Clamped day is always valid for (year, month); fall back to the
    // original date only if the year arithmetic overflowed chrono's range.
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

/// Number of days in the given month.
const fn last_day_of_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) {
                29
            } else {
                28
            }
        }
    }
}

/// Dates for one continuation installment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallmentDates {
    /// 1-based installment index (2..=N for continuations).
    pub installment_no: u32,
    /// Issue date, advanced from the template.
    pub issued_on: NaiveDate,
    /// Due date, advanced from the template.
    pub due_on: NaiveDate,
}

/// The expansion of one recurring request.
#[derive(Debug, Clone)]
pub struct RecurrencePlan {
    /// Group id shared by every installment in the series.
    pub group_id: Uuid,
    /// Total number of installments (N).
    pub installment_count: u32,
    /// Installments 2..=N. Installment 1 is the originating request.
    pub continuations: Vec<InstallmentDates>,
}

/// Plans the continuation installments for a recurring request.
///
/// Returns `None` when `installment_count < 2` — a single-installment
/// request is not a series and gets no group id.
#[must_use]
pub fn plan_installments(
    issued_on: NaiveDate,
    due_on: NaiveDate,
    installment_count: u32,
) -> Option<RecurrencePlan> {
    if installment_count < 2 {
        return None;
    }

    let continuations = (2..=installment_count)
        .map(|i| InstallmentDates {
            installment_no: i,
            issued_on: add_months(issued_on, i - 1),
            due_on: add_months(due_on, i - 1),
        })
        .collect();

    Some(RecurrencePlan {
        group_id: Uuid::new_v4(),
        installment_count,
        continuations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(date(2025, 1, 31), 1, date(2025, 2, 28))]
    #[case(date(2024, 1, 31), 1, date(2024, 2, 29))]
    #[case(date(2025, 1, 31), 2, date(2025, 3, 31))]
    #[case(date(2025, 1, 31), 3, date(2025, 4, 30))]
    #[case(date(2025, 3, 15), 1, date(2025, 4, 15))]
    #[case(date(2025, 11, 30), 2, date(2026, 1, 30))]
    #[case(date(2025, 12, 31), 1, date(2026, 1, 31))]
    #[case(date(2024, 2, 29), 12, date(2025, 2, 28))]
    fn test_add_months(#[case] from: NaiveDate, #[case] months: u32, #[case] expected: NaiveDate) {
        assert_eq!(add_months(from, months), expected);
    }

    #[test]
    fn test_add_zero_months_is_identity() {
        let d = date(2025, 6, 17);
        assert_eq!(add_months(d, 0), d);
    }

    #[test]
    fn test_plan_none_for_single_installment() {
        assert!(plan_installments(date(2025, 1, 1), date(2025, 1, 10), 1).is_none());
        assert!(plan_installments(date(2025, 1, 1), date(2025, 1, 10), 0).is_none());
    }

    #[test]
    fn test_plan_fan_out() {
        let plan = plan_installments(date(2025, 1, 15), date(2025, 1, 31), 4).unwrap();

        assert_eq!(plan.installment_count, 4);
        assert_eq!(plan.continuations.len(), 3);

        let numbers: Vec<u32> = plan.continuations.iter().map(|c| c.installment_no).collect();
        assert_eq!(numbers, vec![2, 3, 4]);

        let due: Vec<NaiveDate> = plan.continuations.iter().map(|c| c.due_on).collect();
        assert_eq!(
            due,
            vec![date(2025, 2, 28), date(2025, 3, 31), date(2025, 4, 30)]
        );

        let issued: Vec<NaiveDate> = plan.continuations.iter().map(|c| c.issued_on).collect();
        assert_eq!(
            issued,
            vec![date(2025, 2, 15), date(2025, 3, 15), date(2025, 4, 15)]
        );
    }

    #[test]
    fn test_plans_get_distinct_group_ids() {
        let a = plan_installments(date(2025, 1, 1), date(2025, 1, 10), 3).unwrap();
        let b = plan_installments(date(2025, 1, 1), date(2025, 1, 10), 3).unwrap();
        assert_ne!(a.group_id, b.group_id);
    }

    /// Strategy for arbitrary valid dates in a wide range.
    fn date_strategy() -> impl Strategy<Value = NaiveDate> {
        (1990i32..2100, 1u32..=12, 1u32..=31).prop_map(|(y, m, d)| {
            let d = d.min(last_day_of_month(y, m));
            NaiveDate::from_ymd_opt(y, m, d).unwrap()
        })
    }

    proptest! {
        /// The day of month is preserved whenever the target month has it,
        /// and clamped to the target month's last day otherwise.
        #[test]
        fn prop_day_preserved_or_clamped(d in date_strategy(), months in 0u32..48) {
            let out = add_months(d, months);
            let last = last_day_of_month(out.year(), out.month());
            if d.day() <= last {
                prop_assert_eq!(out.day(), d.day());
            } else {
                prop_assert_eq!(out.day(), last);
            }
        }

        /// Month arithmetic lands exactly `months` calendar months ahead.
        #[test]
        fn prop_month_offset_exact(d in date_strategy(), months in 0u32..48) {
            let out = add_months(d, months);
            let from = d.year() * 12 + i32::try_from(d.month0()).unwrap();
            let to = out.year() * 12 + i32::try_from(out.month0()).unwrap();
            prop_assert_eq!(to - from, i32::try_from(months).unwrap());
        }

        /// Due dates strictly increase across a series.
        #[test]
        fn prop_series_strictly_increasing(d in date_strategy(), count in 2u32..24) {
            let plan = plan_installments(d, d, count).unwrap();
            let mut prev = d;
            for c in &plan.continuations {
                prop_assert!(c.due_on > prev);
                prev = c.due_on;
            }
        }

        /// A series always has exactly N-1 continuations numbered 2..=N.
        #[test]
        fn prop_series_shape(d in date_strategy(), count in 2u32..24) {
            let plan = plan_installments(d, d, count).unwrap();
            prop_assert_eq!(plan.continuations.len() as u32, count - 1);
            for (offset, c) in plan.continuations.iter().enumerate() {
                prop_assert_eq!(c.installment_no as usize, offset + 2);
            }
        }
    }
}
