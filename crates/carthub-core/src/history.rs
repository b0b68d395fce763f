// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! History reconciliation: overdue detection, battery delta reporting,
//! and filtering over the usage ledger.
//!
//! All views here are pure read projections over the same entry set;
//! nothing in this module mutates state.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::types::HistoryEntry;

/// An entry is overdue when it came back strictly after its expected
/// return time. Returning exactly on time is NOT overdue.
pub fn is_overdue(return_time: DateTime<Utc>, expected_return_time: DateTime<Utc>) -> bool {
    return_time > expected_return_time
}

/// Render the battery change over one cycle, e.g. `80% → 60% (-20%)`.
/// Positive deltas carry an explicit `+`; an entry with no end reading
/// yet reports as still in use.
pub fn battery_delta(start: i64, end: Option<i64>) -> String {
    match end {
        None => format!("{start}% → In Use"),
        Some(end) => {
            let diff = end - start;
            let sign = if diff > 0 { "+" } else { "" };
            format!("{start}% → {end}% ({sign}{diff}%)")
        }
    }
}

/// Partition selector for ledger views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryFilter {
    All,
    Overdue,
    OnTime,
}

/// Filter ledger entries. The overdue/on-time predicates only apply to
/// closed entries; open entries appear only under `All`.
pub fn filter_entries(entries: &[HistoryEntry], filter: HistoryFilter) -> Vec<&HistoryEntry> {
    entries
        .iter()
        .filter(|entry| match filter {
            HistoryFilter::All => true,
            HistoryFilter::Overdue => entry
                .return_time
                .is_some_and(|ret| is_overdue(ret, entry.expected_return_time)),
            HistoryFilter::OnTime => entry
                .return_time
                .is_some_and(|ret| !is_overdue(ret, entry.expected_return_time)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn entry(id: i64, returned_late_by: Option<i64>) -> HistoryEntry {
        let checkout = Utc::now();
        let expected = checkout + Duration::hours(6);
        HistoryEntry {
            id,
            cart_id: 1,
            cart_number: "CART-001".into(),
            person_id: 1,
            person_name: "Ana".into(),
            checkout_time: checkout,
            return_time: returned_late_by.map(|m| expected + Duration::minutes(m)),
            expected_return_time: expected,
            battery_level_start: 80,
            battery_level_end: returned_late_by.map(|_| 60),
            notes: None,
            created_at: checkout,
        }
    }

    #[test]
    fn overdue_is_strictly_after_expected() {
        let expected = Utc::now();
        assert!(is_overdue(expected + Duration::seconds(1), expected));
        assert!(!is_overdue(expected, expected));
        assert!(!is_overdue(expected - Duration::seconds(1), expected));
    }

    #[test]
    fn battery_delta_formats_signed_change() {
        assert_eq!(battery_delta(80, Some(60)), "80% → 60% (-20%)");
        assert_eq!(battery_delta(40, Some(95)), "40% → 95% (+55%)");
        assert_eq!(battery_delta(50, Some(50)), "50% → 50% (0%)");
    }

    #[test]
    fn battery_delta_reports_open_entry_as_in_use() {
        assert_eq!(battery_delta(80, None), "80% → In Use");
    }

    #[test]
    fn filters_partition_closed_entries_only() {
        // e1 on time, e2 overdue, e3 still open.
        let entries = vec![entry(1, Some(-30)), entry(2, Some(30)), entry(3, None)];

        let all = filter_entries(&entries, HistoryFilter::All);
        assert_eq!(all.len(), 3);

        let overdue = filter_entries(&entries, HistoryFilter::Overdue);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, 2);

        let on_time = filter_entries(&entries, HistoryFilter::OnTime);
        assert_eq!(on_time.len(), 1);
        assert_eq!(on_time[0].id, 1);
    }

    #[test]
    fn on_time_boundary_return_is_not_overdue() {
        let mut e = entry(1, Some(0));
        e.return_time = Some(e.expected_return_time);
        let entries = vec![e];
        assert_eq!(filter_entries(&entries, HistoryFilter::Overdue).len(), 0);
        assert_eq!(filter_entries(&entries, HistoryFilter::OnTime).len(), 1);
    }
}
