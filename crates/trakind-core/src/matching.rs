// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Matching subscriptions against availability snapshots.

use crate::types::{Subscription, TimeWindow};

/// Counts the windows after the first one that also match `subscription`.
///
/// `windows` must be sorted ascending by date. Because `matches` is monotone
/// over a sorted list, the matching prefix ends at the first non-match, found
/// by binary search.
pub fn count_additional_matches(subscription: &Subscription, windows: &[TimeWindow]) -> usize {
    match windows.split_first() {
        Some((_, rest)) => rest.partition_point(|w| subscription.matches(w)),
        None => 0,
    }
}

/// The earliest window, when it matches the subscription.
pub fn first_match<'a>(
    subscription: &Subscription,
    windows: &'a [TimeWindow],
) -> Option<&'a TimeWindow> {
    windows.first().filter(|w| subscription.matches(w))
}
