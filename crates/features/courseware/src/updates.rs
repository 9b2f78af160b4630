use crate::catalog::{CourseUpdate, UpdateStatus};
use chrono::{NaiveDate, Utc};
use std::cmp::Reverse;

/// Authored date form, e.g. `March 01, 2021`.
pub const UPDATE_DATE_FORMAT: &str = "%B %d, %Y";
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses an update's publish date; `None` if it matches neither accepted form.
#[must_use]
pub fn parse_update_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, UPDATE_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT))
        .ok()
}

/// Visible updates, most recently published first.
///
/// Unparseable dates count as today. Equal dates fall back to the higher id first.
#[must_use]
pub fn order_updates(items: &[CourseUpdate]) -> Vec<CourseUpdate> {
    order_updates_at(items, Utc::now().date_naive())
}

/// [`order_updates`] with an explicit "today".
#[must_use]
pub fn order_updates_at(items: &[CourseUpdate], today: NaiveDate) -> Vec<CourseUpdate> {
    let mut visible: Vec<_> = items
        .iter()
        .filter(|item| item.status != UpdateStatus::Deleted)
        .map(|item| (parse_update_date(&item.date).unwrap_or(today), item))
        .collect();

    visible.sort_by_key(|(date, item)| Reverse((*date, item.id)));
    visible.into_iter().map(|(_, item)| item.clone()).collect()
}
