use super::ContentItem;
use crate::dates::{DateRange, ReferenceZone};

/// Items published on a day inside `range` (inclusive), sorted by
/// `published_at` ascending. Ties keep their input order.
///
/// Publication instants are mapped to days with the same [`ReferenceZone`]
/// the log accumulator uses, so logs and posts agree on where midnight is.
pub fn filter_by_date_range(
    items: &[ContentItem],
    range: &DateRange,
    zone: ReferenceZone,
) -> Vec<ContentItem> {
    let mut selected: Vec<ContentItem> = items
        .iter()
        .filter(|item| {
            zone.date_of_seconds(item.published_at)
                .is_some_and(|date| range.contains(date))
        })
        .cloned()
        .collect();

    selected.sort_by_key(|item| item.published_at);
    selected
}
