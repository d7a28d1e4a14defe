use chrono::{DateTime, Utc};

use riftfall_common::{NewsFile, NewsItem};

/// Append `new_items` to the log, keep only the newest `max_items`, and stamp
/// the file with `now`. Items are never deduplicated.
pub fn merge(
    mut file: NewsFile,
    new_items: Vec<NewsItem>,
    max_items: usize,
    now: DateTime<Utc>,
) -> NewsFile {
    file.items.extend(new_items);
    trim_front(&mut file.items, max_items);
    file.generated_at = now;
    file
}

/// Drop the oldest entries until at most `max_items` remain.
pub fn trim_front<T>(items: &mut Vec<T>, max_items: usize) {
    if items.len() > max_items {
        let excess = items.len() - max_items;
        items.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use chrono::Duration;
    use riftfall_common::NewsItemType;

    fn file_with(n: usize) -> NewsFile {
        let mut file = NewsFile::empty(Utc::now() - Duration::hours(6));
        file.items = (0..n).map(|i| titled_item(&format!("old {i}"))).collect();
        file
    }

    fn titles(file: &NewsFile) -> Vec<String> {
        file.items.iter().map(|i| i.title.clone()).collect()
    }

    #[test]
    fn appends_in_generation_order_under_cap() {
        let now = Utc::now();
        let new = vec![
            news_item(NewsItemType::Summary),
            news_item(NewsItemType::CycleEnd),
            news_item(NewsItemType::CycleReset),
        ];

        let merged = merge(file_with(2), new, 200, now);

        assert_eq!(merged.items.len(), 5);
        assert_eq!(merged.items[0].title, "old 0");
        let types: Vec<_> = merged.items[2..].iter().map(|i| i.item_type).collect();
        assert_eq!(
            types,
            [NewsItemType::Summary, NewsItemType::CycleEnd, NewsItemType::CycleReset]
        );
        assert_eq!(merged.generated_at, now);
    }

    #[test]
    fn over_cap_keeps_last_max_items() {
        let new = vec![titled_item("new 0"), titled_item("new 1"), titled_item("new 2")];

        let merged = merge(file_with(5), new, 4, Utc::now());

        assert_eq!(titles(&merged), ["old 4", "new 0", "new 1", "new 2"]);
    }

    #[test]
    fn new_items_alone_exceeding_cap_are_trimmed_too() {
        let new = vec![titled_item("a"), titled_item("b"), titled_item("c")];
        let merged = merge(file_with(0), new, 2, Utc::now());
        assert_eq!(titles(&merged), ["b", "c"]);
    }

    #[test]
    fn exactly_at_cap_is_untouched() {
        let merged = merge(file_with(3), vec![titled_item("new")], 4, Utc::now());
        assert_eq!(titles(&merged), ["old 0", "old 1", "old 2", "new"]);
    }

    #[test]
    fn repeated_merges_are_not_deduplicated() {
        let item = titled_item("same");
        let once = merge(file_with(0), vec![item.clone()], 10, Utc::now());
        let twice = merge(once, vec![item], 10, Utc::now());
        assert_eq!(twice.items.len(), 2);
    }

    #[test]
    fn trim_front_on_plain_vec() {
        let mut v = vec![1, 2, 3, 4, 5];
        trim_front(&mut v, 2);
        assert_eq!(v, [4, 5]);
        trim_front(&mut v, 10);
        assert_eq!(v, [4, 5]);
    }
}
