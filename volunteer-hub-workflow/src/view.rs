//! Filtered, paged slice of an enriched application list. Pure
//! recomputation on every keystroke or page change; no state is derived
//! incrementally.

use volunteer_hub_config::Config;
use volunteer_hub_datastore::models::Application;

use crate::enrich::resolved_event_name;

#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationPage {
    pub items: Vec<Application>,
    pub total_pages: usize,
}

/// Case-insensitive substring filter on the resolved event name, then the
/// 1-indexed `page`'s slice. An empty filter matches everything.
/// `total_pages` is never below 1, even for an empty list; an
/// out-of-range page yields an empty slice, not an error.
#[must_use]
pub fn page(
    list: &[Application],
    filter: &str,
    page: usize,
    page_size: usize,
) -> ApplicationPage {
    let page_size = page_size.max(1);
    let needle = filter.to_lowercase();
    let filtered: Vec<&Application> = list
        .iter()
        .filter(|application| {
            resolved_event_name(application)
                .to_lowercase()
                .contains(&needle)
        })
        .collect();
    let total_pages = filtered.len().div_ceil(page_size).max(1);
    let items = if page == 0 {
        Vec::new()
    } else {
        filtered
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .cloned()
            .collect()
    };
    ApplicationPage { items, total_pages }
}

/// Filter text plus current page. Changing the filter always snaps back
/// to page 1 so the user cannot be left on a page the new filter no
/// longer has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    filter: String,
    page: usize,
    page_size: usize,
}

impl Pager {
    #[must_use]
    pub const fn new(page_size: usize) -> Self {
        Self {
            filter: String::new(),
            page: 1,
            page_size,
        }
    }

    #[must_use]
    pub const fn from_config(config: &Config) -> Self {
        Self::new(config.page_size)
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.page = 1;
    }

    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.page
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.page = (self.page + 1).min(total_pages.max(1));
    }

    #[must_use]
    pub fn view(&self, list: &[Application]) -> ApplicationPage {
        page(list, &self.filter, self.page, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use volunteer_hub_datastore::Document;

    use super::*;
    use crate::normalize::normalize_application;

    fn named(id: &str, event_name: &str) -> Application {
        normalize_application(&Document::new(id, json!({ "eventName": event_name })))
    }

    fn sample() -> Vec<Application> {
        vec![
            named("a-1", "Beach Cleanup"),
            named("a-2", "Food Drive"),
            named("a-3", "beach volleyball fundraiser"),
        ]
    }

    #[test]
    fn filter_is_a_case_insensitive_substring_match() {
        let result = page(&sample(), "BEACH", 1, 10);
        let ids: Vec<&str> = result.items.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["a-1", "a-3"]);
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert_eq!(page(&sample(), "", 1, 10).items.len(), 3);
    }

    #[test]
    fn unenriched_rows_match_against_the_unknown_event_fallback() {
        let list = vec![normalize_application(&Document::new("a-raw", json!({})))];
        assert_eq!(page(&list, "unknown", 1, 10).items.len(), 1);
        assert_eq!(
            page(&list, "", 1, 10).items[0].event_name, None,
            "the view model never mutates its input"
        );
    }

    #[test]
    fn total_pages_is_at_least_one_even_when_empty() {
        assert_eq!(page(&[], "", 1, 10).total_pages, 1);
        assert_eq!(page(&sample(), "no such event", 1, 10).total_pages, 1);
    }

    #[test]
    fn pagination_boundaries() {
        let list: Vec<Application> = (0..10)
            .map(|n| named(&format!("a-{n}"), "Beach Cleanup"))
            .collect();
        assert_eq!(page(&list, "", 1, 10).total_pages, 1);

        let list: Vec<Application> = (0..11)
            .map(|n| named(&format!("a-{n}"), "Beach Cleanup"))
            .collect();
        let second = page(&list, "", 2, 10);
        assert_eq!(second.total_pages, 2);
        assert_eq!(second.items.len(), 1);
    }

    #[test]
    fn out_of_range_pages_yield_an_empty_slice() {
        assert!(page(&sample(), "", 7, 10).items.is_empty());
        assert!(page(&sample(), "", 0, 10).items.is_empty());
    }

    #[test]
    fn changing_the_filter_resets_to_page_one() {
        let mut pager = Pager::new(1);
        pager.next_page(3);
        pager.next_page(3);
        assert_eq!(pager.current_page(), 3);

        pager.set_filter("beach");
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.filter(), "beach");
    }

    #[test]
    fn page_navigation_clamps_to_the_valid_range() {
        let mut pager = Pager::new(10);
        pager.prev_page();
        assert_eq!(pager.current_page(), 1);
        pager.next_page(2);
        pager.next_page(2);
        assert_eq!(pager.current_page(), 2);
    }
}
