use std::collections::HashSet;

/// Mutable state of one crawl
///
/// Owned by the coordinator. `seen_ids` starts as every id already on durable
/// storage and only grows; `current_page` is never persisted, so every run
/// restarts pagination and relies on `seen_ids` to skip captured items.
#[derive(Debug, Clone, Default)]
pub struct CrawlState {
    seen_ids: HashSet<String>,
    current_page: u32,
}

impl CrawlState {
    /// Creates state seeded with the ids loaded from storage
    pub fn new(seen_ids: HashSet<String>) -> Self {
        Self {
            seen_ids,
            current_page: 0,
        }
    }

    pub fn is_seen(&self, id: &str) -> bool {
        self.seen_ids.contains(id)
    }

    /// Records an id as durably captured
    ///
    /// Returns `false` if it was already known.
    pub fn mark_seen(&mut self, id: &str) -> bool {
        if self.seen_ids.contains(id) {
            return false;
        }
        self.seen_ids.insert(id.to_string())
    }

    pub fn seen_count(&self) -> usize {
        self.seen_ids.len()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn set_current_page(&mut self, page: u32) {
        self.current_page = page;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_ids_are_seen() {
        let state = CrawlState::new(["1".to_string(), "2".to_string()].into_iter().collect());
        assert!(state.is_seen("1"));
        assert!(!state.is_seen("3"));
        assert_eq!(state.seen_count(), 2);
        assert_eq!(state.current_page(), 0);
    }

    #[test]
    fn test_mark_seen_only_grows() {
        let mut state = CrawlState::default();
        assert!(state.mark_seen("42"));
        assert!(!state.mark_seen("42"));
        assert!(state.mark_seen("43"));
        assert_eq!(state.seen_count(), 2);
    }
}
