//! Page bookkeeping for paginated lists.

use jikan_client::api::Pagination;

/// Current page and whether upstream has another one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    current_page: u32,
    has_next_page: bool,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            current_page: 1,
            has_next_page: false,
        }
    }
}

impl PaginationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    /// Back to page 1, as on every new search or filter selection
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Jump to a page; page numbers below 1 become 1
    pub fn go_to(&mut self, page: u32) {
        self.current_page = page.max(1);
    }

    /// Record what upstream reported for the current page
    pub fn update(&mut self, pagination: &Pagination) {
        self.has_next_page = pagination.has_next_page;
    }

    pub fn prev_disabled(&self) -> bool {
        self.current_page == 1
    }

    pub fn next_disabled(&self) -> bool {
        !self.has_next_page
    }

    /// Move forward; `None` while the next control is disabled
    pub fn next(&mut self) -> Option<u32> {
        if self.next_disabled() {
            return None;
        }
        self.current_page += 1;
        Some(self.current_page)
    }

    /// Move back; `None` on page 1
    pub fn prev(&mut self) -> Option<u32> {
        if self.prev_disabled() {
            return None;
        }
        self.current_page -= 1;
        Some(self.current_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_next(has_next_page: bool) -> Pagination {
        Pagination {
            has_next_page,
            ..Default::default()
        }
    }

    #[test]
    fn test_starts_on_first_page() {
        let state = PaginationState::new();
        assert_eq!(state.current_page(), 1);
        assert!(state.prev_disabled());
        assert!(state.next_disabled());
    }

    #[test]
    fn test_next_follows_upstream() {
        let mut state = PaginationState::new();
        assert_eq!(state.next(), None);

        state.update(&with_next(true));
        assert!(!state.next_disabled());
        assert_eq!(state.next(), Some(2));
        assert!(!state.prev_disabled());

        state.update(&with_next(false));
        assert!(state.next_disabled());
        assert_eq!(state.next(), None);
        assert_eq!(state.current_page(), 2);
    }

    #[test]
    fn test_prev_stops_at_one() {
        let mut state = PaginationState::new();
        state.go_to(2);
        assert_eq!(state.prev(), Some(1));
        assert_eq!(state.prev(), None);
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_reset() {
        let mut state = PaginationState::new();
        state.update(&with_next(true));
        state.go_to(7);
        state.reset();
        assert_eq!(state, PaginationState::default());
    }

    #[test]
    fn test_go_to_zero_clamps() {
        let mut state = PaginationState::new();
        state.go_to(0);
        assert_eq!(state.current_page(), 1);
    }
}
