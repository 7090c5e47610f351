//! Client-side pagination over an already-filtered result set.

/// Windowed view over a full result set. The server filters; we only slice.
#[derive(Debug, Clone)]
pub struct Pager<T> {
    items: Vec<T>,
    page_size: usize,
    current_page: usize,
}

impl<T> Pager<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            // A zero page size has no meaningful window.
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    /// Replace the full result set. Always snaps back to page 1: a page
    /// offset carried over from a previous search would index into the wrong
    /// data.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.current_page = 1;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.page_size)
    }

    /// The records of the current page, clipped to the set's bounds.
    pub fn visible(&self) -> &[T] {
        let start = (self.current_page - 1) * self.page_size;
        if start >= self.items.len() {
            return &[];
        }
        let end = (start + self.page_size).min(self.items.len());
        &self.items[start..end]
    }

    /// Advance one page. No-op on the last page; returns whether it moved.
    pub fn next_page(&mut self) -> bool {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page. No-op on the first page; returns whether it moved.
    pub fn prev_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Footer line: "Showing 9 to 16 of 23".
    pub fn summary(&self) -> String {
        if self.items.is_empty() {
            return "Showing 0 of 0".to_string();
        }
        let first = (self.current_page - 1) * self.page_size + 1;
        let last = (self.current_page * self.page_size).min(self.items.len());
        format!("Showing {} to {} of {}", first, last, self.items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pager_with(n: usize, page_size: usize) -> Pager<usize> {
        let mut pager = Pager::new(page_size);
        pager.set_items((0..n).collect());
        pager
    }

    #[test]
    fn total_pages_is_ceiling_division() {
        assert_eq!(pager_with(0, 8).total_pages(), 0);
        assert_eq!(pager_with(1, 8).total_pages(), 1);
        assert_eq!(pager_with(8, 8).total_pages(), 1);
        assert_eq!(pager_with(9, 8).total_pages(), 2);
        assert_eq!(pager_with(16, 8).total_pages(), 2);
        assert_eq!(pager_with(17, 8).total_pages(), 3);
    }

    #[test]
    fn pages_cover_contiguous_non_overlapping_ranges() {
        let mut pager = pager_with(23, 8);
        let mut seen = Vec::new();
        loop {
            assert!(pager.visible().len() <= 8);
            seen.extend_from_slice(pager.visible());
            if !pager.next_page() {
                break;
            }
        }
        assert_eq!(seen, (0..23).collect::<Vec<_>>());
    }

    #[test]
    fn navigation_saturates_at_both_edges() {
        let mut pager = pager_with(20, 8);
        assert!(!pager.prev_page());
        assert_eq!(pager.current_page(), 1);

        assert!(pager.next_page());
        assert!(pager.next_page());
        assert!(!pager.next_page());
        assert_eq!(pager.current_page(), 3);

        assert!(pager.prev_page());
        assert_eq!(pager.current_page(), 2);
    }

    #[test]
    fn replacing_items_resets_to_page_one() {
        let mut pager = pager_with(20, 8);
        pager.next_page();
        assert_eq!(pager.current_page(), 2);

        pager.set_items(vec![100, 101, 102]);
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.visible(), [100, 101, 102]);
    }

    #[test]
    fn empty_set_is_a_valid_terminal_state() {
        let mut pager = pager_with(5, 8);
        pager.set_items(Vec::new());
        assert_eq!(pager.total_pages(), 0);
        assert!(pager.visible().is_empty());
        assert!(!pager.next_page());
        assert!(!pager.prev_page());
        assert_eq!(pager.summary(), "Showing 0 of 0");
    }

    #[test]
    fn summary_reflects_the_window() {
        let mut pager = pager_with(23, 8);
        assert_eq!(pager.summary(), "Showing 1 to 8 of 23");
        pager.next_page();
        assert_eq!(pager.summary(), "Showing 9 to 16 of 23");
        pager.next_page();
        assert_eq!(pager.summary(), "Showing 17 to 23 of 23");
    }
}
