//! Offset pagination helpers.

use std::num::NonZeroUsize;
use std::ops::Range;

pub const DEFAULT_CURRENT_PAGE: NonZeroUsize = NonZeroUsize::MIN;
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = NonZeroUsize::new(50).unwrap();

/// One-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub current_page: NonZeroUsize,
    pub page_size: NonZeroUsize,
}

impl PageRequest {
    pub fn new(current_page: NonZeroUsize, page_size: NonZeroUsize) -> Self {
        Self {
            current_page,
            page_size,
        }
    }

    /// Index range of this page within `total` items; empty when the page lies past the end.
    pub fn bounds(&self, total: usize) -> Range<usize> {
        let start = (self.current_page.get() - 1).saturating_mul(self.page_size.get());
        if start >= total {
            return total..total;
        }
        let end = start.saturating_add(self.page_size.get()).min(total);
        start..end
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENT_PAGE, DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(current_page: usize, page_size: usize) -> PageRequest {
        PageRequest::new(
            NonZeroUsize::new(current_page).expect("non-zero page"),
            NonZeroUsize::new(page_size).expect("non-zero size"),
        )
    }

    #[test]
    fn defaults_to_first_page_of_fifty() {
        let page = PageRequest::default();
        assert_eq!(page.current_page.get(), 1);
        assert_eq!(page.page_size.get(), 50);
    }

    #[test]
    fn splits_120_items_into_50_50_20() {
        assert_eq!(request(1, 50).bounds(120), 0..50);
        assert_eq!(request(2, 50).bounds(120), 50..100);
        assert_eq!(request(3, 50).bounds(120), 100..120);
        assert!(request(4, 50).bounds(120).is_empty());
    }

    #[test]
    fn empty_set_yields_empty_page() {
        assert!(request(1, 10).bounds(0).is_empty());
    }

    #[test]
    fn huge_page_numbers_do_not_overflow() {
        assert!(request(usize::MAX, usize::MAX).bounds(10).is_empty());
        assert_eq!(request(1, usize::MAX).bounds(10), 0..10);
    }

    #[test]
    fn page_length_matches_remaining_items() {
        for total in [0usize, 1, 7, 49, 50, 51, 120] {
            for page_size in [1usize, 3, 50] {
                for current_page in 1usize..=10 {
                    let len = request(current_page, page_size).bounds(total).len();
                    let remaining = total.saturating_sub(page_size * (current_page - 1));
                    assert_eq!(len, page_size.min(remaining));
                }
            }
        }
    }
}
