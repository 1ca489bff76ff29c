use serde::Serialize;

use crate::models::BillSheetEntry;

/// Position of one page within the full result set. Pages are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pager {
    pub current_page: i64,
    pub records_per_page: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

impl Pager {
    pub fn new(page: i64, records_per_page: i64, total_count: i64) -> Self {
        let total_pages = if total_count <= 0 {
            0
        } else {
            (total_count + records_per_page - 1) / records_per_page
        };
        Self {
            current_page: page.max(0),
            records_per_page,
            total_count: total_count.max(0),
            total_pages,
        }
    }

    /// Index of the first row on this page. Saturates for absurd page
    /// numbers, which then land past the end.
    pub fn offset(&self) -> i64 {
        self.current_page.saturating_mul(self.records_per_page)
    }

    /// Rows this page holds: `min(records_per_page, total_count - offset)`,
    /// never negative.
    pub fn slice_len(&self) -> i64 {
        (self.total_count - self.offset()).clamp(0, self.records_per_page)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BillSheetPage {
    pub billsheets: Vec<BillSheetEntry>,
    pub pager: Pager,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_partial_page() {
        let pager = Pager::new(2, 50, 120);
        assert_eq!(pager.offset(), 100);
        assert_eq!(pager.slice_len(), 20);
        assert_eq!(pager.total_pages, 3);
    }

    #[test]
    fn full_page_and_exact_multiple() {
        let pager = Pager::new(0, 50, 100);
        assert_eq!(pager.slice_len(), 50);
        assert_eq!(pager.total_pages, 2);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let pager = Pager::new(5, 50, 120);
        assert_eq!(pager.offset(), 250);
        assert_eq!(pager.slice_len(), 0);
    }

    #[test]
    fn huge_page_number_is_empty_not_overflow() {
        let pager = Pager::new(i64::MAX / 10, 50, 120);
        assert_eq!(pager.offset(), i64::MAX);
        assert_eq!(pager.slice_len(), 0);
        assert_eq!(Pager::new(i64::MAX, 50, 120).slice_len(), 0);
    }

    #[test]
    fn no_rows() {
        let pager = Pager::new(0, 50, 0);
        assert_eq!(pager.total_pages, 0);
        assert_eq!(pager.slice_len(), 0);
    }

    #[test]
    fn negative_page_is_treated_as_first() {
        assert_eq!(Pager::new(-3, 50, 10).offset(), 0);
    }
}
