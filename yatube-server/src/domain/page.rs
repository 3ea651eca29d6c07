use serde::Serialize;

/// One page of a listing, numbered from 1.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u32,
    pub num_pages: u32,
    pub total: u64,
}

/// Resolved window into a listing of `total` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u32,
    pub num_pages: u32,
    pub limit: i64,
    pub offset: i64,
}

impl PageWindow {
    /// Clamps `requested` into `1..=num_pages`. An empty listing still has one page.
    pub fn resolve(requested: Option<u32>, per_page: u32, total: u64) -> Self {
        let per_page = per_page.max(1);
        let num_pages = total.div_ceil(u64::from(per_page)).max(1);
        let num_pages = u32::try_from(num_pages).unwrap_or(u32::MAX);
        let number = requested.unwrap_or(1).clamp(1, num_pages);

        Self {
            number,
            num_pages,
            limit: i64::from(per_page),
            offset: i64::from(number - 1) * i64::from(per_page),
        }
    }

    pub fn into_page<T>(self, items: Vec<T>, total: u64) -> Page<T> {
        Page {
            items,
            number: self.number,
            num_pages: self.num_pages,
            total,
        }
    }
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_other_pages(&self) -> bool {
        self.num_pages > 1
    }

    pub fn previous_number(&self) -> u32 {
        self.number.saturating_sub(1).max(1)
    }

    pub fn next_number(&self) -> u32 {
        (self.number + 1).min(self.num_pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_listing_has_one_page() {
        let window = PageWindow::resolve(None, 10, 0);
        assert_eq!(window.number, 1);
        assert_eq!(window.num_pages, 1);
        assert_eq!(window.offset, 0);
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        let window = PageWindow::resolve(Some(9), 10, 13);
        assert_eq!(window.num_pages, 2);
        assert_eq!(window.number, 2);
        assert_eq!(window.offset, 10);

        let window = PageWindow::resolve(Some(0), 10, 13);
        assert_eq!(window.number, 1);
    }

    #[test]
    fn page_navigation() {
        let page = PageWindow::resolve(Some(2), 10, 25).into_page(vec![1, 2, 3], 25);
        assert!(page.has_previous());
        assert!(page.has_next());
        assert!(page.has_other_pages());
        assert_eq!(page.previous_number(), 1);
        assert_eq!(page.next_number(), 3);
    }
}
