const MAX_LIMIT: i64 = 100;

/// Page-number pagination for admin listings. Pages start at 1.
#[derive(Clone, Copy)]
pub struct Pagination {
    page: i64,
    limit: i64,
}

impl Pagination {
    pub fn new(page: &Option<i64>, limit: &Option<i64>, default_limit: &i64) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(*default_limit).clamp(1, MAX_LIMIT),
        }
    }

    pub fn page(&self) -> &i64 {
        &self.page
    }

    pub fn limit(&self) -> &i64 {
        &self.limit
    }

    /// Saturates at `i64::MAX`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::Pagination;

    #[test]
    fn defaults_to_first_page() {
        let pagination = Pagination::new(&None, &None, &20);
        assert_eq!(*pagination.page(), 1);
        assert_eq!(*pagination.limit(), 20);
        assert_eq!(pagination.offset(), 0);
    }

    #[test]
    fn clamps_out_of_range_values() {
        let pagination = Pagination::new(&Some(-3), &Some(10_000), &20);
        assert_eq!(*pagination.page(), 1);
        assert_eq!(*pagination.limit(), 100);

        let pagination = Pagination::new(&Some(3), &Some(0), &20);
        assert_eq!(*pagination.limit(), 1);
        assert_eq!(pagination.offset(), 2);
    }

    #[test]
    fn huge_page_saturates_offset() {
        let pagination = Pagination::new(&Some(i64::MAX), &Some(100), &20);
        assert_eq!(*pagination.page(), i64::MAX);
        assert_eq!(pagination.offset(), i64::MAX);
    }
}
