use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 6;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Page-number pagination arguments as sent by clients (`?page=2&limit=6`).
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PageArgs {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageArgs {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Row offset of the requested page, capped to what SQLite can bind.
    pub fn offset(&self) -> u64 {
        self.page
            .unwrap_or(1)
            .saturating_sub(1)
            .saturating_mul(self.limit())
            .min(i64::MAX as u64)
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_starts_at_zero() {
        let args = PageArgs::default();
        assert_eq!(args.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(args.offset(), 0);
    }

    #[test]
    fn offset_follows_page_and_limit() {
        assert_eq!(PageArgs::new(3, 10).offset(), 20);
        assert_eq!(PageArgs::new(0, 10).offset(), 0);
        assert_eq!(PageArgs::new(1, 0).limit(), 1);
        assert_eq!(PageArgs::new(1, 5000).limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn huge_page_saturates() {
        assert_eq!(PageArgs::new(u64::MAX, 10).offset(), i64::MAX as u64);
        assert_eq!(PageArgs::new(u64::MAX, MAX_PAGE_SIZE).offset(), i64::MAX as u64);
    }
}
