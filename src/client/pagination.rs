pub const SEARCH_PAGE_CAP: u32 = 500;
pub const CATEGORY_PAGE_CAP: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub current: u32,
    pub total: u32,
}

impl Pager {
    pub fn clamped(current: u32, total_pages: u32, cap: u32) -> Self {
        Self {
            current: current.max(1),
            total: total_pages.min(cap),
        }
    }

    pub fn for_search(current: u32, total_pages: u32) -> Self {
        Self::clamped(current, total_pages, SEARCH_PAGE_CAP)
    }

    pub fn for_category(current: u32, total_pages: u32) -> Self {
        Self::clamped(current, total_pages, CATEGORY_PAGE_CAP)
    }

    pub fn prev(&self) -> Option<u32> {
        (self.current > 1).then(|| self.current - 1)
    }

    pub fn next(&self) -> Option<u32> {
        (self.current < self.total).then(|| self.current + 1)
    }

    pub fn label(&self) -> String {
        format!("Página {} de {}", self.current, self.total)
    }
}

pub fn total_pages(value: &serde_json::Value) -> u32 {
    value
        .get("total_pages")
        .and_then(serde_json::Value::as_u64)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_total_is_clamped_to_500() {
        let pager = Pager::for_search(500, 38_000);
        assert_eq!(pager.total, 500);
        assert_eq!(pager.next(), None);
        assert_eq!(pager.prev(), Some(499));
        assert_eq!(Pager::for_search(1, 12).total, 12);
    }

    #[test]
    fn category_total_is_clamped_to_10() {
        let pager = Pager::for_category(9, 500);
        assert_eq!(pager.total, 10);
        assert_eq!(pager.next(), Some(10));
        assert_eq!(Pager::for_category(10, 500).next(), None);
    }

    #[test]
    fn first_page_has_no_prev() {
        let pager = Pager::for_category(1, 3);
        assert_eq!(pager.prev(), None);
        assert_eq!(pager.label(), "Página 1 de 3");
    }

    #[test]
    fn total_pages_reads_upstream_field() {
        assert_eq!(total_pages(&json!({"total_pages": 42})), 42);
        assert_eq!(total_pages(&json!({})), 1);
        assert_eq!(total_pages(&json!({"total_pages": "many"})), 1);
    }
}
