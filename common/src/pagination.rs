//! Pagination query parameters and response envelope.
//!
//! Reimplements `examples/original_source/internal/util/pagination`: a
//! request-side `Paginator` (page/per_page, validated at the edge) and a
//! response-side `Pagination` envelope.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 10_000;

/// Query-string pagination parameters. `page`/`per_page` are `None` until a
/// caller supplies them; `normalized()` fills in the defaults and clamps the
/// repository-level cap (spec.md 6: clients are rejected above 100 at
/// validation, but the repository itself caps at 10000 as a last line of
/// defense against a validation bypass).
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct Paginator {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Paginator {
    /// Edge validation: `page >= 1`, `per_page` in `[1, 100]`.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(page) = self.page {
            if page < 1 {
                return Err("page must be >= 1".to_string());
            }
        }

        if let Some(per_page) = self.per_page {
            if !(1..=100).contains(&per_page) {
                return Err("per_page must be between 1 and 100".to_string());
            }
        }

        Ok(())
    }

    pub fn normalized(&self) -> (i64, i64) {
        let page = self.page.filter(|p| *p >= 1).unwrap_or(DEFAULT_PAGE);
        let per_page = self
            .per_page
            .filter(|p| *p >= 1)
            .unwrap_or(DEFAULT_PER_PAGE)
            .min(MAX_PER_PAGE);

        (page, per_page)
    }

    pub fn offset_limit(&self) -> (i64, i64) {
        let (page, per_page) = self.normalized();
        ((page - 1) * per_page, per_page)
    }
}

/// Response envelope attached to every list endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Pagination {
    pub total: i64,
    pub count: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, count: i64, total: i64, per_page: i64) -> Self {
        let total_pages = if per_page <= 0 {
            1
        } else {
            ((total as f64) / (per_page as f64)).ceil() as i64
        }
        .max(1);

        Self {
            total,
            count,
            page,
            per_page,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let p = Paginator::default();
        assert_eq!(p.normalized(), (1, 10));
    }

    #[test]
    fn per_page_is_capped_at_repository_max() {
        let p = Paginator {
            page: Some(1),
            per_page: Some(999_999),
        };
        assert_eq!(p.normalized(), (1, MAX_PER_PAGE));
    }

    #[test]
    fn validate_rejects_per_page_above_100() {
        let p = Paginator {
            page: Some(1),
            per_page: Some(101),
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn total_pages_is_never_zero() {
        let pag = Pagination::new(1, 0, 0, 10);
        assert_eq!(pag.total_pages, 1);
    }
}
