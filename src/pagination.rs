use serde::Deserialize;

/// `?limit=&offset=` query. Each route supplies its own default and cap.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    /// `(limit, offset)` with the limit in `1..=max_limit` and a non-negative offset.
    pub fn window(self, default_limit: i64, max_limit: i64) -> (i64, i64) {
        (
            self.limit.unwrap_or(default_limit).clamp(1, max_limit),
            self.offset.unwrap_or(0).max(0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_use_route_default() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.window(20, 100), (20, 0));
        assert_eq!(p.window(50, 200), (50, 0));
    }

    #[test]
    fn values_are_clamped() {
        let p = Pagination {
            limit: Some(5000),
            offset: Some(-3),
        };
        assert_eq!(p.window(20, 100), (100, 0));
        let p = Pagination {
            limit: Some(0),
            offset: Some(40),
        };
        assert_eq!(p.window(20, 100), (1, 40));
    }
}
