//! Errors for user-supplied query values.
//!
//! These are validation failures on page parameters, distinct from
//! backend errors in [`crate::api::ApiError`].

/// Invalid search, sort or paging input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("unknown sort option: {0}")]
    UnknownSort(String),

    #[error("invalid date {0:?}: expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("page numbers start at 1")]
    InvalidPage,

    #[error("page {0} is out of range")]
    PageOutOfRange(usize),

    #[error("items per page must be one of 1, 5, 10, 20 or 50 (got {0})")]
    InvalidPageSize(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = QueryError::InvalidDate("01/05/2024".into());
        assert_eq!(
            err.to_string(),
            "invalid date \"01/05/2024\": expected YYYY-MM-DD"
        );

        assert_eq!(QueryError::InvalidPage.to_string(), "page numbers start at 1");
        assert!(QueryError::InvalidPageSize(7).to_string().contains("got 7"));
        assert_eq!(
            QueryError::PageOutOfRange(9).to_string(),
            "page 9 is out of range"
        );
    }
}
