//! The API endpoints URIs.

/// The root route which reports the service name.
pub const ROOT: &str = "/";
/// The route to create and list expenses.
pub const EXPENSES: &str = "/expenses";
/// The route to list the distinct expense categories.
pub const EXPENSE_CATEGORIES: &str = "/expenses/categories";

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::EXPENSES);
        assert_endpoint_is_valid_uri(endpoints::EXPENSE_CATEGORIES);
    }
}
