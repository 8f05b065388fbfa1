//! Open-route classification and the REST endpoint table.
//!
//! Some API paths are public: authentication itself, the product catalog,
//! categories and discount lookups.  Requests to those paths must never carry
//! an `Authorization` header and must never trigger a token refresh, even if
//! the server unexpectedly answers `401`.
//!
//! Classification is a plain prefix match against the request path, so
//! `/product/123/reviews` is open because it starts with `/product`.

/// REST endpoint prefixes exposed by the backend.
pub mod endpoints {
    pub const AUTH: &str = "/auth";
    pub const USER: &str = "/user";
    pub const CATEGORY: &str = "/category";
    pub const PRODUCT: &str = "/product";
    pub const ORDER: &str = "/order";
    pub const CART: &str = "/cart";
    pub const NOTIFICATION: &str = "/notification";
    pub const DISCOUNT: &str = "/discount";
    pub const REVIEW: &str = "/review";

    /// Login endpoint (`POST`).
    pub const LOGIN: &str = "/auth/login";
    /// Token refresh endpoint (`POST {refreshToken}` → `{accessToken}`).
    pub const REFRESH: &str = "/auth/refresh";
}

/// Static allowlist of path prefixes that do not require a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteClassification {
    open_prefixes: Vec<String>,
}

impl RouteClassification {
    /// Builds a classification from an explicit prefix list.
    pub fn new<I, S>(open_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            open_prefixes: open_prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` when `path` starts with any open prefix.
    pub fn is_open(&self, path: &str) -> bool {
        self.open_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// The configured open prefixes, in declaration order.
    pub fn open_prefixes(&self) -> &[String] {
        &self.open_prefixes
    }
}

impl Default for RouteClassification {
    /// Authentication, public catalog and public discount lookup.
    fn default() -> Self {
        Self::new([
            endpoints::AUTH,
            endpoints::CATEGORY,
            endpoints::PRODUCT,
            endpoints::DISCOUNT,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_paths_are_open() {
        let routes = RouteClassification::default();
        assert!(routes.is_open("/auth/login"));
        assert!(routes.is_open(endpoints::REFRESH));
    }

    #[test]
    fn test_catalog_and_discount_paths_are_open() {
        let routes = RouteClassification::default();
        assert!(routes.is_open("/product/42"));
        assert!(routes.is_open("/category"));
        assert!(routes.is_open("/discount/SUMMER"));
    }

    #[test]
    fn test_account_paths_are_protected() {
        let routes = RouteClassification::default();
        assert!(!routes.is_open("/user/me"));
        assert!(!routes.is_open("/order/checkout"));
        assert!(!routes.is_open("/cart"));
        assert!(!routes.is_open("/review"));
    }

    #[test]
    fn test_classification_is_prefix_match_only() {
        // "/api/product" does not start with "/product".
        let routes = RouteClassification::default();
        assert!(!routes.is_open("/api/product"));
    }

    #[test]
    fn test_custom_prefix_list() {
        let routes = RouteClassification::new(["/public"]);
        assert!(routes.is_open("/public/banner"));
        assert!(!routes.is_open("/auth/login"));
        assert_eq!(routes.open_prefixes(), ["/public".to_string()]);
    }
}
