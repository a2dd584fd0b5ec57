//! Request Identity Resolution
//!
//! Authentication proper is an external concern; the API layer only needs a
//! stable user id per request. [`IdentityResolver`] is that narrow seam -
//! the bundled [`HeaderResolver`] reads a bearer token, tests inject doubles.

use axum::http::{header, HeaderMap};

/// Resolves the acting user's stable id from request headers.
pub trait IdentityResolver: Send + Sync {
    /// `None` when the request carries no resolvable identity.
    fn resolve(&self, headers: &HeaderMap) -> Option<String>;
}

/// Default resolver: the bearer token of the `Authorization` header is the
/// user id. Token verification happens upstream (gateway/proxy); by the time
/// a request reaches this process the token is trusted.
pub struct HeaderResolver;

impl IdentityResolver for HeaderResolver {
    fn resolve(&self, headers: &HeaderMap) -> Option<String> {
        let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        let token = value.strip_prefix("Bearer ")?.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_is_the_identity() {
        let headers = headers_with_auth("Bearer user-42");
        assert_eq!(HeaderResolver.resolve(&headers), Some("user-42".to_string()));
    }

    #[test]
    fn test_missing_or_malformed_auth_resolves_to_none() {
        assert_eq!(HeaderResolver.resolve(&HeaderMap::new()), None);
        assert_eq!(HeaderResolver.resolve(&headers_with_auth("Basic abc")), None);
        assert_eq!(HeaderResolver.resolve(&headers_with_auth("Bearer ")), None);
    }
}
