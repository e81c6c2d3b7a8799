//! HTTP response types for the Admin API transport.

use std::collections::HashMap;

const REL_NEXT: &str = r#"rel="next""#;
const REL_PREVIOUS: &str = r#"rel="previous""#;
const PREVIOUS_SEPARATOR: &str = r#"rel="previous", "#;
const NEXT_BOUNDARY: &str = r#">; rel="next""#;
const PAGE_INFO: &str = "page_info=";

/// Extracts the next-page `page_info` token from a `Link` header value.
///
/// Returns `None` when the header has no `rel="next"` link. When a previous
/// link precedes the next one the token is read from the segment after it;
/// otherwise from the first `page_info=` occurrence.
///
/// # Example
///
/// ```rust
/// use shopify_mcp::clients::next_page_cursor;
///
/// let link = r#"<https://s.myshopify.com/admin/api/2025-10/customers.json?page_info=p1>; rel="previous", <https://s.myshopify.com/admin/api/2025-10/customers.json?limit=2&page_info=n2>; rel="next""#;
/// assert_eq!(next_page_cursor(link).as_deref(), Some("n2"));
/// assert_eq!(next_page_cursor(r#"<https://x?page_info=p1>; rel="previous""#), None);
/// ```
#[must_use]
pub fn next_page_cursor(link: &str) -> Option<String> {
    if !link.contains(REL_NEXT) {
        return None;
    }

    let segment = if link.contains(REL_PREVIOUS) {
        link.split_once(PREVIOUS_SEPARATOR).map_or(link, |(_, next)| next)
    } else {
        link
    };

    let (_, after) = segment.split_once(PAGE_INFO)?;
    let token = after
        .split_once(NEXT_BOUNDARY)
        .map_or(after, |(token, _)| token);
    Some(token.to_string())
}

/// A response from the Admin API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lowercased, possibly multi-valued.
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body (`{}` for an empty body).
    pub body: serde_json::Value,
    /// The continuation token from the `Link` header, if there is a next page.
    pub next_page_info: Option<String>,
}

impl HttpResponse {
    /// Creates a response, extracting the pagination token from `Link`.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let next_page_info = headers
            .get("link")
            .and_then(|values| values.first())
            .and_then(|link| next_page_cursor(link));

        Self {
            code,
            headers,
            body,
            next_page_info,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the `X-Shopify-API-Deprecated-Reason` header value, if present.
    #[must_use]
    pub fn deprecation_reason(&self) -> Option<&str> {
        self.header("x-shopify-api-deprecated-reason")
    }

    /// Returns the first value of a header by lowercase name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}
