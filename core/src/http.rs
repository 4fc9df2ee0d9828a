//! Transport-plane data types: requests, responses, and endpoint descriptors.
//!
//! # Design
//! Requests and responses are plain owned data. An [`Endpoint`] descriptor
//! owns the two pure halves of every call — [`Endpoint::request`] builds an
//! `HttpRequest` (placeholder substitution, query assembly, body attachment)
//! and [`Endpoint::decode`] consumes an `HttpResponse` (status check, then
//! JSON decode or discard). Neither touches the network, which keeps the
//! whole wire contract testable without a server; the session half lives in
//! [`crate::client`].

use serde_json::Value;

use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// How a successful response body is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Decode the body as JSON and return it verbatim.
    Json,
    /// Discard the body (delete-style endpoints), even if the server sent one.
    Empty,
}

/// Static description of one remote operation: method, path template,
/// declared query-parameter names, whether a body may be attached, and how
/// the response body is handled.
///
/// Descriptors are `const` table entries in [`crate::endpoints`]; they are
/// never built or mutated at runtime.
#[derive(Debug)]
pub struct Endpoint {
    pub method: HttpMethod,
    /// URL path, possibly containing `{placeholder}` markers.
    pub path: &'static str,
    /// Query-parameter names in the order the caller supplies values.
    pub query: &'static [&'static str],
    pub has_body: bool,
    pub response: ResponseMode,
}

/// An HTTP request described as plain data, ready for the session to execute.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Full request target: base URL plus the substituted path.
    pub url: String,
    /// Query pairs for parameters the caller actually supplied. Absent
    /// parameters never appear here, not even as empty strings.
    pub query: Vec<(&'static str, String)>,
    /// JSON body, already serialized.
    pub body: Option<String>,
}

/// An HTTP response described as plain data, as read back from the session.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl Endpoint {
    /// Build the request for this endpoint.
    ///
    /// `path_args` fill the template's placeholders positionally, each
    /// substituted exactly once. `query_args` line up with
    /// [`Endpoint::query`]; `None` values are omitted from the query
    /// entirely.
    pub fn request(
        &self,
        base_url: &str,
        path_args: &[&str],
        query_args: &[Option<String>],
        body: Option<String>,
    ) -> HttpRequest {
        debug_assert_eq!(path_args.len(), self.path.matches('{').count());
        debug_assert_eq!(query_args.len(), self.query.len());
        debug_assert!(body.is_none() || self.has_body);

        let query = self
            .query
            .iter()
            .zip(query_args)
            .filter_map(|(name, value)| value.as_ref().map(|v| (*name, v.clone())))
            .collect();

        HttpRequest {
            method: self.method,
            url: format!("{}{}", base_url, fill_path(self.path, path_args)),
            query,
            body,
        }
    }

    /// Interpret the response for this endpoint.
    ///
    /// Any status outside the 2xx range becomes [`ApiError::Http`] carrying
    /// the raw body. On success the body is decoded per the response mode;
    /// `Empty` endpoints yield `Value::Null` without looking at the body.
    pub fn decode(&self, response: HttpResponse) -> Result<Value, ApiError> {
        if !(200..300).contains(&response.status) {
            return Err(ApiError::Http {
                status: response.status,
                body: response.body,
            });
        }
        match self.response {
            ResponseMode::Json => serde_json::from_str(&response.body)
                .map_err(|e| ApiError::Deserialization(e.to_string())),
            ResponseMode::Empty => Ok(Value::Null),
        }
    }
}

/// Substitute `args` into the `{name}` markers of `template`, positionally
/// and in template order. Each marker is replaced exactly once; all other
/// characters pass through unaltered.
pub(crate) fn fill_path(template: &str, args: &[&str]) -> String {
    let mut path = String::with_capacity(template.len() + args.len() * 8);
    let mut rest = template;
    for arg in args {
        let Some(open) = rest.find('{') else { break };
        let Some(len) = rest[open..].find('}') else { break };
        path.push_str(&rest[..open]);
        path.push_str(arg);
        rest = &rest[open + len + 1..];
    }
    path.push_str(rest);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBE: Endpoint = Endpoint {
        method: HttpMethod::Get,
        path: "/api/v2/things/{id}",
        query: &["status", "limit"],
        has_body: false,
        response: ResponseMode::Json,
    };

    const DROP: Endpoint = Endpoint {
        method: HttpMethod::Delete,
        path: "/api/v2/things/{id}",
        query: &[],
        has_body: false,
        response: ResponseMode::Empty,
    };

    #[test]
    fn fill_path_replaces_each_marker_once() {
        let path = fill_path("/api/v2/things/{id}/parts/{part}", &["t-9", "p-2"]);
        assert_eq!(path, "/api/v2/things/t-9/parts/p-2");
    }

    #[test]
    fn fill_path_without_markers_is_identity() {
        assert_eq!(fill_path("/api/v2/things", &[]), "/api/v2/things");
    }

    #[test]
    fn fill_path_leaves_surrounding_text_untouched() {
        let path = fill_path("/a/{x}/b", &["value-with-no-braces"]);
        assert_eq!(path, "/a/value-with-no-braces/b");
    }

    #[test]
    fn request_substitutes_path_and_keeps_present_params() {
        let req = PROBE.request(
            "http://localhost:3000",
            &["t-1"],
            &[Some("active".to_string()), None],
            None,
        );
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/api/v2/things/t-1");
        assert_eq!(req.query, vec![("status", "active".to_string())]);
        assert!(req.body.is_none());
    }

    #[test]
    fn request_omits_unset_params_entirely() {
        let req = PROBE.request("http://localhost:3000", &["t-1"], &[None, None], None);
        assert!(req.query.is_empty());
    }

    #[test]
    fn decode_returns_json_body_verbatim() {
        let body = r#"{"id":"t-1","nested":{"k":[1,2,3]}}"#;
        let value = PROBE
            .decode(HttpResponse {
                status: 200,
                body: body.to_string(),
            })
            .unwrap();
        let expected: Value = serde_json::from_str(body).unwrap();
        assert_eq!(value, expected);
    }

    #[test]
    fn decode_accepts_any_2xx() {
        let value = PROBE
            .decode(HttpResponse {
                status: 201,
                body: "{\"ok\":true}".to_string(),
            })
            .unwrap();
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn decode_maps_non_2xx_to_http_error_with_raw_body() {
        let err = PROBE
            .decode(HttpResponse {
                status: 404,
                body: "no such thing".to_string(),
            })
            .unwrap_err();
        match err {
            ApiError::Http { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "no such thing");
            }
            other => panic!("expected Http, got {other:?}"),
        }
    }

    #[test]
    fn decode_empty_mode_ignores_any_body() {
        let value = DROP
            .decode(HttpResponse {
                status: 204,
                body: String::new(),
            })
            .unwrap();
        assert!(value.is_null());

        // Some servers send a body on 200 deletes; Empty mode still discards it.
        let value = DROP
            .decode(HttpResponse {
                status: 200,
                body: "{\"deleted\":true}".to_string(),
            })
            .unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn decode_bad_json_is_a_deserialization_error() {
        let err = PROBE
            .decode(HttpResponse {
                status: 200,
                body: "not json".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
