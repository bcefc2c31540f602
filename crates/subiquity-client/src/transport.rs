//! HTTP/1.1 transport to the installer backend.
//!
//! Every request opens its own connection through [`Endpoint::connect`],
//! performs the hyper handshake and spawns a task driving the connection,
//! so concurrent calls never wait on each other.
//!
//! ## Wire conventions
//!
//! - Query values are JSON-encoded, then percent-encoded: `wait=true`,
//!   `username=%22alice%22`.
//! - Request bodies are JSON with content type
//!   `application/json; charset=utf-8`.
//! - Status 200 is success. Any other status is a [`ClientError::Status`]
//!   carrying the raw body; failure bodies are never parsed.
//!
//! ## Logging
//!
//! Each call logs `--> METHOD url body` before sending and
//! `==> METHOD url body` after a successful decode, at `trace` level. Bodies
//! are cut at [`LOG_TRUNCATE_CHARS`] characters. Secret-bearing calls log a
//! redacted rendering instead of the wire form. Calls whose response is
//! ignored log `==> METHOD url` with no body: the text was never decoded, so
//! there is no typed value to redact.

use std::borrow::Cow;
use std::fmt::Write as _;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::{CONTENT_TYPE, HOST};
use hyper::{Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Serialize;
use serde::de::DeserializeOwned;
use subiquity_types::codec::{self, DecodeError};
use subiquity_types::redact::{Redact, mask};
use subiquity_types::Union;
use tracing::{debug, trace};

use crate::endpoint::Endpoint;
use crate::error::ClientError;

/// Logged bodies longer than this many characters are truncated.
pub const LOG_TRUNCATE_CHARS: usize = 1200;

/// Content type of every request body.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Cut `text` to [`LOG_TRUNCATE_CHARS`] characters, marking the cut with `…`.
pub fn truncate_for_log(text: &str) -> Cow<'_, str> {
    match text.char_indices().nth(LOG_TRUNCATE_CHARS) {
        Some((cut, _)) => Cow::Owned(format!("{}…", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

/// Connection factory plus wire conventions.
///
/// A transport starts closed. [`open`](Transport::open) and
/// [`close`](Transport::close) take `&mut self`, so they can never overlap
/// with in-flight requests, which only borrow the transport.
#[derive(Debug, Default)]
pub struct Transport {
    endpoint: Option<Endpoint>,
}

impl Transport {
    /// A closed transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route subsequent requests to `endpoint`.
    pub fn open(&mut self, endpoint: Endpoint) {
        debug!(%endpoint, "transport opened");
        self.endpoint = Some(endpoint);
    }

    /// Stop accepting requests. Closing a closed transport does nothing.
    pub fn close(&mut self) {
        if let Some(endpoint) = self.endpoint.take() {
            debug!(%endpoint, "transport closed");
        }
    }

    pub fn is_open(&self) -> bool {
        self.endpoint.is_some()
    }

    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    /// Start building a request for operation `name`.
    pub fn call<'a>(&'a self, name: &'static str, method: Method, path: &'a str) -> Call<'a> {
        Call {
            transport: self,
            name,
            method,
            path,
            query: Vec::new(),
            body: None,
            encode_error: None,
        }
    }
}

struct QueryParam {
    key: &'static str,
    /// JSON-encoded value sent on the wire (before percent-encoding).
    value: String,
    /// JSON-encoded value shown in logs.
    logged: String,
}

struct Body {
    wire: String,
    logged: String,
}

/// One request under construction.
///
/// Encoding failures in the builder methods are deferred and reported by
/// the `send*` methods as [`ClientError::Encode`].
#[must_use = "a call does nothing until it is sent"]
pub struct Call<'a> {
    transport: &'a Transport,
    name: &'static str,
    method: Method,
    path: &'a str,
    query: Vec<QueryParam>,
    body: Option<Body>,
    encode_error: Option<serde_json::Error>,
}

impl Call<'_> {
    /// Add a query parameter with a JSON-encoded value.
    pub fn query<V: Serialize + ?Sized>(mut self, key: &'static str, value: &V) -> Self {
        match serde_json::to_string(value) {
            Ok(value) => self.query.push(QueryParam {
                key,
                logged: value.clone(),
                value,
            }),
            Err(e) => self.fail(e),
        }
        self
    }

    /// Add a query parameter only when `value` is present.
    pub fn query_opt<V: Serialize>(self, key: &'static str, value: Option<&V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Add a secret string query parameter; logs show it masked.
    pub fn secret_query(mut self, key: &'static str, value: &str) -> Self {
        match (serde_json::to_string(value), serde_json::to_string(&mask(value))) {
            (Ok(value), Ok(logged)) => self.query.push(QueryParam { key, value, logged }),
            (Err(e), _) | (_, Err(e)) => self.fail(e),
        }
        self
    }

    /// Send `body` as JSON and log it as sent.
    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> Self {
        self.json_logged(body, body)
    }

    /// Send `body` as JSON but log its redacted projection.
    pub fn json_redacted<B: Serialize + Redact>(self, body: &B) -> Self {
        self.json_logged(body, &body.redacted())
    }

    /// Send `body` as JSON but log `logged` in its place.
    pub fn json_logged<B, L>(mut self, body: &B, logged: &L) -> Self
    where
        B: Serialize + ?Sized,
        L: Serialize + ?Sized,
    {
        match (serde_json::to_string(body), serde_json::to_string(logged)) {
            (Ok(wire), Ok(logged)) => self.body = Some(Body { wire, logged }),
            (Err(e), _) | (_, Err(e)) => self.fail(e),
        }
        self
    }

    fn fail(&mut self, error: serde_json::Error) {
        self.encode_error.get_or_insert(error);
    }

    /// Send and decode a flat record (or scalar), logging the response as
    /// received.
    pub async fn send<T: DeserializeOwned>(self) -> Result<T, ClientError> {
        self.send_with(codec::decode, |_| None).await
    }

    /// Send and decode a secret-bearing record, logging its redacted
    /// projection.
    pub async fn send_redacted<T>(self) -> Result<T, ClientError>
    where
        T: DeserializeOwned + Serialize + Redact,
    {
        self.send_with(codec::decode, |value: &T| {
            Some(
                serde_json::to_string(&value.redacted())
                    .unwrap_or_else(|e| format!("<unrenderable response: {e}>")),
            )
        })
        .await
    }

    /// Send and decode a discriminated union by its `$type`.
    pub async fn send_union<U: Union>(self) -> Result<U, ClientError> {
        self.send_with(codec::decode_union_str, |_| None).await
    }

    /// Send and ignore the response body, which is not logged either.
    pub async fn send_empty(self) -> Result<(), ClientError> {
        let (description, _) = self.exchange().await?;
        trace!("==> {description}");
        Ok(())
    }

    /// Send with a custom decoder and log formatter.
    ///
    /// `render` returns the log rendering of the decoded value, or `None` to
    /// log the response text as received.
    pub async fn send_with<T, D, R>(self, decode: D, render: R) -> Result<T, ClientError>
    where
        D: FnOnce(&str) -> Result<T, DecodeError>,
        R: FnOnce(&T) -> Option<String>,
    {
        let (description, text) = self.exchange().await?;
        let value = decode(&text)?;
        let rendered = render(&value);
        trace!(
            "==> {description} {}",
            truncate_for_log(rendered.as_deref().unwrap_or(&text))
        );
        Ok(value)
    }

    /// Log and send the request, returning the logged description and the
    /// text of a 200 response.
    async fn exchange(self) -> Result<(String, String), ClientError> {
        let Call {
            transport,
            name,
            method,
            path,
            query,
            body,
            encode_error,
        } = self;

        if let Some(source) = encode_error {
            return Err(ClientError::Encode {
                method: name,
                source,
            });
        }
        let endpoint = transport.endpoint.as_ref().ok_or(ClientError::NotOpen)?;
        let authority = endpoint.authority();

        let description = format!(
            "{method} http://{authority}{}",
            with_query(path, &logged_query(&query))
        );
        match &body {
            Some(body) => trace!("--> {description} {}", truncate_for_log(&body.logged)),
            None => trace!("--> {description}"),
        }

        let mut builder = Request::builder()
            .method(method)
            .uri(with_query(path, &wire_query(&query)))
            .header(HOST, authority.as_str());
        let payload = match body {
            Some(body) => {
                builder = builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE);
                Bytes::from(body.wire)
            }
            None => Bytes::new(),
        };
        let request = builder.body(Full::new(payload))?;

        let (status, bytes) = round_trip(endpoint, request).await?;
        if status != StatusCode::OK {
            return Err(ClientError::Status {
                method: name,
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        let text = String::from_utf8(bytes.to_vec())
            .map_err(|source| ClientError::Utf8 { method: name, source })?;
        Ok((description, text))
    }
}

/// Connect, send one request and read the whole response.
async fn round_trip(
    endpoint: &Endpoint,
    request: Request<Full<Bytes>>,
) -> Result<(StatusCode, Bytes), ClientError> {
    let stream = endpoint.connect().await?;
    let (mut sender, conn) =
        hyper::client::conn::http1::handshake::<_, Full<Bytes>>(TokioIo::new(stream)).await?;

    // Drive the connection in the background
    tokio::spawn(async move {
        if let Err(e) = conn.await {
            debug!(error = %e, "backend connection error");
        }
    });

    let response = sender.send_request(request).await?;
    let status = response.status();
    let body = response.into_body().collect().await?.to_bytes();
    Ok((status, body))
}

fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

fn wire_query(params: &[QueryParam]) -> String {
    params
        .iter()
        .map(|p| format!("{}={}", p.key, percent_encode(&p.value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Query as shown in logs: JSON values, not percent-encoded.
fn logged_query(params: &[QueryParam]) -> String {
    params
        .iter()
        .map(|p| format!("{}={}", p.key, p.logged))
        .collect::<Vec<_>>()
        .join("&")
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[test]
    fn test_truncate_long_body() {
        let body = "x".repeat(2000);
        let logged = truncate_for_log(&body);
        assert_eq!(logged.chars().count(), LOG_TRUNCATE_CHARS + 1);
        assert!(logged.ends_with('…'));
        assert_eq!(&logged[..LOG_TRUNCATE_CHARS], &body[..LOG_TRUNCATE_CHARS]);
    }

    #[test]
    fn test_truncate_short_body_unchanged() {
        let body = "y".repeat(500);
        assert!(matches!(truncate_for_log(&body), Cow::Borrowed(_)));

        let exact = "z".repeat(LOG_TRUNCATE_CHARS);
        assert_eq!(truncate_for_log(&exact), exact.as_str());
    }

    #[test]
    fn test_truncate_counts_characters() {
        let body = "é".repeat(1500);
        let logged = truncate_for_log(&body);
        assert_eq!(logged.chars().count(), LOG_TRUNCATE_CHARS + 1);
    }

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode("true"), "true");
        assert_eq!(percent_encode("\"alice\""), "%22alice%22");
        assert_eq!(percent_encode("[\"a\",\"b\"]"), "%5B%22a%22%2C%22b%22%5D");
        assert_eq!(percent_encode("\"Europe/Paris\""), "%22Europe%2FParis%22");
        assert_eq!(percent_encode("\"ü\""), "%22%C3%BC%22");
    }

    #[test]
    fn test_query_encoding() {
        let transport = Transport::new();
        let call = transport
            .call("test", Method::GET, "/x")
            .query("wait", &true)
            .query("username", "alice")
            .query_opt::<bool>("cur", None)
            .secret_query("token", "C123");

        assert_eq!(
            wire_query(&call.query),
            "wait=true&username=%22alice%22&token=%22C123%22"
        );
        assert_eq!(
            logged_query(&call.query),
            r#"wait=true&username="alice"&token="****""#
        );
    }

    #[tokio::test]
    async fn test_request_before_open() {
        let transport = Transport::new();
        let result = transport
            .call("status", Method::GET, "/meta/status")
            .send::<serde_json::Value>()
            .await;
        assert!(matches!(result, Err(ClientError::NotOpen)));
    }

    #[tokio::test]
    async fn test_request_after_close() {
        let mut transport = Transport::new();
        transport.open(Endpoint::unix("/nonexistent.sock"));
        assert!(transport.is_open());
        transport.close();
        transport.close();
        let result = transport
            .call("status", Method::GET, "/meta/status")
            .send_empty()
            .await;
        assert!(matches!(result, Err(ClientError::NotOpen)));
    }

    #[tokio::test]
    async fn test_encode_error_is_deferred() {
        let mut unencodable = BTreeMap::new();
        unencodable.insert(vec![1u8], 1u8);

        let mut transport = Transport::new();
        transport.open(Endpoint::unix("/nonexistent.sock"));
        let result = transport
            .call("bad", Method::POST, "/bad")
            .json(&unencodable)
            .send_empty()
            .await;
        assert!(matches!(
            result,
            Err(ClientError::Encode { method: "bad", .. })
        ));
    }
}
