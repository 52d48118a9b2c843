//! HTTP requests as effects.
//!
//! [`HttpTransport`] is the capability a host implements over its client.
//! [`send_result`] checks the status, and the JSON helpers add
//! serialization through `serde_json`.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{TransportError, failure_message};
use crate::config::TransportConfig;
use crate::effect::{CancellationToken, ReaderTaskResult, TaskResult};

/// Failure message of a request whose token was cancelled.
pub const HTTP_REQUEST_CANCELLED: &str = "HTTP request was cancelled.";

/// Failure message of a JSON response whose body is `null` or blank.
pub const HTTP_PAYLOAD_EMPTY: &str = "HTTP payload was empty.";

/// Request method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        };
        formatter.write_str(name)
    }
}

/// An outgoing request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    method: HttpMethod,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// A request without headers or body.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// A `GET` request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// A `POST` request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replaces the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// The request method.
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// The target URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// The first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The body bytes, if any.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// A received response.
pub trait HttpResponse: Send + 'static {
    /// The status code.
    fn status(&self) -> u16;

    /// `true` for 2xx statuses.
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status())
    }

    /// Reads the whole body as text.
    fn read_body(
        self,
        cancellation: &CancellationToken,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;
}

/// A request/response capability.
pub trait HttpTransport: Send + Sync + 'static {
    /// The response this transport produces.
    type Response: HttpResponse;

    /// Sends `request`, giving up when `cancellation` fires.
    fn send(
        &self,
        request: HttpRequest,
        cancellation: &CancellationToken,
    ) -> impl Future<Output = Result<Self::Response, TransportError>> + Send;
}

/// A response whose body is already in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufferedResponse {
    status: u16,
    body: String,
}

impl BufferedResponse {
    /// A response with `status` and `body`.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// The body text.
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl HttpResponse for BufferedResponse {
    fn status(&self) -> u16 {
        self.status
    }

    async fn read_body(self, cancellation: &CancellationToken) -> Result<String, TransportError> {
        cancellation.check()?;
        Ok(self.body)
    }
}

fn request_failure(operation: &str, error: &TransportError) -> String {
    match error {
        TransportError::Cancelled => HTTP_REQUEST_CANCELLED.to_string(),
        other => failure_message(operation, other),
    }
}

/// Sends `request` and keeps the response when its status is a success.
///
/// A non-success status fails with
/// `"HTTP request failed with status {code}: {body}"`.
pub fn send_result<H>(
    transport: Arc<H>,
    request: HttpRequest,
    cancellation: CancellationToken,
) -> TaskResult<H::Response>
where
    H: HttpTransport,
{
    TaskResult::new(async move {
        if cancellation.is_cancelled() {
            return Err(HTTP_REQUEST_CANCELLED.to_string());
        }
        let response = transport
            .send(request, &cancellation)
            .await
            .map_err(|error| request_failure("http send", &error))?;
        if response.is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.read_body(&cancellation).await.unwrap_or_default();
        tracing::debug!(status, "http request returned a failure status");
        Err(format!("HTTP request failed with status {status}: {body}"))
    })
}

async fn read_json<R, T>(response: R, cancellation: &CancellationToken) -> Result<T, String>
where
    R: HttpResponse,
    T: DeserializeOwned,
{
    let body = response
        .read_body(cancellation)
        .await
        .map_err(|error| request_failure("http read", &error))?;
    if body.trim().is_empty() {
        return Err(HTTP_PAYLOAD_EMPTY.to_string());
    }
    match serde_json::from_str::<Option<T>>(&body) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(HTTP_PAYLOAD_EMPTY.to_string()),
        Err(error) => Err(error.to_string()),
    }
}

/// `GET url`, deserializing the body as JSON.
pub fn get_json_result<H, T>(transport: Arc<H>, url: impl Into<String>, cancellation: CancellationToken) -> TaskResult<T>
where
    H: HttpTransport,
    T: DeserializeOwned + Send + 'static,
{
    get_json_result_with(transport, url, cancellation, &TransportConfig::default())
}

/// [`get_json_result`] with the `Accept` header taken from `config`.
pub fn get_json_result_with<H, T>(
    transport: Arc<H>,
    url: impl Into<String>,
    cancellation: CancellationToken,
    config: &TransportConfig,
) -> TaskResult<T>
where
    H: HttpTransport,
    T: DeserializeOwned + Send + 'static,
{
    let request = HttpRequest::get(url).with_header("Accept", config.json_content_type.clone());
    let token = cancellation.clone();
    send_result(transport, request, cancellation)
        .flat_map(move |response| TaskResult::new(async move { read_json(response, &token).await }))
}

/// `POST url` with `payload` as a JSON body, deserializing the response.
pub fn post_json_result<H, Req, T>(
    transport: Arc<H>,
    url: impl Into<String>,
    payload: &Req,
    cancellation: CancellationToken,
) -> TaskResult<T>
where
    H: HttpTransport,
    Req: Serialize + ?Sized,
    T: DeserializeOwned + Send + 'static,
{
    post_json_result_with(transport, url, payload, cancellation, &TransportConfig::default())
}

/// [`post_json_result`] with the content type taken from `config`.
pub fn post_json_result_with<H, Req, T>(
    transport: Arc<H>,
    url: impl Into<String>,
    payload: &Req,
    cancellation: CancellationToken,
    config: &TransportConfig,
) -> TaskResult<T>
where
    H: HttpTransport,
    Req: Serialize + ?Sized,
    T: DeserializeOwned + Send + 'static,
{
    let body = match serde_json::to_vec(payload) {
        Ok(body) => body,
        Err(error) => return TaskResult::fail(error.to_string()),
    };
    let request = HttpRequest::post(url)
        .with_header("Content-Type", config.json_content_type.clone())
        .with_header("Accept", config.json_content_type.clone())
        .with_body(body);
    let token = cancellation.clone();
    send_result(transport, request, cancellation)
        .flat_map(move |response| TaskResult::new(async move { read_json(response, &token).await }))
}

/// Lifts a function of the transport into a reader over it.
pub fn http_reader<H, T, F>(function: F) -> ReaderTaskResult<Arc<H>, T>
where
    H: HttpTransport,
    T: Send + 'static,
    F: Fn(Arc<H>) -> TaskResult<T> + Send + Sync + 'static,
{
    ReaderTaskResult::new(function)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct Fixed(u16, &'static str);

    impl HttpTransport for Fixed {
        type Response = BufferedResponse;

        async fn send(
            &self,
            _request: HttpRequest,
            cancellation: &CancellationToken,
        ) -> Result<BufferedResponse, TransportError> {
            cancellation.check()?;
            Ok(BufferedResponse::new(self.0, self.1))
        }
    }

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Payload {
        value: i32,
    }

    #[rstest]
    #[case(200, true)]
    #[case(204, true)]
    #[case(302, false)]
    #[case(500, false)]
    fn success_range(#[case] status: u16, #[case] expected: bool) {
        assert_eq!(BufferedResponse::new(status, "").is_success(), expected);
    }

    #[rstest]
    fn header_lookup_ignores_case() {
        let request = HttpRequest::get("https://example.com").with_header("Content-Type", "text/plain");
        assert_eq!(request.header("content-type"), Some("text/plain"));
        assert_eq!(request.header("accept"), None);
        assert_eq!(request.method().to_string(), "GET");
    }

    #[tokio::test]
    async fn failure_status_carries_body() {
        let outcome = send_result(
            Arc::new(Fixed(500, "bad")),
            HttpRequest::get("https://example.com"),
            CancellationToken::none(),
        )
        .await;
        assert_eq!(outcome, Err("HTTP request failed with status 500: bad".to_string()));
    }

    #[tokio::test]
    async fn pre_cancelled_send_fails() {
        let outcome = send_result(
            Arc::new(Fixed(200, "{}")),
            HttpRequest::get("https://example.com"),
            CancellationToken::cancelled_token(),
        )
        .await;
        assert_eq!(outcome.map(|response| response.status()), Err(HTTP_REQUEST_CANCELLED.to_string()));
    }

    #[rstest]
    #[case("null")]
    #[case("")]
    #[tokio::test]
    async fn empty_payload_fails(#[case] body: &'static str) {
        let outcome: Result<Payload, String> =
            get_json_result(Arc::new(Fixed(200, body)), "https://example.com", CancellationToken::none()).await;
        assert_eq!(outcome, Err(HTTP_PAYLOAD_EMPTY.to_string()));
    }

    #[tokio::test]
    async fn json_payload_is_parsed() {
        let outcome: Result<Payload, String> = get_json_result(
            Arc::new(Fixed(200, r#"{"value":5}"#)),
            "https://example.com",
            CancellationToken::none(),
        )
        .await;
        assert_eq!(outcome, Ok(Payload { value: 5 }));
    }
}
