//! HTTP transport: sends JSON requests and normalizes responses.
//!
//! `Transport` owns the response contract (204 handling, lenient body
//! parsing, error classification). The actual I/O happens behind the
//! `HttpBackend` trait so the rest of the crate never touches reqwest.

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::ApiError;

/// A fully resolved request, ready to hand to a backend
#[derive(Debug, Clone)]
pub struct HttpRequest {
  pub method: Method,
  pub url: Url,
  pub headers: HeaderMap,
  pub body: Option<Vec<u8>>,
}

/// Raw response as seen by the transport
#[derive(Debug, Clone)]
pub struct HttpResponse {
  pub status: StatusCode,
  pub body: Vec<u8>,
}

/// Something that can execute an `HttpRequest`.
#[async_trait]
pub trait HttpBackend: Send + Sync + 'static {
  async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Production backend built on reqwest.
/// Clone is cheap - reqwest::Client is reference counted.
#[derive(Clone)]
pub struct ReqwestBackend {
  client: Client,
}

impl ReqwestBackend {
  pub fn new(timeout: Duration) -> Result<Self, ApiError> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self { client })
  }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
  async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
    let mut builder = self
      .client
      .request(request.method, request.url)
      .headers(request.headers);
    if let Some(body) = request.body {
      builder = builder.body(body);
    }

    let response = builder.send().await?;
    let status = response.status();
    let body = response.bytes().await?.to_vec();

    Ok(HttpResponse { status, body })
  }
}

/// Per-call options merged over the transport defaults
#[derive(Debug, Clone)]
pub struct RequestOptions {
  pub method: Method,
  pub headers: HeaderMap,
  pub body: Option<Value>,
}

impl Default for RequestOptions {
  fn default() -> Self {
    Self {
      method: Method::GET,
      headers: HeaderMap::new(),
      body: None,
    }
  }
}

impl RequestOptions {
  pub fn method(method: Method) -> Self {
    Self {
      method,
      ..Self::default()
    }
  }

  /// Attach a JSON body
  pub fn json(mut self, body: &impl Serialize) -> Result<Self, ApiError> {
    let value =
      serde_json::to_value(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
    self.body = Some(value);
    Ok(self)
  }
}

/// JSON transport over a backend, rooted at the API origin.
#[derive(Clone)]
pub struct Transport<B> {
  backend: B,
  base_url: Url,
}

impl<B: HttpBackend> Transport<B> {
  pub fn new(backend: B, base_url: Url) -> Self {
    Self { backend, base_url }
  }

  /// Issue one request and decode the response as `T`.
  ///
  /// A 204 decodes `T` from JSON null, so void calls use `T = ()`.
  /// Bodies that are not JSON are treated as absent.
  pub async fn request<T: DeserializeOwned>(
    &self,
    endpoint: &str,
    options: RequestOptions,
  ) -> Result<T, ApiError> {
    let url = self
      .base_url
      .join(endpoint)
      .map_err(|e| ApiError::InvalidResponse(format!("bad endpoint {}: {}", endpoint, e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(
      header::CONTENT_TYPE,
      HeaderValue::from_static("application/json"),
    );
    for (name, value) in options.headers.iter() {
      headers.insert(name.clone(), value.clone());
    }

    let body = options.body.map(|b| b.to_string().into_bytes());

    debug!(method = %options.method, %url, "sending request");
    let response = self
      .backend
      .send(HttpRequest {
        method: options.method,
        url,
        headers,
        body,
      })
      .await?;
    debug!(status = response.status.as_u16(), "received response");

    if response.status == StatusCode::NO_CONTENT {
      return decode(Value::Null);
    }

    let data: Value = serde_json::from_slice(&response.body).unwrap_or(Value::Null);

    if response.status.is_success() {
      decode(data)
    } else {
      Err(ApiError::from_status(response.status.as_u16(), &data))
    }
  }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
  serde_json::from_value(value).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
pub mod testing {
  //! Scripted in-memory backend for tests.

  use super::*;
  use std::collections::VecDeque;
  use std::sync::{Arc, Mutex};

  /// Backend that replays queued responses and records every request.
  #[derive(Clone, Default)]
  pub struct MockBackend {
    responses: Arc<Mutex<VecDeque<Result<HttpResponse, ApiError>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
  }

  impl MockBackend {
    pub fn new() -> Self {
      Self::default()
    }

    /// Queue a JSON response
    pub fn respond(&self, status: u16, body: Value) -> &Self {
      self.push(Ok(HttpResponse {
        status: StatusCode::from_u16(status).unwrap(),
        body: body.to_string().into_bytes(),
      }))
    }

    /// Queue a response with a raw body
    pub fn respond_raw(&self, status: u16, body: &str) -> &Self {
      self.push(Ok(HttpResponse {
        status: StatusCode::from_u16(status).unwrap(),
        body: body.as_bytes().to_vec(),
      }))
    }

    /// Queue a connection failure
    pub fn fail(&self, message: &str) -> &Self {
      self.push(Err(ApiError::Network(message.to_string())))
    }

    fn push(&self, response: Result<HttpResponse, ApiError>) -> &Self {
      self.responses.lock().unwrap().push_back(response);
      self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
      self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
      self.requests.lock().unwrap().len()
    }

    /// The JSON body of the n-th recorded request
    pub fn body_of(&self, n: usize) -> Option<Value> {
      let requests = self.requests.lock().unwrap();
      let body = requests.get(n)?.body.as_ref()?;
      serde_json::from_slice(body).ok()
    }
  }

  #[async_trait]
  impl HttpBackend for MockBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
      self.requests.lock().unwrap().push(request);
      self
        .responses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(ApiError::Network("no scripted response".to_string())))
    }
  }

  pub fn base_url() -> Url {
    Url::parse("http://grocer.test").unwrap()
  }
}

#[cfg(test)]
mod tests {
  use super::testing::{base_url, MockBackend};
  use super::*;
  use serde::Deserialize;
  use serde_json::json;

  #[derive(Debug, Deserialize, PartialEq)]
  struct Count {
    deleted: u64,
  }

  fn transport(backend: &MockBackend) -> Transport<MockBackend> {
    Transport::new(backend.clone(), base_url())
  }

  #[tokio::test]
  async fn test_success_decodes_body() {
    let backend = MockBackend::new();
    backend.respond(200, json!({ "deleted": 3 }));

    let count: Count = transport(&backend)
      .request("/api/grocery-items/", RequestOptions::method(Method::DELETE))
      .await
      .unwrap();

    assert_eq!(count, Count { deleted: 3 });
    let sent = &backend.requests()[0];
    assert_eq!(sent.method, Method::DELETE);
    assert_eq!(sent.url.as_str(), "http://grocer.test/api/grocery-items/");
  }

  #[tokio::test]
  async fn test_no_content_yields_unit() {
    let backend = MockBackend::new();
    backend.respond_raw(204, "");

    let result: Result<(), _> = transport(&backend)
      .request("/api/grocery-items/1/", RequestOptions::method(Method::DELETE))
      .await;
    assert!(result.is_ok());
  }

  #[tokio::test]
  async fn test_json_content_type_is_merged_with_caller_headers() {
    let backend = MockBackend::new();
    backend.respond_raw(204, "");

    let mut options = RequestOptions::method(Method::POST);
    options
      .headers
      .insert("x-request-id", HeaderValue::from_static("abc"));
    let _: () = transport(&backend).request("/x/", options).await.unwrap();

    let sent = &backend.requests()[0];
    assert_eq!(sent.headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(sent.headers["x-request-id"], "abc");
  }

  #[tokio::test]
  async fn test_caller_content_type_overrides_default() {
    let backend = MockBackend::new();
    backend.respond_raw(204, "");

    let mut options = RequestOptions::default();
    options.headers.insert(
      header::CONTENT_TYPE,
      HeaderValue::from_static("application/merge-patch+json"),
    );
    let _: () = transport(&backend).request("/x/", options).await.unwrap();

    assert_eq!(
      backend.requests()[0].headers[header::CONTENT_TYPE],
      "application/merge-patch+json"
    );
  }

  #[tokio::test]
  async fn test_unparseable_error_body_uses_generic_message() {
    let backend = MockBackend::new();
    backend.respond_raw(502, "<html>Bad Gateway</html>");

    let err = transport(&backend)
      .request::<Value>("/x/", RequestOptions::default())
      .await
      .unwrap_err();

    assert_eq!(
      err,
      ApiError::Request {
        status: 502,
        message: "An error occurred. Please try again.".to_string()
      }
    );
  }

  #[tokio::test]
  async fn test_unparseable_success_body_is_null() {
    let backend = MockBackend::new();
    backend.respond_raw(200, "");

    let value: Value = transport(&backend)
      .request("/x/", RequestOptions::default())
      .await
      .unwrap();
    assert_eq!(value, Value::Null);
  }

  #[tokio::test]
  async fn test_field_errors_are_classified() {
    let backend = MockBackend::new();
    backend.respond(400, json!({ "name": ["This field is required."] }));

    let err = transport(&backend)
      .request::<Value>("/x/", RequestOptions::method(Method::POST))
      .await
      .unwrap_err();

    assert_eq!(err.to_string(), "Please fix the highlighted fields.");
    assert_eq!(err.field_errors()["name"], "This field is required.");
  }

  #[tokio::test]
  async fn test_network_failure_propagates() {
    let backend = MockBackend::new();
    backend.fail("connection refused");

    let err = transport(&backend)
      .request::<Value>("/x/", RequestOptions::default())
      .await
      .unwrap_err();
    assert_eq!(err, ApiError::Network("connection refused".to_string()));
    assert_eq!(backend.request_count(), 1);
  }

  #[tokio::test]
  async fn test_json_body_is_serialized() {
    let backend = MockBackend::new();
    backend.respond(200, json!({ "updated": 2 }));

    let options = RequestOptions::method(Method::PATCH)
      .json(&json!({ "purchased": true }))
      .unwrap();
    let _: Value = transport(&backend).request("/x/", options).await.unwrap();

    assert_eq!(backend.body_of(0), Some(json!({ "purchased": true })));
  }
}
