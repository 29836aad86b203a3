//! HTTP transport for the spreadsheet values API.
//!
//! The HTTP client is abstracted behind [`HttpClient`] so the URL and
//! payload handling can be tested without a network. [`UreqClient`] is the
//! blocking implementation used in production.

use crate::config::RemoteConfig;
use crate::error::{SyncError, SyncResult};
use crate::transport::TableTransport;
use campus_codec::TableName;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP method used by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET.
    Get,
    /// POST.
    Post,
    /// PUT.
    Put,
}

impl Method {
    /// Returns the method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

/// HTTP client abstraction.
pub trait HttpClient: Send + Sync {
    /// Sends a request with an optional JSON body and returns the response
    /// body.
    fn send(&self, method: Method, url: &Url, body: Option<&str>) -> SyncResult<String>;
}

/// Blocking HTTP client backed by `ureq`.
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    /// Creates a client with an optional per-request timeout.
    pub fn new(timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            agent: builder.build(),
        }
    }
}

impl HttpClient for UreqClient {
    fn send(&self, method: Method, url: &Url, body: Option<&str>) -> SyncResult<String> {
        let request = self.agent.request(method.as_str(), url.as_str());
        let result = match body {
            Some(payload) => request
                .set("Content-Type", "application/json")
                .send_string(payload),
            None => request.call(),
        };
        match result {
            Ok(resp) => resp
                .into_string()
                .map_err(|e| SyncError::transport_retryable(e.to_string())),
            Err(ureq::Error::Status(code, resp)) => {
                let message = resp.into_string().unwrap_or_default();
                Err(SyncError::status(code, message))
            }
            Err(ureq::Error::Transport(err)) => Err(SyncError::transport_retryable(err.to_string())),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Serialize)]
struct ValueUpdate<'a> {
    values: &'a [Vec<String>],
}

/// Spreadsheet transport over HTTP.
///
/// Requests go to `{endpoint}/{document}/values/{range}` with the access
/// key as the `key` query parameter.
pub struct HttpTransport<C: HttpClient> {
    base: Url,
    api_key: String,
    client: C,
    connected: AtomicBool,
    last_error: RwLock<Option<String>>,
}

impl HttpTransport<UreqClient> {
    /// Creates a transport from a remote configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the key or document is missing or the
    /// endpoint is not a valid base URL.
    pub fn from_config(config: &RemoteConfig) -> SyncResult<Self> {
        Self::new(config, UreqClient::new(config.timeout))
    }
}

impl<C: HttpClient> HttpTransport<C> {
    /// Creates a transport with a custom client.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the key or document is missing or the
    /// endpoint is not a valid base URL.
    pub fn new(config: &RemoteConfig, client: C) -> SyncResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(SyncError::InvalidConfig("access key is required".into()));
        }
        if config.document_id.trim().is_empty() {
            return Err(SyncError::InvalidConfig("document id is required".into()));
        }

        let mut base = Url::parse(&config.endpoint)
            .map_err(|e| SyncError::InvalidConfig(format!("endpoint: {e}")))?;
        base.path_segments_mut()
            .map_err(|()| SyncError::InvalidConfig("endpoint cannot be a base URL".into()))?
            .pop_if_empty()
            .push(&config.document_id)
            .push("values");

        Ok(Self {
            base,
            api_key: config.api_key.clone(),
            client,
            connected: AtomicBool::new(true),
            last_error: RwLock::new(None),
        })
    }

    /// Returns the values URL of the document.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Returns the last error message.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// Builds the URL for a range such as `Students!A1:Z500`.
    pub fn range_url(&self, range: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(range);
        }
        {
            let mut query = url.query_pairs_mut();
            for (name, value) in params {
                query.append_pair(name, value);
            }
            query.append_pair("key", &self.api_key);
        }
        url
    }

    fn send(&self, method: Method, url: Url, body: Option<&str>) -> SyncResult<String> {
        debug!(method = method.as_str(), path = url.path(), "remote request");
        match self.client.send(method, &url, body) {
            Ok(text) => {
                self.connected.store(true, Ordering::SeqCst);
                *self.last_error.write() = None;
                Ok(text)
            }
            Err(err) => {
                if matches!(err, SyncError::Transport { .. }) {
                    self.connected.store(false, Ordering::SeqCst);
                }
                *self.last_error.write() = Some(err.to_string());
                Err(err)
            }
        }
    }
}

fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl<C: HttpClient> TableTransport for HttpTransport<C> {
    fn read_range(
        &self,
        table: TableName,
        first: usize,
        last: usize,
    ) -> SyncResult<Vec<Vec<String>>> {
        let url = self.range_url(&format!("{table}!A{first}:Z{last}"), &[]);
        let text = self.send(Method::Get, url, None)?;
        let range: ValueRange = serde_json::from_str(&text)
            .map_err(|e| SyncError::Protocol(format!("failed to decode {table} range: {e}")))?;
        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    fn clear(&self, table: TableName) -> SyncResult<()> {
        let url = self.range_url(&format!("{table}!A1:Z:clear"), &[]);
        self.send(Method::Post, url, Some("{}"))?;
        Ok(())
    }

    fn write(&self, table: TableName, rows: &[Vec<String>]) -> SyncResult<()> {
        let url = self.range_url(&format!("{table}!A1"), &[("valueInputOption", "RAW")]);
        let body = serde_json::to_string(&ValueUpdate { values: rows })
            .map_err(|e| SyncError::Protocol(format!("failed to encode {table}: {e}")))?;
        self.send(Method::Put, url, Some(&body))?;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingClient {
        sent: Mutex<Vec<(Method, String, Option<String>)>>,
        response: Mutex<Option<SyncResult<String>>>,
    }

    impl RecordingClient {
        fn respond(&self, response: SyncResult<String>) {
            *self.response.lock() = Some(response);
        }
    }

    impl HttpClient for RecordingClient {
        fn send(&self, method: Method, url: &Url, body: Option<&str>) -> SyncResult<String> {
            self.sent
                .lock()
                .push((method, url.to_string(), body.map(str::to_string)));
            self.response
                .lock()
                .clone()
                .unwrap_or_else(|| Ok("{}".to_string()))
        }
    }

    fn transport() -> HttpTransport<RecordingClient> {
        let config = RemoteConfig::new("secret", "doc123").with_endpoint("https://example.test/v4/spreadsheets");
        HttpTransport::new(&config, RecordingClient::default()).unwrap()
    }

    #[test]
    fn read_range_url_and_decode() {
        let transport = transport();
        transport
            .client
            .respond(Ok(r#"{"range":"Students!A1:Z2","values":[["ID","Name"],["STU001",20]]}"#.to_string()));

        let rows = transport.read_range(TableName::Students, 1, 2).unwrap();
        assert_eq!(rows, vec![vec!["ID", "Name"], vec!["STU001", "20"]]);

        let sent = transport.client.sent.lock();
        assert_eq!(sent[0].0, Method::Get);
        assert_eq!(
            sent[0].1,
            "https://example.test/v4/spreadsheets/doc123/values/Students!A1:Z2?key=secret"
        );
    }

    #[test]
    fn empty_range_has_no_values() {
        let transport = transport();
        let rows = transport.read_range(TableName::Courses, 1, 500).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn clear_then_write_requests() {
        let transport = transport();
        transport.clear(TableName::Faculty).unwrap();
        transport
            .write(TableName::Faculty, &[vec!["ID".to_string()]])
            .unwrap();

        let sent = transport.client.sent.lock();
        assert_eq!(sent[0].0, Method::Post);
        assert!(sent[0].1.contains("/values/Faculty!A1:Z:clear?key=secret"));
        assert_eq!(sent[1].0, Method::Put);
        assert!(sent[1].1.contains("/values/Faculty!A1?valueInputOption=RAW&key=secret"));
        assert_eq!(sent[1].2.as_deref(), Some(r#"{"values":[["ID"]]}"#));
    }

    #[test]
    fn failures_are_remembered() {
        let transport = transport();
        transport
            .client
            .respond(Err(SyncError::transport_retryable("connection refused")));

        assert!(transport.clear(TableName::University).is_err());
        assert!(!transport.is_connected());
        assert!(transport.last_error().unwrap().contains("connection refused"));
    }

    #[test]
    fn bad_body_is_protocol_error() {
        let transport = transport();
        transport.client.respond(Ok("not json".to_string()));
        let err = transport.read_range(TableName::Students, 1, 10).unwrap_err();
        assert!(matches!(err, SyncError::Protocol(_)));
    }

    #[test]
    fn missing_key_is_rejected() {
        let config = RemoteConfig::new("", "doc");
        let err = HttpTransport::new(&config, RecordingClient::default()).err().unwrap();
        assert!(matches!(err, SyncError::InvalidConfig(_)));
    }
}
