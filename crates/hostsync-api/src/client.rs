// Async HTTP client for the Ansible Tower / AWX REST API.
//
// Base path: {tower_url}/api/{version}/
// Auth: HTTP basic (username + password)
//
// The client knows about URLs, payloads and status codes only. What the
// endpoints mean is up to the caller.

use std::time::Duration;

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, trace};
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;

/// A decoded JSON object body.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

// ── Response ─────────────────────────────────────────────────────────

/// A successful (2xx) Tower response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    /// Raw response body as received.
    pub body: String,
    /// Decoded body. Empty when the server sent no content.
    pub json: JsonMap,
}

impl ApiResponse {
    /// Look up a top-level field of the decoded body.
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.json.get(key)
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Raw HTTP client for one Tower instance.
///
/// Every call is a single attempt: no retries, no backoff. The timeout from
/// the `TransportConfig` applies to each call on its own.
pub struct TowerClient {
    http: reqwest::Client,
    base_url: String,
    api_version: String,
    username: String,
    password: SecretString,
    timeout: Duration,
}

impl TowerClient {
    /// Create a client for the Tower instance at `base_url`.
    ///
    /// No network I/O happens here; the first request opens the connection.
    pub fn new(
        base_url: &str,
        api_version: &str,
        username: &str,
        password: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_version: api_version.to_owned(),
            username: username.to_owned(),
            password: password.clone(),
            timeout: transport.timeout,
        })
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build `{base_url}/api/{api_version}/{path}`.
    ///
    /// Tower wants collection and detail paths to end in `/`, so one is
    /// appended unless the URL already ends with `/` or carries a filter
    /// (`=`). A slash after a query string breaks the filter value.
    pub fn build_url(&self, path: &str) -> String {
        let mut url = format!("{}/api/{}/{}", self.base_url, self.api_version, path);
        if !url.ends_with('/') && !url.contains('=') {
            url.push('/');
        }
        url
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub async fn get(&self, path: &str) -> Result<ApiResponse, Error> {
        self.request::<()>(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, Error> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, Error> {
        self.request(Method::PATCH, path, Some(body)).await
    }

    /// Issue one authenticated call.
    ///
    /// A payload is sent as a JSON body (`Content-Type: application/json`);
    /// without one the request has no body at all.
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&B>,
    ) -> Result<ApiResponse, Error> {
        let url = Url::parse(&self.build_url(path))?;
        debug!("{method} {url}");

        let mut req = self
            .http
            .request(method, url.clone())
            .basic_auth(&self.username, Some(self.password.expose_secret()));

        if let Some(body) = payload {
            trace!(payload = ?serde_json::to_value(body).ok(), "request payload");
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|e| self.transport_error(e, &url))?;
        self.handle_response(resp, &url).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response(
        &self,
        resp: reqwest::Response,
        url: &Url,
    ) -> Result<ApiResponse, Error> {
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| self.transport_error(e, url))?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "request to {url} failed");
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let json = if body.trim().is_empty() {
            JsonMap::new()
        } else {
            serde_json::from_str(&body).map_err(|e| {
                let preview = body.chars().take(200).collect::<String>();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body: body.clone(),
                }
            })?
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
            json,
        })
    }

    fn transport_error(&self, err: reqwest::Error, url: &Url) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else {
            Error::Transport(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> TowerClient {
        let password = SecretString::from("secret".to_owned());
        match TowerClient::new(base, "v2", "admin", &password, &TransportConfig::default()) {
            Ok(client) => client,
            Err(e) => panic!("client should build: {e}"),
        }
    }

    #[test]
    fn build_url_appends_single_trailing_slash() {
        let c = client("https://tower.example.com");
        assert_eq!(c.build_url("hosts"), "https://tower.example.com/api/v2/hosts/");
        assert_eq!(c.build_url("hosts/42"), "https://tower.example.com/api/v2/hosts/42/");
    }

    #[test]
    fn build_url_keeps_existing_trailing_slash() {
        let c = client("https://tower.example.com");
        assert_eq!(
            c.build_url("inventories/7/hosts/"),
            "https://tower.example.com/api/v2/inventories/7/hosts/"
        );
    }

    #[test]
    fn build_url_leaves_filters_alone() {
        let c = client("https://tower.example.com");
        assert_eq!(
            c.build_url("inventories?name=Lab"),
            "https://tower.example.com/api/v2/inventories?name=Lab"
        );
        assert_eq!(
            c.build_url("inventories/7/hosts?name=web01"),
            "https://tower.example.com/api/v2/inventories/7/hosts?name=web01"
        );
    }

    #[test]
    fn build_url_trims_base_slash() {
        let c = client("https://tower.example.com/");
        assert_eq!(c.build_url("ping"), "https://tower.example.com/api/v2/ping/");
    }
}
