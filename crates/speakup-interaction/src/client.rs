//! ApiClient - shared HTTP client for the SpeakUp backend.
//!
//! Every request goes through [`ApiClient::send`], which attaches the
//! current bearer token, unwraps the `{ data }` envelope and maps non-2xx
//! answers onto [`SpeakupError`]. A 401 answered to a request that carried a
//! token is reported to the registered [`UnauthorizedHook`].

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use speakup_core::config::ClientConfig;
use speakup_core::session::{BearerToken, UnauthorizedHook};
use speakup_core::{Result, SpeakupError};
use std::sync::{Arc, OnceLock, Weak};
use std::time::Duration;

use crate::envelope::{Envelope, ErrorBody};

/// Whether a request may carry the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Sent without a token and never reported to the 401 hook
    /// (login, register). A 401 there means bad credentials, and it must
    /// not end a session that is already signed in.
    Anonymous,
    /// Token attached whenever one is present.
    Bearer,
}

pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Arc<BearerToken>,
    unauthorized_hook: OnceLock<Weak<dyn UnauthorizedHook>>,
}

impl ApiClient {
    /// Builds a client for `config.api_url` that reads its token from
    /// `token`.
    pub fn new(config: &ClientConfig, token: Arc<BearerToken>) -> Result<Self> {
        let base_url = Url::parse(&config.api_url)
            .map_err(|e| SpeakupError::config(format!("Invalid api_url '{}': {e}", config.api_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(SpeakupError::config(format!(
                "api_url '{}' cannot be used as a base URL",
                config.api_url
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SpeakupError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            token,
            unauthorized_hook: OnceLock::new(),
        })
    }

    /// Registers the receiver of token rejections. Only the first call
    /// takes effect.
    pub fn set_unauthorized_hook(&self, hook: Weak<dyn UnauthorizedHook>) {
        if self.unauthorized_hook.set(hook).is_err() {
            tracing::warn!("unauthorized hook already registered; ignoring");
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `segments` under the base URL, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SpeakupError::config("api_url cannot be used as a base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> Result<Envelope<T>> {
        let url = self.endpoint(segments)?;
        let request = self.http.request(Method::GET, url).query(query);
        self.send(request, Access::Bearer).await
    }

    pub(crate) async fn post<B, T>(
        &self,
        segments: &[&str],
        body: Option<&B>,
        access: Access,
    ) -> Result<Envelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let mut request = self.http.request(Method::POST, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request, access).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<Envelope<T>> {
        let url = self.endpoint(segments)?;
        let request = self.http.request(Method::DELETE, url);
        self.send(request, Access::Bearer).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        access: Access,
    ) -> Result<Envelope<T>> {
        let attached = match access {
            Access::Bearer => self.token.get().await,
            Access::Anonymous => None,
        };

        let request = match &attached {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let path = response.url().path().to_string();
        tracing::debug!(%status, %path, authenticated = attached.is_some(), "api response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::UNAUTHORIZED
                && let Some(token) = attached.as_deref()
            {
                self.notify_unauthorized(token).await;
            }
            return Err(map_http_error(status, &body, &path));
        }

        response.json::<Envelope<T>>().await.map_err(|e| SpeakupError::Serialization {
            format: "JSON".to_string(),
            message: format!("Failed to parse response from {path}: {e}"),
        })
    }

    async fn notify_unauthorized(&self, token: &str) {
        let hook = self.unauthorized_hook.get().and_then(Weak::upgrade);
        match hook {
            Some(hook) => hook.on_unauthorized(token).await,
            None => tracing::debug!("401 received but no unauthorized hook is registered"),
        }
    }
}

/// Maps a failed `send()` onto the error taxonomy.
fn map_transport_error(err: reqwest::Error) -> SpeakupError {
    if err.is_timeout() {
        SpeakupError::network(format!("Request timed out: {err}"))
    } else if err.is_connect() {
        SpeakupError::network(format!("Could not reach the server: {err}"))
    } else {
        SpeakupError::network(err.to_string())
    }
}

/// Maps a non-2xx answer onto the error taxonomy.
pub(crate) fn map_http_error(status: StatusCode, body: &str, path: &str) -> SpeakupError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SpeakupError::unauthorized(message),
        StatusCode::NOT_FOUND => SpeakupError::not_found("resource", path),
        StatusCode::TOO_MANY_REQUESTS => SpeakupError::server(status.as_u16(), message),
        s if s.is_client_error() => SpeakupError::validation(message),
        s => SpeakupError::server(s.as_u16(), message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speakup_core::ErrorKind;

    fn client(url: &str) -> Result<ApiClient> {
        let config = ClientConfig {
            api_url: url.to_string(),
            ..ClientConfig::default()
        };
        ApiClient::new(&config, Arc::new(BearerToken::new()))
    }

    #[test]
    fn test_endpoint_joins_and_encodes_segments() {
        let client = client("http://localhost:5000/api/").unwrap();
        let url = client.endpoint(&["stories", "a b", "like"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/stories/a%20b/like");

        let client = self::client("http://localhost:5000/api").unwrap();
        let url = client.endpoint(&["auth", "profile"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/auth/profile");
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let err = client("not a url").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (StatusCode::UNAUTHORIZED, ErrorKind::Unauthorized),
            (StatusCode::BAD_REQUEST, ErrorKind::Validation),
            (StatusCode::CONFLICT, ErrorKind::Validation),
            (StatusCode::NOT_FOUND, ErrorKind::NotFound),
            (StatusCode::TOO_MANY_REQUESTS, ErrorKind::Server),
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorKind::Server),
            (StatusCode::BAD_GATEWAY, ErrorKind::Server),
        ];
        for (status, kind) in cases {
            assert_eq!(map_http_error(status, "", "/x").kind(), kind, "{status}");
        }
    }

    #[test]
    fn test_error_message_from_body() {
        let err = map_http_error(
            StatusCode::BAD_REQUEST,
            r#"{"success":false,"message":"User already exists"}"#,
            "/auth/register",
        );
        assert_eq!(err, SpeakupError::validation("User already exists"));

        let err = map_http_error(StatusCode::UNAUTHORIZED, r#"{"error":"Invalid credentials"}"#, "/auth/login");
        assert_eq!(err, SpeakupError::unauthorized("Invalid credentials"));

        let err = map_http_error(StatusCode::SERVICE_UNAVAILABLE, "<html>", "/stats");
        assert_eq!(err, SpeakupError::server(503, "Service Unavailable"));
    }
}
