//! A query service speaking the symptom API over HTTP.
//!
//! The API has two endpoints:
//!
//! - `GET /query?symptoms=...` answers with
//!   `{"symptoms": ..., "response": ..., "conditions": [{"condition", "text"}]}`,
//!   or with `{"error": ...}` and a non-successful status.
//! - `GET /health` answers with `{"status": "healthy"}`.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use mime::Mime;
use reqwest::{Client, Response, header};
use symptom_chat_service::{
    ErrorKind, QueryReply, QueryService, QueryServiceError,
};

pub use config::{HttpServiceConfig, HttpServiceConfigBuilder};

/// Error type for [`HttpQueryService`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_decode() {
            ErrorKind::Malformed
        } else {
            ErrorKind::Transport
        };
        Self::new(format!("{err}"), kind)
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl QueryServiceError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Symptom query service reached over HTTP.
#[derive(Clone, Debug)]
pub struct HttpQueryService {
    client: Client,
    config: Arc<HttpServiceConfig>,
}

impl HttpQueryService {
    /// Creates a new `HttpQueryService` with the given configuration.
    pub fn new(config: HttpServiceConfig) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(Error::from_reqwest)?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Asks the server whether it is ready to answer queries.
    pub async fn health(&self) -> Result<bool, Error> {
        let url = proto::health_url(&self.config.base_url)?;
        let resp = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(Error::from_reqwest)?;
        let body = resp.bytes().await.map_err(Error::from_reqwest)?;
        proto::decode_health(&body)
    }
}

impl QueryService for HttpQueryService {
    type Error = Error;

    fn query(
        &self,
        symptoms: &str,
    ) -> impl Future<Output = Result<QueryReply, Self::Error>> + Send + 'static
    {
        let resp_fut = proto::query_url(&self.config.base_url, symptoms).map(
            |url| {
                debug!("sending query to {}", url.path());
                self.client
                    .get(url)
                    .header(header::ACCEPT, "application/json")
                    .send()
            },
        );

        async move {
            let resp = resp_fut?.await.map_err(Error::from_reqwest)?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.bytes().await.unwrap_or_default();
                let detail = proto::decode_error_message(&body)
                    .unwrap_or_else(|| status.to_string());
                return Err(Error::new(
                    format!("server answered {status}: {detail}"),
                    ErrorKind::Status,
                ));
            }

            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok());
            let is_json = content_type
                .and_then(|v| v.parse().ok())
                .map(|m: Mime| m.subtype() == mime::JSON)
                .unwrap_or(false);
            if !is_json {
                return Err(Error::new(
                    format!("Unexpected content type: {content_type:?}"),
                    ErrorKind::Malformed,
                ));
            }

            let body = resp.bytes().await.map_err(Error::from_reqwest)?;
            proto::decode_reply(&body)
        }
    }
}
