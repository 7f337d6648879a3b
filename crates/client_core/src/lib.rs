use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, StatusCode,
};
use serde_json::Value;
use shared::{
    domain::Code,
    protocol::{classify_lookup_body, InstructorRecord, LookupBody, RecordRequest},
};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

pub mod config;
pub use config::Settings;

const LOOKUP_SEGMENTS: [&str; 2] = ["ajarn", "abbre"];
const REQUEST_SEGMENT: &str = "request";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("abbreviation {0:?} is incomplete; three letters are required")]
    IncompleteCode(String),
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service returned status {0}")]
    Status(StatusCode),
    #[error("malformed response payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Classified result of a lookup that reached the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(InstructorRecord),
    NotFound(Code),
}

#[async_trait]
pub trait DirectoryApi: Send + Sync {
    async fn lookup(&self, code: Code) -> Result<LookupOutcome, ClientError>;
    async fn submit_request(&self, request: &RecordRequest) -> Result<(), ClientError>;
    async fn fetch_photo(&self, photo_url: &str) -> Result<Vec<u8>, ClientError>;
}

/// HTTP client for the instructor directory service.
///
/// Cheap to clone; the inner [`reqwest::Client`] is reference counted.
#[derive(Debug, Clone)]
pub struct JarnClient {
    http: Client,
    base_url: Url,
}

impl JarnClient {
    pub fn new(settings: &Settings) -> Result<Self, ClientError> {
        let base_url = parse_base_url(&settings.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "url cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let url = Url::parse(raw.trim()).map_err(|err| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "expected an http(s) url".to_string(),
        });
    }
    Ok(url)
}

#[async_trait]
impl DirectoryApi for JarnClient {
    async fn lookup(&self, code: Code) -> Result<LookupOutcome, ClientError> {
        if !code.is_complete() {
            return Err(ClientError::IncompleteCode(code.as_string()));
        }

        let abbreviation = code.as_string();
        let mut segments: Vec<&str> = LOOKUP_SEGMENTS.to_vec();
        segments.push(&abbreviation);
        let url = self.endpoint(&segments)?;

        info!(code = %code, "lookup: requesting record");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            info!(code = %code, "lookup: service answered 404");
            return Ok(LookupOutcome::NotFound(code));
        }
        if !status.is_success() {
            warn!(code = %code, %status, "lookup: unexpected status");
            return Err(ClientError::Status(status));
        }

        let bytes = response.bytes().await?;
        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        match classify_lookup_body(body) {
            LookupBody::Record(record) => {
                debug!(code = %code, name = %record.english_name, "lookup: record found");
                Ok(LookupOutcome::Found(record))
            }
            LookupBody::NotFound => {
                info!(code = %code, "lookup: no record for abbreviation");
                Ok(LookupOutcome::NotFound(code))
            }
        }
    }

    async fn submit_request(&self, request: &RecordRequest) -> Result<(), ClientError> {
        let mut segments: Vec<&str> = LOOKUP_SEGMENTS.to_vec();
        segments.push(REQUEST_SEGMENT);
        let url = self.endpoint(&segments)?;

        info!(
            abbreviation = %request.abbreviation,
            department = %request.department,
            "submit: sending record request"
        );
        let response = self.http.post(url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(abbreviation = %request.abbreviation, %status, "submit: rejected");
            return Err(ClientError::Status(status));
        }
        Ok(())
    }

    async fn fetch_photo(&self, photo_url: &str) -> Result<Vec<u8>, ClientError> {
        let url = self
            .base_url
            .join(photo_url)
            .map_err(|err| ClientError::InvalidBaseUrl {
                url: photo_url.to_string(),
                reason: err.to_string(),
            })?;
        debug!(%url, "photo: fetching");
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
