use thiserror::Error;

/// Failures talking to the backend. Search callers downgrade these to an
/// empty result list with a warning; the submission runner surfaces them.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("could not build the HTTP client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("request to `{endpoint}` failed: {source}")]
    Request { endpoint: &'static str, source: reqwest::Error },
    #[error("backend returned {status} from `{endpoint}`")]
    Status { endpoint: &'static str, status: reqwest::StatusCode },
    #[error("could not decode the response from `{endpoint}`: {source}")]
    Decode { endpoint: &'static str, source: reqwest::Error },
    #[error("malformed record from `{endpoint}`: {message}")]
    Malformed { endpoint: &'static str, message: String },
}
