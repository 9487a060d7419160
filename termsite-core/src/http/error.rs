use hyper::header::CONTENT_TYPE;
use hyper::{Response, StatusCode};

use super::{body_from, Resp};

/// Why a request could not be answered with a file
///
/// Every variant is terminal for its request; nothing is retried.
#[derive(thiserror::Error, Debug)]
pub enum ServeError {
    /// The request path escapes the document root
    #[error("Forbidden")]
    Forbidden,
    /// Missing file, directory without index, or the excluded marker file
    #[error("Not Found")]
    NotFound,
    /// Unexpected filesystem failure
    #[error("Internal Server Error: {0}")]
    Internal(#[source] std::io::Error),
}

impl ServeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::Forbidden => StatusCode::FORBIDDEN,
            ServeError::NotFound => StatusCode::NOT_FOUND,
            ServeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Plain-text response carrying only the reason phrase
    pub fn to_response(&self) -> Resp {
        plain_text(self.status())
    }
}

/// `text/plain` response whose body is the status reason phrase
pub fn plain_text(status: StatusCode) -> Resp {
    let reason = status.canonical_reason().unwrap_or("Error");
    let mut resp = Response::new(body_from(reason));
    *resp.status_mut() = status;
    resp.headers_mut()
        .insert(CONTENT_TYPE, hyper::header::HeaderValue::from_static("text/plain; charset=utf-8"));
    resp
}
