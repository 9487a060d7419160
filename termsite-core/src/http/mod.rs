//! Static file server built on hyper
//!
//! - [`resolve`] - request target to a normalised path below the document root
//! - [`mime`] - extension to `Content-Type` table
//! - [`error`] - the 403/404/500 taxonomy and its plain-text responses
//! - [`server`] - the accept loop and per-request file streaming

pub mod error;
pub mod mime;
pub mod resolve;
pub mod server;

pub use error::ServeError;
pub use mime::content_type_for;
pub use resolve::{normalize_request_path, INDEX_FILE};
pub use server::{ResolvedFile, StaticServer};

use bytes::Bytes;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full};
use hyper::Response;

/// Response body: either a buffered error page or a streamed file
pub type RespBody = UnsyncBoxBody<Bytes, std::io::Error>;
pub type Resp = Response<RespBody>;

/// Create a response body from any data that can be converted to Bytes
pub fn body_from<T: Into<Bytes>>(data: T) -> RespBody {
    Full::new(data.into()).map_err(|never| match never {}).boxed_unsync()
}
