//! Static file server
//!
//! One hyper connection task per client; the only shared state is the
//! immutable document root and marker path behind an `Arc`.

use anyhow::{bail, Context};
use bytes::{Bytes, BytesMut};
use futures::stream::{self, StreamExt};
use http_body_util::{BodyExt, StreamBody};
use http_body::Frame;
use http::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

use super::{content_type_for, normalize_request_path, Resp, RespBody, ServeError, INDEX_FILE};
use crate::config::ServerConfig;

const CHUNK_SIZE: usize = 64 * 1024;

/// A file that passed every guard and can be opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Path as requested below the root; decides the content type
    pub logical: PathBuf,
    /// Symlink-free location that is actually opened
    pub real: PathBuf,
}

/// Serves files below a document root over HTTP/1.1
pub struct StaticServer {
    root: PathBuf,
    excluded: PathBuf,
    bind_addr: String,
    access_log: bool,
}

impl StaticServer {
    /// Create a server for `doc_root`, never serving `excluded_file` (relative to the root)
    pub fn new(doc_root: impl AsRef<Path>, excluded_file: &str) -> anyhow::Result<Self> {
        let doc_root = doc_root.as_ref();
        let root = std::fs::canonicalize(doc_root).with_context(|| {
            format!("Document root {} is not accessible", doc_root.display())
        })?;
        if !root.is_dir() {
            bail!("Document root {} is not a directory", root.display());
        }

        let lexical = root.join(excluded_file);
        let excluded = std::fs::canonicalize(&lexical).unwrap_or(lexical);

        Ok(Self {
            root,
            excluded,
            bind_addr: ServerConfig::default().bind_addr(),
            access_log: false,
        })
    }

    /// Create a server from validated configuration
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self::new(&config.doc_root, &config.excluded_file)?.with_bind_addr(config.bind_addr()))
    }

    pub fn with_bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = addr.into();
        self
    }

    /// Log every request at info instead of debug
    pub fn with_access_log(mut self, enabled: bool) -> Self {
        self.access_log = enabled;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn excluded_path(&self) -> &Path {
        &self.excluded
    }

    /// Map a request target onto a servable file
    pub async fn resolve(&self, target: &str) -> Result<ResolvedFile, ServeError> {
        let relative = normalize_request_path(target)?;
        let candidate = self.root.join(&relative);

        if !candidate.starts_with(&self.root) {
            return Err(ServeError::Forbidden);
        }
        if candidate == self.excluded {
            return Err(ServeError::NotFound);
        }

        let real = self.confine(&candidate).await?;
        let metadata = tokio::fs::metadata(&real).await.map_err(stat_error)?;

        if metadata.is_file() {
            return Ok(ResolvedFile { logical: candidate, real });
        }
        if !metadata.is_dir() {
            return Err(ServeError::NotFound);
        }

        let index = candidate.join(INDEX_FILE);
        if index == self.excluded {
            return Err(ServeError::NotFound);
        }
        let real_index = match self.confine(&index).await {
            Ok(path) => path,
            Err(ServeError::Internal(_)) => return Err(ServeError::NotFound),
            Err(e) => return Err(e),
        };
        match tokio::fs::metadata(&real_index).await {
            Ok(m) if m.is_file() => Ok(ResolvedFile { logical: index, real: real_index }),
            _ => Err(ServeError::NotFound),
        }
    }

    // Follows symlinks and re-checks the root prefix and the marker file.
    async fn confine(&self, candidate: &Path) -> Result<PathBuf, ServeError> {
        let real = tokio::fs::canonicalize(candidate).await.map_err(stat_error)?;
        if !real.starts_with(&self.root) {
            return Err(ServeError::Forbidden);
        }
        if real == self.excluded {
            return Err(ServeError::NotFound);
        }
        Ok(real)
    }

    /// Answer a request target with the file or an error page
    pub async fn respond(&self, target: &str) -> Resp {
        match self.open(target).await {
            Ok(resp) => resp,
            Err(err) => {
                if let ServeError::Internal(ref e) = err {
                    log::error!("Failed to serve {}: {}", target, e);
                }
                err.to_response()
            }
        }
    }

    // The first chunk is read before a status is chosen so that an unreadable
    // file still turns into a 500.
    async fn open(&self, target: &str) -> Result<Resp, ServeError> {
        let file = self.resolve(target).await?;

        let mut handle = tokio::fs::File::open(&file.real).await.map_err(ServeError::Internal)?;
        let len = handle.metadata().await.map_err(ServeError::Internal)?.len();
        let mut first = BytesMut::with_capacity(CHUNK_SIZE);
        handle.read_buf(&mut first).await.map_err(ServeError::Internal)?;

        let mut resp = Response::new(file_body(handle, first.freeze()));
        let headers = resp.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type_for(&file.logical)));
        headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
        Ok(resp)
    }

    /// hyper entry point; every method is treated like GET
    pub async fn handle_request<B>(&self, req: Request<B>) -> Result<Resp, Infallible> {
        let started = Instant::now();
        let resp = self.respond(req.uri().path()).await;

        let status = resp.status();
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        if self.access_log {
            log::info!("{} {} {} ({:.2}ms)", req.method(), req.uri().path(), status.as_u16(), elapsed_ms);
        } else {
            log::debug!("{} {} {} ({:.2}ms)", req.method(), req.uri().path(), status.as_u16(), elapsed_ms);
        }

        Ok(resp)
    }

    /// Bind the configured address and serve forever
    pub async fn serve(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(&self.bind_addr)
            .await
            .with_context(|| format!("Failed to bind to {}", self.bind_addr))?;
        self.serve_listener(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve_listener(self, listener: TcpListener) -> anyhow::Result<()> {
        let local = listener.local_addr()?;
        let host = if local.ip().is_loopback() || local.ip().is_unspecified() {
            "localhost".to_string()
        } else {
            local.ip().to_string()
        };
        log::info!("🚀 Development server running at http://{}:{}", host, local.port());
        log::info!("📁 Serving static files from {}", self.root.display());

        let server = Arc::new(self);

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let server = Arc::clone(&server);

            tokio::spawn(async move {
                let service = service_fn(move |req| {
                    let server = Arc::clone(&server);
                    async move { server.handle_request(req).await }
                });

                if let Err(err) =
                    http1::Builder::new().serve_connection(TokioIo::new(stream), service).await
                {
                    log::warn!("Connection error from {}: {}", remote_addr, err);
                }
            });
        }
    }
}

fn stat_error(err: io::Error) -> ServeError {
    if err.kind() == io::ErrorKind::NotFound {
        ServeError::NotFound
    } else {
        ServeError::Internal(err)
    }
}

// A read error after the head has been sent surfaces as a body error, which
// makes hyper drop the connection.
fn file_body(file: tokio::fs::File, first: Bytes) -> RespBody {
    let head = stream::once(async move { Ok::<_, io::Error>(Frame::data(first)) });
    let rest = stream::unfold(Some(file), |state| async move {
        let mut file = match state {
            Some(file) => file,
            None => return None,
        };
        let mut buf = BytesMut::with_capacity(CHUNK_SIZE);
        match file.read_buf(&mut buf).await {
            Ok(0) => None,
            Ok(_) => Some((Ok(Frame::data(buf.freeze())), Some(file))),
            Err(e) => Some((Err(e), None)),
        }
    });

    StreamBody::new(head.chain(rest)).boxed_unsync()
}
