use cucumber::World as CucumberWorld;
use std::collections::HashMap;
use tempfile::TempDir;
use termsite_core::fade::{CardFrame, CardGeometry, FadeEngine, Viewport};
use termsite_core::render::{AnchorNavigator, PageLayout, ScrollRequest};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

/// Response as read off the wire
#[derive(Debug, Clone, Default)]
pub struct HttpReply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpReply {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }
}

/// Element positions the FAQ navigator reads when it scrolls
#[derive(Debug, Clone, Default)]
pub struct FakeLayout {
    pub tops: HashMap<String, f64>,
    pub scroll_y: f64,
    pub header: Option<f64>,
}

impl PageLayout for FakeLayout {
    fn element_top(&self, id: &str) -> Option<f64> {
        self.tops.get(id).copied()
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn header_height(&self) -> Option<f64> {
        self.header
    }
}

#[derive(Debug, Default, CucumberWorld)]
pub struct SiteWorld {
    // Static server
    pub docs: Option<TempDir>,
    pub port: Option<u16>,
    pub server: Option<JoinHandle<()>>,
    pub last_reply: Option<HttpReply>,

    // Fade engine
    pub engine: FadeEngine,
    pub viewport: Viewport,
    pub frames: Vec<CardFrame>,

    // FAQ navigation
    pub navigator: AnchorNavigator,
    pub layout: FakeLayout,
    pub scrolls: Vec<ScrollRequest>,
}

impl SiteWorld {
    /// Send one hand-written HTTP/1.1 request so the target reaches the
    /// server exactly as written
    pub async fn request(&mut self, target: &str) -> Result<(), String> {
        let port = self.port.ok_or("server is not running")?;
        let mut stream = TcpStream::connect(("127.0.0.1", port))
            .await
            .map_err(|e| format!("connect failed: {}", e))?;
        let req = format!("GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n", target);
        stream.write_all(req.as_bytes()).await.map_err(|e| e.to_string())?;

        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.map_err(|e| e.to_string())?;
        self.last_reply = Some(parse_reply(&raw)?);
        Ok(())
    }

    pub fn reply(&self) -> &HttpReply {
        self.last_reply.as_ref().expect("no request was sent")
    }

    /// Drive one card through a sequence of coverages, one frame each
    pub fn scroll_card(&mut self, id: &str, card_top: f64, coverages: &[f64]) {
        let vh = self.viewport.effective_height();
        for coverage in coverages {
            let card = CardGeometry::new(id, card_top, (1.0 - coverage) * vh);
            let frames = self.engine.recompute(&self.viewport, &[card]);
            self.frames.extend(frames);
        }
    }
}

impl Drop for SiteWorld {
    fn drop(&mut self) {
        if let Some(server) = self.server.take() {
            server.abort();
        }
    }
}

fn parse_reply(raw: &[u8]) -> Result<HttpReply, String> {
    let split = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or("response has no header terminator")?;
    let head = String::from_utf8_lossy(&raw[..split]).into_owned();
    let mut lines = head.split("\r\n");

    let status = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .and_then(|s| s.parse().ok())
        .ok_or("malformed status line")?;
    let headers = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    Ok(HttpReply {
        status,
        headers,
        body: String::from_utf8_lossy(&raw[split + 4..]).into_owned(),
    })
}

/// `0.0, 0.3, 0.5` -> `[0.0, 0.3, 0.5]`
pub fn parse_numbers(list: &str) -> Vec<f64> {
    list.split(',')
        .map(|n| n.trim().parse().unwrap_or_else(|_| panic!("not a number: {:?}", n)))
        .collect()
}
