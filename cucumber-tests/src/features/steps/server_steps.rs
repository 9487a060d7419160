use crate::features::world::SiteWorld;
use cucumber::{given, then, when};
use std::fs;
use termsite_core::StaticServer;
use tokio::net::TcpListener;

#[given(expr = "a document root with the site files")]
async fn given_document_root(world: &mut SiteWorld) {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    fs::write(root.join("index.html"), "<h1>TermStation</h1>").expect("index");
    fs::write(root.join("faq.html"), "<h1>FAQ</h1>").expect("faq");
    fs::write(root.join("CNAME"), "termstation.dev").expect("marker");
    fs::write(root.join("styles.css"), "body { margin: 0 }").expect("css");
    fs::create_dir_all(root.join("assets")).expect("assets");
    fs::write(root.join("assets").join("demo.mp4"), [0u8, 1, 2, 3]).expect("video");
    fs::create_dir_all(root.join("guide")).expect("guide");
    fs::write(root.join("guide").join("index.html"), "Guide index").expect("guide index");

    println!("📁 Document root at {}", root.display());
    world.docs = Some(dir);
}

#[given(expr = "the server is running")]
async fn given_server_running(world: &mut SiteWorld) {
    let root = world.docs.as_ref().expect("document root not created").path().to_path_buf();
    let server = StaticServer::new(&root, "CNAME").expect("server");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();

    world.server = Some(tokio::spawn(async move {
        if let Err(e) = server.serve_listener(listener).await {
            eprintln!("❌ Server stopped: {}", e);
        }
    }));
    world.port = Some(port);
    println!("🚀 Server listening on port {}", port);
}

#[when(expr = "I request {string}")]
async fn when_request(world: &mut SiteWorld, target: String) {
    world.request(&target).await.expect("request failed");
    println!("➡️  {} -> {}", target, world.reply().status);
}

#[then(expr = "the response status is {int}")]
async fn then_status(world: &mut SiteWorld, status: u16) {
    assert_eq!(world.reply().status, status);
}

#[then(expr = "the content type is {string}")]
async fn then_content_type(world: &mut SiteWorld, expected: String) {
    assert_eq!(world.reply().header("content-type"), Some(expected.as_str()));
}

#[then(expr = "the body is {string}")]
async fn then_body(world: &mut SiteWorld, expected: String) {
    assert_eq!(world.reply().body, expected);
}

#[then(expr = "the file {string} still exists on disk")]
async fn then_file_exists(world: &mut SiteWorld, name: String) {
    let root = world.docs.as_ref().expect("document root not created").path();
    assert!(root.join(&name).exists(), "{} was removed", name);
}
