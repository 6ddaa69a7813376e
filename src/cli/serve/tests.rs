use super::*;
use crate::actor::messages::{OpenReply, PipelineMsg, SessionInfo};
use std::io::{Read, Write};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpStream};
use std::path::Path;
use std::thread;
use tokio::sync::mpsc;

/// Answers pipeline requests the way an actor with one open document would.
fn fake_pipeline(mut rx: mpsc::Receiver<PipelineMsg>, open: PathBuf, artifact: PathBuf) {
    let open_id = SessionId::for_document(&open);
    let info = move || SessionInfo {
        id: open_id,
        document: open.clone(),
        artifact: artifact.clone(),
        view: "artifact",
    };

    thread::spawn(move || {
        while let Some(msg) = rx.blocking_recv() {
            match msg {
                PipelineMsg::List(reply) => {
                    let _ = reply.send(vec![info()]);
                }
                PipelineMsg::Lookup { session, reply } => {
                    let _ = reply.send((session == open_id).then(&info));
                }
                PipelineMsg::Open {
                    document,
                    reply: Some(reply),
                    ..
                } => {
                    let _ = reply.send(Ok(OpenReply {
                        session: SessionId::for_document(&document),
                        reused: document == info().document,
                    }));
                }
                PipelineMsg::Close {
                    document,
                    reply: Some(reply),
                } => {
                    let _ = reply.send(document == info().document);
                }
                _ => {}
            }
        }
    });
}

struct TestServer {
    server: Arc<Server>,
    addr: SocketAddr,
    dir: PathBuf,
    _root: tempfile::TempDir,
}

impl TestServer {
    fn start() -> Self {
        let root = tempfile::TempDir::new().unwrap();
        let dir = root.path().canonicalize().unwrap();
        let document = dir.join("main.tex");
        let artifact = dir.join("temp.pdf");
        std::fs::write(&artifact, b"%PDF-1.5 test").unwrap();

        let (server, addr) =
            lifecycle::bind_with_retry(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).unwrap();
        let server = Arc::new(server);

        let (pipeline_tx, pipeline_rx) = pipeline_channel();
        fake_pipeline(pipeline_rx, document, artifact);

        let config = Arc::new(crate::config::TexmexConfig {
            root: dir.clone(),
            ..Default::default()
        });
        let context = Arc::new(ServeContext {
            config,
            addr,
            pipeline_tx,
        });

        let loop_server = Arc::clone(&server);
        thread::spawn(move || run_request_loop(&loop_server, context));

        Self {
            server,
            addr,
            dir,
            _root: root,
        }
    }

    fn request(&self, method: &str, path: &str, body: &str) -> String {
        let mut stream = TcpStream::connect(self.addr).unwrap();
        write!(
            stream,
            "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    fn session(&self) -> SessionId {
        SessionId::for_document(&self.dir.join("main.tex"))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.unblock();
    }
}

fn status(response: &str) -> &str {
    response.split(' ').nth(1).unwrap_or_default()
}

#[test]
fn test_index_lists_sessions() {
    let server = TestServer::start();
    let response = server.request("GET", "/", "");
    assert_eq!(status(&response), "200");
    assert!(response.contains(&format!("/preview/{}", server.session())));
    assert!(response.contains("main.tex"));
}

#[test]
fn test_preview_page_for_open_session() {
    let server = TestServer::start();
    let response = server.request("GET", &format!("/preview/{}", server.session()), "");
    assert_eq!(status(&response), "200");
    assert!(response.contains(&server.session().to_string()));
}

#[test]
fn test_preview_page_unknown_session() {
    let server = TestServer::start();
    let other = SessionId::for_document(Path::new("/elsewhere/other.tex"));
    let response = server.request("GET", &format!("/preview/{other}"), "");
    assert_eq!(status(&response), "404");
}

#[test]
fn test_artifact_download() {
    let server = TestServer::start();
    let response = server.request(
        "GET",
        &format!("/preview/{}/document.pdf", server.session()),
        "",
    );
    assert_eq!(status(&response), "200");
    assert!(response.contains("application/pdf"));
    assert!(response.ends_with("%PDF-1.5 test"));
}

#[test]
fn test_api_open_resolves_relative_path() {
    let server = TestServer::start();
    let response = server.request("POST", "/api/open", r#"{"path":"main.tex"}"#);
    assert_eq!(status(&response), "200");
    assert!(response.contains(&format!("\"session\":\"{}\"", server.session())));
    assert!(response.contains("\"reused\":true"));
}

#[test]
fn test_api_open_rejects_bad_body() {
    let server = TestServer::start();
    let response = server.request("POST", "/api/open", "not json");
    assert_eq!(status(&response), "400");
}

#[test]
fn test_api_close() {
    let server = TestServer::start();
    assert_eq!(
        status(&server.request("POST", "/api/close", r#"{"path":"main.tex"}"#)),
        "204"
    );
    assert_eq!(
        status(&server.request("POST", "/api/close", r#"{"path":"other.tex"}"#)),
        "404"
    );
}

#[test]
fn test_api_change_accepted() {
    let server = TestServer::start();
    let response = server.request(
        "POST",
        "/api/change",
        r#"{"path":"main.tex","text":"\\documentclass{article}"}"#,
    );
    assert_eq!(status(&response), "204");
}

#[test]
fn test_wrong_method_and_unknown_path() {
    let server = TestServer::start();
    assert_eq!(status(&server.request("GET", "/api/open", "")), "405");
    assert_eq!(status(&server.request("GET", "/nope", "")), "404");
}
