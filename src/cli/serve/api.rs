//! Request handlers: session pages and the control API.
//!
//! Handlers run on the HTTP thread pool and talk to the pipeline actor with
//! blocking sends and oneshot replies.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiny_http::Request;
use tokio::sync::{mpsc, oneshot};

use super::response::{
    respond_bad_request, respond_html, respond_json, respond_no_content, respond_not_found,
    respond_pdf, respond_unavailable,
};
use crate::actor::messages::{PipelineMsg, SessionInfo};
use crate::config::TexmexConfig;
use crate::core::SessionId;
use crate::embed::serve::{INDEX_HTML, IndexVars, PREVIEW_HTML, PreviewVars};
use crate::utils::html::escape;

/// Shared state of the request handlers.
pub struct ServeContext {
    pub config: Arc<TexmexConfig>,
    pub addr: SocketAddr,
    pub pipeline_tx: mpsc::Sender<PipelineMsg>,
}

#[derive(Debug, Deserialize)]
struct OpenRequest {
    path: PathBuf,
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct OpenResponse {
    session: String,
    url: String,
    reused: bool,
}

#[derive(Debug, Deserialize)]
struct ChangeRequest {
    path: PathBuf,
    text: String,
}

#[derive(Debug, Deserialize)]
struct CloseRequest {
    path: PathBuf,
}

impl ServeContext {
    /// Send and wait for the reply. `None` when the pipeline is gone.
    fn ask<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> PipelineMsg) -> Option<T> {
        let (tx, rx) = oneshot::channel();
        self.pipeline_tx.blocking_send(build(tx)).ok()?;
        rx.blocking_recv().ok()
    }

    fn preview_url(&self, session: SessionId) -> String {
        format!("http://{}/preview/{}", self.addr, session)
    }

    pub fn index(&self, request: Request) -> Result<()> {
        let Some(sessions) = self.ask(PipelineMsg::List) else {
            return respond_unavailable(request);
        };

        let rows = if sessions.is_empty() {
            "    <li class=\"empty\">No open documents</li>".to_string()
        } else {
            sessions.iter().map(index_row).collect::<Vec<_>>().join("\n")
        };

        respond_html(
            request,
            INDEX_HTML.render(&IndexVars {
                version: env!("CARGO_PKG_VERSION"),
                rows,
            }),
        )
    }

    pub fn preview(&self, request: Request, session: SessionId) -> Result<()> {
        let Some(info) = self.lookup(session) else {
            return respond_not_found(request, "404 No such preview");
        };

        let body = PREVIEW_HTML.render(&PreviewVars {
            session: session.to_string(),
            title: document_name(&info),
            ws_port: super::get_actual_ws_port(),
        });
        respond_html(request, body)
    }

    pub fn artifact(&self, request: Request, session: SessionId) -> Result<()> {
        let Some(info) = self.lookup(session) else {
            return respond_not_found(request, "404 No such preview");
        };
        match std::fs::read(&info.artifact) {
            Ok(bytes) => respond_pdf(request, bytes),
            Err(_) => respond_not_found(request, "404 No PDF compiled yet"),
        }
    }

    pub fn open(&self, mut request: Request) -> Result<()> {
        let body: OpenRequest = match read_json(&mut request) {
            Ok(body) => body,
            Err(e) => return respond_bad_request(request, &format!("{e:#}")),
        };
        let document = self.config.resolve_document(&body.path);

        let reply = self.ask(|reply| PipelineMsg::Open {
            document,
            text: body.text,
            reply: Some(reply),
        });
        match reply {
            Some(Ok(opened)) => respond_json(
                request,
                &OpenResponse {
                    session: opened.session.to_string(),
                    url: self.preview_url(opened.session),
                    reused: opened.reused,
                },
            ),
            Some(Err(message)) => respond_bad_request(request, &message),
            None => respond_unavailable(request),
        }
    }

    pub fn change(&self, mut request: Request) -> Result<()> {
        let body: ChangeRequest = match read_json(&mut request) {
            Ok(body) => body,
            Err(e) => return respond_bad_request(request, &format!("{e:#}")),
        };
        let msg = PipelineMsg::Change {
            document: self.config.resolve_document(&body.path),
            text: body.text,
        };
        if self.pipeline_tx.blocking_send(msg).is_err() {
            return respond_unavailable(request);
        }
        respond_no_content(request)
    }

    pub fn close(&self, mut request: Request) -> Result<()> {
        let body: CloseRequest = match read_json(&mut request) {
            Ok(body) => body,
            Err(e) => return respond_bad_request(request, &format!("{e:#}")),
        };
        let document = self.config.resolve_document(&body.path);

        match self.ask(|reply| PipelineMsg::Close {
            document,
            reply: Some(reply),
        }) {
            Some(true) => respond_no_content(request),
            Some(false) => respond_not_found(request, "404 Document is not open"),
            None => respond_unavailable(request),
        }
    }

    fn lookup(&self, session: SessionId) -> Option<SessionInfo> {
        self.ask(|reply| PipelineMsg::Lookup { session, reply })
            .flatten()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(request: &mut Request) -> Result<T> {
    let mut body = String::new();
    request
        .as_reader()
        .read_to_string(&mut body)
        .context("failed to read request body")?;
    serde_json::from_str(&body).context("invalid request body")
}

fn document_name(info: &SessionInfo) -> String {
    info.document.file_name().map_or_else(
        || info.document.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}

fn index_row(info: &SessionInfo) -> String {
    format!(
        "    <li><a href=\"/preview/{}\" title=\"{}\">{}</a><span class=\"view\">{}</span></li>",
        info.id,
        escape(&info.document.display().to_string()),
        escape(&document_name(info)),
        info.view,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn info(path: &str) -> SessionInfo {
        let document = PathBuf::from(path);
        SessionInfo {
            id: SessionId::for_document(&document),
            artifact: PathBuf::from("/tmp/x/temp.pdf"),
            document,
            view: "artifact",
        }
    }

    #[test]
    fn test_index_row_escapes_name() {
        let row = index_row(&info("/doc/a&b.tex"));
        assert!(row.contains("a&amp;b.tex"));
        assert!(row.contains(&format!(
            "/preview/{}",
            SessionId::for_document(Path::new("/doc/a&b.tex"))
        )));
        assert!(row.contains("artifact"));
    }

    #[test]
    fn test_request_bodies() {
        let open: OpenRequest = serde_json::from_str(r#"{"path":"main.tex"}"#).unwrap();
        assert_eq!(open.path, PathBuf::from("main.tex"));
        assert!(open.text.is_none());

        let change: ChangeRequest =
            serde_json::from_str(r#"{"path":"main.tex","text":"\\section{A}"}"#).unwrap();
        assert_eq!(change.text, "\\section{A}");

        assert!(serde_json::from_str::<ChangeRequest>(r#"{"path":"main.tex"}"#).is_err());
    }

    #[test]
    fn test_open_response_shape() {
        let body = serde_json::to_value(OpenResponse {
            session: "0011223344556677".into(),
            url: "http://127.0.0.1:5280/preview/0011223344556677".into(),
            reused: true,
        })
        .unwrap();
        assert_eq!(body["session"], "0011223344556677");
        assert_eq!(body["reused"], true);
    }
}
