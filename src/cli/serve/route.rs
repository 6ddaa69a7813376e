//! URL routing for the preview server.

use tiny_http::Method;

use crate::core::SessionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `GET /` - list of open sessions
    Index,
    /// `GET /preview/<id>` - render surface page
    Preview(SessionId),
    /// `GET /preview/<id>/document.pdf` - current on-disk artifact
    Artifact(SessionId),
    /// `POST /api/open`
    Open,
    /// `POST /api/change`
    Change,
    /// `POST /api/close`
    Close,
    /// Known path, wrong method
    MethodNotAllowed,
    NotFound,
}

impl Route {
    pub fn resolve(method: &Method, url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let read = matches!(method, Method::Get | Method::Head);
        let post = matches!(method, Method::Post);

        let route = match segments.as_slice() {
            [] => Self::Index,
            ["preview", id] => match id.parse() {
                Ok(id) => Self::Preview(id),
                Err(_) => return Self::NotFound,
            },
            ["preview", id, "document.pdf"] => match id.parse() {
                Ok(id) => Self::Artifact(id),
                Err(_) => return Self::NotFound,
            },
            ["api", "open"] => Self::Open,
            ["api", "change"] => Self::Change,
            ["api", "close"] => Self::Close,
            _ => return Self::NotFound,
        };

        let allowed = match route {
            Self::Index | Self::Preview(_) | Self::Artifact(_) => read,
            _ => post,
        };
        if allowed {
            route
        } else {
            Self::MethodNotAllowed
        }
    }
}
