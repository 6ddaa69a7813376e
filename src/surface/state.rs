//! Surface state machine.
//!
//! ```text
//! Closed --open--> Open(Blank) --push--> Open(Artifact | Error) --close--> Closed
//! ```
//!
//! Each push replaces the content; the latest push wins.

use super::message::SurfacePayload;
use crate::transport::EncodedBlob;

/// Content currently shown by an open surface.
#[derive(Debug, Clone, Default)]
pub enum View {
    /// Opened, first compile not finished yet.
    #[default]
    Blank,
    Artifact(EncodedBlob),
    Error(String),
}

impl View {
    /// Payload that reproduces this view on a client. `Blank` has none.
    pub fn payload(&self) -> Option<SurfacePayload<'_>> {
        match self {
            Self::Blank => None,
            Self::Artifact(blob) => Some(SurfacePayload::Artifact {
                data: blob.as_str(),
            }),
            Self::Error(message) => Some(SurfacePayload::Error { message }),
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Blank => "compiling",
            Self::Artifact(_) => "artifact",
            Self::Error(_) => "error",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum SurfaceState {
    #[default]
    Closed,
    Open(View),
}

impl SurfaceState {
    /// Open the surface. Already-open surfaces keep their content.
    pub fn open(&mut self) {
        if matches!(self, Self::Closed) {
            *self = Self::Open(View::Blank);
        }
    }

    /// Replace the content, opening the surface if needed.
    pub fn show(&mut self, view: View) {
        *self = Self::Open(view);
    }

    pub fn close(&mut self) {
        *self = Self::Closed;
    }

    /// Payload a newly attached client should receive, if any.
    pub fn payload(&self) -> Option<SurfacePayload<'_>> {
        match self {
            Self::Closed => Some(SurfacePayload::Closed),
            Self::Open(view) => view.payload(),
        }
    }
}
