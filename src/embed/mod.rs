//! Embedded static resources for texmex.
//!
//! - `template` - Template types for typed variable injection
//! - `serve` - Preview server pages (preview.html, index.html)

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use super::{Template, TemplateVars};
    use crate::utils::html::escape;

    /// Variables for preview.html.
    pub struct PreviewVars {
        pub session: String,
        pub title: String,
        pub ws_port: u16,
    }

    impl TemplateVars for PreviewVars {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__SESSION__", &escape(&self.session))
                .replace("__TITLE__", &escape(&self.title))
                .replace("__WS_PORT__", &self.ws_port.to_string())
        }
    }

    /// Render surface page: pdf.js viewer bound to one session.
    pub const PREVIEW_HTML: Template<PreviewVars> =
        Template::new(include_str!("serve/preview.html"));

    /// Variables for index.html.
    pub struct IndexVars {
        pub version: &'static str,
        /// Pre-rendered `<li>` rows, already escaped.
        pub rows: String,
    }

    impl TemplateVars for IndexVars {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__VERSION__", &escape(self.version))
                .replace("__ROWS__", &self.rows)
        }
    }

    /// Session index served at `/`.
    pub const INDEX_HTML: Template<IndexVars> =
        Template::new(include_str!("serve/index.html"));
}

#[cfg(test)]
mod tests {
    use super::serve::*;

    #[test]
    fn test_preview_page_injection() {
        let html = PREVIEW_HTML.render(&PreviewVars {
            session: "0123456789abcdef".into(),
            title: "a<b>.tex".into(),
            ws_port: 35731,
        });
        assert!(html.contains("0123456789abcdef"));
        assert!(html.contains("35731"));
        assert!(html.contains("a&lt;b&gt;.tex"));
        assert!(!html.contains("__SESSION__"));
        assert!(!html.contains("__WS_PORT__"));
        assert!(!html.contains("__TITLE__"));
    }

    #[test]
    fn test_index_page_injection() {
        let html = INDEX_HTML.render(&IndexVars {
            version: "0.3.0",
            rows: "<li>main.tex</li>".into(),
        });
        assert!(html.contains("<li>main.tex</li>"));
        assert!(!html.contains("__ROWS__"));
    }
}
