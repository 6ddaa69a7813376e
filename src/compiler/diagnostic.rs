//! Compiler output summaries for the terminal status line.
//!
//! LaTeX logs are long; the status line shows only the first `!` error and
//! the input line it points at. The surface always gets the full text.

use regex::Regex;
use std::sync::LazyLock;

static ERROR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^! (.+)$").expect("valid regex"));
static LINE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^l\.(\d+)").expect("valid regex"));

/// One-line summary of compiler output, e.g. `Undefined control sequence. (line 5)`.
///
/// Falls back to the last non-empty line when no `!` error is present.
pub fn summarize(output: &str) -> String {
    if let Some(caps) = ERROR_LINE.captures(output) {
        let message = caps[1].trim();
        let rest = &output[caps.get(0).map_or(0, |m| m.end())..];
        return match LINE_NUMBER.captures(rest) {
            Some(line) => format!("{message} (line {})", &line[1]),
            None => message.to_string(),
        };
    }

    output
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}
