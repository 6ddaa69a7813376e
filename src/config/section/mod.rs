//! Configuration sections of `texmex.toml`.

mod compiler;
mod export;
mod preview;
mod serve;

pub use compiler::CompilerConfig;
pub use export::ExportConfig;
pub use preview::PreviewConfig;
pub use serve::ServeConfig;
