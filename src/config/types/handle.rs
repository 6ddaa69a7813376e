//! Global config handle.
//!
//! Uses `arc-swap` for lock-free reads from actor tasks and HTTP threads.

use crate::config::TexmexConfig;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<TexmexConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(TexmexConfig::default()));

#[inline]
pub fn cfg() -> Arc<TexmexConfig> {
    CONFIG.load_full()
}

#[inline]
pub fn init_config(config: TexmexConfig) -> Arc<TexmexConfig> {
    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}
