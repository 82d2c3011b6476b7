//! Core services and infrastructure

pub mod logging;
pub mod retry;
pub mod shutdown;
pub mod styles; // palette for CLI tables and help
pub mod sync;
pub mod version;
