//! Ordered, fault-tolerant cache event delivery
//!
//! Cache regions hand mutation events (put, remove, remove-all, dispose) to a
//! [`queue::CacheEventQueue`], which delivers them to a lateral or remote listener on a
//! background thread, retrying transient failures and poisoning itself when a listener
//! keeps failing.

pub mod app;
pub mod config;
pub mod core;
pub mod pool;
pub mod queue;
pub mod stats;
