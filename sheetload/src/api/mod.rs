//! Companion HTTP surface: the echo ingestion sink and the log stream.

pub mod logs;
pub mod server;
