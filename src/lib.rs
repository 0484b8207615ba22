//! docserver - a minimal HTTP/1.1 document server
//!
//! Serves, creates, replaces and deletes files under a single document root.

pub mod config;
pub mod files;
pub mod http;
pub mod server;
