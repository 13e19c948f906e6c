//! Assistant Bridge - HTTP front for a hosted assistants API
//!
//! Each endpoint forwards the caller's text to a freshly created assistant
//! and thread, waits for the run by polling or streaming, and answers with
//! one JSON body.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
