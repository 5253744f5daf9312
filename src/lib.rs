//! tandem: run an application server and a diagnostics server side by side
//! and stop both together.

pub mod app;
pub mod config;
pub mod process;
pub mod server;
