//! MCP transport layer

pub mod server;

pub use server::FitTrackService;
