//! FitTrack Core Library
//!
//! Health metric calculations and nearby-store ingredient matching, with the
//! SQLite persistence and MCP tool surface around them.

pub mod build_info;
pub mod config;
pub mod db;
pub mod health;
pub mod mcp;
pub mod models;
pub mod stores;
pub mod tools;
