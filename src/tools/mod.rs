//! Tool functions
//!
//! Plain functions behind the MCP tools: validate input, touch the database,
//! call the calculators, and shape serializable responses.

pub mod health;
pub mod status;
pub mod stores;
