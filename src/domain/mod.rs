//! Application Signals domain: wire records, parameter validation, the two
//! queries, their text reports, and the MCP tool surface over them.

pub mod format;
pub mod models;
pub mod operations;
pub mod params;
pub mod tools;
