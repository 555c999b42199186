//! HTTP transport for the Model Context Protocol endpoint

pub mod handlers;
