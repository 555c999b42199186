//! Model Context Protocol JSON-RPC handling
//!
//! Envelope construction lives in `rpc`; method routing and negotiation in `server`.

pub mod rpc;
pub mod server;
