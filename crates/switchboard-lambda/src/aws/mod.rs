//! AWS service adapters.
//!
//! Strategies talk to AWS through the narrow async traits defined here
//! ([`connect::ConnectOps`], [`dynamo::TableStore`]) so tests can swap in
//! scripted stubs without touching the SDK.

pub mod connect;
pub mod dynamo;

#[cfg(test)]
pub(crate) mod mock;
