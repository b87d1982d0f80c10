//! Core pipeline for the switchboard Lambda entry point.
//!
//! An incoming invocation passes through four stages, strictly in order:
//!
//! - [`classify`]: infer the [`InvocationSource`] from the raw event shape
//! - [`extract`]: pull out the source-specific useful payload
//! - [`sanitize`]: mask sensitive keys and patterns in the payload
//! - [`dispatch`]: resolve the `request_type` token through the
//!   [`StrategyRegistry`] and run the two-phase validate/operate contract
//!
//! Every outcome, success or failure, is rendered as a [`ResponseEnvelope`];
//! nothing past the dispatch boundary raises to the caller.
//!
//! This crate is deliberately free of AWS dependencies. Concrete strategies
//! and their AWS adapters live in the Lambda binary crate and plug in through
//! the [`Strategy`] trait and [`RegistryBuilder`].
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides fixture events for every source and
//! stub strategies. Enable the `test-utils` feature to access it from
//! dependent crates.

#![deny(warnings)]

mod dispatch;
mod envelope;
mod error;
mod registry;
mod sanitize;
mod source;
mod strategy;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use dispatch::dispatch;
pub use envelope::{EnvelopeBuilder, ResponseBody, ResponseEnvelope, ResponseResult};
pub use error::DispatchError;
pub use registry::{RegistryBuilder, StrategyFactory, StrategyRegistry, REQUEST_TYPE_FIELD};
pub use sanitize::sanitize;
pub use source::{classify, extract, InvocationSource};
pub use strategy::{Rejection, Strategy};
