//! # nars-agent
//!
//! The interface an environment talks to.
//!
//! This crate provides:
//! - `Agent`: sensors, goals and operation bookkeeping over a `ProcessBridge`
//! - `OperationBook`: the activation map shared with the bridge's reader task
//! - `AgentConfig`: goals and gates, loadable from JSON

pub mod agent;
pub mod book;
pub mod config;

pub use agent::{Agent, AgentStats, OutputObserver};
pub use book::{ActivationMap, ActivationPolicy, OperationBook, mutually_exclusive};
pub use config::AgentConfig;
