//! Process bridge to NARS backends
//!
//! This crate provides:
//! - `ProcessBridge`: owns a backend child process plus one reader and one writer task
//! - `CommandQueue`: the FIFO of commands waiting to be written to the backend
//! - `BackendConfig`: which backend to launch and from where

pub mod config;
pub mod process;
pub mod queue;

pub use config::BackendConfig;
pub use process::{BridgeState, HANDSHAKE, OutputHook, ProcessBridge};
pub use queue::{CommandQueue, HIGH_WATER_MARK, Pushed};
