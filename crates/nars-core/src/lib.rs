//! # nars-core
//!
//! Core types shared by the NARS bridge crates.
//!
//! This crate provides the backend-agnostic vocabulary:
//! - Operations and perceptions exchanged with a reasoning backend
//! - Sensors turning environment arguments into perceptions
//! - Dialects: per-backend sentence templates and report extraction
//! - Backend families and their launch commands

pub mod alias;
pub mod backend;
pub mod dialect;
pub mod error;
pub mod operation;
pub mod perception;
pub mod sensor;

pub use alias::OperationAliases;
pub use backend::{BackendType, LaunchCommand};
pub use dialect::{Dialect, Templates};
pub use error::{NarsError, Result};
pub use operation::Operation;
pub use perception::Perception;
pub use sensor::{SenseArgs, Sensor, SensorId};
