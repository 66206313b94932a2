//! Dispatch of targets to site handlers
//!
//! This module provides:
//! - [`Registry`]: site key to handler factory, resolved per target
//! - [`Executor`]: bounded-concurrency batch runner producing a [`ResultMap`]
//! - [`RateCalculator`]: items-per-minute throughput for progress logs

mod executor;
mod rate;
mod registry;

pub use executor::{Executor, ResultMap};
pub use rate::RateCalculator;
pub use registry::{HandlerFactory, Registry, RegistryError};
