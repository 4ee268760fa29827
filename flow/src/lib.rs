// src/lib.rs

//! byteshop-flow: asynchronous, type-safe step pipelines.
//!
//! Every multi-step operation in ByteShop (signing up, adding to the cart,
//! checking out, advancing an order's status) is expressed as a [`Pipeline`]:
//!  - an ordered list of named steps, each optionally skippable or optional;
//!  - `before` / `on` / `after` hooks per step, all async;
//!  - early exit with [`PipelineControl::Stop`] or with an error;
//!  - a shared, lockable [`ContextData`] that every handler reads and writes.
//!
//! Pipelines are registered in a [`Flows`] registry keyed by their context
//! type, so callers only need to build a context and call [`Flows::run`].

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::handler::Handler;
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{FlowError, FlowResult};

pub use crate::registry::Flows;
