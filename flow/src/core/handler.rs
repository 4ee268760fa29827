// src/core/handler.rs

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// A boxed, type-erased step handler.
///
/// Takes its own clone of the context handle and resolves to a control signal
/// or the pipeline's error type. Lock guards must be released before the
/// handler awaits anything.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;
