// src/auth/mod.rs

//! Who is calling, and what they may do.

pub mod permissions;
pub mod request_context;

pub use permissions::Permission;
pub use request_context::{RequestContext, SESSION_COOKIE};
