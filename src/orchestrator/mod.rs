//! Application-level orchestration.
//!
//! This module owns the content workflow (validate, request, normalize, persist) and the
//! interactive session controller. UI/CLI layers call into this module to keep responsibilities
//! separated.

mod controller;
mod post_process;
mod workflow;

pub(crate) use controller::{run_controller, UiCommand};
pub use workflow::ContentWorkflow;
