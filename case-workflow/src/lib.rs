//! Lifecycle of one in-progress case analysis.
//!
//! An intern selects an X-ray, submits it for inference, receives a
//! provisional result held on the server under a temporary id, and then
//! either commits it as a permanent case record or abandons it. The
//! [`CaseWorkflow`] state machine never performs I/O itself: network-bound
//! steps hand out tickets that the [`driver`] functions run against a
//! [`CaseApi`], and server-side cleanups come back as [`DiscardTemp`]
//! follow-ups to be fired best-effort.

pub mod api;
pub mod controller;
pub mod driver;
pub mod error;
pub mod image;
pub mod state;

#[cfg(test)]
mod test_support;

pub use api::CaseApi;
pub use controller::{
    CaseWorkflow, CommitCompletion, CommitTicket, DiscardTemp, Followup, ProcessCompletion,
    ProcessTicket, ProcessedCase,
};
pub use driver::{Analysis, discard_best_effort, run_commit, run_process};
pub use error::{ApiError, WorkflowError};
pub use image::SourceImage;
pub use state::{ProvisionalResult, WorkflowState};
