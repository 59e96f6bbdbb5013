//! Publish channel for kitsync
//!
//! Changed local artifacts are staged, committed and pushed through an
//! external version-control tool. The channel is modeled as a trait so the
//! reconciliation engine never depends on how the child process is invoked.

pub mod client;

pub use client::{GitPublisher, PublishClient, PublishOutcome, PublishStep};
