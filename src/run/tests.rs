//! Unit tests for the execution pipeline.
//!
//! This module contains tests organised into:
//! - [`fake_cluster`] - A scriptable in-memory cluster and deterministic names
//! - [`namespace_tests`] - Namespace resolution and ownership
//! - [`watch_tests`] - The completion-vs-deadline race
//! - [`cleanup_tests`] - Teardown ordering and gating
//! - [`pipeline_tests`] - End-to-end pipeline scenarios

mod cleanup_tests;
