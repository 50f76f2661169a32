//! In-crate tests for the task lifecycle.

mod support;
