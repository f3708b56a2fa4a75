//! Integration tests for the farmstats pipeline
//!
//! These tests stand up wiremock servers in place of the farm site and drive
//! the pipeline end to end.

mod common;
mod pipeline_tests;
mod surface_tests;
