//! Property-based tests

pub mod reconciler_proptest;
pub mod reducer_proptest;
