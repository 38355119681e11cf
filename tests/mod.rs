//! Test suite for threadsync
//!
//! This module organizes all tests

pub mod property;
