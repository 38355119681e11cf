//! Custom assertion macros and utilities
//!
//! Provides assertion macros with more descriptive failure messages for
//! results, thread stores and operation lists.

/// Assert that a result is ok and return the value
///
/// This macro unwraps a Result, providing a better error message
/// if the result is an error.
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a result is an error
macro_rules! assert_err {
    ($result:expr) => {
        assert!($result.is_err(), "Expected Err, got Ok");
    };
    ($result:expr, $pattern:pat) => {
        match $result {
            Err($pattern) => {}
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => panic!("Expected different error variant, got: {:?}", e),
        }
    };
}

/// Assert that a store holds exactly the given thread IDs
macro_rules! assert_thread_ids {
    ($store:expr, [$($id:expr),* $(,)?]) => {
        let actual: Vec<&str> = $store.thread_infos.keys().map(|id| id.as_str()).collect();
        let expected: Vec<&str> = vec![$($id),*];
        assert_eq!(actual, expected, "Unexpected thread IDs in store");
    };
}

/// Assert that an operation list has the given kinds, in order
macro_rules! assert_operation_kinds {
    ($operations:expr, [$($kind:expr),* $(,)?]) => {
        let actual: Vec<&str> = $operations.iter().map(|op| op.kind()).collect();
        let expected: Vec<&str> = vec![$($kind),*];
        assert_eq!(actual, expected, "Unexpected operation kinds");
    };
}
