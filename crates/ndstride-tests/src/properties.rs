//! Behavioural properties every backend must satisfy
//!
//! Written against the operation traits through `backend_tests!` so another
//! backend only needs a new invocation list.
