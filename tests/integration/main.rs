//! End-to-end tests against mock HTTP servers

mod harvest_tests;
mod merge_tests;
mod schema_tests;
