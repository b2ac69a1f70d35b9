//! Test-data builders, compiled for tests and the `test-support` feature.

pub mod category_fake;

pub use category_fake::CategoryFakeBuilder;
