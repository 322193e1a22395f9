//! Deterministic sample dataset

mod generator;

pub use generator::{SampleGenerator, SampleSize, FEATURED_CUSTOMER};
