//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod harness;

use tokenfield_rs::{Segment, SegmentKind};

/// Keys of the catalog used in most examples
pub const EXAMPLE_KEYS: [&str; 3] = ["BASE_URL", "base_token", "API_KEY"];

/// Concatenate segment contents back into the raw value
pub fn rejoin(segments: &[Segment]) -> String {
    segments.iter().map(|s| s.content.as_str()).collect()
}

/// `(kind, content)` pairs, for compact assertions
pub fn shape(segments: &[Segment]) -> Vec<(SegmentKind, &str)> {
    segments
        .iter()
        .map(|s| (s.kind, s.content.as_str()))
        .collect()
}

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f32, b: f32, epsilon: f32) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}
