//! Custom test assertions

/// Assert every value is greater than the one before it
pub fn assert_strictly_increasing(values: &[u64]) {
    for pair in values.windows(2) {
        assert!(
            pair[0] < pair[1],
            "Expected strictly increasing sequence numbers, got {:?}",
            values
        );
    }
}
