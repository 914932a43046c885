#![allow(dead_code)]

use std::path::PathBuf;

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

/// Denominator for generated ratios. Multiples of 1/64 add up exactly in
/// binary floating point, so the generated triples pass the exact-sum check.
pub const RATIO_STEPS: u32 = 64;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// `(train, test, val)` with `train > 0` and an exact sum of one.
pub fn arb_valid_ratios() -> BoxedStrategy<(f64, f64, f64)> {
    (1..=RATIO_STEPS)
        .prop_flat_map(|train| (Just(train), 0..=(RATIO_STEPS - train)))
        .prop_map(|(train, test)| {
            let val = RATIO_STEPS - train - test;
            let step = RATIO_STEPS as f64;
            (train as f64 / step, test as f64 / step, val as f64 / step)
        })
        .boxed()
}

/// Non-negative step triples whose sum is not the full denominator.
pub fn arb_off_sum_ratios() -> BoxedStrategy<(f64, f64, f64)> {
    (1..=RATIO_STEPS, 0..=RATIO_STEPS, 0..=RATIO_STEPS)
        .prop_filter("sum must differ from one", |(a, b, c)| {
            a + b + c != RATIO_STEPS
        })
        .prop_map(|(a, b, c)| {
            let step = RATIO_STEPS as f64;
            (a as f64 / step, b as f64 / step, c as f64 / step)
        })
        .boxed()
}

/// Distinct image paths, `0..=max` of them.
pub fn arb_image_paths(max: usize) -> BoxedStrategy<Vec<PathBuf>> {
    (0..=max)
        .prop_map(|n| {
            (0..n)
                .map(|i| PathBuf::from(format!("images/img_{i:04}.png")))
                .collect()
        })
        .boxed()
}
