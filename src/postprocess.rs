// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

/// Largest finite value, or `None` if no value is finite.
pub fn max_finite(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            Some(m) if m >= v => Some(m),
            _ => Some(v),
        })
}

/// Divide every finite value by the largest finite value.
///
/// Leaves the values untouched when the maximum is 0 or nothing is finite.
/// Infinite values stay infinite. Returns the divisor if one was applied.
pub fn normalize(values: &mut [f64]) -> Option<f64> {
    let max = max_finite(values)?;
    if max == 0.0 {
        return None;
    }
    for v in values.iter_mut().filter(|v| v.is_finite()) {
        *v /= max;
    }
    Some(max)
}

/// Replace each value with 1 if it is `<= threshold`, else 0.
///
/// Unreached (`+inf`) cells become 0.
pub fn threshold(values: &mut [f64], threshold: f64) {
    for v in values.iter_mut() {
        *v = if *v <= threshold { 1.0 } else { 0.0 };
    }
}
