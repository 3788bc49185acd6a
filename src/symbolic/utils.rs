// utility functions shared by the symbolic engine and the sampler

/// `num_values` evenly spaced points from `start` to `end`.
/// The last point is pinned to `end` so accumulated rounding never moves the right edge of the domain.
pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    let mut values = Vec::with_capacity(num_values);
    if num_values == 1 {
        values.push(start);
        return values;
    }
    let step = (end - start) / (num_values as f64 - 1.0);

    for i in 0..num_values {
        let value = start + (i as f64 * step);
        values.push(value);
    }
    if let Some(last) = values.last_mut() {
        *last = end;
    }

    values
}
