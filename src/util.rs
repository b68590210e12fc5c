use itertools::Itertools;

pub fn mean(data: &[f64]) -> Option<f64> {
    match data.len() {
        0 => None,
        count => Some(data.iter().sum::<f64>() / count as f64),
    }
}

/// Population standard deviation (divides by `n`).
pub fn std_dev(data: &[f64]) -> Option<f64> {
    let data_mean = mean(data)?;
    let variance = data
        .iter()
        .map(|value| {
            let diff = data_mean - *value;

            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;

    Some(variance.sqrt())
}

/// Discrete first difference: `out[i] = data[i + 1] - data[i]`.
pub fn first_difference(data: &[f64]) -> Vec<f64> {
    data.iter()
        .tuple_windows()
        .map(|(prev, next)| next - prev)
        .collect()
}

pub fn round_to_i32(value: f64) -> i32 {
    value.round() as i32
}
