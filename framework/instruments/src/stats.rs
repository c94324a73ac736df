/// Median of the values, `None` when there are none.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Median absolute percentage error of the values around their median.
pub fn median_absolute_percentage_error(values: &[f64]) -> Option<f64> {
    let center = median(values)?;
    if center == 0.0 {
        return Some(0.0);
    }

    let errors = values
        .iter()
        .map(|v| ((v - center) / center).abs() * 100.0)
        .collect::<Vec<_>>();
    median(&errors)
}
