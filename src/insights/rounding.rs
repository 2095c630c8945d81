/// Round half-up to `places` decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor + 0.5).floor() / factor
}

/// Mean of day counts rounded to the nearest whole day, `None` when empty.
pub fn rounded_mean(values: &[u32]) -> Option<u32> {
    if values.is_empty() {
        return None;
    }
    let total: u64 = values.iter().map(|&v| u64::from(v)).sum();
    Some(round_to(total as f64 / values.len() as f64, 0) as u32)
}
