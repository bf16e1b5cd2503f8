/// Rounds `value` to `decimals` decimal places, half away from zero.
///
/// Non-finite values are returned unchanged.
#[must_use]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    // avoid reporting -0.0
    if rounded == 0.0 { 0.0 } else { rounded }
}
