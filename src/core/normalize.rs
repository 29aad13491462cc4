use super::types::{NormalizedInputs, RawInputs};

/// Coerces a raw field value to a finite number, falling back when the field
/// is unset or non-finite.
pub fn to_number(raw: Option<f64>, fallback: f64) -> f64 {
    match raw {
        Some(v) if v.is_finite() => v,
        _ => fallback,
    }
}

/// Clamps to the closed interval [0, 1]. Non-finite input clamps to 0 so a
/// fraction coming out of here is always usable in arithmetic.
pub fn clamp_fraction(x: f64) -> f64 {
    if x.is_finite() { x.clamp(0.0, 1.0) } else { 0.0 }
}

pub fn percent_to_fraction(pct: f64) -> f64 {
    clamp_fraction(pct / 100.0)
}

/// Deliberately unclamped: a computed fraction above 1 is reported as-is
/// (markup routinely exceeds 100%).
pub fn fraction_to_percent(fraction: f64) -> f64 {
    fraction * 100.0
}

pub fn normalize(raw: &RawInputs) -> NormalizedInputs {
    NormalizedInputs {
        list_price: to_number(raw.list_price, 0.0).max(0.0),
        unit_cost: to_number(raw.unit_cost, 0.0).max(0.0),
        discount_mode: raw.discount_mode,
        discount_value: to_number(raw.discount_value, 0.0),
        target_margin_pct: to_number(raw.target_margin_pct, 0.0),
    }
}
