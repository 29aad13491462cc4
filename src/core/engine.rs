use super::normalize::{normalize, percent_to_fraction};
use super::types::{DiscountMode, NormalizedInputs, PricingResult, RawInputs};

/// One-call boundary for the presentation layer: normalize then compute.
pub fn quote(raw: &RawInputs) -> PricingResult {
    compute(&normalize(raw))
}

/// Turns normalized inputs into the full set of derived metrics. Total over
/// the normalized domain: never errors, never returns NaN. Edge cases (zero
/// price, zero cost, impossible targets) resolve through flooring, clamping,
/// or `+inf`, not through error states.
pub fn compute(inputs: &NormalizedInputs) -> PricingResult {
    let discount = match inputs.discount_mode {
        DiscountMode::Percentage => {
            inputs.list_price * percent_to_fraction(inputs.discount_value)
        }
        DiscountMode::Amount => inputs.discount_value.max(0.0).min(inputs.list_price),
    };

    // Second cap: whatever the mode branch produced, the discount can never
    // exceed the price it is subtracted from.
    let total_discount = discount.min(inputs.list_price);
    let net_price = (inputs.list_price - total_discount).max(0.0);

    // A cost above the net price floors to zero profit; losses are not
    // reported as negative currency.
    let gross_profit_per_unit = (net_price - inputs.unit_cost).max(0.0);

    let margin = guarded_ratio(gross_profit_per_unit, net_price);
    let markup = guarded_ratio(gross_profit_per_unit, inputs.unit_cost);

    PricingResult {
        net_price,
        gross_profit_per_unit,
        margin,
        markup,
        price_for_target_margin: price_for_target_margin(
            inputs.unit_cost,
            inputs.target_margin_pct,
        ),
    }
}

/// Profit over a denominator, with 0 for a non-positive denominator. The
/// quotient itself is also guarded: a subnormal denominator under a huge
/// numerator overflows to `+inf`, which reports as 0 like the other
/// degenerate ratios.
fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 {
        return 0.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() { ratio } else { 0.0 }
}

/// Solves `(price - cost) / price = target` for the list price, assuming no
/// discount. A target of 100% or more has no finite solution, and a zero
/// cost makes the ratio degenerate; both report `+inf`.
pub fn price_for_target_margin(unit_cost: f64, target_margin_pct: f64) -> f64 {
    let target_fraction = percent_to_fraction(target_margin_pct);
    if target_fraction >= 1.0 || unit_cost <= 0.0 {
        f64::INFINITY
    } else {
        unit_cost / (1.0 - target_fraction)
    }
}
