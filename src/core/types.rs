use serde::Serialize;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum DiscountMode {
    #[default]
    Percentage,
    Amount,
}

/// Field values exactly as supplied by the caller. Numeric fields are `None`
/// when the user left them blank; a present value may still be non-finite
/// (e.g. smuggled through a JSON float) and is coerced during normalization.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RawInputs {
    pub list_price: Option<f64>,
    pub unit_cost: Option<f64>,
    pub discount_mode: DiscountMode,
    pub discount_value: Option<f64>,
    pub target_margin_pct: Option<f64>,
}

/// Same shape as `RawInputs` with every numeric field finite. Prices and
/// costs are floored at zero; the discount value is finite but only clamped
/// per-mode inside the engine; the target margin is an unclamped percent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NormalizedInputs {
    pub list_price: f64,
    pub unit_cost: f64,
    pub discount_mode: DiscountMode,
    pub discount_value: f64,
    pub target_margin_pct: f64,
}

/// Derived metrics for one unit. `margin` and `markup` are fractions, not
/// percents (0.5 means 50%). Every field is a finite non-negative real
/// except `price_for_target_margin`, which is `+inf` when no finite price
/// can satisfy the requested margin.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub net_price: f64,
    pub gross_profit_per_unit: f64,
    pub margin: f64,
    pub markup: f64,
    pub price_for_target_margin: f64,
}
