mod engine;
mod normalize;
mod types;

pub use engine::{compute, price_for_target_margin, quote};
pub use normalize::{clamp_fraction, fraction_to_percent, normalize, percent_to_fraction, to_number};
pub use types::{DiscountMode, NormalizedInputs, PricingResult, RawInputs};
