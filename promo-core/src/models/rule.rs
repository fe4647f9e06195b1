/// A discount rule attached to a single bundle item.
///
/// The rule kinds form a closed set: a flat currency amount subtracted from
/// the base price, or a proportional reduction. Dispatch is by pattern match,
/// so adding a kind is a compile-time-checked change rather than a runtime
/// registry lookup.
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "lowercase")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PromotionRule {
    /// A flat currency amount subtracted from the base price
    Fixed {
        /// The amount to subtract; expected non-negative
        amount: f64,
    },
    /// A proportional reduction of the base price
    Percentage {
        /// The percentage to remove; expected within `[0, 100]`
        percent: f64,
    },
}

impl PromotionRule {
    /// Compute the promotional price for `base_price` under this rule.
    ///
    /// This is a total function: it accepts any input and never returns a
    /// negative value. A discount larger than the base price clamps to zero,
    /// so percentages above 100 silently produce 0. Range validation of the
    /// rule itself belongs to bundle construction, not here.
    pub fn final_price(&self, base_price: f64) -> f64 {
        match self {
            Self::Fixed { amount } => f64::max(0.0, base_price - amount),
            Self::Percentage { percent } => f64::max(0.0, base_price * (1.0 - percent / 100.0)),
        }
    }
}
