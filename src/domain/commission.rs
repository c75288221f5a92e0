// src/domain/commission.rs

/// Share of the gross commission the brokerage keeps before the agent split.
pub const DEFAULT_BROKERAGE_FEE_RATE: f64 = 0.25;

/// Turns a deal's price, commission rate and agent share into the amount the
/// agent actually takes home.
///
/// Rates are whole percentages (`3.0` means 3%). The brokerage fee is a
/// fraction (`0.25` means 25%). Setting the fee to zero gives the plain
/// `price * rate * share` formula used by older dashboards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommissionCalculator {
    pub brokerage_fee_rate: f64,
}

impl Default for CommissionCalculator {
    fn default() -> Self {
        Self {
            brokerage_fee_rate: DEFAULT_BROKERAGE_FEE_RATE,
        }
    }
}

impl CommissionCalculator {
    pub fn new(brokerage_fee_rate: f64) -> Self {
        Self { brokerage_fee_rate }
    }

    /// No clamping: negative or out-of-range inputs flow straight through.
    /// Rounding is left to the display layer.
    pub fn calculate(&self, listing_price: f64, commission_rate: f64, my_share: f64) -> f64 {
        let base = listing_price * (commission_rate / 100.0);
        let after_fee = base * (1.0 - self.brokerage_fee_rate);
        after_fee * (my_share / 100.0)
    }
}

/// Commission with the default 25% brokerage fee.
pub fn calculate_commission(listing_price: f64, commission_rate: f64, my_share: f64) -> f64 {
    CommissionCalculator::default().calculate(listing_price, commission_rate, my_share)
}
