//! Common types used across the engine.

use odra::casper_types::U256;

/// Round data returned by a price feed (Chainlink aggregator layout)
#[odra::odra_type]
pub struct RoundData {
    /// Round identifier
    pub round_id: u64,
    /// Price with 8 decimals
    pub answer: U256,
    /// Block time the round started
    pub started_at: u64,
    /// Block time of the last update
    pub updated_at: u64,
    /// Round in which the answer was computed
    pub answered_in_round: u64,
}

/// Debt and collateral value of one account
#[odra::odra_type]
#[derive(Copy, Default)]
pub struct AccountInformation {
    /// DHC minted by the account (18 decimals)
    pub total_dhc_minted: U256,
    /// Sum of the account's collateral in USD (18 decimals)
    pub collateral_value_usd: U256,
}

/// Outcome of a liquidation
#[odra::odra_type]
#[derive(Copy)]
pub struct LiquidationResult {
    /// Collateral equivalent of the covered debt
    pub collateral_for_debt: U256,
    /// Bonus collateral paid to the liquidator
    pub bonus_collateral: U256,
    /// Health factor before the liquidation
    pub starting_health_factor: U256,
    /// Health factor after the liquidation
    pub ending_health_factor: U256,
}

impl LiquidationResult {
    /// Total collateral moved to the liquidator
    pub fn total_collateral_seized(&self) -> U256 {
        self.collateral_for_debt + self.bonus_collateral
    }
}
