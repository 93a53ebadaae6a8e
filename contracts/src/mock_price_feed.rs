//! Mock Price Feed Contract
//!
//! Chainlink-style aggregator with a settable answer, for local deployments
//! and tests. Every update stamps the round with the current block time unless
//! round data is written explicitly.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::DhcError;
use crate::types::RoundData;

/// Mock Price Feed Contract
#[odra::module]
pub struct MockPriceFeed {
    /// Answer decimals (8 for USD feeds)
    decimals: Var<u8>,
    /// Latest round
    latest_round: Var<RoundData>,
}

#[odra::module]
impl MockPriceFeed {
    pub fn init(&mut self, decimals: u8, initial_answer: U256) {
        self.decimals.set(decimals);
        self.update_answer(initial_answer);
    }

    pub fn decimals(&self) -> u8 {
        self.decimals.get().unwrap_or(8)
    }

    /// Publish a new answer stamped with the current block time
    pub fn update_answer(&mut self, answer: U256) {
        let now = self.env().get_block_time();
        let round_id = self.latest_round.get().map(|r| r.round_id).unwrap_or(0) + 1;
        self.latest_round.set(RoundData {
            round_id,
            answer,
            started_at: now,
            updated_at: now,
            answered_in_round: round_id,
        });
    }

    /// Overwrite the latest round, e.g. to backdate it
    pub fn update_round_data(&mut self, round_id: u64, answer: U256, updated_at: u64, started_at: u64) {
        self.latest_round.set(RoundData {
            round_id,
            answer,
            started_at,
            updated_at,
            answered_in_round: round_id,
        });
    }

    pub fn latest_round_data(&self) -> RoundData {
        self.latest_round.get_or_revert_with(DhcError::InvalidPrice)
    }
}
