//! Price Oracle Adapter
//!
//! Reads Chainlink-style round data from a collateral's price feed and refuses
//! to hand out prices older than [`TIMEOUT`]. When a feed stops updating the
//! engine freezes every operation that needs a valuation instead of pricing
//! against stale data.

use odra::prelude::*;
use odra::casper_types::{RuntimeArgs, U256};
use odra::CallDef;
use crate::errors::{DhcError, EngineResult};
use crate::types::RoundData;

/// Maximum feed age: 3 hours, in block-time units (milliseconds on Casper)
pub const TIMEOUT: u64 = 3 * 60 * 60 * 1000;

/// Entry point every price feed exposes
pub const LATEST_ROUND_DATA: &str = "latest_round_data";

/// Stale-checked reads from price feeds
pub struct OracleLib;

impl OracleLib {
    /// Latest round from `feed`, failing with `StalePrice` once it is older
    /// than [`TIMEOUT`] at the current block time.
    pub fn stale_checked_round_data(env: &odra::ContractEnv, feed: Address) -> EngineResult<RoundData> {
        let call_def = CallDef::new(LATEST_ROUND_DATA, false, RuntimeArgs::new());
        let round: RoundData = env.call_contract(feed, call_def);
        Self::check_freshness(&round, env.get_block_time())?;
        Ok(round)
    }

    /// Latest fresh price from `feed`, 8 decimals.
    pub fn price(env: &odra::ContractEnv, feed: Address) -> EngineResult<U256> {
        Ok(Self::stale_checked_round_data(env, feed)?.answer)
    }

    /// Staleness rule in isolation. A round stamped in the future has age zero.
    pub fn check_freshness(round: &RoundData, now: u64) -> EngineResult<()> {
        let age = now.saturating_sub(round.updated_at);
        if age > TIMEOUT {
            return Err(DhcError::StalePrice.into());
        }
        Ok(())
    }
}
