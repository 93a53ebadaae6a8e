//! DHC Contracts
//!
//! Over-collateralized stablecoin engine for Casper.
//!
//! ## Architecture
//!
//! - **DhcEngine**: collateral and debt ledgers; deposit, mint, burn, redeem
//!   and liquidation transitions, each checked against the solvency rule
//! - **DhcToken**: CEP-18 stable token, mintable only by its owner (the engine)
//! - **solvency**: fixed-point health factor and valuation math
//! - **oracle**: stale-checked reads from Chainlink-style price feeds
//! - **MockPriceFeed / MockToken**: development collaborators
//!
//! ## Solvency Rule
//!
//! After every transition, each account with debt satisfies
//! `collateral_usd * 50% * 1e18 / debt >= 1e18`, i.e. it is at least 200%
//! collateralized. Accounts below that line can be liquidated for a 10%
//! collateral bonus.

#![cfg_attr(target_arch = "wasm32", no_std)]

#[cfg(target_arch = "wasm32")]
extern crate alloc;

// Re-export odra for downstream usage
pub use odra;

// Core module declarations
pub mod types;
pub mod errors;
pub mod events;
pub mod solvency;
pub mod oracle;

// Contract modules
pub mod engine;
pub mod dhc_token;

// Development collaborators
pub mod mock_price_feed;
pub mod mock_token;
