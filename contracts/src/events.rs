//! Events emitted by the engine and the DHC token.
//!
//! Events written during a transition that later reverts are discarded with it.

use odra::prelude::*;
use odra::casper_types::U256;

#[odra::event]
pub struct CollateralDeposited {
    pub user: Address,
    pub token: Address,
    pub amount: U256,
}

/// `from` is the account whose ledger entry shrank; `to` received the tokens.
/// They differ only for liquidations.
#[odra::event]
pub struct CollateralRedeemed {
    pub from: Address,
    pub to: Address,
    pub token: Address,
    pub amount: U256,
}

#[odra::event]
pub struct DhcMinted {
    pub user: Address,
    pub amount: U256,
}

#[odra::event]
pub struct DhcBurned {
    pub on_behalf_of: Address,
    pub payer: Address,
    pub amount: U256,
}

#[odra::event]
pub struct Liquidated {
    pub liquidator: Address,
    pub user: Address,
    pub token: Address,
    pub debt_covered: U256,
    pub collateral_seized: U256,
}

#[odra::event]
pub struct Transfer {
    pub from: Address,
    pub to: Address,
    pub amount: U256,
}

#[odra::event]
pub struct Approval {
    pub owner: Address,
    pub spender: Address,
    pub amount: U256,
}

#[odra::event]
pub struct Mint {
    pub to: Address,
    pub amount: U256,
}

#[odra::event]
pub struct Burn {
    pub from: Address,
    pub amount: U256,
}

#[odra::event]
pub struct OwnershipTransferred {
    pub previous_owner: Address,
    pub new_owner: Address,
}
