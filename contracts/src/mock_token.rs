//! Mock Collateral Token Contract
//!
//! Freely mintable CEP-18 style token used as collateral in local deployments
//! and tests. It exposes the same `mint -> bool` and `burn` entry points as
//! the DHC token, so it can also stand in for the stable token. Three switches
//! simulate misbehaving tokens:
//! - `set_transfers_fail` makes `transfer` and `transfer_from` return `false`
//!   without moving funds
//! - `set_mints_fail` makes `mint` return `false` without minting
//! - `set_reentry_target` makes `transfer_from` call back into an engine's
//!   `deposit_collateral` before moving funds

use odra::prelude::*;
use odra::casper_types::{U256, runtime_args};
use odra::CallDef;
use crate::errors::DhcError;

/// Mock Collateral Token Contract
#[odra::module]
pub struct MockToken {
    /// Token name
    name: Var<String>,
    /// Token symbol
    symbol: Var<String>,
    /// Decimals
    decimals: Var<u8>,
    /// Total supply
    total_supply: Var<U256>,
    /// Balance mapping
    balances: Mapping<Address, U256>,
    /// Allowance mapping (owner -> spender -> amount)
    allowances: Mapping<(Address, Address), U256>,
    /// When set, transfers report failure
    transfers_fail: Var<bool>,
    /// When set, mints report failure
    mints_fail: Var<bool>,
    /// Engine to re-enter from `transfer_from`
    reentry_target: Var<Option<Address>>,
}

#[odra::module]
impl MockToken {
    pub fn init(&mut self, name: String, symbol: String, decimals: u8) {
        self.name.set(name);
        self.symbol.set(symbol);
        self.decimals.set(decimals);
        self.total_supply.set(U256::zero());
        self.transfers_fail.set(false);
        self.mints_fail.set(false);
        self.reentry_target.set(None);
    }

    pub fn name(&self) -> String {
        self.name.get_or_default()
    }

    pub fn symbol(&self) -> String {
        self.symbol.get_or_default()
    }

    pub fn decimals(&self) -> u8 {
        self.decimals.get().unwrap_or(18)
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply.get().unwrap_or(U256::zero())
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).unwrap_or(U256::zero())
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances.get(&(owner, spender)).unwrap_or(U256::zero())
    }

    /// Faucet: anyone can mint
    pub fn mint(&mut self, to: Address, amount: U256) -> bool {
        if self.mints_fail.get().unwrap_or(false) {
            return false;
        }
        let new_balance = self.balance_of(to) + amount;
        let new_supply = self.total_supply() + amount;
        self.balances.set(&to, new_balance);
        self.total_supply.set(new_supply);
        true
    }

    /// Burn tokens held by the caller
    pub fn burn(&mut self, amount: U256) {
        let caller = self.env().caller();
        let balance = self.balance_of(caller);
        if balance < amount {
            self.env().revert(DhcError::BurnAmountExceedsBalance);
        }
        self.balances.set(&caller, balance - amount);
        self.total_supply.set(self.total_supply() - amount);
    }

    pub fn transfer(&mut self, recipient: Address, amount: U256) -> bool {
        if self.transfers_fail.get().unwrap_or(false) {
            return false;
        }
        let sender = self.env().caller();
        self.move_balance(sender, recipient, amount);
        true
    }

    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        let owner = self.env().caller();
        self.allowances.set(&(owner, spender), amount);
        true
    }

    pub fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) -> bool {
        if self.transfers_fail.get().unwrap_or(false) {
            return false;
        }

        if let Some(engine) = self.reentry_target.get().flatten() {
            let args = runtime_args! {
                "token" => self.env().self_address(),
                "amount" => amount
            };
            let call_def = CallDef::new("deposit_collateral", true, args);
            self.env().call_contract::<()>(engine, call_def);
        }

        let spender = self.env().caller();
        let current_allowance = self.allowance(owner, spender);
        if current_allowance < amount {
            self.env().revert(DhcError::InsufficientAllowance);
        }
        self.allowances.set(&(owner, spender), current_allowance - amount);
        self.move_balance(owner, recipient, amount);
        true
    }

    // ========== Test Switches ==========

    pub fn set_transfers_fail(&mut self, fail: bool) {
        self.transfers_fail.set(fail);
    }

    pub fn set_mints_fail(&mut self, fail: bool) {
        self.mints_fail.set(fail);
    }

    pub fn set_reentry_target(&mut self, engine: Option<Address>) {
        self.reentry_target.set(engine);
    }

    fn move_balance(&mut self, from: Address, to: Address, amount: U256) {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            self.env().revert(DhcError::InsufficientBalance);
        }
        self.balances.set(&from, from_balance - amount);
        let to_balance = self.balance_of(to);
        self.balances.set(&to, to_balance + amount);
    }
}
