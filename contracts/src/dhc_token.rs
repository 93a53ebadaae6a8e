//! DHC Stable Token Contract
//!
//! CEP-18 compatible stable token. Minting is reserved for the owner; after
//! deployment ownership is handed to the engine, which makes the engine the
//! only minter. Anyone may burn tokens they hold.

use odra::prelude::*;
use odra::casper_types::{U256, Key};
use odra::casper_types::bytesrepr::ToBytes;
use crate::errors::DhcError;
use crate::events::{Approval, Burn, Mint, OwnershipTransferred, Transfer};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

const DHC_DECIMALS: u8 = 18;
const CEP18_NAME_KEY: &str = "name";
const CEP18_SYMBOL_KEY: &str = "symbol";
const CEP18_DECIMALS_KEY: &str = "decimals";
const CEP18_TOTAL_SUPPLY_KEY: &str = "total_supply";
const CEP18_BALANCES_DICT: &str = "balances";
const CEP18_ALLOWANCES_DICT: &str = "allowances";

/// DHC Stable Token Contract
#[odra::module(events = [Transfer, Approval, Mint, Burn, OwnershipTransferred])]
pub struct DhcToken {
    /// Token name
    name: Var<String>,
    /// Token symbol
    symbol: Var<String>,
    /// Total supply
    total_supply: Var<U256>,
    /// Balance mapping
    balances: Mapping<Address, U256>,
    /// Allowance mapping (owner -> spender -> amount)
    allowances: Mapping<(Address, Address), U256>,
    /// Sole minter
    owner: Var<Address>,
}

#[odra::module]
impl DhcToken {
    /// Initialize the token; the deployer becomes owner
    pub fn init(&mut self, name: String, symbol: String) {
        self.name.set(name.clone());
        self.symbol.set(symbol.clone());
        self.total_supply.set(U256::zero());
        self.owner.set(self.env().caller());
        self.env().init_dictionary(CEP18_BALANCES_DICT);
        self.env().init_dictionary(CEP18_ALLOWANCES_DICT);
        self.env().set_named_value(CEP18_NAME_KEY, name);
        self.env().set_named_value(CEP18_SYMBOL_KEY, symbol);
        self.env().set_named_value(CEP18_DECIMALS_KEY, DHC_DECIMALS);
        self.env().set_named_value(CEP18_TOTAL_SUPPLY_KEY, U256::zero());
    }

    // ========== CEP-18 Standard Functions ==========

    pub fn name(&self) -> String {
        self.name.get_or_default()
    }

    pub fn symbol(&self) -> String {
        self.symbol.get_or_default()
    }

    pub fn decimals(&self) -> u8 {
        DHC_DECIMALS
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

    /// Transfer tokens to recipient
    pub fn transfer(&mut self, recipient: Address, amount: U256) -> bool {
        let sender = self.env().caller();
        self.transfer_internal(sender, recipient, amount);
        true
    }

    /// Approve spender to spend tokens
    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        let owner = self.env().caller();
        self.approve_internal(owner, spender, amount);
        true
    }

    /// Transfer tokens from owner to recipient (requires allowance)
    pub fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) -> bool {
        let spender = self.env().caller();

        let current_allowance = self.allowance(owner, spender);
        if current_allowance < amount {
            self.env().revert(DhcError::InsufficientAllowance);
        }

        self.transfer_internal(owner, recipient, amount);
        self.approve_internal(owner, spender, current_allowance - amount);
        true
    }

    // ========== Supply Functions ==========

    /// Mint new tokens (owner only)
    pub fn mint(&mut self, to: Address, amount: U256) -> bool {
        self.require_owner();
        if amount.is_zero() {
            self.env().revert(DhcError::TokenAmountIsZero);
        }

        let new_balance = self.balance_of(to) + amount;
        self.balances.set(&to, new_balance);
        self.set_balance_cep18(to, new_balance);

        let new_supply = self.total_supply() + amount;
        self.total_supply.set(new_supply);
        self.set_total_supply_cep18(new_supply);

        self.env().emit_event(Mint { to, amount });
        true
    }

    /// Burn tokens held by the caller
    pub fn burn(&mut self, amount: U256) {
        let caller = self.env().caller();
        if amount.is_zero() {
            self.env().revert(DhcError::TokenAmountIsZero);
        }

        let current_balance = self.balance_of(caller);
        if current_balance < amount {
            self.env().revert(DhcError::BurnAmountExceedsBalance);
        }

        let new_balance = current_balance - amount;
        self.balances.set(&caller, new_balance);
        self.set_balance_cep18(caller, new_balance);

        let new_supply = self.total_supply() - amount;
        self.total_supply.set(new_supply);
        self.set_total_supply_cep18(new_supply);

        self.env().emit_event(Burn { from: caller, amount });
    }

    // ========== Ownership ==========

    pub fn owner(&self) -> Option<Address> {
        self.owner.get()
    }

    /// Hand minting rights to `new_owner` (owner only)
    pub fn transfer_ownership(&mut self, new_owner: Address) {
        self.require_owner();
        let previous_owner = self.env().caller();
        self.owner.set(new_owner);
        self.env().emit_event(OwnershipTransferred {
            previous_owner,
            new_owner,
        });
    }

    // ========== Internal Functions ==========

    fn transfer_internal(&mut self, from: Address, to: Address, amount: U256) {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            self.env().revert(DhcError::InsufficientBalance);
        }

        let new_from_balance = from_balance - amount;
        self.balances.set(&from, new_from_balance);
        self.set_balance_cep18(from, new_from_balance);

        let new_to_balance = self.balance_of(to) + amount;
        self.balances.set(&to, new_to_balance);
        self.set_balance_cep18(to, new_to_balance);

        self.env().emit_event(Transfer { from, to, amount });
    }

    fn approve_internal(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances.set(&(owner, spender), amount);
        self.set_allowance_cep18(owner, spender, amount);
        self.env().emit_event(Approval { owner, spender, amount });
    }

    fn set_balance_cep18(&self, owner: Address, amount: U256) {
        let key = Self::cep18_balance_key(owner);
        self.env().set_dictionary_value(CEP18_BALANCES_DICT, key.as_bytes(), amount);
    }

    fn set_allowance_cep18(&self, owner: Address, spender: Address, amount: U256) {
        let key = Self::cep18_allowance_key(owner, spender);
        self.env().set_dictionary_value(CEP18_ALLOWANCES_DICT, key.as_bytes(), amount);
    }

    fn set_total_supply_cep18(&self, amount: U256) {
        self.env().set_named_value(CEP18_TOTAL_SUPPLY_KEY, amount);
    }

    fn cep18_balance_key(owner: Address) -> String {
        let key = Key::from(owner);
        let bytes = key.to_bytes().unwrap_or_default();
        BASE64_STANDARD.encode(bytes)
    }

    fn cep18_allowance_key(owner: Address, spender: Address) -> String {
        let owner_key = Key::from(owner);
        let spender_key = Key::from(spender);
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&owner_key.to_bytes().unwrap_or_default());
        bytes.extend_from_slice(&spender_key.to_bytes().unwrap_or_default());
        BASE64_STANDARD.encode(bytes)
    }

    fn require_owner(&self) {
        let caller = self.env().caller();
        match self.owner.get() {
            Some(owner) if owner == caller => {}
            _ => self.env().revert(DhcError::NotOwner),
        }
    }
}
