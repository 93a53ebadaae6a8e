//! DHC Engine Contract
//!
//! Owns the collateral and debt ledgers and gates every state change on the
//! solvency rule. Accounts deposit registered collateral tokens, mint DHC
//! against them, burn DHC and redeem collateral. Positions whose health factor
//! drops below 1.0 can be liquidated by any other account.
//!
//! Transition flow:
//! 1. Validate inputs (non-zero amounts, registered collateral)
//! 2. Mutate the ledgers
//! 3. Call out to the collateral token / DHC token
//! 4. Recompute the affected health factor and revert if it is broken
//!
//! Any failure reverts the deploy, which discards the ledger writes, the token
//! transfers and the events of the transition. Every mutating entry point runs
//! under a re-entrancy lock.

use odra::prelude::*;
use odra::casper_types::{U256, runtime_args};
use odra::CallDef;
use crate::errors::{DhcError, EngineError, EngineResult};
use crate::events::{CollateralDeposited, CollateralRedeemed, DhcBurned, DhcMinted, Liquidated};
use crate::oracle::OracleLib;
use crate::solvency::{
    self, ADDITIONAL_FEED_PRECISION, LIQUIDATION_BONUS, LIQUIDATION_PRECISION,
    LIQUIDATION_THRESHOLD, MIN_HEALTH_FACTOR, PRECISION,
};
use crate::types::{AccountInformation, LiquidationResult};

/// DHC Engine Contract
#[odra::module(events = [CollateralDeposited, CollateralRedeemed, DhcMinted, DhcBurned, Liquidated])]
pub struct DhcEngine {
    /// Registered collateral tokens, in registration order
    collateral_tokens: Var<Vec<Address>>,
    /// Collateral token -> price feed
    price_feeds: Mapping<Address, Address>,
    /// (user, collateral token) -> deposited amount
    collateral_deposited: Mapping<(Address, Address), U256>,
    /// user -> DHC minted
    dhc_minted: Mapping<Address, U256>,
    /// DHC token contract address
    dhc: Var<Address>,
    /// Set while a transition is in flight
    locked: Var<bool>,
}

#[odra::module]
impl DhcEngine {
    /// Initialize the engine with its fixed collateral registry.
    ///
    /// `token_addresses[i]` is priced by `price_feed_addresses[i]`.
    pub fn init(
        &mut self,
        token_addresses: Vec<Address>,
        price_feed_addresses: Vec<Address>,
        dhc_address: Address,
    ) {
        if token_addresses.len() != price_feed_addresses.len() {
            self.env().revert(DhcError::TokenAddressesAndPriceFeedAddressesMustBeSameLength);
        }

        for (token, feed) in token_addresses.iter().zip(price_feed_addresses.iter()) {
            if self.price_feeds.get(token).is_some() {
                self.env().revert(DhcError::DuplicateCollateralToken);
            }
            self.price_feeds.set(token, *feed);
        }

        self.collateral_tokens.set(token_addresses);
        self.dhc.set(dhc_address);
        self.locked.set(false);
    }

    // ========== Transitions ==========

    /// Deposit collateral and mint DHC in one transition
    pub fn deposit_collateral_and_mint_dhc(
        &mut self,
        token: Address,
        amount_collateral: U256,
        amount_dhc: U256,
    ) {
        self.non_reentrant(|engine| {
            let caller = engine.env().caller();
            engine.deposit_collateral_internal(caller, token, amount_collateral)?;
            engine.mint_dhc_internal(caller, amount_dhc)
        })
    }

    /// Deposit `amount` of `token` as collateral. Requires an allowance on
    /// the token for this contract.
    pub fn deposit_collateral(&mut self, token: Address, amount: U256) {
        self.non_reentrant(|engine| {
            let caller = engine.env().caller();
            engine.deposit_collateral_internal(caller, token, amount)
        })
    }

    /// Burn DHC and redeem collateral in one transition
    pub fn redeem_collateral_for_dhc(
        &mut self,
        token: Address,
        amount_collateral: U256,
        amount_dhc: U256,
    ) {
        self.non_reentrant(|engine| {
            let caller = engine.env().caller();
            Self::more_than_zero(amount_collateral)?;
            Self::more_than_zero(amount_dhc)?;
            engine.require_allowed_token(token)?;
            engine.burn_dhc_internal(amount_dhc, caller, caller)?;
            engine.redeem_collateral_internal(token, amount_collateral, caller, caller)?;
            engine.revert_if_health_factor_is_broken(caller)
        })
    }

    /// Withdraw collateral; the remaining position must stay healthy
    pub fn redeem_collateral(&mut self, token: Address, amount: U256) {
        self.non_reentrant(|engine| {
            let caller = engine.env().caller();
            Self::more_than_zero(amount)?;
            engine.require_allowed_token(token)?;
            engine.redeem_collateral_internal(token, amount, caller, caller)?;
            engine.revert_if_health_factor_is_broken(caller)
        })
    }

    /// Mint DHC against deposited collateral
    pub fn mint_dhc(&mut self, amount: U256) {
        self.non_reentrant(|engine| {
            let caller = engine.env().caller();
            engine.mint_dhc_internal(caller, amount)
        })
    }

    /// Repay debt by burning DHC. Requires a DHC allowance for this contract.
    pub fn burn_dhc(&mut self, amount: U256) {
        self.non_reentrant(|engine| {
            let caller = engine.env().caller();
            Self::more_than_zero(amount)?;
            engine.burn_dhc_internal(amount, caller, caller)?;
            // Burning only raises the factor; this check cannot fail today
            // and stays as a guard for future changes to the burn path.
            engine.revert_if_health_factor_is_broken(caller)
        })
    }

    /// Repay `debt_to_cover` of `user`'s debt with the caller's DHC and take
    /// the equivalent `token` collateral plus a 10% bonus.
    ///
    /// `user` must be below the minimum health factor, the liquidation must
    /// strictly improve it, and the caller's own position must stay healthy.
    /// Partial liquidation is allowed.
    pub fn liquidate(&mut self, token: Address, user: Address, debt_to_cover: U256) -> LiquidationResult {
        self.non_reentrant(|engine| engine.liquidate_internal(token, user, debt_to_cover))
    }

    // ========== Queries ==========

    pub fn get_health_factor(&self, user: Address) -> U256 {
        self.settle(self.health_factor_of(user))
    }

    pub fn calculate_health_factor(&self, total_dhc_minted: U256, collateral_value_usd: U256) -> U256 {
        self.settle(solvency::health_factor(total_dhc_minted, collateral_value_usd))
    }

    pub fn get_account_information(&self, user: Address) -> AccountInformation {
        self.settle(self.account_information(user))
    }

    pub fn get_account_collateral_value(&self, user: Address) -> U256 {
        self.settle(self.account_collateral_value(user))
    }

    /// USD value (18 decimals) of `amount` of `token` at the current price
    pub fn get_usd_value(&self, token: Address, amount: U256) -> U256 {
        self.settle(self.usd_value(token, amount))
    }

    /// Amount of `token` worth `usd_amount` (18 decimals) at the current price
    pub fn get_token_amount_from_usd(&self, token: Address, usd_amount: U256) -> U256 {
        let result = self
            .price_of(token)
            .and_then(|price| solvency::token_amount_from_usd(price, usd_amount));
        self.settle(result)
    }

    pub fn get_collateral_balance_of_user(&self, user: Address, token: Address) -> U256 {
        self.collateral_balance(user, token)
    }

    pub fn get_dhc_minted(&self, user: Address) -> U256 {
        self.dhc_minted.get(&user).unwrap_or(U256::zero())
    }

    pub fn get_collateral_tokens(&self) -> Vec<Address> {
        self.collateral_tokens.get_or_default()
    }

    pub fn get_collateral_token_price_feed(&self, token: Address) -> Option<Address> {
        self.price_feeds.get(&token)
    }

    pub fn get_dhc(&self) -> Option<Address> {
        self.dhc.get()
    }

    pub fn get_precision(&self) -> U256 {
        U256::from(PRECISION)
    }

    pub fn get_additional_feed_precision(&self) -> U256 {
        U256::from(ADDITIONAL_FEED_PRECISION)
    }

    pub fn get_liquidation_threshold(&self) -> u64 {
        LIQUIDATION_THRESHOLD
    }

    pub fn get_liquidation_bonus(&self) -> u64 {
        LIQUIDATION_BONUS
    }

    pub fn get_liquidation_precision(&self) -> u64 {
        LIQUIDATION_PRECISION
    }

    pub fn get_min_health_factor(&self) -> U256 {
        U256::from(MIN_HEALTH_FACTOR)
    }
}

impl DhcEngine {
    // ========== Guards ==========

    /// Runs one transition under the re-entrancy lock and reverts the whole
    /// deploy on failure. A revert also discards the lock write.
    fn non_reentrant<T>(&mut self, transition: impl FnOnce(&mut Self) -> EngineResult<T>) -> T {
        if self.locked.get().unwrap_or(false) {
            self.env().revert(DhcError::ReentrantCall);
        }
        self.locked.set(true);
        let outcome = transition(self);
        self.locked.set(false);
        self.settle(outcome)
    }

    fn settle<T>(&self, result: EngineResult<T>) -> T {
        match result {
            Ok(value) => value,
            Err(error) => self.env().revert(error),
        }
    }

    fn more_than_zero(amount: U256) -> EngineResult<()> {
        if amount.is_zero() {
            return Err(DhcError::NeedsMoreThanZero.into());
        }
        Ok(())
    }

    fn require_allowed_token(&self, token: Address) -> EngineResult<()> {
        if self.price_feeds.get(&token).is_none() {
            return Err(DhcError::NotAllowedToken.into());
        }
        Ok(())
    }

    // ========== Ledger Transitions ==========

    fn deposit_collateral_internal(&mut self, user: Address, token: Address, amount: U256) -> EngineResult<()> {
        Self::more_than_zero(amount)?;
        self.require_allowed_token(token)?;

        let new_balance = self
            .collateral_balance(user, token)
            .checked_add(amount)
            .ok_or(EngineError::Rejected(DhcError::MathOverflow))?;
        self.collateral_deposited.set(&(user, token), new_balance);
        self.env().emit_event(CollateralDeposited { user, token, amount });

        let engine = self.env().self_address();
        if !self.token_transfer_from(token, user, engine, amount) {
            return Err(DhcError::TransferFailed.into());
        }
        Ok(())
    }

    /// Moves `amount` of `from`'s collateral out to `to`. Only liquidation
    /// passes `from != to`.
    fn redeem_collateral_internal(
        &mut self,
        token: Address,
        amount: U256,
        from: Address,
        to: Address,
    ) -> EngineResult<()> {
        let balance = self.collateral_balance(from, token);
        if balance < amount {
            return Err(DhcError::InsufficientCollateral.into());
        }
        self.collateral_deposited.set(&(from, token), balance - amount);
        self.env().emit_event(CollateralRedeemed { from, to, token, amount });

        if !self.token_transfer(token, to, amount) {
            return Err(DhcError::TransferFailed.into());
        }
        Ok(())
    }

    /// Debt goes up first; the health check then sees the post-mint state.
    fn mint_dhc_internal(&mut self, user: Address, amount: U256) -> EngineResult<()> {
        Self::more_than_zero(amount)?;

        let new_debt = self
            .get_dhc_minted(user)
            .checked_add(amount)
            .ok_or(EngineError::Rejected(DhcError::MathOverflow))?;
        self.dhc_minted.set(&user, new_debt);
        self.revert_if_health_factor_is_broken(user)?;

        self.env().emit_event(DhcMinted { user, amount });
        if !self.dhc_mint(user, amount)? {
            return Err(DhcError::MintFailed.into());
        }
        Ok(())
    }

    /// Clears `amount` of `on_behalf_of`'s debt with DHC pulled from `payer`.
    /// Only liquidation passes `on_behalf_of != payer`.
    fn burn_dhc_internal(&mut self, amount: U256, on_behalf_of: Address, payer: Address) -> EngineResult<()> {
        let debt = self.get_dhc_minted(on_behalf_of);
        if debt < amount {
            return Err(DhcError::BurnAmountExceedsMinted.into());
        }
        self.dhc_minted.set(&on_behalf_of, debt - amount);

        let dhc = self.dhc_address()?;
        let engine = self.env().self_address();
        if !self.token_transfer_from(dhc, payer, engine, amount) {
            return Err(DhcError::TransferFailed.into());
        }
        self.dhc_burn(dhc, amount);

        self.env().emit_event(DhcBurned {
            on_behalf_of,
            payer,
            amount,
        });
        Ok(())
    }

    fn liquidate_internal(&mut self, token: Address, user: Address, debt_to_cover: U256) -> EngineResult<LiquidationResult> {
        Self::more_than_zero(debt_to_cover)?;
        self.require_allowed_token(token)?;

        let liquidator = self.env().caller();
        if liquidator == user {
            return Err(DhcError::CannotLiquidateYourself.into());
        }

        let starting_health_factor = self.health_factor_of(user)?;
        if starting_health_factor >= U256::from(MIN_HEALTH_FACTOR) {
            return Err(DhcError::HealthFactorOk.into());
        }

        let price = self.price_of(token)?;
        let collateral_for_debt = solvency::token_amount_from_usd(price, debt_to_cover)?;
        let bonus_collateral = solvency::liquidation_bonus(collateral_for_debt)?;
        let total_collateral = collateral_for_debt
            .checked_add(bonus_collateral)
            .ok_or(EngineError::Rejected(DhcError::MathOverflow))?;

        self.redeem_collateral_internal(token, total_collateral, user, liquidator)?;
        self.burn_dhc_internal(debt_to_cover, user, liquidator)?;

        let ending_health_factor = self.health_factor_of(user)?;
        if ending_health_factor <= starting_health_factor {
            return Err(DhcError::HealthFactorNotImproved.into());
        }
        self.revert_if_health_factor_is_broken(liquidator)?;

        self.env().emit_event(Liquidated {
            liquidator,
            user,
            token,
            debt_covered: debt_to_cover,
            collateral_seized: total_collateral,
        });

        Ok(LiquidationResult {
            collateral_for_debt,
            bonus_collateral,
            starting_health_factor,
            ending_health_factor,
        })
    }

    // ========== Valuation ==========

    fn collateral_balance(&self, user: Address, token: Address) -> U256 {
        self.collateral_deposited.get(&(user, token)).unwrap_or(U256::zero())
    }

    fn price_of(&self, token: Address) -> EngineResult<U256> {
        let feed = self
            .price_feeds
            .get(&token)
            .ok_or(EngineError::Rejected(DhcError::NotAllowedToken))?;
        OracleLib::price(&self.env(), feed)
    }

    fn usd_value(&self, token: Address, amount: U256) -> EngineResult<U256> {
        let price = self.price_of(token)?;
        solvency::usd_value(price, amount)
    }

    /// Sum over the registry. Empty balances contribute zero without a
    /// price read, so unlike a plain sum over every registered token, a stale
    /// feed only freezes accounts that actually hold that token.
    fn account_collateral_value(&self, user: Address) -> EngineResult<U256> {
        let mut total = U256::zero();
        for token in self.collateral_tokens.get_or_default() {
            let amount = self.collateral_balance(user, token);
            if amount.is_zero() {
                continue;
            }
            total = solvency::add_usd(total, self.usd_value(token, amount)?)?;
        }
        Ok(total)
    }

    fn account_information(&self, user: Address) -> EngineResult<AccountInformation> {
        Ok(AccountInformation {
            total_dhc_minted: self.get_dhc_minted(user),
            collateral_value_usd: self.account_collateral_value(user)?,
        })
    }

    fn health_factor_of(&self, user: Address) -> EngineResult<U256> {
        let info = self.account_information(user)?;
        solvency::health_factor(info.total_dhc_minted, info.collateral_value_usd)
    }

    fn revert_if_health_factor_is_broken(&self, user: Address) -> EngineResult<()> {
        solvency::check_health_factor(self.health_factor_of(user)?)
    }

    // ========== Token Calls ==========

    fn dhc_address(&self) -> EngineResult<Address> {
        self.dhc
            .get()
            .ok_or(EngineError::Rejected(DhcError::DhcNotConfigured))
    }

    fn token_transfer(&self, token: Address, recipient: Address, amount: U256) -> bool {
        let args = runtime_args! {
            "recipient" => recipient,
            "amount" => amount
        };
        let call_def = CallDef::new("transfer", true, args);
        self.env().call_contract(token, call_def)
    }

    fn token_transfer_from(&self, token: Address, owner: Address, recipient: Address, amount: U256) -> bool {
        let args = runtime_args! {
            "owner" => owner,
            "recipient" => recipient,
            "amount" => amount
        };
        let call_def = CallDef::new("transfer_from", true, args);
        self.env().call_contract(token, call_def)
    }

    fn dhc_mint(&self, to: Address, amount: U256) -> EngineResult<bool> {
        let dhc = self.dhc_address()?;
        let args = runtime_args! {
            "to" => to,
            "amount" => amount
        };
        let call_def = CallDef::new("mint", true, args);
        Ok(self.env().call_contract(dhc, call_def))
    }

    fn dhc_burn(&self, dhc: Address, amount: U256) {
        let args = runtime_args! {
            "amount" => amount
        };
        let call_def = CallDef::new("burn", true, args);
        self.env().call_contract::<()>(dhc, call_def);
    }
}
