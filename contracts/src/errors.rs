//! Engine error definitions.

use odra::prelude::*;
use odra::casper_types::U256;

/// DHC engine errors
#[repr(u16)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DhcError {
    // Validation errors (1xx)
    NeedsMoreThanZero = 100,
    NotAllowedToken = 101,
    TokenAddressesAndPriceFeedAddressesMustBeSameLength = 102,
    DuplicateCollateralToken = 103,
    DhcNotConfigured = 104,

    // Solvency errors (2xx)
    BreaksHealthFactor = 200,
    InsufficientCollateral = 201,
    BurnAmountExceedsMinted = 202,

    // Liquidation errors (3xx)
    HealthFactorOk = 300,
    HealthFactorNotImproved = 301,
    CannotLiquidateYourself = 302,

    // Oracle errors (4xx)
    StalePrice = 400,
    InvalidPrice = 401,

    // External call errors (5xx)
    TransferFailed = 500,
    MintFailed = 501,
    ReentrantCall = 502,

    // Math errors (6xx)
    MathOverflow = 600,

    // Token errors (7xx)
    NotOwner = 700,
    TokenAmountIsZero = 701,
    BurnAmountExceedsBalance = 702,
    InsufficientBalance = 703,
    InsufficientAllowance = 704,
}

impl DhcError {
    pub const fn message(&self) -> &'static str {
        match self {
            // Validation
            DhcError::NeedsMoreThanZero => "Amount must be more than zero",
            DhcError::NotAllowedToken => "Token is not an allowed collateral",
            DhcError::TokenAddressesAndPriceFeedAddressesMustBeSameLength => {
                "Token addresses and price feed addresses must be the same length"
            }
            DhcError::DuplicateCollateralToken => "Collateral token registered twice",
            DhcError::DhcNotConfigured => "DHC token address is not set",

            // Solvency
            DhcError::BreaksHealthFactor => "Health factor below minimum",
            DhcError::InsufficientCollateral => "Amount exceeds deposited collateral",
            DhcError::BurnAmountExceedsMinted => "Amount exceeds minted DHC",

            // Liquidation
            DhcError::HealthFactorOk => "Health factor is OK, nothing to liquidate",
            DhcError::HealthFactorNotImproved => "Liquidation did not improve health factor",
            DhcError::CannotLiquidateYourself => "Cannot liquidate your own position",

            // Oracle
            DhcError::StalePrice => "Oracle price stale",
            DhcError::InvalidPrice => "Oracle price is zero",

            // External calls
            DhcError::TransferFailed => "Token transfer failed",
            DhcError::MintFailed => "DHC mint failed",
            DhcError::ReentrantCall => "Re-entrant call rejected",

            // Math
            DhcError::MathOverflow => "Arithmetic overflow",

            // Token
            DhcError::NotOwner => "Caller is not the token owner",
            DhcError::TokenAmountIsZero => "Token amount must be more than zero",
            DhcError::BurnAmountExceedsBalance => "Burn amount exceeds balance",
            DhcError::InsufficientBalance => "Insufficient token balance",
            DhcError::InsufficientAllowance => "Insufficient allowance",
        }
    }
}

impl core::fmt::Display for DhcError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

impl From<DhcError> for OdraError {
    fn from(error: DhcError) -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            OdraError::user(error as u16)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            OdraError::user(error as u16, error.message())
        }
    }
}

/// Failure of an engine transition, with diagnostics where they exist.
///
/// The on-chain revert only carries the [`DhcError`] code; the payloads are
/// available to callers of the pure solvency functions and to host tests.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EngineError {
    /// Health factor of the checked account after the transition.
    BreaksHealthFactor(U256),
    Rejected(DhcError),
}

impl EngineError {
    /// On-chain error code for this failure.
    pub const fn code(&self) -> DhcError {
        match self {
            EngineError::BreaksHealthFactor(_) => DhcError::BreaksHealthFactor,
            EngineError::Rejected(error) => *error,
        }
    }
}

impl From<DhcError> for EngineError {
    fn from(error: DhcError) -> Self {
        EngineError::Rejected(error)
    }
}

impl From<EngineError> for OdraError {
    fn from(error: EngineError) -> Self {
        error.code().into()
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
