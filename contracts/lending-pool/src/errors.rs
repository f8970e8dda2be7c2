use lending_math::MathError;
use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    CallerNotPoolAdmin = 3,
    CallerNotRiskOrPoolAdmin = 4,
    ReserveAlreadyInitialized = 5,
    ReserveNotListed = 6,
    NoMoreReservesAllowed = 7,
    InvalidReserveParams = 8,
    InvalidAmount = 9,
    ReserveInactive = 10,
    ReservePaused = 11,
    ReserveFrozen = 12,
    SupplyCapExceeded = 13,
    BorrowCapExceeded = 14,
    NotEnoughAvailableUserBalance = 15,
    BorrowingNotEnabled = 16,
    StableBorrowingNotEnabled = 17,
    InvalidInterestRateModeSelected = 18,
    CollateralBalanceIsZero = 19,
    HealthFactorLowerThanLiquidationThreshold = 20,
    CollateralCannotCoverNewBorrow = 21,
    LtvValidationFailed = 22,
    CollateralSameAsBorrowingCurrency = 23,
    AmountBiggerThanMaxLoanSizeStable = 24,
    NoDebtOfSelectedType = 25,
    NoExplicitAmountToRepayOnBehalf = 26,
    UnderlyingBalanceZero = 27,
    UserInIsolationMode = 28,
    AssetNotBorrowableInIsolation = 29,
    DebtCeilingExceeded = 30,
    ReserveLiquidityNotZero = 31,
    HealthFactorNotBelowThreshold = 32,
    CollateralCannotBeLiquidated = 33,
    SpecifiedCurrencyNotBorrowedByUser = 34,
    FlashloanDisabled = 35,
    InconsistentFlashloanParams = 36,
    InvalidFlashloanExecutorReturn = 37,
    FlashLoanNotRepaid = 38,
    PriceNotAvailable = 39,
    InvalidPremium = 40,
    InvalidLiquidationPolicy = 41,
    InsufficientAllowance = 42,
    Overflow = 43,
    DivisionByZero = 44,
}

impl From<MathError> for Error {
    fn from(err: MathError) -> Self {
        match err {
            MathError::Overflow => Error::Overflow,
            MathError::DivisionByZero => Error::DivisionByZero,
        }
    }
}
