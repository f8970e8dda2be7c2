use lending_math::MathError;
use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 100,
    NotInitialized = 101,
    CallerMustBePool = 102,
    InvalidMintAmount = 103,
    InvalidBurnAmount = 104,
    NotEnoughBalance = 105,
    InsufficientAllowance = 106,
    InsufficientBorrowAllowance = 107,
    OperationNotSupported = 108,
    CallerMustBeLendingGauge = 109,
    Overflow = 110,
    DivisionByZero = 111,
}

impl From<MathError> for Error {
    fn from(err: MathError) -> Self {
        match err {
            MathError::Overflow => Error::Overflow,
            MathError::DivisionByZero => Error::DivisionByZero,
        }
    }
}
