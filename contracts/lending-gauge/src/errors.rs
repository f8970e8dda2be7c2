use lending_math::MathError;
use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 200,
    NotInitialized = 201,
    CallerNotPoolAdmin = 202,
    InvalidPhasesLength = 203,
    PercentageNotMatch = 204,
    CallerMustBePool = 205,
    Overflow = 206,
    DivisionByZero = 207,
}

impl From<MathError> for Error {
    fn from(err: MathError) -> Self {
        match err {
            MathError::Overflow => Error::Overflow,
            MathError::DivisionByZero => Error::DivisionByZero,
        }
    }
}
