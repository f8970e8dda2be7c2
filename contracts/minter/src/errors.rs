use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 300,
    NotInitialized = 301,
    MintNotAllowed = 302,
    Overflow = 303,
    GaugeNotAdded = 304,
    CallerNotAdmin = 305,
}
