pub mod account;
pub mod ports;
pub mod snapshot;
pub mod transaction;
