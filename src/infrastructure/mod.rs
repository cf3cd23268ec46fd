pub mod identity;
pub mod transports;
