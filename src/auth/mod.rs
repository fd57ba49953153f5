//! Request authentication for the seller API.

pub mod cea;

pub use cea::{CeaSigner, CeaSigningResult, CeaTimestamp, Credentials, SignedRequestHeaders};
