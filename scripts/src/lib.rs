//! Script for deploying a compiled smart contract from the default signer of
//! a configured network.

#![deny(missing_docs)]

pub mod artifacts;
pub mod cli;
pub mod commands;
pub mod constants;
pub mod environment;
pub mod errors;
pub mod provider;
pub mod types;
pub mod utils;
