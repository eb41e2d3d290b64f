//! NTC2-PRECONFIG: TPM configuration register reconciler
//!
//! A library for computing, validating and writing the vendor
//! configuration registers of NTC2-compatible TPMs.

pub mod config;
pub mod device;
pub mod reconcile;
pub mod register;
