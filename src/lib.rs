//! LoRaWAN secure element adapter
//!
//! This crate connects a LoRaWAN stack to a dedicated crypto coprocessor.
//! Key material for the protected key slots never crosses the MCU: the stack
//! addresses keys by role, this crate translates each role to a keychain slot
//! and forwards the cryptographic work to the coprocessor driver.
//!
//! # Features
//! - Key storage and derivation on the coprocessor keychain
//! - AES-CMAC computation and verification, AES encryption
//! - Device identity record (DevEUI, JoinEUI, PIN) with change notification
//!   so the caller can persist it
//! - Join-accept decryption for both LoRaWAN 1.0.x and 1.1.x servers, with
//!   automatic protocol version disambiguation
//! - No unsafe code
//!
//! # Example
//! ```ignore
//! use lorawan_se::{
//!     config::identity::IdentityConfig,
//!     element::SecureElement,
//!     join::JoinReqType,
//!     keys::KeyIdentifier,
//! };
//!
//! // Engine and HAL implementations come from the board support crate
//! let mut se = SecureElement::with_listener(engine, hal, IdentityConfig::default(), || {
//!     // schedule a persist of the exported identity record
//! });
//! se.init()?;
//!
//! // MIC over an uplink frame
//! let mic = se.compute_aes_cmac(Some(&b0), &frame, KeyIdentifier::FNwkSIntKey)?;
//!
//! // Decrypt a join-accept, learning which LoRaWAN version the server speaks
//! let mut dec_join_accept = [0u8; 33];
//! let version = se.process_join_accept(
//!     JoinReqType::JoinReq,
//!     &join_eui,
//!     dev_nonce,
//!     &enc_join_accept,
//!     &mut dec_join_accept,
//! )?;
//! ```

#![warn(missing_docs)]
#![no_std]

/// Identity and provisioning configuration
pub mod config;

/// Secure element interface
pub mod element;

/// Crypto coprocessor abstraction
pub mod engine;

/// Join-accept frame handling
pub mod join;

/// Logical key identifiers
pub mod keys;
