//! Identity and provisioning configuration
//!
//! This module contains the types a board integration uses to describe the
//! device identity held by the secure element. It includes:
//! - Default identity values (DevEUI, JoinEUI, PIN)
//! - Provisioning policy (pre-provisioned parts, derived DevEUI)
//! - The serialized identity record persisted by the caller

/// Identity record and provisioning policy
pub mod identity;

pub use identity::IdentityConfig;
