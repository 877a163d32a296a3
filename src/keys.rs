//! Logical key identifiers
//!
//! The LoRaWAN stack addresses keys by their protocol role. The coprocessor
//! addresses its keychain by slot index. This module holds the role
//! vocabulary and its translation to keychain slots.

use crate::engine::KeySlot;

/// AES-128 key size in bytes
pub const KEY_SIZE: usize = 16;

/// AES-128 key (16 bytes)
pub type AESKey = [u8; KEY_SIZE];

/// Key roles known to the LoRaWAN stack
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyIdentifier {
    /// Application root key
    AppKey,
    /// Network root key
    NwkKey,
    /// Join session integrity key
    JSIntKey,
    /// Join session encryption key
    JSEncKey,
    /// Forwarding network session integrity key
    FNwkSIntKey,
    /// Serving network session integrity key
    SNwkSIntKey,
    /// Network session encryption key
    NwkSEncKey,
    /// Application session key
    AppSKey,
    /// Multicast root key
    McRootKey,
    /// Multicast key-encryption key
    McKeKey,
    /// Multicast group key 0, delivered encrypted under the
    /// key-encryption key
    McKey0,
    /// Multicast group key 1, delivered encrypted under the
    /// key-encryption key
    McKey1,
    /// Multicast group key 2, delivered encrypted under the
    /// key-encryption key
    McKey2,
    /// Multicast group key 3, delivered encrypted under the
    /// key-encryption key
    McKey3,
    /// Multicast application session key for group 0
    McAppSKey0,
    /// Multicast application session key for group 1
    McAppSKey1,
    /// Multicast application session key for group 2
    McAppSKey2,
    /// Multicast application session key for group 3
    McAppSKey3,
    /// Multicast network session key for group 0
    McNwkSKey0,
    /// Multicast network session key for group 1
    McNwkSKey1,
    /// Multicast network session key for group 2
    McNwkSKey2,
    /// Multicast network session key for group 3
    McNwkSKey3,
    /// All-zero key used when randomizing unused slots
    SlotRandZeroKey,
    /// Placeholder when no key applies
    NoKey,
}

impl KeyIdentifier {
    /// Keychain slot backing this identifier
    ///
    /// Total over the enum; identifiers without a dedicated slot map to the
    /// second general purpose slot.
    pub fn key_slot(self) -> KeySlot {
        match self {
            KeyIdentifier::AppKey => KeySlot::AppKey,
            KeyIdentifier::NwkKey => KeySlot::NwkKey,
            KeyIdentifier::JSIntKey => KeySlot::JSIntKey,
            KeyIdentifier::JSEncKey => KeySlot::JSEncKey,
            KeyIdentifier::FNwkSIntKey => KeySlot::FNwkSIntKey,
            KeyIdentifier::SNwkSIntKey => KeySlot::SNwkSIntKey,
            KeyIdentifier::NwkSEncKey => KeySlot::NwkSEncKey,
            KeyIdentifier::AppSKey => KeySlot::AppSKey,
            KeyIdentifier::McRootKey => KeySlot::GpKeKey5,
            KeyIdentifier::McKeKey => KeySlot::GpKeKey4,
            KeyIdentifier::McKey0 => KeySlot::GpKeKey0,
            KeyIdentifier::McKey1 => KeySlot::GpKeKey1,
            KeyIdentifier::McKey2 => KeySlot::GpKeKey2,
            KeyIdentifier::McKey3 => KeySlot::GpKeKey3,
            KeyIdentifier::McAppSKey0 => KeySlot::McAppSKey0,
            KeyIdentifier::McAppSKey1 => KeySlot::McAppSKey1,
            KeyIdentifier::McAppSKey2 => KeySlot::McAppSKey2,
            KeyIdentifier::McAppSKey3 => KeySlot::McAppSKey3,
            KeyIdentifier::McNwkSKey0 => KeySlot::McNwkSKey0,
            KeyIdentifier::McNwkSKey1 => KeySlot::McNwkSKey1,
            KeyIdentifier::McNwkSKey2 => KeySlot::McNwkSKey2,
            KeyIdentifier::McNwkSKey3 => KeySlot::McNwkSKey3,
            KeyIdentifier::SlotRandZeroKey => KeySlot::Gp0,
            KeyIdentifier::NoKey => KeySlot::Gp1,
        }
    }
}
