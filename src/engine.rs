//! Crypto coprocessor abstraction
//!
//! Every cryptographic operation of the secure element runs on a dedicated
//! coprocessor that holds an indexed keychain. This module defines:
//! - The keychain slot numbering shared with the coprocessor firmware
//! - The command interface a transport driver implements
//! - Host services (unique id, random source) the secure element consumes

use crate::config::identity::{EUI64, SePin};
use crate::keys::AESKey;

/// MIC size in bytes
pub const MIC_SIZE: usize = 4;

/// Message integrity code (4 bytes)
pub type Mic = [u8; MIC_SIZE];

/// LoRaWAN protocol minor version
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LorawanVersion {
    /// LoRaWAN 1.0.x
    V1_0 = 0x00,
    /// LoRaWAN 1.1.x
    V1_1 = 0x01,
}

impl LorawanVersion {
    /// Version tag as encoded in engine commands
    pub fn value(self) -> u8 {
        self as u8
    }

    /// MIC header length of this version's join-accept scheme
    pub fn header_length(self) -> usize {
        match self {
            LorawanVersion::V1_0 => 1,
            LorawanVersion::V1_1 => 12,
        }
    }
}

/// Key slots of the coprocessor keychain
///
/// The numbering is fixed by the coprocessor firmware; slots 6 through 11
/// are general purpose key-encryption slots and slots 26 and 27 hold plain
/// general purpose keys.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum KeySlot {
    /// Root key burned in at manufacturing
    MotherKey = 1,
    /// Network root key
    NwkKey = 2,
    /// Application root key
    AppKey = 3,
    /// Join server encryption key
    JSEncKey = 4,
    /// Join server integrity key
    JSIntKey = 5,
    /// General purpose key-encryption slot 0
    GpKeKey0 = 6,
    /// General purpose key-encryption slot 1
    GpKeKey1 = 7,
    /// General purpose key-encryption slot 2
    GpKeKey2 = 8,
    /// General purpose key-encryption slot 3
    GpKeKey3 = 9,
    /// General purpose key-encryption slot 4
    GpKeKey4 = 10,
    /// General purpose key-encryption slot 5
    GpKeKey5 = 11,
    /// Application session key
    AppSKey = 12,
    /// Forwarding network session integrity key
    FNwkSIntKey = 13,
    /// Serving network session integrity key
    SNwkSIntKey = 14,
    /// Network session encryption key
    NwkSEncKey = 15,
    /// Reserved slot 0
    Rfu0 = 16,
    /// Reserved slot 1
    Rfu1 = 17,
    /// Multicast application session key 0
    McAppSKey0 = 18,
    /// Multicast application session key 1
    McAppSKey1 = 19,
    /// Multicast application session key 2
    McAppSKey2 = 20,
    /// Multicast application session key 3
    McAppSKey3 = 21,
    /// Multicast network session key 0
    McNwkSKey0 = 22,
    /// Multicast network session key 1
    McNwkSKey1 = 23,
    /// Multicast network session key 2
    McNwkSKey2 = 24,
    /// Multicast network session key 3
    McNwkSKey3 = 25,
    /// General purpose slot 0
    Gp0 = 26,
    /// General purpose slot 1
    Gp1 = 27,
}

impl KeySlot {
    /// Slot index as encoded in engine commands
    pub fn value(self) -> u8 {
        self as u8
    }
}

/// Crypto coprocessor command interface
///
/// Implementations wrap the transport to the coprocessor (SPI command set,
/// software fallback for test rigs). Commands are synchronous; a command
/// either completes on the coprocessor or fails with the driver's error.
pub trait CryptoEngine {
    /// Transport or command error reported by the driver
    type Error;

    /// Restores the keychain and crypto state from coprocessor NVM
    fn restore_from_flash(&mut self) -> Result<(), Self::Error>;

    /// Persists the keychain and crypto state to coprocessor NVM
    fn store_to_flash(&mut self) -> Result<(), Self::Error>;

    /// Writes raw key material into a slot
    fn set_key(&mut self, slot: KeySlot, key: &AESKey) -> Result<(), Self::Error>;

    /// Derives a key from the slot `root` with the block `input` and stores
    /// the result in the slot `target`
    fn derive_and_store_key(
        &mut self,
        root: KeySlot,
        target: KeySlot,
        input: &AESKey,
    ) -> Result<(), Self::Error>;

    /// AES-CMAC over `data` with the key in `slot`, truncated to a MIC
    fn compute_aes_cmac(&mut self, slot: KeySlot, data: &[u8]) -> Result<Mic, Self::Error>;

    /// Checks an AES-CMAC over `data` against `expected`
    fn verify_aes_cmac(
        &mut self,
        slot: KeySlot,
        data: &[u8],
        expected: &Mic,
    ) -> Result<(), Self::Error>;

    /// AES-encrypts `data` with the key in `slot` into `enc_data`
    ///
    /// `data` is a whole number of 16 byte blocks and `enc_data` holds at
    /// least `data.len()` bytes.
    fn aes_encrypt(
        &mut self,
        slot: KeySlot,
        data: &[u8],
        enc_data: &mut [u8],
    ) -> Result<(), Self::Error>;

    /// Decrypts a join-accept body and checks its MIC in one command
    ///
    /// `enc_data` is the frame without its MHDR. The MIC is computed over
    /// `mic_header` followed by the decrypted body, using the key in
    /// `mic_slot`; `mic_header` matches `version.header_length()`.
    fn process_join_accept(
        &mut self,
        dec_slot: KeySlot,
        mic_slot: KeySlot,
        version: LorawanVersion,
        mic_header: &[u8],
        enc_data: &[u8],
        dec_data: &mut [u8],
    ) -> Result<(), Self::Error>;

    /// Reads the DevEUI provisioned into the coprocessor
    fn read_unique_id(&mut self) -> Result<EUI64, Self::Error>;

    /// Reads the JoinEUI provisioned into the coprocessor
    fn read_join_eui(&mut self) -> Result<EUI64, Self::Error>;

    /// Reads the PIN provisioned into the coprocessor
    fn read_pin(&mut self) -> Result<SePin, Self::Error>;
}

/// Host services consumed by the secure element
pub trait SeHal {
    /// MCU unique identifier, used to derive a DevEUI
    fn get_unique_id(&mut self) -> EUI64;

    /// One value from the hardware random source
    fn get_random_number(&mut self) -> u32;
}
