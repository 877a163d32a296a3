//! Secure element interface
//!
//! [`SecureElement`] is the single entry point the LoRaWAN stack talks to.
//! It owns the crypto engine and the identity record, translates key roles
//! to keychain slots, and drives the join-accept version trials. Raw key
//! material for the protected slots never passes through this module; only
//! engine commands do.

use heapless::Vec;

use crate::config::identity::{EUI64, IdentityConfig, SeIdentity, SePin, SE_NVM_CTX_SIZE};
use crate::engine::{CryptoEngine, LorawanVersion, Mic, SeHal};
use crate::join::{self, JoinReqType, JOIN_ACCEPT_FRAME_MAX_SIZE, JOIN_ACCEPT_FRAME_MIN_SIZE};
use crate::keys::{AESKey, KeyIdentifier};

/// Size of the MIC B0/B1 block prepended to MIC computations
pub const MIC_BLOCK_BX_SIZE: usize = 16;

/// Largest message accepted by the crypto operations
pub const CRYPTO_MAXMESSAGE_SIZE: usize = 256;

/// Scratch capacity for crypto operations (message plus one MIC block)
pub const CRYPTO_BUFFER_SIZE: usize = CRYPTO_MAXMESSAGE_SIZE + MIC_BLOCK_BX_SIZE;

/// Secure element operation error
#[derive(Debug)]
pub enum SecureElementError<E> {
    /// The crypto engine rejected or failed a command
    Engine(E),
    /// An input or output exceeds a fixed buffer capacity
    BufferSize,
    /// The key was applied but persisting the engine key store failed
    Persistence(E),
}

/// Trial progress while disambiguating the join-accept protocol version
enum JoinAcceptState<E> {
    /// Attempting the 1.0.x scheme
    TryingLegacy,
    /// Attempting the 1.1.x scheme after an inconclusive 1.0.x trial
    #[cfg(feature = "lorawan-1-1")]
    TryingCurrent,
    /// Terminal: the consistent version, or the last trial's failure
    Resolved(Result<LorawanVersion, SecureElementError<E>>),
}

fn dummy_cb() {}

/// Secure element adapter between a LoRaWAN stack and a crypto coprocessor
///
/// `ctx_changed` runs after every mutation of the identity record so the
/// caller can persist [`SecureElement::get_nvm_ctx`].
pub struct SecureElement<E: CryptoEngine, H: SeHal, F: FnMut() = fn()> {
    /// Crypto coprocessor driver
    engine: E,
    /// Host services (unique id, random source)
    hal: H,
    /// Identity record backing the NVM context
    identity: SeIdentity,
    /// Read identity back from the coprocessor at init
    pre_provisioned: bool,
    /// Keep the configured DevEUI instead of deriving it at init
    static_dev_eui: bool,
    /// Identity change listener
    ctx_changed: F,
}

impl<E: CryptoEngine, H: SeHal> SecureElement<E, H> {
    /// Creates a secure element with no change listener
    pub fn new(engine: E, hal: H, config: IdentityConfig) -> Self {
        Self::with_listener(engine, hal, config, dummy_cb as fn())
    }
}

impl<E: CryptoEngine, H: SeHal, F: FnMut()> SecureElement<E, H, F> {
    /// Creates a secure element with an identity change listener
    pub fn with_listener(engine: E, hal: H, config: IdentityConfig, ctx_changed: F) -> Self {
        Self {
            engine,
            hal,
            identity: SeIdentity {
                dev_eui: config.dev_eui,
                join_eui: config.join_eui,
                pin: config.pin,
            },
            pre_provisioned: config.pre_provisioned,
            static_dev_eui: config.static_dev_eui,
            ctx_changed,
        }
    }

    /// Restores the engine crypto state and provisions the identity record
    ///
    /// Pre-provisioned parts have their DevEUI, JoinEUI and PIN read back
    /// from the coprocessor; a failed read keeps the configured default for
    /// that field. Otherwise the DevEUI is derived from the MCU unique id
    /// unless the configuration pinned it. The change listener runs exactly
    /// once so the caller can persist the initialized record, and the
    /// engine's restore status is returned.
    pub fn init(&mut self) -> Result<(), SecureElementError<E::Error>> {
        let restored = self.engine.restore_from_flash();

        if self.pre_provisioned {
            if let Ok(dev_eui) = self.engine.read_unique_id() {
                self.identity.dev_eui = dev_eui;
            }
            if let Ok(join_eui) = self.engine.read_join_eui() {
                self.identity.join_eui = join_eui;
            }
            if let Ok(pin) = self.engine.read_pin() {
                self.identity.pin = pin;
            }
        } else if !self.static_dev_eui {
            self.identity.dev_eui = self.hal.get_unique_id();
        }

        (self.ctx_changed)();

        restored.map_err(SecureElementError::Engine)
    }

    /// Restores the engine crypto state, then adopts the identity record
    /// from a serialized image
    ///
    /// The record is adopted unconditionally; the returned status is the
    /// engine's restore status.
    pub fn restore_nvm_ctx(
        &mut self,
        ctx: &[u8; SE_NVM_CTX_SIZE],
    ) -> Result<(), SecureElementError<E::Error>> {
        let restored = self.engine.restore_from_flash();
        self.identity = SeIdentity::from_bytes(ctx);
        restored.map_err(SecureElementError::Engine)
    }

    /// Serialized identity record for the caller to persist
    pub fn get_nvm_ctx(&self) -> [u8; SE_NVM_CTX_SIZE] {
        self.identity.to_bytes()
    }

    /// Stores key material for `key_id` and persists the engine key store
    ///
    /// Multicast group keys arrive encrypted under the multicast
    /// key-encryption key and are unwrapped inside the engine; every other
    /// key is written as delivered.
    pub fn set_key(
        &mut self,
        key_id: KeyIdentifier,
        key: &AESKey,
    ) -> Result<(), SecureElementError<E::Error>> {
        match key_id {
            KeyIdentifier::McKey0
            | KeyIdentifier::McKey1
            | KeyIdentifier::McKey2
            | KeyIdentifier::McKey3 => self
                .engine
                .derive_and_store_key(KeyIdentifier::McKeKey.key_slot(), key_id.key_slot(), key)
                .map_err(SecureElementError::Engine)?,
            _ => self
                .engine
                .set_key(key_id.key_slot(), key)
                .map_err(SecureElementError::Engine)?,
        }

        self.engine
            .store_to_flash()
            .map_err(SecureElementError::Persistence)
    }

    /// Computes an AES-CMAC over `buffer`, truncated to a MIC
    ///
    /// When `mic_bx_buffer` is given the CMAC covers the B0/B1 block
    /// followed by `buffer`, as uplink and downlink MICs require.
    pub fn compute_aes_cmac(
        &mut self,
        mic_bx_buffer: Option<&[u8; MIC_BLOCK_BX_SIZE]>,
        buffer: &[u8],
        key_id: KeyIdentifier,
    ) -> Result<Mic, SecureElementError<E::Error>> {
        match mic_bx_buffer {
            Some(mic_bx) => {
                let mut scratch: Vec<u8, CRYPTO_BUFFER_SIZE> = Vec::new();
                scratch
                    .extend_from_slice(mic_bx)
                    .map_err(|_| SecureElementError::BufferSize)?;
                scratch
                    .extend_from_slice(buffer)
                    .map_err(|_| SecureElementError::BufferSize)?;

                self.engine
                    .compute_aes_cmac(key_id.key_slot(), &scratch)
                    .map_err(SecureElementError::Engine)
            }
            None => self
                .engine
                .compute_aes_cmac(key_id.key_slot(), buffer)
                .map_err(SecureElementError::Engine),
        }
    }

    /// Checks an AES-CMAC over `buffer` against `expected_cmac`
    pub fn verify_aes_cmac(
        &mut self,
        buffer: &[u8],
        expected_cmac: &Mic,
        key_id: KeyIdentifier,
    ) -> Result<(), SecureElementError<E::Error>> {
        self.engine
            .verify_aes_cmac(key_id.key_slot(), buffer, expected_cmac)
            .map_err(SecureElementError::Engine)
    }

    /// AES-encrypts `buffer` with the key behind `key_id` into `enc_buffer`
    pub fn aes_encrypt(
        &mut self,
        buffer: &[u8],
        key_id: KeyIdentifier,
        enc_buffer: &mut [u8],
    ) -> Result<(), SecureElementError<E::Error>> {
        if enc_buffer.len() < buffer.len() {
            return Err(SecureElementError::BufferSize);
        }

        self.engine
            .aes_encrypt(key_id.key_slot(), buffer, &mut enc_buffer[..buffer.len()])
            .map_err(SecureElementError::Engine)
    }

    /// Derives a key from `root_key_id` with `input` and stores the result
    /// under `target_key_id`, persisting the engine key store
    ///
    /// `version` is accepted for interface compatibility; derivation inside
    /// the engine does not depend on it.
    pub fn derive_and_store_key(
        &mut self,
        _version: LorawanVersion,
        input: &AESKey,
        root_key_id: KeyIdentifier,
        target_key_id: KeyIdentifier,
    ) -> Result<(), SecureElementError<E::Error>> {
        self.engine
            .derive_and_store_key(root_key_id.key_slot(), target_key_id.key_slot(), input)
            .map_err(SecureElementError::Engine)?;

        self.engine
            .store_to_flash()
            .map_err(SecureElementError::Persistence)
    }

    /// Decrypts a join-accept and reports which LoRaWAN version built it
    ///
    /// The frame carries no version marker, so the element first tries the
    /// 1.0.x scheme. If that trial fails or the decrypted DLSettings field
    /// announces 1.1.x, the 1.1.x scheme is tried with its longer MIC
    /// header. The MHDR is copied to `dec_join_accept` unencrypted; the
    /// rest of the output is the engine's decryption from the last trial.
    pub fn process_join_accept(
        &mut self,
        join_req_type: JoinReqType,
        join_eui: &EUI64,
        dev_nonce: u16,
        enc_join_accept: &[u8],
        dec_join_accept: &mut [u8],
    ) -> Result<LorawanVersion, SecureElementError<E::Error>> {
        if enc_join_accept.len() < JOIN_ACCEPT_FRAME_MIN_SIZE
            || enc_join_accept.len() > JOIN_ACCEPT_FRAME_MAX_SIZE
            || dec_join_accept.len() < enc_join_accept.len()
        {
            return Err(SecureElementError::BufferSize);
        }

        #[cfg(not(feature = "lorawan-1-1"))]
        let _ = (join_eui, dev_nonce);

        // Rejoin-accepts are encrypted under the join server encryption key
        let enc_key = if join_req_type == JoinReqType::JoinReq {
            KeyIdentifier::NwkKey
        } else {
            KeyIdentifier::JSEncKey
        };

        // The MHDR stays in clear; only the bytes after it reach the engine
        dec_join_accept[0] = enc_join_accept[0];

        let mut state = JoinAcceptState::TryingLegacy;
        loop {
            state = match state {
                JoinAcceptState::TryingLegacy => {
                    let mic_header = join::mic_header_10();
                    match self.try_join_accept(
                        enc_key,
                        KeyIdentifier::NwkKey,
                        LorawanVersion::V1_0,
                        &mic_header,
                        enc_join_accept,
                        dec_join_accept,
                    ) {
                        Ok(LorawanVersion::V1_0) => {
                            JoinAcceptState::Resolved(Ok(LorawanVersion::V1_0))
                        }
                        #[cfg(feature = "lorawan-1-1")]
                        _ => JoinAcceptState::TryingCurrent,
                        #[cfg(not(feature = "lorawan-1-1"))]
                        other => JoinAcceptState::Resolved(other),
                    }
                }
                #[cfg(feature = "lorawan-1-1")]
                JoinAcceptState::TryingCurrent => {
                    let mic_header = join::mic_header_11(join_req_type, join_eui, dev_nonce);
                    match self.try_join_accept(
                        enc_key,
                        KeyIdentifier::JSIntKey,
                        LorawanVersion::V1_1,
                        &mic_header,
                        enc_join_accept,
                        dec_join_accept,
                    ) {
                        Ok(LorawanVersion::V1_1) => {
                            JoinAcceptState::Resolved(Ok(LorawanVersion::V1_1))
                        }
                        other => JoinAcceptState::Resolved(other),
                    }
                }
                JoinAcceptState::Resolved(outcome) => return outcome,
            };
        }
    }

    /// One decryption trial under one scheme; reports the version the
    /// decrypted frame claims for itself
    fn try_join_accept(
        &mut self,
        enc_key: KeyIdentifier,
        mic_key: KeyIdentifier,
        version: LorawanVersion,
        mic_header: &[u8],
        enc_join_accept: &[u8],
        dec_join_accept: &mut [u8],
    ) -> Result<LorawanVersion, SecureElementError<E::Error>> {
        self.engine
            .process_join_accept(
                enc_key.key_slot(),
                mic_key.key_slot(),
                version,
                mic_header,
                &enc_join_accept[1..],
                &mut dec_join_accept[1..enc_join_accept.len()],
            )
            .map_err(SecureElementError::Engine)?;

        Ok(join::reported_version(dec_join_accept))
    }

    /// Reads one value from the hardware random source
    pub fn random_number(&mut self) -> u32 {
        self.hal.get_random_number()
    }

    /// DevEUI held in the identity record
    pub fn get_dev_eui(&self) -> &EUI64 {
        &self.identity.dev_eui
    }

    /// Overwrites the DevEUI and notifies the change listener
    pub fn set_dev_eui(&mut self, dev_eui: EUI64) {
        self.identity.dev_eui = dev_eui;
        (self.ctx_changed)();
    }

    /// JoinEUI held in the identity record
    pub fn get_join_eui(&self) -> &EUI64 {
        &self.identity.join_eui
    }

    /// Overwrites the JoinEUI and notifies the change listener
    pub fn set_join_eui(&mut self, join_eui: EUI64) {
        self.identity.join_eui = join_eui;
        (self.ctx_changed)();
    }

    /// PIN held in the identity record
    pub fn get_pin(&self) -> &SePin {
        &self.identity.pin
    }

    /// Overwrites the PIN and notifies the change listener
    pub fn set_pin(&mut self, pin: SePin) {
        self.identity.pin = pin;
        (self.ctx_changed)();
    }

    /// Crypto engine handle
    pub fn get_engine(&self) -> &E {
        &self.engine
    }
}
