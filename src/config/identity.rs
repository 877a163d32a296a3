//! Device identity record and provisioning policy

/// Size of an EUI-64 field in bytes
pub const SE_EUI_SIZE: usize = 8;

/// Size of the secure element PIN in bytes
pub const SE_PIN_SIZE: usize = 4;

/// Size of the serialized identity record (DevEUI, JoinEUI, PIN)
pub const SE_NVM_CTX_SIZE: usize = 2 * SE_EUI_SIZE + SE_PIN_SIZE;

/// IEEE EUI-64 identifier (8 bytes, big endian)
pub type EUI64 = [u8; SE_EUI_SIZE];

/// Secure element PIN (4 bytes, big endian)
pub type SePin = [u8; SE_PIN_SIZE];

/// Identity defaults and provisioning policy for a secure element
///
/// `Default::default()` yields a zeroed identity whose DevEUI is derived
/// from the MCU unique id at init time.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityConfig {
    /// End-device EUI
    pub dev_eui: EUI64,
    /// Join server EUI
    pub join_eui: EUI64,
    /// Secure element PIN
    pub pin: SePin,
    /// Read DevEUI, JoinEUI and PIN back from the coprocessor at init
    pub pre_provisioned: bool,
    /// Keep the configured DevEUI instead of deriving it from the MCU
    /// unique id
    pub static_dev_eui: bool,
}

impl IdentityConfig {
    /// Creates a configuration with fixed identity values
    pub fn new(dev_eui: EUI64, join_eui: EUI64, pin: SePin) -> Self {
        Self {
            dev_eui,
            join_eui,
            pin,
            pre_provisioned: false,
            static_dev_eui: true,
        }
    }

    /// Creates a configuration for a pre-provisioned part
    ///
    /// The identity record is read from the coprocessor at init time.
    pub fn pre_provisioned() -> Self {
        Self {
            dev_eui: [0; SE_EUI_SIZE],
            join_eui: [0; SE_EUI_SIZE],
            pin: [0; SE_PIN_SIZE],
            pre_provisioned: true,
            static_dev_eui: true,
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            dev_eui: [0; SE_EUI_SIZE],
            join_eui: [0; SE_EUI_SIZE],
            pin: [0; SE_PIN_SIZE],
            pre_provisioned: false,
            static_dev_eui: false,
        }
    }
}

/// In-memory identity record held by the secure element
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SeIdentity {
    pub(crate) dev_eui: EUI64,
    pub(crate) join_eui: EUI64,
    pub(crate) pin: SePin,
}

impl SeIdentity {
    /// Serializes the record for the caller's NVM layer
    pub(crate) fn to_bytes(&self) -> [u8; SE_NVM_CTX_SIZE] {
        let mut bytes = [0u8; SE_NVM_CTX_SIZE];
        bytes[..SE_EUI_SIZE].copy_from_slice(&self.dev_eui);
        bytes[SE_EUI_SIZE..2 * SE_EUI_SIZE].copy_from_slice(&self.join_eui);
        bytes[2 * SE_EUI_SIZE..].copy_from_slice(&self.pin);
        bytes
    }

    /// Rebuilds the record from a serialized image
    pub(crate) fn from_bytes(bytes: &[u8; SE_NVM_CTX_SIZE]) -> Self {
        let mut identity = Self {
            dev_eui: [0; SE_EUI_SIZE],
            join_eui: [0; SE_EUI_SIZE],
            pin: [0; SE_PIN_SIZE],
        };
        identity.dev_eui.copy_from_slice(&bytes[..SE_EUI_SIZE]);
        identity
            .join_eui
            .copy_from_slice(&bytes[SE_EUI_SIZE..2 * SE_EUI_SIZE]);
        identity.pin.copy_from_slice(&bytes[2 * SE_EUI_SIZE..]);
        identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_record_round_trip() {
        let identity = SeIdentity {
            dev_eui: [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08],
            join_eui: [0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18],
            pin: [0x21, 0x22, 0x23, 0x24],
        };

        let bytes = identity.to_bytes();
        assert_eq!(&bytes[..SE_EUI_SIZE], &identity.dev_eui);
        assert_eq!(&bytes[SE_EUI_SIZE..2 * SE_EUI_SIZE], &identity.join_eui);
        assert_eq!(&bytes[2 * SE_EUI_SIZE..], &identity.pin);

        assert_eq!(SeIdentity::from_bytes(&bytes), identity);
    }

    #[test]
    fn test_config_provisioning_flags() {
        let fixed = IdentityConfig::new([0xAA; 8], [0xBB; 8], [0xCC; 4]);
        assert!(!fixed.pre_provisioned);
        assert!(fixed.static_dev_eui);

        let provisioned = IdentityConfig::pre_provisioned();
        assert!(provisioned.pre_provisioned);

        let derived = IdentityConfig::default();
        assert!(!derived.pre_provisioned);
        assert!(!derived.static_dev_eui);
    }
}
