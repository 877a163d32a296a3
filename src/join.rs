//! Join-accept frame handling
//!
//! A join-accept does not carry the LoRaWAN version of the server that built
//! it. The OptNeg flag that announces 1.1.x sits in the DLSettings field,
//! inside the encrypted portion of the frame, so the version only becomes
//! readable after a successful decryption. This module holds the frame
//! layout constants and the MIC header builders for both schemes.

use crate::config::identity::{EUI64, SE_EUI_SIZE};
use crate::engine::LorawanVersion;

/// MHDR value of a join-accept frame
pub const JOIN_ACCEPT_MHDR: u8 = 0x20;

/// Smallest join-accept frame (MHDR, payload and MIC)
pub const JOIN_ACCEPT_FRAME_MIN_SIZE: usize = 17;

/// Largest join-accept frame (optional CFList included)
pub const JOIN_ACCEPT_FRAME_MAX_SIZE: usize = 33;

/// Size of the 1.1.x MIC header
/// (JoinReqType, JoinEUI, DevNonce and MHDR)
pub const JOIN_ACCEPT_MIC_COMPUTATION_OFFSET: usize = 12;

/// Offset of the DLSettings field within the full frame
pub const DL_SETTINGS_OFFSET: usize = 11;

/// OptNeg flag inside DLSettings, set by 1.1.x servers
const DL_SETTINGS_OPT_NEG: u8 = 0x80;

/// Join-request variants a join-accept answers
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum JoinReqType {
    /// Rejoin-request type 0
    RejoinReq0 = 0x00,
    /// Rejoin-request type 1
    RejoinReq1 = 0x01,
    /// Rejoin-request type 2
    RejoinReq2 = 0x02,
    /// Initial join-request
    JoinReq = 0xFF,
}

/// MIC header of the 1.0.x scheme: the bare MHDR
pub fn mic_header_10() -> [u8; 1] {
    [JOIN_ACCEPT_MHDR]
}

/// MIC header of the 1.1.x scheme
///
/// JoinReqType, JoinEUI byte-reversed, DevNonce little endian, MHDR.
pub fn mic_header_11(
    join_req_type: JoinReqType,
    join_eui: &EUI64,
    dev_nonce: u16,
) -> [u8; JOIN_ACCEPT_MIC_COMPUTATION_OFFSET] {
    let mut header = [0u8; JOIN_ACCEPT_MIC_COMPUTATION_OFFSET];
    header[0] = join_req_type as u8;
    for (dst, src) in header[1..1 + SE_EUI_SIZE].iter_mut().zip(join_eui.iter().rev()) {
        *dst = *src;
    }
    header[9..11].copy_from_slice(&dev_nonce.to_le_bytes());
    header[11] = JOIN_ACCEPT_MHDR;
    header
}

/// Minor version a decrypted join-accept reports in its DLSettings field
///
/// A frame too short to carry a DLSettings field reports 1.0.x, since it
/// cannot announce OptNeg.
pub fn reported_version(dec_join_accept: &[u8]) -> LorawanVersion {
    match dec_join_accept.get(DL_SETTINGS_OFFSET) {
        Some(dl_settings) if dl_settings & DL_SETTINGS_OPT_NEG != 0 => LorawanVersion::V1_1,
        _ => LorawanVersion::V1_0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mic_header_layout() {
        let join_eui = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        let header = mic_header_11(JoinReqType::JoinReq, &join_eui, 0xA1B2);

        assert_eq!(header[0], 0xFF);
        assert_eq!(
            &header[1..9],
            &[0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]
        );
        assert_eq!(&header[9..11], &[0xB2, 0xA1]);
        assert_eq!(header[11], JOIN_ACCEPT_MHDR);

        assert_eq!(mic_header_10(), [JOIN_ACCEPT_MHDR]);
    }

    #[test]
    fn test_reported_version_reads_opt_neg() {
        let mut frame = [0u8; JOIN_ACCEPT_FRAME_MIN_SIZE];
        assert_eq!(reported_version(&frame), LorawanVersion::V1_0);

        frame[DL_SETTINGS_OFFSET] = 0x80;
        assert_eq!(reported_version(&frame), LorawanVersion::V1_1);

        // Other DLSettings bits (RX1DRoffset, RX2 data rate) are ignored
        frame[DL_SETTINGS_OFFSET] = 0x7F;
        assert_eq!(reported_version(&frame), LorawanVersion::V1_0);
    }

    #[test]
    fn test_reported_version_short_frame_is_legacy() {
        assert_eq!(reported_version(&[]), LorawanVersion::V1_0);
        assert_eq!(
            reported_version(&[0u8; DL_SETTINGS_OFFSET]),
            LorawanVersion::V1_0
        );
    }
}
