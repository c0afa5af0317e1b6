// libpafe-p2p/src/constants.rs
//! Common protocol constants used across the crate

/// Chip wire frame preamble: 0x00 0x00 0xFF
pub const FRAME_PREAMBLE: [u8; 3] = [0x00, 0x00, 0xFF];

/// Chip wire frame postamble: 0x00
pub const FRAME_POSTAMBLE: u8 = 0x00;

/// Minimal chip wire frame length in bytes
pub const MIN_FRAME_LEN: usize = 7;

/// Maximum payload length for normal information frames
pub const MAX_PAYLOAD_LEN: usize = 255;

/// ACK frame sent by the chip after each accepted command
pub const ACK_FRAME: [u8; 6] = [0x00, 0x00, 0xFF, 0x00, 0xFF, 0x00];

/// RC-S956 host->device prefix (D4) and device->host prefix (D5)
pub const CMD_PREFIX_HOST: u8 = 0xD4;
pub const CMD_PREFIX_DEVICE: u8 = 0xD5;

/// RC-S956 command codes (host -> device). Responses use `code + 1`.
pub mod cmd {
    pub const GET_GENERAL_STATUS: u8 = 0x04;
    pub const WRITE_REGISTER: u8 = 0x08;
    pub const SET_PARAMETERS: u8 = 0x12;
    pub const RESET: u8 = 0x18;
    pub const RF_CONFIGURATION: u8 = 0x32;
    pub const IN_DATA_EXCHANGE: u8 = 0x40;
    pub const IN_RELEASE: u8 = 0x52;
    pub const IN_JUMP_FOR_DEP: u8 = 0x56;
    pub const TG_GET_DATA: u8 = 0x86;
    pub const TG_INIT_AS_TARGET: u8 = 0x8C;
    pub const TG_SET_DATA: u8 = 0x8E;
    pub const TG_RESPONSE_TO_INITIATOR: u8 = 0x90;
    pub const TG_SET_GENERAL_BYTES: u8 = 0x92;
}

/// GetGeneralStatus response layout
pub const GGS_TXMODE: usize = 4;
pub const GGS_TXMODE_DEP: u8 = 0x03;
pub const GGS_TXMODE_FALP: u8 = 0x05;

/// SetParameters flags while waiting as a target. Automatic ATR_RES (bit 2)
/// stays cleared so that ATR_REQ general bytes can be checked before answering.
pub const SETPARAM_TARGET: u8 = 0x00;

/// RFConfiguration items
pub const RFCONFIG_FIELD: u8 = 0x01;
pub const RFCONFIG_TIMEOUTS: u8 = 0x02;
pub const RFCONFIG_RETRIES: u8 = 0x05;

/// FeliCa system code advertised while waiting as a target
pub const TARGET_SYSTEM_CODE: u16 = 0xFFFF;

/// Chip status byte returned on RF timeout
pub const CHIP_STATUS_TIMEOUT: u8 = 0x01;

/// CIU registers with 106k target-only settings
pub const REG_CIU_GSNON: u16 = 0x6316;
pub const REG_CIU_CWGSP: u16 = 0x6317;
pub const REG_CIU_MODGSP: u16 = 0x6318;
/// 106k target values for (GsNOn, CWGsP, ModGsP)
pub const REG_106K_TARGET: [(u16, u8); 3] = [
    (REG_CIU_GSNON, 0xFF),
    (REG_CIU_CWGSP, 0x3F),
    (REG_CIU_MODGSP, 0x11),
];
/// Chip defaults restored after a 106k target session
pub const REG_106K_DEFAULT: [(u16, u8); 3] = [
    (REG_CIU_GSNON, 0x88),
    (REG_CIU_CWGSP, 0x20),
    (REG_CIU_MODGSP, 0x20),
];

/// NFC-DEP frame bytes
pub mod dep {
    /// Request/response command byte 0 (CMD0)
    pub const CMD0_REQ: u8 = 0xD4;
    pub const CMD0_RES: u8 = 0xD5;
    /// CMD1 values
    pub const ATR_REQ: u8 = 0x00;
    pub const ATR_RES: u8 = 0x01;
    pub const RLS_REQ: u8 = 0x0A;
    pub const RLS_RES: u8 = 0x0B;
    /// PP/PPi: LR=254 bytes with general bytes present
    pub const PP_LLCP: u8 = 0x32;
    pub const NFCID3_LEN: usize = 10;
    /// Tg + NFCID3t + DIDt + BSt + BRt + TO + PPt
    pub const ATR_RES_FIELDS_LEN: usize = 16;
    /// Fixed initiator id used for passive 106k jumps
    pub const PASSIVE_106K_INITIATOR_ID: [u8; 4] = [0x08, 0x01, 0x02, 0x03];
    /// Polling request used for passive 212k/424k jumps
    pub const PASSIVE_FELICA_POLLING: [u8; 5] = [0x00, 0xFF, 0xFF, 0x01, 0x00];
}

/// LLCP constants
pub mod llcp {
    /// LLCP magic number at the head of the general bytes
    pub const MAGIC: [u8; 3] = [0x46, 0x66, 0x6D];
    /// Local LLCP version 1.0
    pub const VERSION_MAJOR: u8 = 1;
    pub const VERSION_MINOR: u8 = 0;
    /// Default link timeout in milliseconds
    pub const DEFAULT_LTO_MS: u16 = 100;
    /// LTO parameter unit in milliseconds
    pub const LTO_UNIT_MS: u16 = 10;
    /// Default maximum information unit
    pub const DEFAULT_MIU: usize = 128;
    /// Well known SAPs
    pub const SAP_LINK_MANAGEMENT: u8 = 0x00;
    pub const SAP_SDP: u8 = 0x01;
    pub const SAP_SNEP: u8 = 0x04;
    /// First SAP not reserved for well known services
    pub const SAP_LOCAL_FIRST: u8 = 0x20;
    /// WKS bits
    pub const WKS_LINK_MANAGEMENT: u16 = 1 << SAP_LINK_MANAGEMENT;
    pub const WKS_SDP: u16 = 1 << SAP_SDP;
    pub const WKS_SNEP: u16 = 1 << SAP_SNEP;
    /// PDU header length
    pub const PDU_HEADER_LEN: usize = 2;
    /// Offset of the information field for sequenced PDUs (I/RR/RNR)
    pub const PDU_SEQUENCE_INFO_POS: usize = 3;
    /// Largest I-PDU information field carried by one normal frame: TFI,
    /// command code and Tg (or status) byte, then the PDU header and
    /// sequence byte.
    pub const MAX_INFO_LEN: usize = super::MAX_PAYLOAD_LEN - 3 - PDU_SEQUENCE_INFO_POS;
}
