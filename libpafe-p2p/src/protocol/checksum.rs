// libpafe-p2p/src/protocol/checksum.rs

/// Length checksum of a normal information frame: LEN + LCS == 0 (mod 256).
pub fn lcs(len: u8) -> u8 {
    0u8.wrapping_sub(len)
}

/// Data checksum over the frame payload (TFI + data):
/// sum(payload) + DCS == 0 (mod 256).
pub fn dcs(payload: &[u8]) -> u8 {
    let sum = payload.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    0u8.wrapping_sub(sum)
}

/// True when `len` and `lcs` form a valid length/checksum pair.
pub fn length_checks(len: u8, lcs: u8) -> bool {
    len.wrapping_add(lcs) == 0
}
