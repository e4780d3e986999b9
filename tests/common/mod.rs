//! Shared VDIF frame synthesis for integration tests.

pub const PACKET_SIZE: u32 = 32; // one VDIF header, no payload — smallest valid frame.

pub fn make_frame(secs_inre: u32, df_num_insec: u32, ref_epoch: u32) -> Vec<u8> {
    let mut buf = vec![0u8; PACKET_SIZE as usize];
    let word0 = secs_inre & 0x3FFF_FFFF;
    let word1 = ((ref_epoch & 0x3F) << 24) | (df_num_insec & 0x00FF_FFFF);
    let df_len = PACKET_SIZE / 8;
    let word2 = df_len & 0x00FF_FFFF;
    buf[0..4].copy_from_slice(&word0.to_le_bytes());
    buf[4..8].copy_from_slice(&word1.to_le_bytes());
    buf[8..12].copy_from_slice(&word2.to_le_bytes());
    buf
}

/// Concatenates one frame per `(secs, df_num)` pair, all sharing `ref_epoch`.
pub fn make_frames(timestamps: &[(u32, u32)], ref_epoch: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(timestamps.len() * PACKET_SIZE as usize);
    for &(secs, df) in timestamps {
        out.extend_from_slice(&make_frame(secs, df, ref_epoch));
    }
    out
}

/// `(secs, df_num)` pairs for a contiguous run of `count` frames starting
/// at `(secs0, df0)`, assuming `frames_per_sec` frames per second.
pub fn contiguous_run(secs0: u32, df0: u32, count: u32, frames_per_sec: u32) -> Vec<(u32, u32)> {
    (0..count)
        .map(|i| {
            let total = df0 as u64 + i as u64;
            let secs = secs0 as u64 + total / frames_per_sec as u64;
            let df = (total % frames_per_sec as u64) as u32;
            (secs as u32, df)
        })
        .collect()
}
