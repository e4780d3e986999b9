//! On-disk SG file layout: file header tag followed by a sequence of
//! write-blocks, each prefixed by a write-block header tag.
//!
//! ```text
//! byte 0:  FileHeaderTag { sync_word, version, packet_format, packet_size, block_size }
//! byte N:  WbHeaderTag { blocknum, wb_size }
//!          <wb_size - size_of(WbHeaderTag) bytes of raw VDIF frames>
//!          WbHeaderTag { blocknum, wb_size }
//!          ...
//! ```

pub const SYNC_WORD: u32 = 0xFEED_FACE;
pub const FILE_VERSION: u32 = 2;
pub const PACKET_FORMAT_VDIF: u32 = 1;

pub const FILE_HEADER_TAG_SIZE: usize = 20;
pub const WB_HEADER_TAG_SIZE: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeaderTag {
    pub sync_word: u32,
    pub version: u32,
    pub packet_format: u32,
    pub packet_size: u32,
    pub block_size: u32,
}

impl FileHeaderTag {
    pub fn new(packet_size: u32, block_size: u32) -> Self {
        FileHeaderTag {
            sync_word: SYNC_WORD,
            version: FILE_VERSION,
            packet_format: PACKET_FORMAT_VDIF,
            packet_size,
            block_size,
        }
    }

    pub fn to_bytes(&self) -> [u8; FILE_HEADER_TAG_SIZE] {
        let mut buf = [0u8; FILE_HEADER_TAG_SIZE];
        buf[0..4].copy_from_slice(&self.sync_word.to_le_bytes());
        buf[4..8].copy_from_slice(&self.version.to_le_bytes());
        buf[8..12].copy_from_slice(&self.packet_format.to_le_bytes());
        buf[12..16].copy_from_slice(&self.packet_size.to_le_bytes());
        buf[16..20].copy_from_slice(&self.block_size.to_le_bytes());
        buf
    }

    pub fn from_bytes(buf: &[u8]) -> Option<FileHeaderTag> {
        if buf.len() < FILE_HEADER_TAG_SIZE {
            return None;
        }
        Some(FileHeaderTag {
            sync_word: u32::from_le_bytes(buf[0..4].try_into().unwrap()),
            version: u32::from_le_bytes(buf[4..8].try_into().unwrap()),
            packet_format: u32::from_le_bytes(buf[8..12].try_into().unwrap()),
            packet_size: u32::from_le_bytes(buf[12..16].try_into().unwrap()),
            block_size: u32::from_le_bytes(buf[16..20].try_into().unwrap()),
        })
    }
}

/// Prefixes every write-block: `blocknum` is the block's sequence number
/// within the file (this is `iblock` at write time), `wb_size` is the
/// total size of the block *including* this header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WbHeaderTag {
    pub blocknum: u64,
    pub wb_size: u32,
}

impl WbHeaderTag {
    pub fn to_bytes(&self) -> [u8; WB_HEADER_TAG_SIZE] {
        let mut buf = [0u8; WB_HEADER_TAG_SIZE];
        buf[0..8].copy_from_slice(&self.blocknum.to_le_bytes());
        buf[8..12].copy_from_slice(&self.wb_size.to_le_bytes());
        buf
    }

    pub fn from_bytes(buf: &[u8]) -> Option<WbHeaderTag> {
        if buf.len() < WB_HEADER_TAG_SIZE {
            return None;
        }
        Some(WbHeaderTag {
            blocknum: u64::from_le_bytes(buf[0..8].try_into().unwrap()),
            wb_size: u32::from_le_bytes(buf[8..12].try_into().unwrap()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_header_round_trips() {
        let h = FileHeaderTag::new(8192, 1024 * 8192 + FILE_HEADER_TAG_SIZE as u32);
        let bytes = h.to_bytes();
        assert_eq!(FileHeaderTag::from_bytes(&bytes), Some(h));
    }

    #[test]
    fn wb_header_round_trips() {
        let h = WbHeaderTag {
            blocknum: 7,
            wb_size: 8192 * 100 + WB_HEADER_TAG_SIZE as u32,
        };
        let bytes = h.to_bytes();
        assert_eq!(WbHeaderTag::from_bytes(&bytes), Some(h));
    }

    #[test]
    fn rejects_truncated_buffers() {
        assert_eq!(FileHeaderTag::from_bytes(&[0u8; 4]), None);
        assert_eq!(WbHeaderTag::from_bytes(&[0u8; 4]), None);
    }
}
