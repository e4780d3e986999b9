//! File-access adapter (component A): the thin layer between the core and
//! raw SG files on disk.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::config::StripeConfig;
use crate::error::Result;
use crate::sg::format::{FileHeaderTag, WbHeaderTag, FILE_HEADER_TAG_SIZE, WB_HEADER_TAG_SIZE};
use crate::sg::mmap_region::MmapRegion;
use crate::vdif::{VdifHeader, VDIF_HEADER_SIZE};

/// Logical per-file metadata, deep-copied into each stripe entry.
#[derive(Debug, Clone)]
pub struct FileMeta {
    pub path: PathBuf,
    pub packet_size: u32,
    pub pkt_offset: u32,
    pub ref_epoch: u32,
    pub first_secs: u32,
    pub first_frame: u32,
    /// Standard-block-in-packets: frames per full write-block.
    pub frames_per_block: u32,
}

impl FileMeta {
    fn unset(path: PathBuf) -> FileMeta {
        FileMeta {
            path,
            packet_size: 0,
            pkt_offset: VDIF_HEADER_SIZE as u32,
            ref_epoch: 0,
            first_secs: 0,
            first_frame: 0,
            frames_per_block: 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct BlockSlot {
    payload_offset: u64,
    n_frames: u32,
}

/// An SG file opened for reading: a read-only mmap plus a pre-scanned
/// index of block offsets so `packets_by_block` is O(1).
pub struct SgReadFile {
    pub meta: FileMeta,
    mmap: memmap2::Mmap,
    blocks: Vec<BlockSlot>,
}

impl SgReadFile {
    pub fn total_blocks(&self) -> u64 {
        self.blocks.len() as u64
    }

    /// Returns the packet bytes for block `k` and the frame count, or
    /// `None` if `k` is out of range. Mirrors `packets_by_block` in the
    /// adapter contract.
    pub fn packets_by_block(&self, k: u64) -> Option<(&[u8], u32)> {
        let slot = self.blocks.get(k as usize)?;
        let start = slot.payload_offset as usize;
        let len = slot.n_frames as usize * self.meta.packet_size as usize;
        self.mmap.get(start..start + len).map(|b| (b, slot.n_frames))
    }

    pub fn report(&self) -> String {
        format!(
            "SgReadFile {{ path: {:?}, packet_size: {}, total_blocks: {} }}",
            self.meta.path,
            self.meta.packet_size,
            self.total_blocks()
        )
    }
}

/// Opens `path` for reading. Returns `None` (not an error) when the path
/// does not exist or is not a valid SG file — the caller is expected to
/// silently drop this grid cell from the plan, per the file-absent-on-open
/// policy.
pub fn open_read(path: &Path) -> Option<SgReadFile> {
    let file = File::open(path).ok()?;
    let mmap = unsafe { memmap2::Mmap::map(&file).ok()? };
    let header = FileHeaderTag::from_bytes(&mmap)?;
    if header.sync_word != crate::sg::format::SYNC_WORD {
        return None;
    }
    let packet_size = header.packet_size;
    if packet_size == 0 {
        return None;
    }

    let mut blocks = Vec::new();
    let mut offset = FILE_HEADER_TAG_SIZE as u64;
    while (offset as usize) + WB_HEADER_TAG_SIZE <= mmap.len() {
        let wb = WbHeaderTag::from_bytes(&mmap[offset as usize..])?;
        if wb.wb_size == 0 {
            break;
        }
        let payload_offset = offset + WB_HEADER_TAG_SIZE as u64;
        let payload_len = wb.wb_size as u64 - WB_HEADER_TAG_SIZE as u64;
        let n_frames = (payload_len / packet_size as u64) as u32;
        if payload_offset + payload_len > mmap.len() as u64 {
            break;
        }
        blocks.push(BlockSlot {
            payload_offset,
            n_frames,
        });
        offset += wb.wb_size as u64;
    }

    let mut meta = FileMeta::unset(path.to_path_buf());
    meta.packet_size = packet_size;
    meta.pkt_offset = VDIF_HEADER_SIZE as u32;
    meta.frames_per_block = blocks.first().map(|b| b.n_frames).unwrap_or(0);

    if let Some(first) = blocks.first() {
        let start = first.payload_offset as usize;
        if let Some(hdr_bytes) = mmap.get(start..start + VDIF_HEADER_SIZE) {
            if let Ok(hdr) = VdifHeader::parse(hdr_bytes) {
                meta.ref_epoch = hdr.ref_epoch;
                meta.first_secs = hdr.secs_inre;
                meta.first_frame = hdr.df_num_insec;
            }
        }
    }

    Some(SgReadFile { meta, mmap, blocks })
}

/// An SG file opened for writing: an auto-growing mmap region plus the
/// write-cursor state (`bytes_used`) the write engine mutates directly.
pub struct SgWriteFile {
    pub meta: FileMeta,
    region: MmapRegion,
    pub bytes_used: u64,
}

impl SgWriteFile {
    pub fn mapped_size(&self) -> u64 {
        self.region.mapped_size()
    }

    /// Grows the mapped region if needed, then copies `src` at the
    /// current write cursor.
    pub fn write_to_sg(&mut self, src: &[u8], growth_size: u64) -> Result<()> {
        let n = src.len() as u64;
        if self.bytes_used + n > self.region.mapped_size() {
            let new_size = self.region.mapped_size() + growth_size;
            self.region.resize(new_size)?;
        }
        let start = self.bytes_used as usize;
        let end = start + src.len();
        self.region.as_mut_slice()[start..end].copy_from_slice(src);
        self.bytes_used += n;
        Ok(())
    }

    /// Shrinks the backing file to exactly `bytes_used`, or to zero if
    /// nothing was written (the caller then unlinks the file).
    pub fn shrink_to_used(&mut self) -> Result<()> {
        self.region.resize(self.bytes_used)
    }

    pub fn report(&self) -> String {
        format!(
            "SgWriteFile {{ path: {:?}, bytes_used: {}, mapped_size: {} }}",
            self.meta.path,
            self.bytes_used,
            self.mapped_size()
        )
    }
}

/// Creates (truncating) `path` for writing and maps it at the configured
/// initial size. Returns `None` on any open/truncate/mmap failure — the
/// caller drops this grid cell and continues with survivors.
pub fn open_write(path: &Path, cfg: &StripeConfig) -> Option<SgWriteFile> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .ok()?;
    let initial_size = cfg.initial_size_in_blocks * cfg.wblock_size;
    let region = MmapRegion::new(file, initial_size).ok()?;
    Some(SgWriteFile {
        meta: FileMeta::unset(path.to_path_buf()),
        region,
        bytes_used: 0,
    })
}
