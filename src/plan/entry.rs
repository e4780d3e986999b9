//! Stripe entry (component B): per-file position, buffered block, and
//! exclusive ownership of one file-metadata record.

use crate::sg::{FileMeta, SgReadFile, SgWriteFile};
use crate::vdif::{FrameTimestamp, VdifHeader};

/// Exclusive ownership of one SG file, in whichever mode the owning plan
/// was built for.
pub enum EntryHandle {
    Read(SgReadFile),
    Write(SgWriteFile),
}

pub struct StripeEntry {
    pub handle: EntryHandle,
    /// Next block to read or write.
    pub iblock: u64,
    /// At most one block's worth of frames. `None` ⇔ `n_frames == 0`.
    pub buffer: Option<Vec<u8>>,
    pub n_frames: u32,
}

impl StripeEntry {
    pub fn new_read(handle: SgReadFile) -> StripeEntry {
        StripeEntry {
            handle: EntryHandle::Read(handle),
            iblock: 0,
            buffer: None,
            n_frames: 0,
        }
    }

    pub fn new_write(handle: SgWriteFile) -> StripeEntry {
        StripeEntry {
            handle: EntryHandle::Write(handle),
            iblock: 0,
            buffer: None,
            n_frames: 0,
        }
    }

    pub fn meta(&self) -> &FileMeta {
        match &self.handle {
            EntryHandle::Read(r) => &r.meta,
            EntryHandle::Write(w) => &w.meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut FileMeta {
        match &mut self.handle {
            EntryHandle::Read(r) => &mut r.meta,
            EntryHandle::Write(w) => &mut w.meta,
        }
    }

    pub fn total_blocks(&self) -> u64 {
        match &self.handle {
            EntryHandle::Read(r) => r.total_blocks(),
            EntryHandle::Write(_) => u64::MAX,
        }
    }

    pub fn is_live(&self) -> bool {
        self.n_frames > 0
    }

    pub fn packet_size(&self) -> u32 {
        self.meta().packet_size
    }

    /// Clears the buffered block: frees it and resets `n_frames` to 0.
    pub fn clear_buffer(&mut self) {
        self.buffer = None;
        self.n_frames = 0;
    }

    /// First and last frame timestamps of the currently buffered block, or
    /// `None` if the entry is dead (empty buffer).
    pub fn buffer_timestamps(&self) -> Option<(FrameTimestamp, FrameTimestamp)> {
        if !self.is_live() {
            return None;
        }
        let buf = self.buffer.as_ref()?;
        let packet_size = self.packet_size() as usize;
        let first = VdifHeader::parse(&buf[0..]).ok()?.timestamp();
        let last_offset = (self.n_frames as usize - 1) * packet_size;
        let last = VdifHeader::parse(&buf[last_offset..]).ok()?.timestamp();
        Some((first, last))
    }

    pub fn report(&self) -> String {
        match &self.handle {
            EntryHandle::Read(r) => format!(
                "StripeEntry {{ {}, iblock: {}, n_frames: {} }}",
                r.report(),
                self.iblock,
                self.n_frames
            ),
            EntryHandle::Write(w) => format!(
                "StripeEntry {{ {}, iblock: {}, n_frames: {} }}",
                w.report(),
                self.iblock,
                self.n_frames
            ),
        }
    }
}
