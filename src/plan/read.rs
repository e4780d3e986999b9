//! Read engine (component E): read-next-block and read-block-by-index.

use crate::error::{Mode, Result};
use crate::plan::entry::EntryHandle;
use crate::plan::ordering::plan_contiguous_run;
use crate::plan::stripe::StripePlan;
use crate::plan::worker;

impl StripePlan {
    /// Produces the next contiguous run of frames across the stripe,
    /// stitched in ascending time. Returns the number of frames appended
    /// to `out`; `0` means no more data or no contiguous run could be
    /// formed this call (not an error).
    pub fn read_next_block(&mut self, out: &mut Vec<u8>) -> Result<u64> {
        self.check_mode(Mode::Read)?;

        let max_fanout = self.cfg.max_fanout;
        worker::run_fanout(&mut self.entries, max_fanout, |entry| {
            let needs_fetch = entry.n_frames == 0 && entry.iblock < entry.total_blocks();
            if !needs_fetch {
                return;
            }
            let fetched = match &entry.handle {
                EntryHandle::Read(r) => r.packets_by_block(entry.iblock).map(|(b, n)| (b.to_vec(), n)),
                EntryHandle::Write(_) => None,
            };
            if let Some((bytes, n_frames)) = fetched {
                entry.buffer = Some(bytes);
                entry.n_frames = n_frames;
            }
        })?;

        for entry in &mut self.entries {
            if entry.n_frames > 0 {
                entry.iblock += 1;
            }
        }

        let mapping = plan_contiguous_run(&self.entries);

        let mut frames_read: u64 = 0;
        for &slot in &mapping {
            if slot <= 0 {
                continue;
            }
            let idx = (slot - 1) as usize;
            let entry = &mut self.entries[idx];
            if let Some(buf) = entry.buffer.take() {
                out.extend_from_slice(&buf);
                frames_read += entry.n_frames as u64;
                entry.clear_buffer();
            }
        }

        Ok(frames_read)
    }

    /// Unconditionally fetches one block from every entry and concatenates
    /// in entry order (not timestamp order); no continuity check. Used
    /// when the caller knows the stripe is aligned by construction.
    pub fn read_block(&mut self, out: &mut Vec<u8>) -> Result<u64> {
        self.check_mode(Mode::Read)?;

        let max_fanout = self.cfg.max_fanout;
        let fetched: Vec<Option<Vec<u8>>> = worker::run_fanout(&mut self.entries, max_fanout, |entry| {
            if entry.iblock >= entry.total_blocks() {
                return None;
            }
            let result = match &entry.handle {
                EntryHandle::Read(r) => r.packets_by_block(entry.iblock).map(|(b, _)| b.to_vec()),
                EntryHandle::Write(_) => None,
            };
            if result.is_some() {
                entry.iblock += 1;
            }
            result
        })?;

        let mut frames_read: u64 = 0;
        for (entry, bytes) in self.entries.iter().zip(fetched.into_iter()) {
            if let Some(bytes) = bytes {
                let n = bytes.len() as u64 / entry.packet_size().max(1) as u64;
                out.extend_from_slice(&bytes);
                frames_read += n;
            }
        }

        Ok(frames_read)
    }
}
