//! Write engine (component G): write-frames, per-entry block persistence,
//! and the mmap-append helper.

use crate::error::{Mode, Result, ScatgatError};
use crate::plan::entry::{EntryHandle, StripeEntry};
use crate::plan::stripe::StripePlan;
use crate::plan::worker;
use crate::sg::format::{FileHeaderTag, WbHeaderTag, FILE_HEADER_TAG_SIZE, WB_HEADER_TAG_SIZE};
use crate::vdif::{VdifHeader, VDIF_HEADER_SIZE};

impl StripePlan {
    /// Distributes `n_frames` VDIF frames from `frames` as whole blocks
    /// across stripe entries, round-robin from the entry with the
    /// smallest `iblock` (ties broken by lowest index). Returns the
    /// number of frames actually persisted.
    ///
    /// Per-entry I/O failure is absorbed locally: the offending entry is
    /// left with whatever it had before this call (its `iblock` is not
    /// advanced), and the returned count reflects only what was actually
    /// written, rather than a loop counter that assumes every worker
    /// succeeded. The caller must discard and rebuild the plan if any
    /// entry partially failed on its first block, since the
    /// file-header-on-first-block invariant can no longer be established
    /// for that straggler.
    pub fn write_frames(&mut self, frames: &[u8], n_frames: u64) -> Result<u64> {
        self.check_mode(Mode::Write)?;
        if n_frames == 0 {
            return Ok(0);
        }
        let n_entries = self.entries.len();
        if n_entries == 0 {
            return Ok(0);
        }

        let first_write = self.entries.iter().all(|e| e.iblock == 0);
        if first_write {
            let header = VdifHeader::parse(frames)?;
            for entry in &mut self.entries {
                let meta = entry.meta_mut();
                meta.packet_size = header.df_len_bytes;
                meta.pkt_offset = VDIF_HEADER_SIZE as u32;
                meta.ref_epoch = header.ref_epoch;
                meta.first_secs = header.secs_inre;
                meta.first_frame = header.df_num_insec;
            }
        }

        let packet_size = self.entries[0].meta().packet_size;
        if packet_size == 0 {
            return Err(ScatgatError::InvalidVdifHeader);
        }
        let frames_per_block = (self.cfg.wblock_size / packet_size as u64).max(1);

        let first_idx = self
            .entries
            .iter()
            .enumerate()
            .min_by_key(|(i, e)| (e.iblock, *i))
            .map(|(i, _)| i)
            .unwrap();

        let max_fanout = self.cfg.max_fanout;
        let growth = self.cfg.growth_size_in_blocks * self.cfg.wblock_size;

        let mut intended_cursor: u64 = 0;
        let mut actual_written: u64 = 0;

        while intended_cursor < n_frames {
            let mut assignments: Vec<Option<(u64, u64)>> = vec![None; n_entries];
            let mut cycle_cursor = intended_cursor;
            for t in 0..n_entries {
                if cycle_cursor >= n_frames {
                    break;
                }
                let idx = (first_idx + t) % n_entries;
                let remaining = n_frames - cycle_cursor;
                let this_n = remaining.min(frames_per_block);
                assignments[idx] = Some((cycle_cursor, this_n));
                cycle_cursor += this_n;
            }

            let results = worker::run_fanout_indexed(&mut self.entries, max_fanout, |idx, entry| {
                match assignments[idx] {
                    Some((offset, this_n)) => {
                        persist_block(entry, frames, offset, this_n, packet_size, frames_per_block, growth)
                    }
                    None => 0,
                }
            })?;

            actual_written += results.iter().sum::<u64>();
            intended_cursor = cycle_cursor;
        }

        Ok(actual_written)
    }
}

/// Persists one block to `entry`, returning the number of frames actually
/// written (`this_n` on success, `0` on any I/O failure — absorbed
/// locally and logged rather than propagated).
fn persist_block(
    entry: &mut StripeEntry,
    frames: &[u8],
    offset: u64,
    this_n: u64,
    packet_size: u32,
    frames_per_block: u64,
    growth: u64,
) -> u64 {
    let iblock = entry.iblock;
    let payload_len = this_n * packet_size as u64;
    let start = (offset * packet_size as u64) as usize;
    let end = start + payload_len as usize;

    let result: Result<()> = (|| {
        let w = match &mut entry.handle {
            EntryHandle::Write(w) => w,
            EntryHandle::Read(_) => return Ok(()),
        };
        if iblock == 0 {
            let block_size = packet_size as u64 * frames_per_block + FILE_HEADER_TAG_SIZE as u64;
            let file_header = FileHeaderTag::new(packet_size, block_size as u32);
            w.write_to_sg(&file_header.to_bytes(), growth)?;
        }
        let wb_header = WbHeaderTag {
            blocknum: iblock,
            wb_size: payload_len as u32 + WB_HEADER_TAG_SIZE as u32,
        };
        w.write_to_sg(&wb_header.to_bytes(), growth)?;
        w.write_to_sg(&frames[start..end], growth)?;
        Ok(())
    })();

    match result {
        Ok(()) => {
            entry.iblock += 1;
            this_n
        }
        Err(_) => {
            crate::displaylevel!(1, "scatgat: write failure on entry, block not persisted");
            0
        }
    }
}
