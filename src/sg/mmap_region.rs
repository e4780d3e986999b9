//! Grow/shrink helper for a memory-mapped, dynamically-resized regular
//! file (component H).
//!
//! `memmap2` has no `mremap` wrapper, so growth and shrinkage both go
//! through the portable fallback the design notes call out: drop the
//! mapping, `set_len` the file, remap. This is exactly the pattern used
//! by `MmapStorage::ensure_capacity` in the VelesDB storage engine this
//! module is grounded on.

use memmap2::MmapMut;
use std::fs::File;

use crate::error::Result;

pub struct MmapRegion {
    file: File,
    mmap: Option<MmapMut>,
    mapped_size: u64,
}

impl MmapRegion {
    /// Truncates `file` to `initial_size` bytes and maps it read-write.
    pub fn new(file: File, initial_size: u64) -> Result<MmapRegion> {
        file.set_len(initial_size)?;
        let mmap = if initial_size > 0 {
            Some(unsafe { MmapMut::map_mut(&file)? })
        } else {
            None
        };
        Ok(MmapRegion {
            file,
            mmap,
            mapped_size: initial_size,
        })
    }

    pub fn mapped_size(&self) -> u64 {
        self.mapped_size
    }

    pub fn as_slice(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        self.mmap.as_deref_mut().unwrap_or(&mut [])
    }

    /// Resizes the backing file to exactly `new_size` and remaps.
    /// `new_size == 0` drops the mapping entirely.
    pub fn resize(&mut self, new_size: u64) -> Result<()> {
        self.mmap.take();
        self.file.set_len(new_size)?;
        self.mmap = if new_size > 0 {
            Some(unsafe { MmapMut::map_mut(&self.file)? })
        } else {
            None
        };
        self.mapped_size = new_size;
        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        if let Some(m) = &self.mmap {
            m.flush()?;
        }
        Ok(())
    }

    pub fn file(&self) -> &File {
        &self.file
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn grow_preserves_prefix_and_updates_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("region");
        let file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .unwrap();
        let mut region = MmapRegion::new(file, 16).unwrap();
        region.as_mut_slice()[0..4].copy_from_slice(b"abcd");
        region.resize(32).unwrap();
        assert_eq!(region.mapped_size(), 32);
        assert_eq!(&region.as_slice()[0..4], b"abcd");
    }

    #[test]
    fn shrink_to_zero_drops_mapping() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("region");
        let file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .unwrap();
        let mut region = MmapRegion::new(file, 16).unwrap();
        region.resize(0).unwrap();
        assert_eq!(region.mapped_size(), 0);
        assert_eq!(region.as_slice().len(), 0);
    }
}
