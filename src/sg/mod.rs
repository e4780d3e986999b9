//! SG file format: on-disk layout, the file-access adapter, and the
//! mmap grow/shrink helper (components A and H).

pub mod access;
pub mod format;
pub mod mmap_region;

pub use access::{open_read, open_write, FileMeta, SgReadFile, SgWriteFile};
