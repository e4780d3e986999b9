//! VDIF header decoding — the external collaborator named in the core's
//! file-access contract. Kept deliberately minimal: only the four fields
//! the core consumes (`secs_inre`, `df_num_insec`, `ref_epoch`, `df_len`).

mod header;

pub use header::{FrameTimestamp, VdifHeader, VDIF_HEADER_SIZE};
