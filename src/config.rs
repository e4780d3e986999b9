// Compile-time tunables, overridable per-plan via `StripeConfig`.
//
// `WBLOCK_SIZE` is external to this crate (a property of the deployment,
// not a constant of the algorithm) — `WBLOCK_SIZE_DEFAULT` only seeds
// `StripeConfig::default`.

/// Default standard write-block size in bytes, used when a caller does not
/// override [`StripeConfig::wblock_size`].
pub const WBLOCK_SIZE_DEFAULT: u64 = 1024 * 1024;

/// Initial mmap size per file on a write plan, in units of `wblock_size`.
pub const INITIAL_SIZE_IN_BLOCKS: u64 = 1000;

/// mmap growth step, in units of `wblock_size`.
pub const GROWTH_SIZE_IN_BLOCKS: u64 = 1000;

/// Per-plan configuration. A caller building a plan may override any field;
/// unset fields come from this crate's compile-time defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripeConfig {
    /// The standard write-block size in bytes.
    pub wblock_size: u64,
    /// Initial per-file mmap size, in units of `wblock_size`.
    pub initial_size_in_blocks: u64,
    /// mmap growth step, in units of `wblock_size`.
    pub growth_size_in_blocks: u64,
    /// Upper bound on threads spawned simultaneously by one engine call.
    /// Stripes wider than this are processed in batches (see
    /// `plan::worker`), to keep very wide stripes (modules×disks ≥ 32)
    /// from spawning one thread per cell all at once.
    pub max_fanout: usize,
}

impl Default for StripeConfig {
    fn default() -> Self {
        StripeConfig {
            wblock_size: WBLOCK_SIZE_DEFAULT,
            initial_size_in_blocks: INITIAL_SIZE_IN_BLOCKS,
            growth_size_in_blocks: GROWTH_SIZE_IN_BLOCKS,
            max_fanout: default_max_fanout(),
        }
    }
}

/// Scales off physical core count, with a floor of 1.
fn default_max_fanout() -> usize {
    let nb_cores = num_cpus::get_physical().max(1);
    nb_cores * 4
}
