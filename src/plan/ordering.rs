//! Ordering & continuity (component F): sorts candidate blocks by
//! first-frame timestamp and identifies the longest contiguous prefix.

use crate::plan::entry::StripeEntry;
use crate::vdif::FrameTimestamp;

/// `is_contiguous(a, b)` where `a = (first, last)` of one entry's buffered
/// block and `b` likewise for the next candidate. The "aligned" case
/// (`b.first == a.first`) is intentionally contiguous, and cross-second
/// rollover at the frame-count boundary is intentionally *not*
/// special-cased (portability across sample rates).
pub fn is_contiguous(a: (FrameTimestamp, FrameTimestamp), b: (FrameTimestamp, FrameTimestamp)) -> bool {
    let (a0, a1) = a;
    let (b0, _b1) = b;

    if a0.secs_inre == a1.secs_inre {
        // a lies within one second.
        b0.secs_inre == a1.secs_inre
            && b0.df_num_insec >= a0.df_num_insec
            && b0.df_num_insec <= a1.df_num_insec + 1
    } else {
        // a straddles seconds.
        (b0.secs_inre == a0.secs_inre && b0.df_num_insec >= a0.df_num_insec)
            || (b0.secs_inre == a1.secs_inre && b0.df_num_insec <= a1.df_num_insec + 1)
            || (a0.secs_inre < b0.secs_inre && b0.secs_inre < a1.secs_inre)
    }
}

/// Builds a signed mapping: live entries are labelled `+idx` / dead
/// entries `-idx` (1-based), dead entries are sorted to the
/// end, the live prefix is selection-sorted ascending by first-frame
/// timestamp, and everything after the first discontinuity is negated.
pub fn plan_contiguous_run(entries: &[StripeEntry]) -> Vec<i64> {
    let n = entries.len();
    let mut mapping: Vec<i64> = (0..n)
        .map(|i| {
            let signed = i as i64 + 1;
            if entries[i].is_live() {
                signed
            } else {
                -signed
            }
        })
        .collect();

    mapping.sort_by(|a, b| b.cmp(a));

    let n_live = mapping.iter().take_while(|&&v| v > 0).count();

    let first_ts = |idx: i64| -> FrameTimestamp {
        entries[(idx - 1) as usize]
            .buffer_timestamps()
            .expect("live entry must have timestamps")
            .0
    };

    for i in 0..n_live {
        let mut min_idx = i;
        for j in (i + 1)..n_live {
            if first_ts(mapping[j]) < first_ts(mapping[min_idx]) {
                min_idx = j;
            }
        }
        mapping.swap(i, min_idx);
    }

    let mut run_len = n_live;
    for i in 0..n_live.saturating_sub(1) {
        let a = entries[(mapping[i] - 1) as usize]
            .buffer_timestamps()
            .expect("live entry must have timestamps");
        let b = entries[(mapping[i + 1] - 1) as usize]
            .buffer_timestamps()
            .expect("live entry must have timestamps");
        if !is_contiguous(a, b) {
            run_len = i + 1;
            break;
        }
    }

    for slot in mapping.iter_mut().take(n_live).skip(run_len) {
        *slot = -*slot;
    }

    mapping
}
