//! Stripe plan (component C): owns the set of stripe entries, a mode
//! tag, and the build/close/free lifecycle.

use std::path::PathBuf;
use std::sync::Mutex;

use rayon::prelude::*;

use crate::config::StripeConfig;
use crate::error::{Mode, Result, ScatgatError};
use crate::plan::entry::{EntryHandle, StripeEntry};
use crate::sg;

pub struct StripePlan {
    pub(crate) mode: Mode,
    pub(crate) entries: Vec<StripeEntry>,
    pub(crate) cfg: StripeConfig,
}

/// Substitutes `{module}`, `{disk}`, `{pattern}` in `template` — a
/// format string with two integer slots and one string slot.
pub fn build_path(template: &str, module: u32, disk: u32, pattern: &str) -> PathBuf {
    let s = template
        .replace("{module}", &module.to_string())
        .replace("{disk}", &disk.to_string())
        .replace("{pattern}", pattern);
    PathBuf::from(s)
}

impl StripePlan {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[StripeEntry] {
        &self.entries
    }

    pub(crate) fn check_mode(&self, expected: Mode) -> Result<()> {
        if self.mode != expected {
            return Err(ScatgatError::WrongMode {
                expected,
                actual: self.mode,
            });
        }
        Ok(())
    }

    /// Opens every (module, disk) cell for reading in parallel, keeps only
    /// the survivors, and orders them ascending by first-frame timestamp.
    /// Returns `None` when no file survives.
    pub fn build_read_plan(
        template: &str,
        pattern: &str,
        modules: &[u32],
        disks: &[u32],
        cfg: StripeConfig,
    ) -> Option<StripePlan> {
        let grid: Vec<(u32, u32)> = modules
            .iter()
            .flat_map(|&m| disks.iter().map(move |&d| (m, d)))
            .collect();

        let mut entries: Vec<StripeEntry> = grid
            .par_iter()
            .filter_map(|&(module, disk)| {
                let path = build_path(template, module, disk, pattern);
                match sg::open_read(&path) {
                    Some(handle) => Some(StripeEntry::new_read(handle)),
                    None => {
                        crate::displaylevel!(2, "scatgat: skipping unreadable path {path:?}");
                        None
                    }
                }
            })
            .collect();

        if entries.is_empty() {
            return None;
        }

        entries.sort_by(|a, b| {
            let ma = a.meta();
            let mb = b.meta();
            (ma.first_secs, ma.first_frame).cmp(&(mb.first_secs, mb.first_frame))
        });

        Some(StripePlan {
            mode: Mode::Read,
            entries,
            cfg,
        })
    }

    /// Creates and maps every (module, disk) cell for writing in
    /// parallel. Returns `None` when no file could be created anywhere in
    /// the grid.
    pub fn build_write_plan(
        template: &str,
        pattern: &str,
        modules: &[u32],
        disks: &[u32],
        cfg: StripeConfig,
    ) -> Option<StripePlan> {
        let grid: Vec<(u32, u32)> = modules
            .iter()
            .flat_map(|&m| disks.iter().map(move |&d| (m, d)))
            .collect();

        let failures: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());
        let mut entries: Vec<StripeEntry> = grid
            .par_iter()
            .filter_map(|&(module, disk)| {
                let path = build_path(template, module, disk, pattern);
                match sg::open_write(&path, &cfg) {
                    Some(handle) => Some(StripeEntry::new_write(handle)),
                    None => {
                        failures.lock().unwrap().push(path);
                        None
                    }
                }
            })
            .collect();

        for path in failures.into_inner().unwrap() {
            crate::displaylevel!(2, "scatgat: failed to create {path:?}", path = path);
        }

        if entries.is_empty() {
            return None;
        }

        // Stable order: by grid position, since write mode has no
        // meaningful timestamp yet.
        entries.sort_by_key(|e| e.meta().path.clone());

        Some(StripePlan {
            mode: Mode::Write,
            entries,
            cfg,
        })
    }

    /// Releases read-mode file handles. Does not free entry buffers or
    /// metadata — call `free` for that.
    pub fn close_read(&mut self) -> Result<()> {
        self.check_mode(Mode::Read)?;
        Ok(())
    }

    /// For each entry: unlink the backing file if nothing was written,
    /// otherwise shrink the mmap to exactly `bytes_used`.
    pub fn close_write(&mut self) -> Result<()> {
        self.check_mode(Mode::Write)?;
        for entry in &mut self.entries {
            if let EntryHandle::Write(w) = &mut entry.handle {
                w.shrink_to_used()?;
                if w.bytes_used == 0 {
                    let _ = std::fs::remove_file(&w.meta.path);
                }
            }
        }
        Ok(())
    }

    /// Drops all owned buffers and metadata.
    pub fn free(self) {
        drop(self);
    }

    pub fn report(&self) -> String {
        let mut out = format!("StripePlan {{ mode: {:?}, entries: {} }}\n", self.mode, self.entries.len());
        for entry in &self.entries {
            out.push_str("  ");
            out.push_str(&entry.report());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_path_substitutes_all_slots() {
        let p = build_path("/mnt/disks/{module}/{disk}/data/{pattern}.sg", 3, 7, "rec001");
        assert_eq!(p, PathBuf::from("/mnt/disks/3/7/data/rec001.sg"));
    }

    #[test]
    fn build_read_plan_returns_none_when_nothing_survives() {
        let cfg = StripeConfig::default();
        let plan = StripePlan::build_read_plan(
            "/nonexistent/{module}/{disk}/{pattern}",
            "none",
            &[1, 2],
            &[1, 2],
            cfg,
        );
        assert!(plan.is_none());
    }

    #[test]
    fn build_write_plan_creates_every_grid_cell() {
        let dir = tempfile::tempdir().unwrap();
        let template = format!("{}/{{module}}_{{disk}}_{{pattern}}.sg", dir.path().display());
        let cfg = StripeConfig::default();
        let plan = StripePlan::build_write_plan(&template, "rec", &[1], &[1, 2], cfg).unwrap();
        assert_eq!(plan.entry_count(), 2);
    }
}
