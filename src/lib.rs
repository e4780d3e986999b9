//! Parallel scatter-gather read/write engine for a VDIF recording striped
//! across a module×disk grid of SG files.
//!
//! A [`plan::StripePlan`] binds one process to a grid of SG files in
//! either read or write mode. Building a plan opens every grid cell in
//! parallel; the read/write engines fan work to one thread per entry per
//! call; the ordering & continuity algorithm stitches per-file blocks
//! into a single time-ordered stream.

pub mod config;
pub mod diag;
pub mod error;
pub mod plan;
pub mod sg;
pub mod vdif;

pub use error::{Mode, Result, ScatgatError};
pub use plan::StripePlan;
