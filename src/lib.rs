//! Shelve: Token-based file classification and archiving
//!
//! Splits filenames into delimiter-separated tokens, groups files into a
//! nested folder hierarchy keyed by chosen token positions, and packs the
//! result into a single zip archive mirroring that hierarchy.

pub mod archive;
pub mod classify;
pub mod error;
pub mod logging;
pub mod record;
pub mod session;
pub mod telemetry;
pub mod tokenize;
pub mod tooling;
pub mod validate;
