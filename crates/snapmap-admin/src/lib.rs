//! CSV backup/restore and bulk maintenance for a snapmap [`RecordStore`].
//!
//! The codec itself ([`write_records`], [`read_rows`]) is synchronous and
//! store-agnostic; [`export`] and [`import`] bind it to a store, and
//! [`maintenance`] layers guarded resets and duplicate cleanup on top.
//!
//! [`RecordStore`]: snapmap_core::RecordStore

mod bridge;
mod codec;
pub mod error;
pub mod maintenance;

pub use bridge::{ImportReport, default_backup_name, export, import};
pub use codec::{HEADER, read_rows, write_records};
pub use error::{Error, Result};
pub use maintenance::Prompt;
