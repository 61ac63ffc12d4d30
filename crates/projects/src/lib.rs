//! Project domain types for atelier.
//!
//! A project points at a storage location on disk that holds a `desc.txt`
//! description file plus `photos/`, `videos/` and `models/` media
//! subfolders. This crate owns the description parser and the media
//! scanner; persistence and HTTP live in other crates.

pub mod descfile;
pub mod scan;
pub mod types;

pub use {
    descfile::{DESC_FILENAME, DescriptionFile, load, parse_desc_file},
    scan::{MEDIA_SUBFOLDERS, media_kind_for, scan_media},
    types::{ConnectionType, MediaItem, MediaKind, ProjectRecord},
};
