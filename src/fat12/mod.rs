// src/fat12/mod.rs
//! FAT12 on-disk structures: boot sector, allocation table, root directory,
//! and the injector that ties them together.

pub mod bpb;
pub mod directory;
pub mod inject;
pub mod reader;
pub mod table;

pub use bpb::BootSector;
pub use inject::{inject, inject_file, Source};
