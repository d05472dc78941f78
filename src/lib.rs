//! # snesfloppy
//!
//! Builds FAT12 floppy images for SNES copier backup units (Pro Fighter,
//! Super Wild Card, Super UFO, Game Doctor) from ROM parts that were
//! already split and headered.
//!
//! * `layout::pack` spreads the parts over as few disks as it can
//! * `formats` produces a blank image for each disk
//! * `fat12::inject` writes the parts into it

pub mod core;
pub mod disk_formats;
pub mod disks;
pub mod dos_name;
pub mod error;
pub mod fat12;
pub mod formats;
pub mod layout;

pub use disk_formats::{best_fit, Geometry};
pub use dos_name::{sanitize, DosName};
pub use error::{Error, Result};
pub use layout::{pack, Layout, Part};
