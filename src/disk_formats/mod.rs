// src/disk_formats/mod.rs

pub mod floppy_3_5inch_ibm;

pub use floppy_3_5inch_ibm::{IBM_1_44M, IBM_1_6M, IBM_720K};

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Physical and FAT12 parameters of one floppy size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskFormat {
    pub cylinders: u8,
    pub heads: u8,
    pub sectors_per_track: u8,
    pub sector_size: u16,
    pub sectors_per_cluster: u8,
    pub root_entries: u16,
    pub media_descriptor: u8,
    pub sectors_per_fat: u16,
    /// Budget for file data. Deliberately below the raw capacity so the
    /// filesystem overhead never has to be computed by the packer.
    pub usable_bytes: u64,
    pub name: &'static str,
    /// File name of the matching blank image in a template directory.
    pub file_name: &'static str,
}

impl DiskFormat {
    /// Calculates the total size in bytes for this disk format.
    pub fn total_size(&self) -> usize {
        self.cylinders as usize * self.heads as usize * self.sectors_per_track as usize * self.sector_size as usize
    }

    pub fn total_sectors(&self) -> u32 {
        self.cylinders as u32 * self.heads as u32 * self.sectors_per_track as u32
    }
}

/// The three disk sizes the backup units understand, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Geometry {
    Dd720K,
    Hd1440K,
    Hd1600K,
}

impl Geometry {
    /// Ascending capacity order, which is also the best-fit search order.
    pub const ALL: [Geometry; 3] = [Geometry::Dd720K, Geometry::Hd1440K, Geometry::Hd1600K];

    pub fn format(self) -> &'static DiskFormat {
        match self {
            Geometry::Dd720K => &IBM_720K,
            Geometry::Hd1440K => &IBM_1_44M,
            Geometry::Hd1600K => &IBM_1_6M,
        }
    }

    pub fn largest() -> Geometry {
        Geometry::Hd1600K
    }

    pub fn usable_bytes(self) -> u64 {
        self.format().usable_bytes
    }

    pub fn total_size(self) -> usize {
        self.format().total_size()
    }

    /// Recovers the geometry of an image from its length in bytes.
    pub fn from_image_len(len: usize) -> Option<Geometry> {
        let format = floppy_3_5inch_ibm::infer_format(len)?;
        Geometry::ALL.into_iter().find(|g| g.format() == format)
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.format().name)
    }
}

impl FromStr for Geometry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "720k" | "720" => Ok(Geometry::Dd720K),
            "1.44m" | "1440k" | "1440" => Ok(Geometry::Hd1440K),
            "1.6m" | "1600k" | "1600" => Ok(Geometry::Hd1600K),
            _ => Err(Error::InvalidInput(format!("unknown disk geometry '{}', expected 720k, 1.44m or 1.6m", s))),
        }
    }
}

/// Smallest geometry whose usable bytes hold `size`.
pub fn best_fit(size: u64) -> Result<Geometry> {
    Geometry::ALL
        .into_iter()
        .find(|g| size <= g.usable_bytes())
        .ok_or_else(|| Error::CapacityExceeded {
            name: "disk contents".to_string(),
            size,
            max: Geometry::largest().usable_bytes(),
        })
}
