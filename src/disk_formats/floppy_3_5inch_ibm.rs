// src/disk_formats/floppy_3_5inch_ibm.rs

use super::DiskFormat; // Import from parent module

/// 720K Double Density, the smallest disk the backup units accept.
pub const IBM_720K: DiskFormat = DiskFormat {
    cylinders: 80,
    heads: 2,
    sectors_per_track: 9,
    sector_size: 512,
    sectors_per_cluster: 2, // 1 sector clusters would outgrow a 3 sector FAT
    root_entries: 112,
    media_descriptor: 0xF9,
    sectors_per_fat: 3,
    usable_bytes: 725_000,
    name: "720K 3.5\" DD",
    file_name: "720k.img",
};

pub const IBM_1_44M: DiskFormat = DiskFormat {
    cylinders: 80,
    heads: 2,
    sectors_per_track: 18,
    sector_size: 512,
    sectors_per_cluster: 1,
    root_entries: 224,
    media_descriptor: 0xF0,
    sectors_per_fat: 9,
    usable_bytes: 1_450_000,
    name: "1.44M 3.5\" HD",
    file_name: "1m44.img",
};

/// 1.6M extended HD format: 20 sectors per track on standard HD media.
pub const IBM_1_6M: DiskFormat = DiskFormat {
    cylinders: 80,
    heads: 2,
    sectors_per_track: 20,
    sector_size: 512,
    sectors_per_cluster: 1,
    root_entries: 224,
    media_descriptor: 0xF0,
    sectors_per_fat: 10,
    usable_bytes: 1_600_000,
    name: "1.6M 3.5\" HD",
    file_name: "1m6.img",
};

pub fn infer_format(size: usize) -> Option<&'static DiskFormat> {
    match size {
        737_280 => Some(&IBM_720K),
        1_474_560 => Some(&IBM_1_44M),
        1_638_400 => Some(&IBM_1_6M),
        _ => None,
    }
}
