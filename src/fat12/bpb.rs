// src/fat12/bpb.rs
//! Boot sector and BIOS Parameter Block of a FAT12 floppy.
//!
//! Only the fields a backup unit looks at are modelled. Everything is
//! little-endian and lives at the fixed offsets of the DOS 4.0 layout.

use crate::disk_formats::DiskFormat;
use crate::error::{Error, Result};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use std::io::{Cursor, Write};

pub const SECTOR_SIZE: usize = 512;
pub const DIR_ENTRY_SIZE: usize = 32;

const JMP_BOOT: [u8; 3] = [0xEB, 0x3C, 0x90];
const OEM_NAME: &[u8; 8] = b"MSDOS5.0";
const VOLUME_LABEL: &[u8; 11] = b"NO NAME    ";
const FS_TYPE: &[u8; 8] = b"FAT12   ";
const EXT_BOOT_SIG: u8 = 0x29;
const VOLUME_SERIAL: u32 = 0x1994_0523;
const BOOT_SIGNATURE: [u8; 2] = [0x55, 0xAA]; // goes in boot[510..512]

const RESERVED_SECTORS: u16 = 1;
const NUM_FATS: u8 = 2;

/// Never hand out more clusters than this, even if the FAT could address them.
pub const MAX_CLUSTERS: usize = 4080;

/// The BPB fields needed to find every region of the volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootSector {
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: u16,
    pub num_fats: u8,
    pub root_entries: u16,
    pub total_sectors: u32,
    pub media: u8,
    pub sectors_per_fat: u16,
    pub sectors_per_track: u16,
    pub heads: u16,
}

/// Byte offsets and sizes derived from a `BootSector`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub fat_start: usize,
    pub fat_size: usize,
    pub num_fats: usize,
    pub root_start: usize,
    pub root_entries: usize,
    pub data_start: usize,
    pub cluster_size: usize,
    pub total_clusters: usize,
}

impl Regions {
    pub fn fat_offset(&self, copy: usize) -> usize {
        self.fat_start + copy * self.fat_size
    }

    pub fn cluster_offset(&self, cluster: usize) -> usize {
        self.data_start + (cluster - 2) * self.cluster_size
    }

    /// One past the highest cluster number that may be allocated.
    pub fn cluster_limit(&self) -> usize {
        2 + self.total_clusters
    }
}

impl BootSector {
    pub fn for_format(format: &DiskFormat) -> Self {
        BootSector {
            bytes_per_sector: format.sector_size,
            sectors_per_cluster: format.sectors_per_cluster,
            reserved_sectors: RESERVED_SECTORS,
            num_fats: NUM_FATS,
            root_entries: format.root_entries,
            total_sectors: format.total_sectors(),
            media: format.media_descriptor,
            sectors_per_fat: format.sectors_per_fat,
            sectors_per_track: format.sectors_per_track as u16,
            heads: format.heads as u16,
        }
    }

    /// Serializes the whole boot sector, boot code area left zero.
    pub fn to_bytes(&self) -> Result<[u8; SECTOR_SIZE]> {
        let mut sector = [0u8; SECTOR_SIZE];
        let (tot16, tot32) = match u16::try_from(self.total_sectors) {
            Ok(n) => (n, 0),
            Err(_) => (0, self.total_sectors),
        };
        let mut cursor = Cursor::new(&mut sector[..]);
        let io = |e: std::io::Error| Error::InvalidInput(format!("boot sector overflow: {}", e));
        cursor.write_all(&JMP_BOOT).map_err(io)?;
        cursor.write_all(OEM_NAME).map_err(io)?;
        cursor.write_u16::<LittleEndian>(self.bytes_per_sector).map_err(io)?;
        cursor.write_u8(self.sectors_per_cluster).map_err(io)?;
        cursor.write_u16::<LittleEndian>(self.reserved_sectors).map_err(io)?;
        cursor.write_u8(self.num_fats).map_err(io)?;
        cursor.write_u16::<LittleEndian>(self.root_entries).map_err(io)?;
        cursor.write_u16::<LittleEndian>(tot16).map_err(io)?;
        cursor.write_u8(self.media).map_err(io)?;
        cursor.write_u16::<LittleEndian>(self.sectors_per_fat).map_err(io)?;
        cursor.write_u16::<LittleEndian>(self.sectors_per_track).map_err(io)?;
        cursor.write_u16::<LittleEndian>(self.heads).map_err(io)?;
        cursor.write_u32::<LittleEndian>(0).map_err(io)?; // hidden sectors
        cursor.write_u32::<LittleEndian>(tot32).map_err(io)?;
        cursor.write_u8(0).map_err(io)?; // drive number
        cursor.write_u8(0).map_err(io)?; // reserved
        cursor.write_u8(EXT_BOOT_SIG).map_err(io)?;
        cursor.write_u32::<LittleEndian>(VOLUME_SERIAL).map_err(io)?;
        cursor.write_all(VOLUME_LABEL).map_err(io)?;
        cursor.write_all(FS_TYPE).map_err(io)?;
        sector[510..512].copy_from_slice(&BOOT_SIGNATURE);
        Ok(sector)
    }

    pub fn has_signature(image: &[u8]) -> bool {
        image.len() >= SECTOR_SIZE && image[510..512] == BOOT_SIGNATURE
    }

    /// Reads the BPB back out of an image and checks it describes a volume
    /// that actually fits in the buffer.
    pub fn parse(image: &[u8]) -> Result<Self> {
        if image.len() < SECTOR_SIZE {
            return Err(Error::InvalidImage(format!("{} bytes is shorter than a boot sector", image.len())));
        }
        let tot16 = LittleEndian::read_u16(&image[0x13..]);
        let boot = BootSector {
            bytes_per_sector: LittleEndian::read_u16(&image[0x0B..]),
            sectors_per_cluster: image[0x0D],
            reserved_sectors: LittleEndian::read_u16(&image[0x0E..]),
            num_fats: image[0x10],
            root_entries: LittleEndian::read_u16(&image[0x11..]),
            total_sectors: if tot16 != 0 { tot16 as u32 } else { LittleEndian::read_u32(&image[0x20..]) },
            media: image[0x15],
            sectors_per_fat: LittleEndian::read_u16(&image[0x16..]),
            sectors_per_track: LittleEndian::read_u16(&image[0x18..]),
            heads: LittleEndian::read_u16(&image[0x1A..]),
        };
        if !boot.bytes_per_sector.is_power_of_two() || boot.bytes_per_sector < 128 {
            return Err(Error::InvalidImage(format!("bytes per sector {}", boot.bytes_per_sector)));
        }
        if boot.sectors_per_cluster == 0 || boot.num_fats == 0 || boot.sectors_per_fat == 0 || boot.reserved_sectors == 0 {
            return Err(Error::InvalidImage("zero cluster, FAT or reserved size in BPB".to_string()));
        }
        let regions = boot.regions();
        let volume_len = boot.total_sectors as usize * boot.bytes_per_sector as usize;
        if volume_len > image.len() || regions.data_start > volume_len {
            return Err(Error::InvalidImage(format!(
                "BPB describes {} bytes but image has {}",
                volume_len.max(regions.data_start),
                image.len()
            )));
        }
        Ok(boot)
    }

    pub fn regions(&self) -> Regions {
        let sector = self.bytes_per_sector as usize;
        let fat_start = self.reserved_sectors as usize * sector;
        let fat_size = self.sectors_per_fat as usize * sector;
        let root_start = fat_start + self.num_fats as usize * fat_size;
        let root_bytes = self.root_entries as usize * DIR_ENTRY_SIZE;
        let data_start = root_start + root_bytes.div_ceil(sector) * sector;
        let cluster_size = self.sectors_per_cluster as usize * sector;
        let volume_len = self.total_sectors as usize * sector;
        let data_clusters = volume_len.saturating_sub(data_start) / cluster_size;
        // the FAT itself must be able to hold an entry for every cluster
        let addressable = (fat_size * 2 / 3).saturating_sub(2);
        Regions {
            fat_start,
            fat_size,
            num_fats: self.num_fats as usize,
            root_start,
            root_entries: self.root_entries as usize,
            data_start,
            cluster_size,
            total_clusters: data_clusters.min(addressable).min(MAX_CLUSTERS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk_formats::{Geometry, IBM_1_44M, IBM_720K};

    #[test]
    fn serializes_fixed_offsets() {
        let bytes = BootSector::for_format(&IBM_1_44M).to_bytes().unwrap();
        assert_eq!(&bytes[0..3], &[0xEB, 0x3C, 0x90]);
        assert_eq!(&bytes[3..11], b"MSDOS5.0");
        assert_eq!(&bytes[0x0B..0x0D], &512u16.to_le_bytes());
        assert_eq!(bytes[0x0D], 1);
        assert_eq!(&bytes[0x0E..0x10], &1u16.to_le_bytes());
        assert_eq!(bytes[0x10], 2);
        assert_eq!(&bytes[0x11..0x13], &224u16.to_le_bytes());
        assert_eq!(&bytes[0x13..0x15], &2880u16.to_le_bytes());
        assert_eq!(bytes[0x15], 0xF0);
        assert_eq!(&bytes[0x16..0x18], &9u16.to_le_bytes());
        assert_eq!(&bytes[0x18..0x1A], &18u16.to_le_bytes());
        assert_eq!(&bytes[0x1A..0x1C], &2u16.to_le_bytes());
        assert_eq!(&bytes[0x1C..0x24], &[0u8; 8]);
        assert_eq!(bytes[0x24], 0);
        assert_eq!(bytes[0x26], 0x29);
        assert_eq!(&bytes[0x2B..0x36], b"NO NAME    ");
        assert_eq!(&bytes[0x36..0x3E], b"FAT12   ");
        assert!(bytes[0x3E..0x1FE].iter().all(|&b| b == 0));
        assert_eq!(&bytes[0x1FE..], &[0x55, 0xAA]);
    }

    #[test]
    fn parse_recovers_what_was_written() {
        for g in Geometry::ALL {
            let boot = BootSector::for_format(g.format());
            let mut image = vec![0u8; g.total_size()];
            image[..SECTOR_SIZE].copy_from_slice(&boot.to_bytes().unwrap());
            assert_eq!(BootSector::parse(&image).unwrap(), boot);
        }
    }

    #[test]
    fn dd_720k_uses_two_sector_clusters() {
        let bytes = BootSector::for_format(&IBM_720K).to_bytes().unwrap();
        assert_eq!(bytes[0x0D], 2);
        assert_eq!(bytes[0x15], 0xF9);
        assert_eq!(&bytes[0x16..0x18], &3u16.to_le_bytes());
        let bytes = BootSector::for_format(&crate::disk_formats::IBM_1_6M).to_bytes().unwrap();
        assert_eq!(bytes[0x0D], 1);
    }

    #[test]
    fn regions_of_720k() {
        let r = BootSector::for_format(&IBM_720K).regions();
        assert_eq!(r.fat_start, 512);
        assert_eq!(r.fat_size, 3 * 512);
        assert_eq!(r.root_start, 7 * 512);
        assert_eq!(r.data_start, 14 * 512);
        assert_eq!(r.cluster_size, 1024);
        assert_eq!(r.total_clusters, (1440 - 14) / 2);
        assert_eq!(r.cluster_offset(2), r.data_start);
    }

    #[test]
    fn parse_rejects_truncated_image() {
        let boot = BootSector::for_format(&IBM_1_44M);
        let mut image = vec![0u8; IBM_720K.total_size()];
        image[..SECTOR_SIZE].copy_from_slice(&boot.to_bytes().unwrap());
        assert!(matches!(BootSector::parse(&image), Err(Error::InvalidImage(_))));
        assert!(BootSector::parse(&[0u8; 100]).is_err());
    }
}
