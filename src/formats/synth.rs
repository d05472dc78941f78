// src/formats/synth.rs
use super::BlankFormatter;
use crate::disk_formats::Geometry;
use crate::error::Result;
use crate::fat12::bpb::{BootSector, SECTOR_SIZE};
use crate::fat12::table;

/// Builds blank images from the geometry alone, no files needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Synthesized;

impl BlankFormatter for Synthesized {
    fn blank_image(&self, geometry: Geometry) -> Result<Vec<u8>> {
        let boot = BootSector::for_format(geometry.format());
        let mut image = vec![0u8; geometry.total_size()];
        image[..SECTOR_SIZE].copy_from_slice(&boot.to_bytes()?);
        let regions = boot.regions();
        for copy in 0..regions.num_fats {
            let start = regions.fat_offset(copy);
            table::init_table(&mut image[start..start + regions.fat_size], boot.media);
        }
        Ok(image)
    }

    fn name(&self) -> &'static str {
        "synthesized"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_1_6m_layout() {
        let image = Synthesized.blank_image(Geometry::Hd1600K).unwrap();
        assert_eq!(image.len(), 1_638_400);
        assert_eq!(&image[0x13..0x15], &3200u16.to_le_bytes());
        assert_eq!(&image[0x18..0x1A], &20u16.to_le_bytes());
        assert_eq!(&image[0x1FE..0x200], &[0x55, 0xAA]);
        // FAT #1 at sector 1, FAT #2 at sector 11
        assert_eq!(&image[512..515], &[0xF0, 0xFF, 0xFF]);
        assert_eq!(&image[512 * 11..512 * 11 + 3], &[0xF0, 0xFF, 0xFF]);
        assert!(image[515..512 * 11].iter().all(|&b| b == 0));
        assert!(image[512 * 21..].iter().all(|&b| b == 0));
    }

    #[test]
    fn blank_720k_media_byte() {
        let image = Synthesized.blank_image(Geometry::Dd720K).unwrap();
        assert_eq!(image.len(), 737_280);
        assert_eq!(image[0x15], 0xF9);
        assert_eq!(&image[512..515], &[0xF9, 0xFF, 0xFF]);
        assert_eq!(&image[512 * 4..512 * 4 + 3], &[0xF9, 0xFF, 0xFF]);
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(
            Synthesized.blank_image(Geometry::Hd1440K).unwrap(),
            Synthesized.blank_image(Geometry::Hd1440K).unwrap()
        );
    }
}
