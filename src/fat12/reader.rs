// src/fat12/reader.rs
//! Read-back of images produced by this crate, used for display and to check
//! what was written.

use super::bpb::{BootSector, DIR_ENTRY_SIZE};
use super::directory::{self, Entry};
use super::table;
use crate::error::{Error, Result};

fn root_region(image: &[u8]) -> Result<(&[u8], super::bpb::Regions)> {
    let regions = BootSector::parse(image)?.regions();
    let end = regions.root_start + regions.root_entries * DIR_ENTRY_SIZE;
    Ok((&image[regions.root_start..end], regions))
}

/// Files in the root directory, volume labels left out.
pub fn catalog(image: &[u8]) -> Result<Vec<Entry>> {
    let (root, _) = root_region(image)?;
    Ok(directory::entries(root).into_iter().filter(|e| !e.is_volume_label()).collect())
}

pub fn free_clusters(image: &[u8]) -> Result<usize> {
    let regions = BootSector::parse(image)?.regions();
    let fat = &image[regions.fat_start..regions.fat_start + regions.fat_size];
    Ok(table::count_free(fat, regions.cluster_limit()))
}

/// Contents of the file called `name` (case insensitive).
pub fn read_file(image: &[u8], name: &str) -> Result<Vec<u8>> {
    let (root, regions) = root_region(image)?;
    let entry = directory::entries(root)
        .into_iter()
        .find(|e| !e.is_volume_label() && e.file_name().eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::InvalidInput(format!("{} not found", name)))?;
    if entry.size == 0 {
        return Ok(Vec::new());
    }
    let fat = &image[regions.fat_start..regions.fat_start + regions.fat_size];
    let clusters = table::chain(fat, entry.first_cluster as usize, regions.cluster_limit())
        .ok_or_else(|| Error::InvalidImage(format!("broken cluster chain for {}", name)))?;
    let size = entry.size as usize;
    if clusters.len() * regions.cluster_size < size {
        return Err(Error::InvalidImage(format!("chain of {} is shorter than its size", name)));
    }
    let mut data = Vec::with_capacity(clusters.len() * regions.cluster_size);
    for cluster in clusters {
        let start = regions.cluster_offset(cluster);
        data.extend_from_slice(&image[start..start + regions.cluster_size]);
    }
    data.truncate(size);
    Ok(data)
}
