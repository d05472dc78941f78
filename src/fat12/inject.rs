// src/fat12/inject.rs
//! Writing files into the root directory of an existing FAT12 image.
//!
//! The image is treated as one owned buffer. `inject` edits it in place and
//! may leave it half written when it fails, so callers that care about the
//! stored copy go through `inject_file`, which only replaces the file after
//! the whole batch went in.

use super::bpb::{BootSector, Regions, DIR_ENTRY_SIZE};
use super::directory::{self, Entry};
use super::table;
use crate::dos_name::DosName;
use crate::error::{Error, Result};
use crate::layout::Part;
use log::{debug, info};
use std::io::Write;
use std::path::Path;

/// File contents paired with the name they get on the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: DosName,
    pub data: Vec<u8>,
}

impl Source {
    pub fn new(name: DosName, data: Vec<u8>) -> Self {
        Source { name, data }
    }

    pub fn from_part(part: &Part) -> Result<Self> {
        let data = std::fs::read(part.path()).map_err(|e| Error::resource(part.path(), e))?;
        Ok(Source::new(part.name().clone(), data))
    }
}

/// Adds every source to `image`, in order. `label` names the image in errors.
pub fn inject(image: &mut [u8], label: &str, sources: &[Source]) -> Result<()> {
    let regions = BootSector::parse(image)?.regions();
    for source in sources {
        inject_one(image, &regions, label, source)?;
        mirror_fats(image, &regions);
    }
    Ok(())
}

/// Loads the image at `path`, injects the batch, and writes it back in one
/// go. On any failure the file on disk is left untouched. The rewritten
/// image keeps the original's permissions, and a symlinked image stays a
/// symlink. Hard links to the image are not preserved.
pub fn inject_file(path: &Path, sources: &[Source]) -> Result<()> {
    let mut image = std::fs::read(path).map_err(|e| Error::resource(path, e))?;
    inject(&mut image, &path.display().to_string(), sources)?;

    // replace the file a symlink points at, not the link
    let target = std::fs::canonicalize(path).map_err(|e| Error::resource(path, e))?;
    let permissions = std::fs::metadata(&target).map_err(|e| Error::resource(&target, e))?.permissions();
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::resource(dir, e))?;
    tmp.write_all(&image).map_err(|e| Error::resource(tmp.path(), e))?;
    tmp.as_file().set_permissions(permissions).map_err(|e| Error::resource(tmp.path(), e))?;
    tmp.persist(&target).map_err(|e| Error::resource(&target, e.error))?;
    debug!("wrote {} bytes back to {}", image.len(), path.display());
    Ok(())
}

fn inject_one(image: &mut [u8], regions: &Regions, label: &str, source: &Source) -> Result<()> {
    let size = u32::try_from(source.data.len())
        .map_err(|_| Error::InvalidInput(format!("{} is too large for FAT12", source.name)))?;

    let root_end = regions.root_start + regions.root_entries * DIR_ENTRY_SIZE;
    let root = &image[regions.root_start..root_end];
    let (name, typ) = source.name.to_entry_fields();
    if directory::entries(root).iter().any(|e| e.name == name && e.typ == typ) {
        return Err(Error::NameCollision { name: source.name.to_string() });
    }
    let slot = directory::find_free_slot(root).ok_or_else(|| Error::DirectoryFull { image: label.to_string() })?;

    let needed = source.data.len().div_ceil(regions.cluster_size);
    let fat = &mut image[regions.fat_start..regions.fat_start + regions.fat_size];
    let clusters = allocate_chain(fat, regions.cluster_limit(), needed).ok_or_else(|| Error::DiskFull {
        image: label.to_string(),
        name: source.name.to_string(),
    })?;

    for (cluster, chunk) in clusters.iter().zip(source.data.chunks(regions.cluster_size)) {
        let start = regions.cluster_offset(*cluster);
        let dst = &mut image[start..start + regions.cluster_size];
        dst[..chunk.len()].copy_from_slice(chunk);
        dst[chunk.len()..].fill(0);
    }

    let first = clusters.first().map_or(0, |&c| c as u16);
    let entry = Entry::new(&source.name, first, size);
    let offset = regions.root_start + slot * DIR_ENTRY_SIZE;
    image[offset..offset + DIR_ENTRY_SIZE].copy_from_slice(&entry.to_bytes());

    info!("{}: {} bytes in {} clusters from {} (slot {})", source.name, size, clusters.len(), first, slot);
    Ok(())
}

/// Claims `count` free clusters below `limit`, linking each one to the one
/// found before it. The newest cluster is always end of chain.
fn allocate_chain(fat: &mut [u8], limit: usize, count: usize) -> Option<Vec<usize>> {
    let mut clusters: Vec<usize> = Vec::with_capacity(count);
    for _ in 0..count {
        let next = table::find_free(fat, limit)?;
        table::set_entry(fat, next, table::EOC_SET);
        if let Some(&prev) = clusters.last() {
            table::set_entry(fat, prev, next as u16);
        }
        clusters.push(next);
    }
    Some(clusters)
}

fn mirror_fats(image: &mut [u8], regions: &Regions) {
    for copy in 1..regions.num_fats {
        image.copy_within(regions.fat_start..regions.fat_start + regions.fat_size, regions.fat_offset(copy));
    }
}
