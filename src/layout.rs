// src/layout.rs
use crate::disk_formats::{best_fit, Geometry};
use crate::dos_name::DosName;
use crate::error::{Error, Result};
use crate::fat12::BootSector;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One piece of a split ROM, waiting to be placed on a disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    path: PathBuf,
    size: u64,
    name: DosName,
}

impl Part {
    pub fn new(path: impl Into<PathBuf>, size: u64, name: DosName) -> Result<Self> {
        let path = path.into();
        if size == 0 {
            return Err(Error::InvalidInput(format!("part {} is empty", path.display())));
        }
        Ok(Part { path, size, name })
    }

    /// Builds a part from a file on disk, taking its size from the metadata.
    pub fn from_file(path: impl Into<PathBuf>, name: DosName) -> Result<Self> {
        let path = path.into();
        let size = std::fs::metadata(&path).map_err(|e| Error::resource(&path, e))?.len();
        Part::new(path, size, name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn name(&self) -> &DosName {
        &self.name
    }
}

/// The parts assigned to one physical disk and the geometry chosen for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    parts: Vec<Part>,
    geometry: Geometry,
}

impl Layout {
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn total_size(&self) -> u64 {
        self.parts.iter().map(Part::size).sum()
    }

    /// Clusters the parts occupy once each is rounded up to whole clusters
    /// of the chosen geometry.
    pub fn clusters_needed(&self) -> usize {
        let cluster_size = BootSector::for_format(self.geometry.format()).regions().cluster_size as u64;
        self.parts.iter().map(|p| p.size().div_ceil(cluster_size) as usize).sum()
    }

    pub fn clusters_available(&self) -> usize {
        BootSector::for_format(self.geometry.format()).regions().total_clusters
    }

    fn close(parts: Vec<Part>, total: u64) -> Result<Self> {
        let mut seen = HashSet::new();
        for part in &parts {
            if !seen.insert(part.name()) {
                return Err(Error::NameCollision { name: part.name().to_string() });
            }
        }
        let geometry = best_fit(total)?;
        info!("disk of {} parts, {} bytes -> {}", parts.len(), total, geometry);
        let layout = Layout { parts, geometry };
        if layout.clusters_needed() > layout.clusters_available() {
            warn!(
                "{} parts need {} clusters but a {} disk has {}, injection will run out of space",
                layout.parts.len(),
                layout.clusters_needed(),
                geometry,
                layout.clusters_available()
            );
        }
        Ok(layout)
    }
}

/// Distributes parts over as few disks as first-fit allows. Input order is
/// kept both across and within disks since it is the order the backup unit
/// loads them in.
///
/// The budget counts bytes, not clusters. Every part is rounded up to whole
/// clusters on the disk, so a layout of many small parts can still run out
/// of space when it is injected.
pub fn pack(parts: &[Part]) -> Result<Vec<Layout>> {
    let max = Geometry::largest().usable_bytes();
    if let Some(part) = parts.iter().find(|p| p.size() > max) {
        return Err(Error::CapacityExceeded {
            name: part.path().display().to_string(),
            size: part.size(),
            max,
        });
    }

    let mut layouts = Vec::new();
    let mut current: Vec<Part> = Vec::new();
    let mut total = 0u64;
    for part in parts {
        if !current.is_empty() && total + part.size() > max {
            debug!("{} does not fit after {} bytes, starting disk {}", part.name(), total, layouts.len() + 2);
            layouts.push(Layout::close(std::mem::take(&mut current), total)?);
            total = 0;
        }
        total += part.size();
        current.push(part.clone());
    }
    if !current.is_empty() {
        layouts.push(Layout::close(current, total)?);
    }
    Ok(layouts)
}
