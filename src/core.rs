// src/core.rs
use crate::disk_formats::Geometry;
use crate::fat12::{reader, BootSector};
use crate::error::Result;

/// Human readable summary of an image: geometry and root directory, or with
/// `ascii` a per-sector dump of the first bytes of every sector.
pub fn display(data: &[u8], ascii: bool) -> Result<String> {
    let boot = BootSector::parse(data)?;
    let mut output = Vec::new();
    output.push(format!("Raw IMG: {} bytes", data.len()));
    if !ascii {
        let name = Geometry::from_image_len(data.len()).map_or("Custom".to_string(), |g| g.to_string());
        output.push(format!(
            "Detected Format: {}\nGeometry: {} heads, {} sectors/track, {} bytes/sector, {} sectors/cluster, media {:#04X}",
            name, boot.heads, boot.sectors_per_track, boot.bytes_per_sector, boot.sectors_per_cluster, boot.media
        ));
        let regions = boot.regions();
        for entry in reader::catalog(data)? {
            output.push(format!("{:<12} {:>9} bytes  cluster {}", entry.file_name(), entry.size, entry.first_cluster));
        }
        let free = reader::free_clusters(data)?;
        output.push(format!("{} of {} clusters free ({} bytes)", free, regions.total_clusters, free * regions.cluster_size));
    } else {
        let sector_size = boot.bytes_per_sector as usize;
        let spt = (boot.sectors_per_track as usize).max(1);
        let heads = (boot.heads as usize).max(1);
        for (lba, chunk) in data.chunks_exact(sector_size).enumerate() {
            let ascii_str: String = chunk.iter()
                .take(32)
                .map(|&b| if b >= 32 && b <= 126 { b as char } else { '.' })
                .collect();
            output.push(format!(
                "Cyl {}, Head {}, Sector {}, Size {} bytes: {}",
                lba / (spt * heads), (lba / spt) % heads, lba % spt + 1, sector_size, ascii_str
            ));
        }
    }
    Ok(output.join("\n"))
}
