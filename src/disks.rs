// src/disks.rs
//! Glue from a list of files on the host to finished disk images.

use crate::dos_name::sanitize_path;
use crate::error::Result;
use crate::fat12::{inject_file, Source};
use crate::formats::BlankFormatter;
use crate::layout::{pack, Part};
use log::info;
use std::path::{Path, PathBuf};

/// Turns host files into parts, names sanitized from their file names.
pub fn parts_from_files(paths: &[PathBuf]) -> Result<Vec<Part>> {
    paths.iter().map(|p| Part::from_file(p, sanitize_path(p)?)).collect()
}

pub fn image_path(out_dir: &Path, stem: &str, index: usize, count: usize) -> PathBuf {
    if count == 1 {
        out_dir.join(format!("{}.img", stem))
    } else {
        out_dir.join(format!("{}_{}.img", stem, index + 1))
    }
}

/// Packs `parts`, then formats and fills one image per disk. Returns the
/// paths written, in disk order.
pub fn build(parts: &[Part], out_dir: &Path, stem: &str, formatter: &dyn BlankFormatter) -> Result<Vec<PathBuf>> {
    let layouts = pack(parts)?;
    let mut written = Vec::with_capacity(layouts.len());
    for (i, layout) in layouts.iter().enumerate() {
        let path = image_path(out_dir, stem, i, layouts.len());
        let sources = layout.parts().iter().map(Source::from_part).collect::<Result<Vec<_>>>()?;
        formatter.create_blank(layout.geometry(), &path)?;
        inject_file(&path, &sources)?;
        info!("disk {} of {}: {} ({} parts)", i + 1, layouts.len(), path.display(), sources.len());
        written.push(path);
    }
    Ok(written)
}
