// src/formats/mod.rs
//! Sources of blank FAT12 images. Which one is used is a configuration
//! choice made once in `select`.

pub mod synth;
pub mod template;

pub use synth::Synthesized;
pub use template::Template;

use crate::disk_formats::Geometry;
use crate::error::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

pub trait BlankFormatter: Send + Sync {
    /// A complete empty image of `geometry.total_size()` bytes.
    fn blank_image(&self, geometry: Geometry) -> Result<Vec<u8>>;

    fn name(&self) -> &'static str;

    fn write_blank(&self, geometry: Geometry, sink: &mut dyn Write) -> Result<()> {
        let image = self.blank_image(geometry)?;
        sink.write_all(&image).map_err(|e| Error::resource(PathBuf::from("<output>"), e))
    }

    fn create_blank(&self, geometry: Geometry, path: &Path) -> Result<()> {
        let image = self.blank_image(geometry)?;
        std::fs::write(path, &image).map_err(|e| Error::resource(path, e))?;
        log::info!("formatted {} as {} ({})", path.display(), geometry, self.name());
        Ok(())
    }
}

pub fn select(template_dir: Option<&Path>) -> Box<dyn BlankFormatter> {
    match template_dir {
        Some(dir) => Box::new(Template::new(dir)),
        None => Box::new(Synthesized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_receives_whole_image() {
        let mut out = Vec::new();
        select(None).write_blank(Geometry::Dd720K, &mut out).unwrap();
        assert_eq!(out.len(), Geometry::Dd720K.total_size());
        assert_eq!(select(Some(Path::new("templates"))).name(), "template");
    }
}
