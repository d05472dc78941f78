// src/formats/template.rs
use super::BlankFormatter;
use crate::disk_formats::Geometry;
use crate::error::{Error, Result};
use crate::fat12::BootSector;
use std::path::PathBuf;

/// Copies pre-made blank images from a directory, one file per geometry
/// (`720k.img`, `1m44.img`, `1m6.img`).
#[derive(Debug, Clone)]
pub struct Template {
    dir: PathBuf,
}

impl Template {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Template { dir: dir.into() }
    }

    pub fn path_for(&self, geometry: Geometry) -> PathBuf {
        self.dir.join(geometry.format().file_name)
    }
}

impl BlankFormatter for Template {
    fn blank_image(&self, geometry: Geometry) -> Result<Vec<u8>> {
        let path = self.path_for(geometry);
        let data = std::fs::read(&path).map_err(|e| Error::resource(&path, e))?;
        if Geometry::from_image_len(data.len()) != Some(geometry) {
            return Err(Error::InvalidImage(format!(
                "template {} is {} bytes, expected {} for {}",
                path.display(),
                data.len(),
                geometry.total_size(),
                geometry
            )));
        }
        if !BootSector::has_signature(&data) {
            return Err(Error::InvalidImage(format!("template {} has no boot signature", path.display())));
        }
        BootSector::parse(&data)?;
        log::debug!("loaded template {}", path.display());
        Ok(data)
    }

    fn name(&self) -> &'static str {
        "template"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::Synthesized;

    #[test]
    fn copies_matching_template() {
        let dir = tempfile::tempdir().unwrap();
        let mut image = Synthesized.blank_image(Geometry::Hd1440K).unwrap();
        image[0x27..0x2B].copy_from_slice(&[1, 2, 3, 4]);
        std::fs::write(dir.path().join("1m44.img"), &image).unwrap();
        let template = Template::new(dir.path());
        assert_eq!(template.blank_image(Geometry::Hd1440K).unwrap(), image);
    }

    #[test]
    fn missing_template_is_a_resource_error() {
        let dir = tempfile::tempdir().unwrap();
        let template = Template::new(dir.path());
        assert!(matches!(template.blank_image(Geometry::Dd720K), Err(Error::Resource { .. })));
    }

    #[test]
    fn wrong_size_template_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let image = Synthesized.blank_image(Geometry::Hd1440K).unwrap();
        std::fs::write(dir.path().join("1m6.img"), &image).unwrap();
        let template = Template::new(dir.path());
        assert!(matches!(template.blank_image(Geometry::Hd1600K), Err(Error::InvalidImage(_))));
    }
}
