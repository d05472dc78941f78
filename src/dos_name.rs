// src/dos_name.rs
use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;

const BASE_LEN: usize = 8;
const EXT_LEN: usize = 3;

/// A file name that is already valid in a FAT root directory: 1 to 8
/// uppercase alphanumerics, optionally a dot and 1 to 3 more.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DosName(String);

impl DosName {
    pub fn new(s: &str) -> Result<Self> {
        let (base, ext) = split_name(s);
        let valid = |part: &str, max: usize| {
            part.len() <= max && part.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        };
        if base.is_empty() || !valid(base, BASE_LEN) || !valid(ext, EXT_LEN) || s.ends_with('.') {
            return Err(Error::InvalidInput(format!("'{}' is not a DOS 8.3 name", s)));
        }
        Ok(DosName(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Space padded name and extension fields of a directory entry.
    pub fn to_entry_fields(&self) -> ([u8; 8], [u8; 3]) {
        let (base, ext) = split_name(&self.0);
        let mut name = [b' '; 8];
        let mut typ = [b' '; 3];
        for (dst, src) in name.iter_mut().zip(base.bytes()) {
            *dst = src.to_ascii_uppercase();
        }
        for (dst, src) in typ.iter_mut().zip(ext.bytes()) {
            *dst = src.to_ascii_uppercase();
        }
        (name, typ)
    }
}

impl fmt::Display for DosName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn split_name(s: &str) -> (&str, &str) {
    s.rsplit_once('.').unwrap_or((s, ""))
}

fn clean(part: &str, max: usize) -> String {
    part.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(max)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Maps an arbitrary file name onto a DOS 8.3 name by dropping everything
/// that is not alphanumeric, truncating and raising case.
pub fn sanitize(name: &str) -> Result<DosName> {
    let (base, ext) = split_name(name);
    let base = clean(base, BASE_LEN);
    let ext = clean(ext, EXT_LEN);
    if base.is_empty() {
        return Err(Error::InvalidInput(format!("'{}' has no usable characters for a DOS name", name)));
    }
    let dos = if ext.is_empty() { base } else { format!("{}.{}", base, ext) };
    log::trace!("sanitized '{}' to '{}'", name, dos);
    Ok(DosName(dos))
}

/// Sanitizes the final component of a path.
pub fn sanitize_path(path: &Path) -> Result<DosName> {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::InvalidInput(format!("no file name in {}", path.display())))?;
    sanitize(name)
}
