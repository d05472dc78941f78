// src/error.rs
use std::io;
use std::path::PathBuf;

/// Everything that can go wrong while packing, formatting or filling a disk.
/// None of these are retried; each one is fatal to the disk being built.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{name} is {size} bytes, larger than the biggest disk ({max} bytes)")]
    CapacityExceeded { name: String, size: u64, max: u64 },
    #[error("no room in root directory of {image}")]
    DirectoryFull { image: String },
    #[error("insufficient disk space in {image} for {name}")]
    DiskFull { image: String, name: String },
    #[error("duplicate file name {name}")]
    NameCollision { name: String },
    #[error("not a usable FAT12 image: {0}")]
    InvalidImage(String),
    #[error("cannot access {}: {source}", .path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn resource(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Resource { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
