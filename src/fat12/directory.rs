// src/fat12/directory.rs
use super::bpb::DIR_ENTRY_SIZE;
use crate::dos_name::DosName;
use byteorder::{ByteOrder, LittleEndian};

pub const ATTR_ARCHIVE: u8 = 0x20;
pub const ATTR_VOLUME_ID: u8 = 0x08;
/// first name byte of a slot that was never used; nothing follows it
pub const END_MARKER: u8 = 0x00;
pub const DELETED: u8 = 0xE5;

/// A root directory entry, reduced to the fields this tool writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: [u8; 8],
    pub typ: [u8; 3],
    pub attr: u8,
    pub first_cluster: u16,
    pub size: u32,
}

impl Entry {
    pub fn new(name: &DosName, first_cluster: u16, size: u32) -> Self {
        let (name, typ) = name.to_entry_fields();
        Entry { name, typ, attr: ATTR_ARCHIVE, first_cluster, size }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut name = [0u8; 8];
        let mut typ = [0u8; 3];
        name.copy_from_slice(&bytes[0..8]);
        typ.copy_from_slice(&bytes[8..11]);
        Entry {
            name,
            typ,
            attr: bytes[11],
            first_cluster: LittleEndian::read_u16(&bytes[26..28]),
            size: LittleEndian::read_u32(&bytes[28..32]),
        }
    }

    /// Bytes 12 through 25 (times, dates, reserved) are left zero.
    pub fn to_bytes(&self) -> [u8; DIR_ENTRY_SIZE] {
        let mut bytes = [0u8; DIR_ENTRY_SIZE];
        bytes[0..8].copy_from_slice(&self.name);
        bytes[8..11].copy_from_slice(&self.typ);
        bytes[11] = self.attr;
        LittleEndian::write_u16(&mut bytes[26..28], self.first_cluster);
        LittleEndian::write_u32(&mut bytes[28..32], self.size);
        bytes
    }

    /// Name as `BASE.EXT`, or just `BASE` when there is no extension.
    pub fn file_name(&self) -> String {
        let base = String::from_utf8_lossy(&self.name).trim_end().to_string();
        let ext = String::from_utf8_lossy(&self.typ).trim_end().to_string();
        if ext.is_empty() {
            base
        } else {
            [base, ext].join(".")
        }
    }

    pub fn is_volume_label(&self) -> bool {
        self.attr & ATTR_VOLUME_ID != 0
    }
}

pub fn is_free_slot(first_byte: u8) -> bool {
    first_byte == END_MARKER || first_byte == DELETED
}

/// Index of the first reusable slot in the root directory region.
pub fn find_free_slot(root: &[u8]) -> Option<usize> {
    root.chunks_exact(DIR_ENTRY_SIZE).position(|slot| is_free_slot(slot[0]))
}

/// Entries in use, in directory order. Stops at the end marker.
pub fn entries(root: &[u8]) -> Vec<Entry> {
    root.chunks_exact(DIR_ENTRY_SIZE)
        .take_while(|slot| slot[0] != END_MARKER)
        .filter(|slot| slot[0] != DELETED)
        .map(Entry::from_bytes)
        .collect()
}
