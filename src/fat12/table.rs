// src/fat12/table.rs
//! ### File allocation table
//!
//! Entries are 12 bits, two of them packed in every three bytes. The table
//! is always handled as one buffered slice starting at FAT entry 0.
//! Clusters 0 and 1 are reserved: entry 0 carries the media byte and both
//! read as allocated, so the first data cluster is 2.

pub const FREE_CLUSTER: u16 = 0;
pub const EOC_SET: u16 = 0xFFF;
/// any value at or above this ends a chain
pub const EOC_MIN: u16 = 0xFF8;
pub const FIRST_DATA_CLUSTER: usize = 2;

/// Value of entry `n` in the table `fat`.
pub fn get_entry(fat: &[u8], n: usize) -> u16 {
    let offset = n + n / 2;
    let val16 = u16::from_le_bytes([fat[offset], fat[offset + 1]]);
    if n & 1 == 1 {
        val16 >> 4
    } else {
        val16 & 0x0FFF
    }
}

/// Stores the low 12 bits of `val` as entry `n`, keeping the neighbouring
/// entry's nibble that shares a byte with it.
pub fn set_entry(fat: &mut [u8], n: usize, val: u16) {
    let offset = n + n / 2;
    let old = u16::from_le_bytes([fat[offset], fat[offset + 1]]);
    let new = if n & 1 == 1 {
        (old & 0x000F) | ((val & 0x0FFF) << 4)
    } else {
        (old & 0xF000) | (val & 0x0FFF)
    };
    fat[offset..offset + 2].copy_from_slice(&new.to_le_bytes());
}

pub fn is_last(fat: &[u8], n: usize) -> bool {
    get_entry(fat, n) >= EOC_MIN
}

/// Marks the reserved entries of a freshly zeroed table.
pub fn init_table(fat: &mut [u8], media: u8) {
    fat[0] = media;
    fat[1] = 0xFF;
    fat[2] = 0xFF;
}

/// First free cluster in `[2, limit)`, scanning upward.
pub fn find_free(fat: &[u8], limit: usize) -> Option<usize> {
    (FIRST_DATA_CLUSTER..limit).find(|&n| get_entry(fat, n) == FREE_CLUSTER)
}

pub fn count_free(fat: &[u8], limit: usize) -> usize {
    (FIRST_DATA_CLUSTER..limit).filter(|&n| get_entry(fat, n) == FREE_CLUSTER).count()
}

/// Follows the chain starting at `first`. Returns `None` if it leaves
/// `[2, limit)`, hits a free entry, or is longer than the disk.
pub fn chain(fat: &[u8], first: usize, limit: usize) -> Option<Vec<usize>> {
    let mut clusters = Vec::new();
    let mut curr = first;
    loop {
        if curr < FIRST_DATA_CLUSTER || curr >= limit || clusters.len() >= limit {
            log::debug!("cluster {} out of range", curr);
            return None;
        }
        clusters.push(curr);
        if is_last(fat, curr) {
            return Some(clusters);
        }
        let next = get_entry(fat, curr);
        if next == FREE_CLUSTER {
            log::debug!("free cluster inside chain at {}", curr);
            return None;
        }
        curr = next as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_value_round_trips_at_every_cluster() {
        let mut fat = vec![0u8; 6144];
        for n in 2..4080 {
            for val in 0..=0xFFF {
                set_entry(&mut fat, n, val);
                assert_eq!(get_entry(&fat, n), val, "cluster {} value {:#x}", n, val);
            }
        }
    }

    #[test]
    fn neighbours_are_preserved() {
        let mut fat = vec![0u8; 16];
        set_entry(&mut fat, 2, 0xABC);
        set_entry(&mut fat, 3, 0x123);
        assert_eq!(&fat[3..6], &[0xBC, 0x3A, 0x12]);
        set_entry(&mut fat, 2, 0x000);
        assert_eq!(get_entry(&fat, 3), 0x123);
        set_entry(&mut fat, 2, 0xFFF);
        set_entry(&mut fat, 3, 0x000);
        assert_eq!(get_entry(&fat, 2), 0xFFF);
    }

    #[test]
    fn reserved_entries_are_not_free() {
        let mut fat = vec![0u8; 32];
        init_table(&mut fat, 0xF0);
        assert_eq!(get_entry(&fat, 0), 0xFF0);
        assert_eq!(get_entry(&fat, 1), 0xFFF);
        assert_eq!(find_free(&fat, 20), Some(2));
        assert_eq!(count_free(&fat, 20), 18);
    }

    #[test]
    fn follows_and_rejects_chains() {
        let mut fat = vec![0u8; 32];
        init_table(&mut fat, 0xF9);
        set_entry(&mut fat, 2, 5);
        set_entry(&mut fat, 5, 3);
        set_entry(&mut fat, 3, EOC_SET);
        assert_eq!(chain(&fat, 2, 20), Some(vec![2, 5, 3]));
        assert!(is_last(&fat, 3));
        set_entry(&mut fat, 3, EOC_MIN);
        assert_eq!(chain(&fat, 2, 20), Some(vec![2, 5, 3]));
        set_entry(&mut fat, 3, 2);
        assert_eq!(chain(&fat, 2, 20), None);
        set_entry(&mut fat, 3, 7);
        assert_eq!(chain(&fat, 2, 20), None);
        assert_eq!(find_free(&fat, 4), None);
    }
}
