//! In-memory FAT16 image builder and block device shared by this crate's
//! unit tests. One data cluster per sector (512 B) keeps cluster-chain math
//! trivial; tests that care about multi-sector clusters build their own
//! image (see `tests/` for the exact-3-cluster scenario from spec.md §8 S3).

use fat16_ds::{BlockDevice, SECTOR_SIZE};
use fat16_err::Result;

use crate::dir_entry::printable_to_sfn;

pub const RESERVED_SECTORS: u32 = 1;
pub const FAT_SIZE_SECTORS: u32 = 1;
pub const NUM_FATS: u32 = 2;
pub const MAX_ROOT_ENTRIES: u32 = 16;
pub const DATA_START_SECTOR: u32 = RESERVED_SECTORS + NUM_FATS * FAT_SIZE_SECTORS + 1;

pub struct TestBlockDevice {
    sectors: Vec<u8>,
}

impl TestBlockDevice {
    pub fn new(sectors: Vec<u8>) -> Self {
        Self { sectors }
    }
}

impl BlockDevice for TestBlockDevice {
    fn sector_count(&self) -> u32 {
        (self.sectors.len() / SECTOR_SIZE) as u32
    }

    fn read(&self, first_sector: u32, sectors: u32, dst: &mut [u8]) -> Result<()> {
        let start = first_sector as usize * SECTOR_SIZE;
        let len = sectors as usize * SECTOR_SIZE;
        dst.copy_from_slice(&self.sectors[start..start + len]);
        Ok(())
    }
}

fn fat_offset(fat_index: usize, cluster: u16) -> usize {
    let fat_start = (RESERVED_SECTORS as usize + fat_index * FAT_SIZE_SECTORS as usize) * SECTOR_SIZE;
    fat_start + cluster as usize * 2
}

fn set_fat_entry(image: &mut [u8], cluster: u16, value: u16) {
    for fat_index in 0..NUM_FATS as usize {
        let off = fat_offset(fat_index, cluster);
        image[off..off + 2].copy_from_slice(&value.to_le_bytes());
    }
}

fn cluster_data_offset(cluster: u16) -> usize {
    DATA_START_SECTOR as usize * SECTOR_SIZE + (cluster as usize - 2) * SECTOR_SIZE
}

fn root_dir_entry_offset(index: usize) -> usize {
    let root_dir_start =
        (RESERVED_SECTORS as usize + NUM_FATS as usize * FAT_SIZE_SECTORS as usize) * SECTOR_SIZE;
    root_dir_start + index * 32
}

fn write_dir_entry(image: &mut [u8], index: usize, name: &[u8; 11], attr: u8, first_cluster: u16, size: u32) {
    let off = root_dir_entry_offset(index);
    image[off..off + 11].copy_from_slice(name);
    image[off + 11] = attr;
    image[off + 26..off + 28].copy_from_slice(&first_cluster.to_le_bytes());
    image[off + 28..off + 32].copy_from_slice(&size.to_le_bytes());
}

/// Builds a minimal valid FAT16 image with `files` (name, content) entries
/// followed by zero-size `dirs` entries in the root directory. Each file's
/// content is written into a freshly allocated one-sector-per-cluster chain.
pub fn build_image(files: &[(&str, &[u8])], dirs: &[&str]) -> Vec<u8> {
    const DATA_CLUSTERS: usize = 64;
    let total_sectors = DATA_START_SECTOR as usize + DATA_CLUSTERS;
    let mut image = vec![0u8; total_sectors * SECTOR_SIZE];

    {
        let bs = &mut image[0..SECTOR_SIZE];
        bs[0..3].copy_from_slice(&[0xEB, 0x3C, 0x90]);
        bs[3..11].copy_from_slice(b"TESTFAT ");
        bs[11..13].copy_from_slice(&(SECTOR_SIZE as u16).to_le_bytes());
        bs[13] = 1;
        bs[14..16].copy_from_slice(&(RESERVED_SECTORS as u16).to_le_bytes());
        bs[16] = NUM_FATS as u8;
        bs[17..19].copy_from_slice(&(MAX_ROOT_ENTRIES as u16).to_le_bytes());
        bs[19..21].copy_from_slice(&(total_sectors as u16).to_le_bytes());
        bs[21] = 0xF0;
        bs[22..24].copy_from_slice(&(FAT_SIZE_SECTORS as u16).to_le_bytes());
        bs[510] = 0x55;
        bs[511] = 0xAA;
    }

    let mut next_cluster: u16 = 2;
    let mut entry_index = 0usize;

    for &(name, content) in files {
        let sfn = printable_to_sfn(name).unwrap();
        let first_cluster = next_cluster;
        let chunks: Vec<&[u8]> = content.chunks(SECTOR_SIZE).collect();

        let mut cluster = first_cluster;
        for (i, chunk) in chunks.iter().enumerate() {
            let data_off = cluster_data_offset(cluster);
            image[data_off..data_off + chunk.len()].copy_from_slice(chunk);
            if i + 1 < chunks.len() {
                let successor = cluster + 1;
                set_fat_entry(&mut image, cluster, successor);
                cluster = successor;
            } else {
                set_fat_entry(&mut image, cluster, 0xFFFF);
            }
        }
        next_cluster = cluster + 1;

        let used_first_cluster = if chunks.is_empty() { 0 } else { first_cluster };
        write_dir_entry(&mut image, entry_index, &sfn, 0, used_first_cluster, content.len() as u32);
        entry_index += 1;
    }

    for &name in dirs {
        let sfn = printable_to_sfn(name).unwrap();
        write_dir_entry(&mut image, entry_index, &sfn, 0x10, 0, 0);
        entry_index += 1;
    }

    image
}
