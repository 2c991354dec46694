// Copyright 2024 Kevin Ludwig
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use zerocopy::{FromBytes, IntoBytes};

use fat16_ds::{BlockDevice, SECTOR_SIZE};
use fat16_err::{Error, Result};

use crate::{
    boot_sector::BootSector,
    dir_entry::{printable_to_sfn, SfnEntry, DIR_ENTRY_SIZE},
    DirHandle, FileHandle,
};

/// A mounted FAT16 volume: boot sector geometry, both File Allocation
/// Tables (cross-validated at open time), and the root directory.
///
/// Borrows nothing from the caller's [`BlockDevice`] — it owns one by value
/// (spec.md §3 requires the device to outlive the volume; owning it makes
/// that invariant unconditional instead of caller-enforced).
pub struct Volume<BD: BlockDevice> {
    device: BD,

    bytes_per_sector: u32,
    sectors_per_cluster: u32,
    cluster_size: u32,
    data_start_sector: u32,
    max_root_entries: u32,

    /// FAT1, kept for chain traversal. FAT2 is discarded after the
    /// byte-for-byte comparison at open (spec.md §4.2 step 5) — nothing
    /// reads from it afterward.
    fat: Vec<u8>,
    root_dir: Vec<SfnEntry>,
}

impl<BD: BlockDevice> Volume<BD> {
    /// Parses the boot sector at `partition_start_sector`, loads and
    /// cross-validates both FATs, and loads the root directory
    /// (spec.md §4.2). Any failure here leaves nothing behind to clean up:
    /// the partially built `Vec`s simply drop.
    pub fn open(device: BD, partition_start_sector: u32) -> Result<Self> {
        let mut boot_sector_bytes = [0u8; SECTOR_SIZE];
        device.read(partition_start_sector, 1, &mut boot_sector_bytes)?;
        let boot_sector = BootSector::read_from_bytes(&boot_sector_bytes)
            .map_err(|_| Error::InvalidFormat("truncated boot sector"))?;
        boot_sector.validate()?;

        let bytes_per_sector = boot_sector.bytes_per_sector.get() as u32;
        let sectors_per_cluster = boot_sector.sectors_per_cluster as u32;
        let cluster_size = bytes_per_sector * sectors_per_cluster;

        let reserved_sectors = boot_sector.reserved_sectors.get() as u32;
        let num_fats = boot_sector.num_fats as u32;
        let fat_size_sectors = boot_sector.fat_size.get() as u32;
        let max_root_entries = boot_sector.max_root_entries.get() as u32;

        let fat1_start = partition_start_sector + reserved_sectors;
        let fat2_start = fat1_start + fat_size_sectors;

        let mut fat1 = vec![0u8; fat_size_sectors as usize * bytes_per_sector as usize];
        device.read(fat1_start, fat_size_sectors, &mut fat1)?;

        let mut fat2 = vec![0u8; fat1.len()];
        device.read(fat2_start, fat_size_sectors, &mut fat2)?;

        if fat1 != fat2 {
            log::error!("FAT1 and FAT2 differ; refusing to mount a volume with a torn FAT");
            return Err(Error::InvalidFormat("FAT1/FAT2 mismatch"));
        }
        drop(fat2);

        let root_dir_start = fat1_start + num_fats * fat_size_sectors;
        let root_dir_sectors = (max_root_entries * DIR_ENTRY_SIZE as u32) / bytes_per_sector;
        let mut root_dir_bytes = vec![0u8; root_dir_sectors as usize * bytes_per_sector as usize];
        device.read(root_dir_start, root_dir_sectors, &mut root_dir_bytes)?;

        let root_dir = root_dir_bytes
            .chunks_exact(DIR_ENTRY_SIZE)
            .map(|chunk| {
                SfnEntry::read_from_bytes(chunk).map_err(|_| Error::InvalidFormat("truncated directory entry"))
            })
            .collect::<Result<Vec<_>>>()?;

        let data_start_sector = root_dir_start + root_dir_sectors;

        Ok(Self {
            device,
            bytes_per_sector,
            sectors_per_cluster,
            cluster_size,
            data_start_sector,
            max_root_entries,
            fat: fat1,
            root_dir,
        })
    }

    pub fn cluster_size(&self) -> u32 {
        self.cluster_size
    }

    pub(crate) fn device(&self) -> &BD {
        &self.device
    }

    pub(crate) fn fat(&self) -> &[u8] {
        &self.fat
    }

    pub(crate) fn data_start_sector(&self) -> u32 {
        self.data_start_sector
    }

    pub(crate) fn sectors_per_cluster(&self) -> u32 {
        self.sectors_per_cluster
    }

    pub(crate) fn bytes_per_sector(&self) -> u32 {
        self.bytes_per_sector
    }

    /// Opens the (only navigable) root directory. Any path other than
    /// `"\"` is rejected per spec.md §4.4.
    pub fn open_dir(&self, path: &str) -> Result<DirHandle<'_>> {
        if path == "\\" {
            Ok(DirHandle::new(&self.root_dir))
        } else if path.starts_with('\\') {
            Err(Error::NotFound)
        } else {
            Err(Error::NotDirectory)
        }
    }

    /// Resolves `name` (an 8.3 filename, case-insensitive on input, matched
    /// as uppercase) in the root directory and opens it for reading
    /// (spec.md §4.5).
    pub fn open_file(&self, name: &str) -> Result<FileHandle<'_, BD>> {
        let sfn = printable_to_sfn(name)?;

        let entry = self
            .root_dir
            .iter()
            .find(|entry| entry.name == sfn && !entry.is_end_of_directory() && !entry.is_deleted())
            .ok_or(Error::NotFound)?;

        if entry.is_directory() {
            return Err(Error::IsDirectory);
        }

        let chain = crate::chain::build_chain(&self.fat, entry.first_cluster())?;
        Ok(FileHandle::new(self, *entry, chain))
    }

    /// Absolute sector at which `cluster`'s data begins.
    pub(crate) fn cluster_sector(&self, cluster: u16) -> u32 {
        self.data_start_sector + (cluster as u32 - 2) * self.sectors_per_cluster
    }
}
