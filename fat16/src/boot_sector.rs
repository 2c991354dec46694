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

use zerocopy::{little_endian::U16, FromBytes, IntoBytes, KnownLayout};

use fat16_err::{Error, Result};

/// Signature that must occupy the last two bytes of sector 0.
pub const BOOT_SIGNATURE: u16 = 0xAA55;

/// Bit-exact, little-endian layout of a FAT16 boot sector (512 bytes).
///
/// Only the fields this reader needs are broken out; the BIOS parameter
/// block's CHS/hidden-sectors region and the extended BPB are carried as
/// opaque padding since nothing here interprets them.
#[repr(C)]
#[derive(Debug, FromBytes, IntoBytes, KnownLayout)]
pub struct BootSector {
    jmp_boot: [u8; 3],
    oem_name: [u8; 8],

    pub bytes_per_sector: U16,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: U16,
    pub num_fats: u8,
    pub max_root_entries: U16,
    total_sectors_16: U16,
    media_type: u8,
    pub fat_size: U16,

    chs_hidden_total32: [u8; 12],
    extended_bpb: [u8; 26],
    unused: [u8; 448],

    signature: U16,
}

impl BootSector {
    /// Validates the fields spec.md §6/§4.2 call out before any FAT or root
    /// directory I/O is attempted, so a malformed image fails fast with
    /// [`Error::InvalidFormat`] rather than mis-sized allocations downstream.
    pub fn validate(&self) -> Result<()> {
        if self.signature.get() != BOOT_SIGNATURE {
            log::error!(
                "boot sector signature {:#06x} does not match {BOOT_SIGNATURE:#06x}",
                self.signature.get()
            );
            return Err(Error::InvalidFormat("bad boot sector signature"));
        }

        let bytes_per_sector = self.bytes_per_sector.get();
        if !matches!(bytes_per_sector, 512 | 1024 | 2048 | 4096) {
            log::error!("bytes per sector ({bytes_per_sector}) is not one of 512/1024/2048/4096");
            return Err(Error::InvalidFormat("bad bytes-per-sector"));
        }

        let sectors_per_cluster = self.sectors_per_cluster as u32;
        if !is_power_of_two(sectors_per_cluster) {
            log::error!("sectors per cluster ({sectors_per_cluster}) is not a power of two");
            return Err(Error::InvalidFormat("bad sectors-per-cluster"));
        }
        if bytes_per_sector as u32 * sectors_per_cluster > 32 * 1024 {
            log::error!("cluster size exceeds 32 KiB");
            return Err(Error::InvalidFormat("cluster too large"));
        }

        if self.fat_size.get() == 0 {
            log::error!("FAT size is zero");
            return Err(Error::InvalidFormat("zero FAT size"));
        }

        let root_dir_bytes = self.max_root_entries.get() as u32 * super::dir_entry::DIR_ENTRY_SIZE as u32;
        if root_dir_bytes % bytes_per_sector as u32 != 0 {
            log::error!(
                "root directory size ({root_dir_bytes}) is not a multiple of bytes per sector ({bytes_per_sector})"
            );
            return Err(Error::InvalidFormat("root directory not sector-aligned"));
        }

        Ok(())
    }
}

fn is_power_of_two(value: u32) -> bool {
    value != 0 && value & (value - 1) == 0
}
