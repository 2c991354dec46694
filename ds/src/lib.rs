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

//! Sector-addressed block device interface.
//!
//! This is the thin contract spec.md treats as an external collaborator:
//! open a host file, report how many fixed-size sectors it holds, and read
//! a run of sectors into a caller-provided buffer.

pub use fat16_err::{Error, Result};

/// Fixed sector size assumed throughout the FAT16 stack.
pub const SECTOR_SIZE: usize = 512;

/// Largest sector count a FAT16 volume's 16-bit fields can address.
pub const MAX_SECTOR_COUNT: u32 = 65535;

pub trait BlockDevice {
    /// Total number of `SECTOR_SIZE`-byte sectors backing this device.
    fn sector_count(&self) -> u32;

    /// Reads `sectors` whole sectors starting at `first_sector` into `dst`.
    ///
    /// `dst.len()` must equal `sectors as usize * SECTOR_SIZE`; out-of-range
    /// reads (`first_sector + sectors > sector_count`) return
    /// [`Error::OutOfRange`].
    fn read(&self, first_sector: u32, sectors: u32, dst: &mut [u8]) -> Result<()>;
}
