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

use std::{fs::File, os::unix::fs::FileExt, path::Path};

use fat16_ds::{BlockDevice, MAX_SECTOR_COUNT, SECTOR_SIZE};
use fat16_err::{Error, Result};
use log::error;

/// A [`BlockDevice`] backed by a regular host file, treated as a flat
/// sequence of fixed-size sectors.
pub struct FileBlockDevice {
    file: File,
    sector_count: u32,
}

impl FileBlockDevice {
    /// Opens `path` read-only and derives the sector count from the file
    /// length. Fails with [`Error::OutOfRange`] if the file holds more
    /// sectors than [`MAX_SECTOR_COUNT`], which is more than FAT16's 16-bit
    /// geometry fields can address.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path).map_err(|error| {
            if error.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound
            } else {
                Error::Io(error)
            }
        })?;
        let len = file.metadata()?.len();
        let sector_count = len / SECTOR_SIZE as u64;
        if sector_count > MAX_SECTOR_COUNT as u64 {
            error!("image holds {sector_count} sectors, more than the {MAX_SECTOR_COUNT} a FAT16 volume can address");
            return Err(Error::OutOfRange);
        }

        Ok(Self {
            file,
            sector_count: sector_count as u32,
        })
    }
}

impl BlockDevice for FileBlockDevice {
    fn sector_count(&self) -> u32 {
        self.sector_count
    }

    fn read(&self, first_sector: u32, sectors: u32, dst: &mut [u8]) -> Result<()> {
        if dst.len() != sectors as usize * SECTOR_SIZE {
            return Err(Error::BadArg);
        }
        if first_sector as u64 + sectors as u64 > self.sector_count as u64 {
            return Err(Error::OutOfRange);
        }

        self.file
            .read_exact_at(dst, first_sector as u64 * SECTOR_SIZE as u64)?;
        Ok(())
    }
}
