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

use std::io::{self, Read, Seek, SeekFrom};

use fat16_ds::BlockDevice;
use fat16_err::Error;

use crate::{dir_entry::SfnEntry, volume::Volume};

/// An open file: a copy of its directory entry, its materialized cluster
/// chain, and an absolute read/write cursor in `[0, file_size]`
/// (spec.md §3, §4.5).
///
/// The chain is an immutable `Vec<u16>` built once at open; only the cursor
/// and the one-cluster scratch buffer are mutable, splitting apart what the
/// original C `clusters_chain_t` conflated (spec.md §9, "cluster chain as
/// value").
pub struct FileHandle<'v, BD: BlockDevice> {
    volume: &'v Volume<BD>,
    entry: SfnEntry,
    chain: Vec<u16>,
    offset: u64,
    cluster_buffer: Vec<u8>,
}

impl<'v, BD: BlockDevice> FileHandle<'v, BD> {
    pub(crate) fn new(volume: &'v Volume<BD>, entry: SfnEntry, chain: Vec<u16>) -> Self {
        let cluster_buffer = vec![0u8; volume.cluster_size() as usize];
        Self {
            volume,
            entry,
            chain,
            offset: 0,
            cluster_buffer,
        }
    }

    pub fn file_size(&self) -> u64 {
        self.entry.file_size.get() as u64
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn fill_cluster_buffer(&mut self, cluster_index: usize) -> io::Result<()> {
        let cluster = self.chain[cluster_index];
        let sector = self.volume.cluster_sector(cluster);
        self.volume
            .device()
            .read(sector, self.volume.sectors_per_cluster(), &mut self.cluster_buffer)
            .map_err(io::Error::from)
    }

    /// Reads up to `buf.len() / elem_size` elements of `elem_size` bytes
    /// each, mirroring the C `fread` contract spec.md §4.5 describes: the
    /// return value counts only *complete* elements. A short final element
    /// still has its bytes written into `buf` — they're just not counted.
    pub fn read_elements(&mut self, buf: &mut [u8], elem_size: usize) -> io::Result<usize> {
        if elem_size == 0 {
            return Err(Error::BadArg.into());
        }
        let requested = buf.len() - buf.len() % elem_size;
        let bytes_read = self.read(&mut buf[..requested])?;
        Ok(bytes_read / elem_size)
    }
}

impl<'v, BD: BlockDevice> Read for FileHandle<'v, BD> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let file_size = self.file_size();
        if self.offset >= file_size {
            return Ok(0);
        }

        let cluster_size = self.volume.cluster_size() as u64;
        let mut total_read = 0usize;
        let mut dst = buf;

        while !dst.is_empty() && self.offset < file_size {
            let cluster_index = (self.offset / cluster_size) as usize;
            self.fill_cluster_buffer(cluster_index)?;

            let intra = (self.offset % cluster_size) as usize;
            let available_in_cluster = self.cluster_buffer.len() - intra;
            let remaining_in_file = (file_size - self.offset) as usize;
            let n = dst.len().min(available_in_cluster).min(remaining_in_file);

            dst[..n].copy_from_slice(&self.cluster_buffer[intra..intra + n]);

            self.offset += n as u64;
            total_read += n;
            dst = &mut dst[n..];
        }

        Ok(total_read)
    }
}

impl<'v, BD: BlockDevice> Seek for FileHandle<'v, BD> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let file_size = self.file_size() as i64;
        let new_offset = match pos {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::Current(delta) => self.offset as i64 + delta,
            SeekFrom::End(delta) => file_size + delta,
        };

        if new_offset < 0 || new_offset > file_size {
            return Err(Error::Invalid.into());
        }

        self.offset = new_offset as u64;
        Ok(self.offset)
    }
}
