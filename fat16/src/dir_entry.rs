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

use zerocopy::{
    little_endian::{U16, U32},
    FromBytes, IntoBytes, KnownLayout,
};

use fat16_err::{Error, Result};

pub const DIR_ENTRY_SIZE: usize = 32;

pub const ATTR_READ_ONLY: u8 = 1 << 0;
pub const ATTR_HIDDEN: u8 = 1 << 1;
pub const ATTR_SYSTEM: u8 = 1 << 2;
pub const ATTR_VOLUME_LABEL: u8 = 1 << 3;
pub const ATTR_DIRECTORY: u8 = 1 << 4;
pub const ATTR_ARCHIVE: u8 = 1 << 5;

/// First byte of `name` marking the end of the directory (no more entries
/// follow, including deleted ones).
pub const NAME_END_OF_DIRECTORY: u8 = 0x00;
/// First byte of `name` marking a deleted entry.
pub const NAME_DELETED: u8 = 0xE5;

/// A single 32-byte short-file-name directory entry, bit-exact per spec.md
/// §6.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout)]
pub struct SfnEntry {
    pub name: [u8; 11],
    pub attributes: u8,
    nt_reserved: u8,
    creation_time_tenths: u8,
    creation_time: U16,
    creation_date: U16,
    last_access_date: U16,
    pub first_cluster_high: U16,
    last_mod_time: U16,
    last_mod_date: U16,
    pub first_cluster_low: U16,
    pub file_size: U32,
}

impl SfnEntry {
    pub fn is_end_of_directory(&self) -> bool {
        self.name[0] == NAME_END_OF_DIRECTORY
    }

    pub fn is_deleted(&self) -> bool {
        self.name[0] == NAME_DELETED
    }

    pub fn is_volume_label(&self) -> bool {
        self.attributes & ATTR_VOLUME_LABEL != 0
    }

    pub fn is_directory(&self) -> bool {
        self.attributes & ATTR_DIRECTORY != 0
    }

    pub fn first_cluster(&self) -> u16 {
        // FAT16 never populates the high word; it exists only so the same
        // on-disk layout works for FAT32.
        self.first_cluster_low.get()
    }
}

/// Converts an 11-byte raw SFN into its printable 8.3 form (spec.md
/// §4.4.1). Directories never get a `.` inserted even if bytes 8..11 are
/// non-blank, matching the original reader's behavior.
pub fn sfn_to_printable(name: &[u8; 11], is_directory: bool) -> String {
    if is_directory {
        return ascii_trim(&name[0..8]);
    }

    let base = &name[0..8];
    let ext = &name[8..11];

    if ext[0] == b' ' {
        return ascii_trim(base);
    }

    let base_str = ascii_trim(base);
    let ext_str = ascii_trim(ext);
    if ext_str.is_empty() {
        base_str
    } else {
        format!("{base_str}.{ext_str}")
    }
}

fn ascii_trim(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == b' ').unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Converts a user-supplied 8.3 name into its 11-byte, space-padded SFN form
/// (spec.md §4.4.2), for exact-match lookup against [`SfnEntry::name`].
pub fn printable_to_sfn(name: &str) -> Result<[u8; 11]> {
    if name.is_empty() || !name.is_ascii() {
        return Err(Error::BadArg);
    }

    let mut sfn = [b' '; 11];
    match name.split_once('.') {
        None => {
            if name.len() > 8 {
                return Err(Error::BadArg);
            }
            sfn[..name.len()].copy_from_slice(name.as_bytes());
        }
        Some((base, ext)) => {
            if base.is_empty() || base.len() > 8 || ext.len() > 3 {
                return Err(Error::BadArg);
            }
            sfn[..base.len()].copy_from_slice(base.as_bytes());
            sfn[8..8 + ext.len()].copy_from_slice(ext.as_bytes());
        }
    }

    for b in &mut sfn {
        b.make_ascii_uppercase();
    }
    Ok(sfn)
}
