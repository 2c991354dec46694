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

//! Read-only FAT16 volume reader.
//!
//! Mounts a FAT16 volume stored in a regular host file (through any
//! [`fat16_ds::BlockDevice`]), parses and cross-validates the boot sector
//! and both File Allocation Tables, loads the root directory, and resolves
//! file names to their cluster chains for streaming reads.
//!
//! Only the root directory is navigable (no subdirectories), names are
//! literal 8.3 short file names, and nothing here ever writes to the image.

mod boot_sector;
mod chain;
mod dir;
mod dir_entry;
mod file;
mod volume;

#[cfg(test)]
mod test_support;

pub use dir::{DirEntryView, DirHandle};
pub use dir_entry::{printable_to_sfn, sfn_to_printable};
pub use fat16_err::{Error, Result};
pub use file::FileHandle;
pub use volume::Volume;
