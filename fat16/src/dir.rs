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

use crate::dir_entry::{sfn_to_printable, SfnEntry, ATTR_ARCHIVE, ATTR_DIRECTORY, ATTR_HIDDEN, ATTR_READ_ONLY, ATTR_SYSTEM};

/// A single decoded root-directory entry (spec.md §4.4.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryView {
    pub name: String,
    pub size: u32,
    pub read_only: bool,
    pub hidden: bool,
    pub system: bool,
    pub directory: bool,
    pub archived: bool,
}

impl DirEntryView {
    fn from_entry(entry: &SfnEntry) -> Self {
        let attrs = entry.attributes;
        Self {
            name: sfn_to_printable(&entry.name, entry.is_directory()),
            size: entry.file_size.get(),
            read_only: attrs & ATTR_READ_ONLY != 0,
            hidden: attrs & ATTR_HIDDEN != 0,
            system: attrs & ATTR_SYSTEM != 0,
            directory: attrs & ATTR_DIRECTORY != 0,
            archived: attrs & ATTR_ARCHIVE != 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Files,
    Dirs,
    Done,
}

/// Iterates the flat root-directory array, files first then directories
/// (spec.md §4.4, §4.6). There is no rewind: once `Done`, the handle is
/// exhausted for good.
pub struct DirHandle<'v> {
    entries: &'v [SfnEntry],
    offset: usize,
    phase: Phase,
}

impl<'v> DirHandle<'v> {
    pub(crate) fn new(entries: &'v [SfnEntry]) -> Self {
        Self {
            entries,
            offset: 0,
            phase: Phase::Files,
        }
    }

    fn skip(&self, entry: &SfnEntry) -> bool {
        if entry.is_deleted() || entry.is_volume_label() {
            return true;
        }
        match self.phase {
            Phase::Files => entry.file_size.get() == 0,
            Phase::Dirs => entry.file_size.get() != 0,
            Phase::Done => true,
        }
    }
}

impl<'v> Iterator for DirHandle<'v> {
    type Item = DirEntryView;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.phase == Phase::Done {
                return None;
            }

            if self.offset == self.entries.len() {
                if self.phase == Phase::Files {
                    self.offset = 0;
                    self.phase = Phase::Dirs;
                    continue;
                }
                self.phase = Phase::Done;
                return None;
            }

            let entry = &self.entries[self.offset];

            // 0x00 marks "no more entries" in the original layout, but
            // spec.md §4.4 has the scan skip past it rather than stop, so a
            // hole earlier in the array doesn't hide entries after it.
            if entry.is_end_of_directory() || self.skip(entry) {
                self.offset += 1;
                continue;
            }

            let view = DirEntryView::from_entry(entry);
            self.offset += 1;
            return Some(view);
        }
    }
}
