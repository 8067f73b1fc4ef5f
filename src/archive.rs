//! The archive-opener itself is out of scope for this crate (see the crate
//! docs); these traits are the narrow seam [`SymbolIndex`](crate::SymbolIndex)
//! uses to read it, the way `samply-symbols` mediates all file access
//! through a `FileAndPathHelper` trait rather than naming a concrete format.

use std::io;

/// One named byte stream inside an archive of symbol side-channel files.
pub trait ArchiveEntry {
    /// The entry's name, e.g. `"perf-1234.map"`. May include a directory
    /// prefix; only the basename is significant to [`SymbolIndex`](crate::SymbolIndex).
    fn name(&self) -> &str;

    fn read_to_string(&mut self) -> io::Result<String>;
}

/// An entry-enumerable container of named byte streams.
pub trait Archive {
    type Entry<'a>: ArchiveEntry
    where
        Self: 'a;

    fn entries(&mut self) -> Box<dyn Iterator<Item = Self::Entry<'_>> + '_>;
}

/// An in-memory [`Archive`] for tests and for callers that have already
/// loaded their side-channel files into memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryArchive {
    files: Vec<(String, String)>,
}

impl InMemoryArchive {
    pub fn new() -> Self {
        InMemoryArchive::default()
    }

    pub fn with_file(mut self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.files.push((name.into(), contents.into()));
        self
    }
}

pub struct InMemoryEntry<'a> {
    name: &'a str,
    contents: &'a str,
}

impl<'a> ArchiveEntry for InMemoryEntry<'a> {
    fn name(&self) -> &str {
        self.name
    }

    fn read_to_string(&mut self) -> io::Result<String> {
        Ok(self.contents.to_string())
    }
}

impl Archive for InMemoryArchive {
    type Entry<'a> = InMemoryEntry<'a>;

    fn entries(&mut self) -> Box<dyn Iterator<Item = Self::Entry<'_>> + '_> {
        Box::new(self.files.iter().map(|(name, contents)| InMemoryEntry {
            name,
            contents,
        }))
    }
}
