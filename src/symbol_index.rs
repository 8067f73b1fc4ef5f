//! Per-archive registry of address-interval tables, consulted by
//! [`crate::frame::FrameReader`] when a frame's module or symbol is
//! `unknown`.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::archive::{Archive, ArchiveEntry};
use crate::cursor::ByteCursor;
use crate::interval::IntervalMap;
use crate::ms_map;
use crate::path_util::{basename, strip_extension};

const UNKNOWN: &str = "unknown";

fn module_map_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(perf-\d+\.map|.+\.ni\.\{.+\}\.map)$").unwrap())
}

fn perfinfo_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^perfinfo-\d+\.map$").unwrap())
}

/// Resolves `(pid, module, address)` to a better `(module, symbol)` pair
/// using `perf-<pid>.map` / `*.ni.{<guid>}.map` interval tables and
/// `perfinfo-<pid>.map` build-guid mappings read from an archive of
/// side-channel files packaged alongside a trace.
#[derive(Debug, Default)]
pub struct SymbolIndex {
    module_maps: HashMap<String, IntervalMap>,
    process_guids: HashMap<String, HashMap<String, String>>,
}

impl SymbolIndex {
    /// Builds an index by scanning every entry in `archive`. Entries whose
    /// basename matches neither known pattern are silently ignored
    /// (`MissingArchiveEntry` in the crate's error taxonomy is non-fatal).
    pub fn new<A: Archive>(archive: &mut A) -> Self {
        let mut module_maps = HashMap::new();
        let mut process_guids = HashMap::new();

        for mut entry in archive.entries() {
            let name = entry.name().to_string();
            let base = basename(&name).to_string();
            if module_map_pattern().is_match(&base) {
                let Ok(contents) = entry.read_to_string() else {
                    continue;
                };
                let key = strip_extension(&base).to_string();
                module_maps.insert(key, parse_module_map(&contents));
            } else if perfinfo_pattern().is_match(&base) {
                let Ok(contents) = entry.read_to_string() else {
                    continue;
                };
                process_guids.insert(base, parse_perfinfo_map(&contents));
            }
        }

        log::debug!(
            "SymbolIndex built: {} module map(s), {} process perfinfo table(s)",
            module_maps.len(),
            process_guids.len()
        );

        SymbolIndex {
            module_maps,
            process_guids,
        }
    }

    /// Attempts to resolve a frame whose module or symbol is `unknown`.
    /// Any miss along the chain yields the caller's original `(module,
    /// symbol)` pair unchanged; this never fails.
    pub fn resolve(&self, pid: i32, module: &str, address: u64) -> (String, String) {
        let fallback = (module.to_string(), UNKNOWN.to_string());

        let perfinfo_key = format!("perfinfo-{pid}.map");
        let Some(perfinfo) = self.process_guids.get(&perfinfo_key) else {
            return fallback;
        };
        let Some(guid) = perfinfo.get(module) else {
            return fallback;
        };
        let map_key = format!("{}.{{{}}}", strip_extension(module), guid);
        let Some(imap) = self.module_maps.get(&map_key) else {
            return fallback;
        };
        let Some((symbol, _start)) = imap.lookup(address) else {
            return fallback;
        };
        let (decoded_module, decoded_symbol) = ms_map::decode(symbol, "");
        if decoded_module.is_empty() {
            (module.to_string(), symbol.to_string())
        } else {
            (decoded_module, decoded_symbol)
        }
    }
}

/// Parses `hexStart hexSize symbolText\n` records.
fn parse_module_map(contents: &str) -> IntervalMap {
    let mut map = IntervalMap::new();
    let mut cursor = ByteCursor::new(contents.as_bytes());
    while !cursor.end_of_stream() {
        cursor.skip_whitespace();
        if cursor.end_of_stream() {
            break;
        }
        let mut start_hex = String::new();
        cursor.read_ascii_until(b' ', &mut start_hex);
        cursor.skip_whitespace();
        let mut size_hex = String::new();
        cursor.read_ascii_until(b' ', &mut size_hex);
        cursor.skip_whitespace();
        let mut symbol = String::new();
        cursor.read_ascii_until(b'\n', &mut symbol);
        if !cursor.end_of_stream() {
            cursor.advance(); // consume '\n'
        }
        let (Ok(start), Ok(size)) = (
            u64::from_str_radix(start_hex.trim(), 16),
            u64::from_str_radix(size_hex.trim(), 16),
        ) else {
            continue;
        };
        map.add(start, size, symbol.trim());
    }
    map.finalize();
    map
}

/// Parses `command;arg1;arg2;...\n` records, keeping only `ImageLoad`.
fn parse_perfinfo_map(contents: &str) -> HashMap<String, String> {
    let mut table = HashMap::new();
    for line in contents.lines() {
        let mut fields = line.split(';');
        let Some(command) = fields.next() else {
            continue;
        };
        if command != "ImageLoad" {
            continue;
        }
        let Some(path) = fields.next() else { continue };
        let Some(guid) = fields.next() else { continue };
        table.insert(basename(path).to_string(), guid.trim().to_string());
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::InMemoryArchive;

    #[test]
    fn resolves_address_via_perfinfo_and_module_map() {
        let mut archive = InMemoryArchive::new()
            .with_file("perfinfo-42.map", "ImageLoad;foo.ni.dll;G;extra\n")
            .with_file(
                "foo.ni.{G}.map",
                "400000 1000 [corlib.dll] Foo::Bar\n",
            );
        let index = SymbolIndex::new(&mut archive);
        let (module, symbol) = index.resolve(42, "foo.ni.dll", 0x400010);
        assert_eq!(module, "corlib.dll");
        assert_eq!(symbol, "Foo::Bar");
    }

    #[test]
    fn missing_entries_are_non_fatal() {
        let index = SymbolIndex::default();
        let (module, symbol) = index.resolve(1, "unknown", 0x1000);
        assert_eq!(module, "unknown");
        assert_eq!(symbol, "unknown");
    }

    #[test]
    fn unrelated_archive_entries_are_ignored() {
        let mut archive = InMemoryArchive::new().with_file("readme.txt", "not a map file");
        let index = SymbolIndex::new(&mut archive);
        assert!(index.module_maps.is_empty());
        assert!(index.process_guids.is_empty());
    }
}
