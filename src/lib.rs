//! A streaming parser for the textual output of `perf script`, with a
//! side-channel symbol resolution engine for frames whose module or symbol
//! comes out of the text as `unknown`.
//!
//! The crate is split into the same two tightly coupled subsystems that
//! motivate it:
//!
//!   - [`EventStreamParser`] consumes a `Read` byte stream and yields a
//!     lazy, bounded sequence of [`Event`]s without ever buffering the
//!     whole input. It is built on top of a small internal byte-cursor
//!     primitive that every other parser in the crate (frame lines,
//!     scheduler-switch payloads, symbol-map files) also uses.
//!   - [`SymbolIndex`] reads an archive of packaged `.map` / `perfinfo`
//!     side-channel files into per-module [`IntervalMap`]s and resolves
//!     `(pid, module, address)` lookups in `O(log n)`. It is consulted by
//!     the parser per-frame whenever a frame's module or symbol is
//!     `unknown`.
//!
//! Archive access and decompression are out of scope for this crate (see
//! the crate's design notes): [`Archive`] is the narrow trait
//! [`SymbolIndex::new`] reads through, modeled on how `samply-symbols`
//! mediates all file access through a `FileAndPathHelper` trait rather than
//! naming a concrete container format.
//!
//! # Example
//!
//! ```
//! use samply_perf_script::{EventStreamParser, ParserConfig};
//!
//! let input = "proc 1234/5678 [003] 10.500: 1 cycles:\n\
//!     \taaaaaaaa func+0x10 (/lib/x.so)\n\n";
//!
//! let mut parser = EventStreamParser::new(input.as_bytes(), ParserConfig::new());
//! let event = parser.next().unwrap().unwrap();
//! assert_eq!(event.event_name, "cycles");
//! assert_eq!(event.time_msec, 10500.0);
//! ```

mod archive;
mod config;
mod cursor;
mod error;
mod event;
mod frame;
mod interval;
mod ms_map;
mod parser;
mod path_util;
mod scheduler;
mod symbol_index;

pub use archive::{Archive, ArchiveEntry, InMemoryArchive, InMemoryEntry};
pub use config::{ParserConfig, DEFAULT_MAX_SAMPLES};
pub use error::{Error, Result};
pub use event::{Event, EventKind, Frame, ScheduleSwitch};
pub use interval::{Interval, IntervalMap};
pub use parser::EventStreamParser;
pub use symbol_index::SymbolIndex;

// Re-exported so callers can build a `ParserConfig::with_pattern` without
// adding their own `regex` dependency just to match this crate's version.
pub use regex;
