//! The driver: skips the preamble, then repeatedly reads one header, decides
//! the event kind, optionally reads a scheduler payload, reads frames until
//! end-of-sample, and emits one [`Event`] per iteration.

use std::io::Read;

use regex::Regex;

use crate::config::ParserConfig;
use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::event::{Event, EventKind, Frame};
use crate::frame;
use crate::scheduler;
use crate::symbol_index::SymbolIndex;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// A lazy, bounded sequence of [`Event`]s parsed from `perf script` text
/// output. Implements `Iterator<Item = Result<Event>>`: every pull parses
/// exactly one event out of the underlying reader, or propagates a
/// [`Error::Format`] / [`Error::UnexpectedEndOfStream`] and then stops.
///
/// Not `Sync`: the event counter is a plain field with no internal locking.
/// Callers sharing one parser across threads must synchronize externally.
pub struct EventStreamParser<R> {
    cursor: ByteCursor<R>,
    pattern: Option<Regex>,
    symbol_index: Option<SymbolIndex>,
    max_samples: u64,
    event_count: u64,
    terminated: bool,
}

impl<R: Read> EventStreamParser<R> {
    /// Builds a parser over `reader`, skipping a leading UTF-8 BOM and any
    /// `#`-prefixed comment lines before the first event.
    pub fn new(reader: R, config: ParserConfig) -> Self {
        let mut cursor = ByteCursor::new(reader);
        skip_bom(&mut cursor);
        skip_preamble(&mut cursor);
        EventStreamParser {
            cursor,
            pattern: config.pattern,
            symbol_index: config.symbol_index,
            max_samples: config.max_samples_or_default(),
            event_count: 0,
            terminated: false,
        }
    }

    /// Cumulative count of events emitted so far.
    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    fn is_end_of_sample(&mut self) -> bool {
        let current = self.cursor.current();
        if current == 0 || self.cursor.end_of_stream() {
            return true;
        }
        if current == b'\n' {
            let next = self.cursor.peek(1);
            return next == b'\n' || next == b'\r' || next == 0;
        }
        false
    }

    /// Finishes the current header/frame line (consumes up to and past the
    /// next `\n`), used both after a header and after each skipped frame
    /// line of a filtered-out event.
    fn finish_line(&mut self) {
        self.cursor.skip_until(b'\n');
        if !self.cursor.end_of_stream() {
            self.cursor.advance();
        }
    }

    /// Consumes the remainder of a filtered-out event's header plus all of
    /// its frame lines, without building any `Frame`s.
    fn skip_to_end_of_sample(&mut self) {
        self.finish_line();
        while !self.is_end_of_sample() {
            self.finish_line();
        }
    }

    /// Parses one event. `Ok(None)` means the event was filtered out by
    /// `pattern` and nothing should be emitted (and the cap should not be
    /// charged for it).
    fn parse_one_event(&mut self) -> Result<Option<Event>> {
        let command = read_command(&mut self.cursor);

        let pid = self.cursor.read_int_decimal()?;
        expect_byte(&mut self.cursor, b'/')?;
        let tid = self.cursor.read_int_decimal()?;

        self.cursor.skip_whitespace();
        expect_byte(&mut self.cursor, b'[')?;
        let cpu = self.cursor.read_int_decimal()?;
        expect_byte(&mut self.cursor, b']')?;

        self.cursor.skip_whitespace();
        let mut seconds_text = String::new();
        self.cursor.read_ascii_until(b':', &mut seconds_text);
        let seconds_offset = self.cursor.offset();
        let seconds: f64 = seconds_text.trim().parse().map_err(|_| Error::Format {
            offset: seconds_offset,
            message: format!("invalid timestamp {seconds_text:?}"),
        })?;
        let time_msec = seconds * 1000.0;
        expect_byte(&mut self.cursor, b':')?;

        self.cursor.skip_whitespace();
        let time_property = if self.cursor.current().is_ascii_digit() {
            self.cursor.read_int_decimal()?
        } else {
            -1
        };

        self.cursor.skip_whitespace();
        let mut event_name = String::new();
        self.cursor.read_ascii_until(b':', &mut event_name);
        expect_byte(&mut self.cursor, b':')?;

        // One lookahead: peek the rest of the line to decide the event kind
        // and apply the filter before committing to a parse strategy.
        let mark = self.cursor.mark();
        let mut event_detail = String::new();
        self.cursor.read_ascii_until(b'\n', &mut event_detail);
        let event_detail = event_detail.trim().to_string();
        // perf's own text usually reports this tracepoint as "sched:sched_switch",
        // so the colon-delimited event_name field above captures only "sched" and
        // the rest ("sched_switch: prev_comm=...") lands in event_detail; but the
        // bare event name "sched_switch" (with no subsystem prefix) is accepted
        // too, since callers may configure perf to record the tracepoint directly.
        let kind = if event_name == "sched_switch" || event_detail.starts_with("sched_switch") {
            EventKind::Scheduler
        } else {
            EventKind::Cpu
        };

        let filtered_out = match &self.pattern {
            Some(re) => !re.is_match(&event_name),
            None => false,
        };

        if filtered_out {
            self.cursor.restore(mark);
            self.skip_to_end_of_sample();
            return Ok(None);
        }

        let schedule_switch = if kind == EventKind::Scheduler {
            self.cursor.restore(mark);
            let switch = scheduler::read(&mut self.cursor)?;
            Some(switch)
        } else {
            self.cursor.clear_mark();
            None
        };

        self.finish_line();

        let mut frames = Vec::new();
        while !self.is_end_of_sample() {
            frames.push(frame::read(
                &mut self.cursor,
                pid,
                self.symbol_index.as_ref(),
            ));
        }
        frames.push(Frame::ThreadFrame {
            id: tid,
            name: "Thread".to_string(),
        });
        frames.push(Frame::ProcessFrame {
            name: command.clone(),
        });

        log::trace!(
            "parsed event {event_name:?} pid={pid} tid={tid} frames={}",
            frames.len()
        );

        self.cursor.compact();

        Ok(Some(Event {
            command,
            pid,
            tid,
            cpu: cpu.max(0) as u32,
            time_msec,
            time_property,
            event_name,
            event_detail,
            frames,
            period: 0.0,
            kind,
            schedule_switch,
        }))
    }
}

impl<R: Read> Iterator for EventStreamParser<R> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.terminated {
            return None;
        }
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.end_of_stream() {
                return None;
            }
            match self.parse_one_event() {
                Ok(None) => continue,
                Ok(Some(event)) => {
                    self.event_count += 1;
                    if self.event_count > self.max_samples {
                        self.terminated = true;
                    }
                    return Some(Ok(event));
                }
                Err(e) => {
                    self.terminated = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

fn expect_byte<R: Read>(cursor: &mut ByteCursor<R>, expected: u8) -> Result<()> {
    if cursor.current() != expected {
        return Err(Error::Format {
            offset: cursor.offset(),
            message: format!(
                "expected {:?} but found {:?}",
                expected as char, cursor.current() as char
            ),
        });
    }
    cursor.advance();
    Ok(())
}

fn skip_bom<R: Read>(cursor: &mut ByteCursor<R>) {
    if cursor.current() == UTF8_BOM[0]
        && cursor.peek(1) == UTF8_BOM[1]
        && cursor.peek(2) == UTF8_BOM[2]
    {
        cursor.advance();
        cursor.advance();
        cursor.advance();
    }
}

fn skip_preamble<R: Read>(cursor: &mut ByteCursor<R>) {
    loop {
        cursor.skip_whitespace();
        if cursor.current() == b'#' {
            cursor.skip_until(b'\n');
        } else {
            break;
        }
    }
}

/// Reads `command`: whitespace-separated tokens, stopping the moment the
/// next token begins with a decimal digit (the `<pid>/<tid>` token), as long
/// as at least one token has already been accumulated.
fn read_command<R: Read>(cursor: &mut ByteCursor<R>) -> String {
    let mut command = String::new();
    loop {
        cursor.skip_whitespace();
        if !command.is_empty() && cursor.current().is_ascii_digit() {
            break;
        }
        if cursor.end_of_stream() || cursor.current() == b'\n' {
            break;
        }
        let mut token = String::new();
        cursor.read_ascii_while(|b| !b.is_ascii_whitespace() && b != 0, &mut token);
        if token.is_empty() {
            break;
        }
        if !command.is_empty() {
            command.push(' ');
        }
        command.push_str(&token);
    }
    command
}
