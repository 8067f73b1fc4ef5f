//! Parses the `prev_comm=... ==> next_comm=...` payload that follows the
//! event name when an event is a `sched_switch`.

use std::io::Read;

use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::event::ScheduleSwitch;

/// Reads one scheduler-switch payload starting at the current position.
/// Leaves the cursor just past `next_prio=<value>`; the caller is
/// responsible for consuming the rest of the line.
pub fn read<R: Read>(cursor: &mut ByteCursor<R>) -> Result<ScheduleSwitch> {
    let previous_command = read_labeled_string(cursor)?;
    cursor.skip_whitespace();
    let previous_tid = read_labeled_int(cursor)?;
    cursor.skip_whitespace();
    let previous_priority = read_labeled_int(cursor)?;
    cursor.skip_whitespace();
    let previous_state = read_labeled_char(cursor)?;
    cursor.skip_whitespace();
    skip_arrow_token(cursor)?;
    cursor.skip_whitespace();
    let next_command = read_labeled_string(cursor)?;
    cursor.skip_whitespace();
    let next_tid = read_labeled_int(cursor)?;
    cursor.skip_whitespace();
    let next_priority = read_labeled_int(cursor)?;

    Ok(ScheduleSwitch {
        previous_command,
        previous_tid,
        previous_priority,
        previous_state,
        next_command,
        next_tid,
        next_priority,
    })
}

fn advance_over_equals<R: Read>(cursor: &mut ByteCursor<R>) -> Result<()> {
    if cursor.end_of_stream() {
        return Err(Error::UnexpectedEndOfStream {
            offset: cursor.offset(),
        });
    }
    cursor.advance(); // consume '='
    Ok(())
}

fn read_labeled_string<R: Read>(cursor: &mut ByteCursor<R>) -> Result<String> {
    cursor.skip_until(b'=');
    advance_over_equals(cursor)?;
    let mut value = String::new();
    cursor.read_ascii_while(|b| b != b' ' && b != b'\n' && b != 0, &mut value);
    Ok(value)
}

fn read_labeled_int<R: Read>(cursor: &mut ByteCursor<R>) -> Result<i32> {
    cursor.skip_until(b'=');
    advance_over_equals(cursor)?;
    cursor.read_int_decimal()
}

fn read_labeled_char<R: Read>(cursor: &mut ByteCursor<R>) -> Result<char> {
    cursor.skip_until(b'=');
    advance_over_equals(cursor)?;
    let byte = cursor.current();
    cursor.advance();
    Ok(byte as char)
}

/// The `==>` separator, consumed as a literal three-byte token rather than
/// by hunting for the byte `n` (see the crate's design notes: the original
/// "skip to the next `n`" trick is fragile and depends on the exact
/// surrounding text).
fn skip_arrow_token<R: Read>(cursor: &mut ByteCursor<R>) -> Result<()> {
    for expected in b"==>" {
        if cursor.current() != *expected {
            return Err(Error::Format {
                offset: cursor.offset(),
                message: "expected '==>' separator in scheduler switch payload".to_string(),
            });
        }
        cursor.advance();
    }
    Ok(())
}
