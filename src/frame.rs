//! Reads a single stack-frame line: `<hexaddr> <symbol-text> (<module-text>)`.

use std::io::Read;

use crate::cursor::ByteCursor;
use crate::event::Frame;
use crate::ms_map;
use crate::path_util::basename;
use crate::symbol_index::SymbolIndex;

const UNKNOWN: &str = "unknown";

fn strip_one_outer_pair(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'(' && last == b')') || (first == b'[' && last == b']') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Reads one `StackFrame` from the cursor, applying [`ms_map`] decoding and
/// [`SymbolIndex`] resolution as described in the crate's design.
pub fn read<R: Read>(cursor: &mut ByteCursor<R>, pid: i32, index: Option<&SymbolIndex>) -> Frame {
    cursor.skip_whitespace();
    let mut address = String::new();
    cursor.read_ascii_until(b' ', &mut address);
    cursor.skip_whitespace();

    let mut rest_of_line = String::new();
    cursor.read_ascii_until(b'\n', &mut rest_of_line);
    if !cursor.end_of_stream() {
        cursor.advance(); // consume '\n'
    }

    let (symbol_text, module_text) = match rest_of_line.rfind('(') {
        Some(idx) => (&rest_of_line[..idx], &rest_of_line[idx..]),
        None => (rest_of_line.as_str(), ""),
    };

    let mut symbol = strip_one_outer_pair(symbol_text.trim()).to_string();
    let module_text = strip_one_outer_pair(module_text.trim());

    if module_text.ends_with(".map") {
        let (_decoded_module, decoded_symbol) = ms_map::decode(&symbol, module_text);
        symbol = if !decoded_symbol.is_empty() {
            decoded_symbol
        } else {
            module_text.to_string()
        };
    }

    let mut module = basename(module_text).to_string();

    if let Some(index) = index {
        if module == UNKNOWN || symbol == UNKNOWN {
            if let Ok(addr) = u64::from_str_radix(address.trim_start_matches("0x"), 16) {
                let (resolved_module, resolved_symbol) = index.resolve(pid, &module, addr);
                module = resolved_module;
                symbol = resolved_symbol;
            } else {
                log::warn!("could not parse frame address {address:?} for symbol resolution");
            }
        }
    }

    Frame::StackFrame {
        address,
        module,
        symbol,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_line(line: &str, pid: i32, index: Option<&SymbolIndex>) -> Frame {
        let mut cursor = ByteCursor::new(line.as_bytes());
        read(&mut cursor, pid, index)
    }

    #[test]
    fn reads_a_plain_stack_frame() {
        let frame = read_line("aaaaaaaa func+0x10 (/lib/x.so)\n", 1, None);
        assert_eq!(
            frame,
            Frame::StackFrame {
                address: "aaaaaaaa".to_string(),
                module: "x.so".to_string(),
                symbol: "func+0x10".to_string(),
            }
        );
    }

    #[test]
    fn strips_one_outer_pair_from_symbol_and_module() {
        let frame = read_line("1 [sym] (module)\n", 1, None);
        assert_eq!(
            frame,
            Frame::StackFrame {
                address: "1".to_string(),
                module: "module".to_string(),
                symbol: "sym".to_string(),
            }
        );
    }

    #[test]
    fn decodes_embedded_map_symbol() {
        let frame = read_line("400010 [corlib.dll] Foo::Bar (proc.map)\n", 1, None);
        assert_eq!(
            frame,
            Frame::StackFrame {
                address: "400010".to_string(),
                module: "proc.map".to_string(),
                symbol: "Foo::Bar".to_string(),
            }
        );
    }

    #[test]
    fn resolves_unknown_frame_via_symbol_index() {
        use crate::archive::InMemoryArchive;

        let mut archive = InMemoryArchive::new()
            .with_file("perfinfo-42.map", "ImageLoad;foo.ni.dll;G;extra\n")
            .with_file("foo.ni.{G}.map", "400000 1000 [corlib.dll] Foo::Bar\n");
        let index = SymbolIndex::new(&mut archive);

        let frame = read_line("400010 unknown (foo.ni.dll)\n", 42, Some(&index));
        assert_eq!(
            frame,
            Frame::StackFrame {
                address: "400010".to_string(),
                module: "corlib.dll".to_string(),
                symbol: "Foo::Bar".to_string(),
            }
        );
    }
}
