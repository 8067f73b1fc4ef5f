//! Decodes the embedded `[module-path] symbol-text` form that PerfView-style
//! `.map` files use to record a symbol's defining module inline.

/// Given a symbol string of the form `[module-path] symbol-text`, returns
/// `(module_path, symbol_text)`. If no bracketed prefix is found anywhere in
/// the input, returns `(input, fallback_module)`.
///
/// Scans token by token (space-separated): the first token that both starts
/// with `[` and ends with `]` is taken as the module, and everything after
/// that token in the original string (trimmed) is the symbol.
pub fn decode(input: &str, fallback_module: &str) -> (String, String) {
    let mut search_from = 0usize;
    for token in input.split_whitespace() {
        let Some(rel) = input[search_from..].find(token) else {
            continue;
        };
        let token_start = search_from + rel;
        let token_end = token_start + token.len();
        if token.len() >= 2 && token.starts_with('[') && token.ends_with(']') {
            let module = &token[1..token.len() - 1];
            let symbol = input[token_end..].trim();
            return (module.to_string(), symbol.to_string());
        }
        search_from = token_end;
    }
    (input.to_string(), fallback_module.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_bracketed_module_and_symbol() {
        let (module, symbol) = decode("[corlib.dll] Foo::Bar", "unknown");
        assert_eq!(module, "corlib.dll");
        assert_eq!(symbol, "Foo::Bar");
    }

    #[test]
    fn falls_back_when_no_bracket_present() {
        let (module, symbol) = decode("Foo::Bar", "ntdll.dll");
        assert_eq!(module, "Foo::Bar");
        assert_eq!(symbol, "ntdll.dll");
    }

    #[test]
    fn bracket_with_no_trailing_symbol_yields_empty_symbol() {
        let (module, symbol) = decode("[corlib.dll]", "unknown");
        assert_eq!(module, "corlib.dll");
        assert_eq!(symbol, "");
    }

    #[test]
    fn bracket_can_appear_after_leading_tokens() {
        let (module, symbol) = decode("prefix [mscorlib.ni.dll] Some::Method", "unknown");
        assert_eq!(module, "mscorlib.ni.dll");
        assert_eq!(symbol, "Some::Method");
    }
}
