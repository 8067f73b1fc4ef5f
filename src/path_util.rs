//! Path-like helpers for module names.
//!
//! `perf script` module strings can come from a Linux build (`/`-separated)
//! or be embedded symbols recorded by a Windows/.NET tool that used `\`
//! (see [`crate::ms_map`]). Neither `std::path` nor `Path::file_name` is
//! appropriate here, since Linux module names can contain bytes that are
//! illegal in a Windows path; both separators are recognized as plain
//! bytes instead.

/// The path component after the last `/` or `\`, or the whole string if
/// neither separator appears.
pub fn basename(path: &str) -> &str {
    let slash = path.rfind('/');
    let backslash = path.rfind('\\');
    match slash.into_iter().chain(backslash).max() {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// The basename with its final `.ext` suffix (if any) removed.
pub fn strip_extension(basename: &str) -> &str {
    match basename.rfind('.') {
        Some(idx) => &basename[..idx],
        None => basename,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basename_handles_both_separators() {
        assert_eq!(basename("/lib/x86_64/libc.so"), "libc.so");
        assert_eq!(basename(r"C:\Windows\System32\ntdll.dll"), "ntdll.dll");
        assert_eq!(basename("no-separator"), "no-separator");
        assert_eq!(basename("mixed/path\\thing.map"), "thing.map");
    }

    #[test]
    fn strip_extension_removes_last_suffix_only() {
        assert_eq!(strip_extension("foo.ni.dll"), "foo.ni");
        assert_eq!(strip_extension("perf-1234.map"), "perf-1234");
        assert_eq!(strip_extension("no-extension"), "no-extension");
    }
}
