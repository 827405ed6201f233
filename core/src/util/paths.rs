//! String-level path handling for integration directories.
//!
//! Directories come from the orchestration engine and may use either Windows
//! (`c:\artifacts`) or Unix (`/srv/build`) form regardless of the host, so
//! rooting and joining are decided on the text itself rather than through
//! `std::path`.

/// True for `/x`, `\x`, `\\server\share` and drive forms like `c:\x` or `c:/x`.
pub fn is_rooted(path: &str) -> bool {
    if path.starts_with('/') || path.starts_with('\\') {
        return true;
    }
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Separator already in use by `base`: backslash when the base only contains
/// backslashes, forward slash otherwise.
pub fn separator_of(base: &str) -> char {
    if base.contains('\\') && !base.contains('/') {
        '\\'
    } else {
        '/'
    }
}

/// Join `rel` onto `base`. A rooted `rel` replaces the base entirely; an empty
/// `rel` yields the base unchanged.
pub fn join(base: &str, rel: &str) -> String {
    if rel.is_empty() {
        return base.to_string();
    }
    if base.is_empty() || is_rooted(rel) {
        return rel.to_string();
    }
    let sep = separator_of(base);
    if base.ends_with(['/', '\\']) {
        format!("{}{}", base, rel)
    } else {
        format!("{}{}{}", base, sep, rel)
    }
}

/// Resolve an optional directory against a base directory.
pub fn resolve(base: &str, dir: &str) -> String {
    let dir = dir.trim();
    if dir.is_empty() {
        base.to_string()
    } else {
        join(base, dir)
    }
}
