//! Object name disambiguation suffixes.
//!
//! Hosts keep names unique by appending `.` and digits (`Cube.001`). These
//! helpers split that suffix off again.

/// Separator between a base name and its numeric suffix.
pub const SUFFIX_SEPARATOR: char = '.';

/// Split `name` into its base and numeric suffix.
///
/// Only a non-empty run of ASCII digits after the last separator counts as a
/// suffix: `Cube.001` -> (`Cube`, Some(1)), `My.Part.2` -> (`My.Part`, Some(2)),
/// `v1.beta` -> (`v1.beta`, None).
pub fn split_suffix(name: &str) -> (&str, Option<u32>) {
    let Some(pos) = name.rfind(SUFFIX_SEPARATOR) else {
        return (name, None);
    };
    let (base, digits) = (&name[..pos], &name[pos + 1..]);
    if base.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return (name, None);
    }
    match digits.parse::<u32>() {
        Ok(n) => (base, Some(n)),
        Err(_) => (name, None),
    }
}

/// Name with any disambiguation suffix removed.
pub fn base_name(name: &str) -> &str {
    split_suffix(name).0
}

/// Pick a name not rejected by `taken`.
///
/// Returns `requested` if free, else `<base>.NNN` with the lowest free `NNN`.
pub fn unique_name(requested: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(requested) {
        return requested.to_string();
    }
    let base = base_name(requested);
    (1u32..)
        .map(|n| format!("{base}{SUFFIX_SEPARATOR}{n:03}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| requested.to_string())
}
