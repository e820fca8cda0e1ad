//! DN (distinguished name) utilities
//!
//! A DN is a `/`-separated list of RNs: `root/ns-[kube-system]/app-[dns]`.
//! A `/` inside square brackets belongs to the RN (`image-[kubevious/ui]`),
//! so splitting tracks bracket depth instead of splitting on every `/`.

/// Separator between RNs
pub const SEPARATOR: char = '/';

/// Characters replaced by `_` when a DN segment is used as a path component
const UNSAFE_PATH_CHARS: &[char] = &[
    '/', '\\', '#', '%', '&', '*', '\'', '"', '{', '}', '<', '>', '@', ':', '+', '|', '=', '?',
    '!',
];

/// Byte offsets of every top-level separator in `dn`
fn separator_positions(dn: &str) -> impl Iterator<Item = usize> + '_ {
    let mut depth: usize = 0;
    dn.char_indices().filter_map(move |(idx, ch)| {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            SEPARATOR if depth == 0 => return Some(idx),
            _ => {}
        }
        None
    })
}

/// Split a DN into its RN segments
///
/// ```rust
/// use state_registry::shared::dn::split_dn;
///
/// assert_eq!(
///     split_dn("root/ns-[kubevious]/image-[kubevious/ui]"),
///     vec!["root", "ns-[kubevious]", "image-[kubevious/ui]"]
/// );
/// ```
pub fn split_dn(dn: &str) -> Vec<&str> {
    if dn.is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut start = 0;
    for pos in separator_positions(dn) {
        segments.push(&dn[start..pos]);
        start = pos + SEPARATOR.len_utf8();
    }
    segments.push(&dn[start..]);
    segments
}

/// Parent DN, or `None` for a single-segment DN
pub fn parent_dn(dn: &str) -> Option<&str> {
    let last = separator_positions(dn).last()?;
    let parent = &dn[..last];
    if parent.is_empty() {
        None
    } else {
        Some(parent)
    }
}

/// Last RN of a DN
pub fn rn_of(dn: &str) -> &str {
    match separator_positions(dn).last() {
        Some(last) => &dn[last + SEPARATOR.len_utf8()..],
        None => dn,
    }
}

/// Append an RN to a parent DN
pub fn make_dn(parent: &str, rn: &str) -> String {
    if parent.is_empty() {
        return rn.to_string();
    }
    let mut dn = String::with_capacity(parent.len() + rn.len() + 1);
    dn.push_str(parent);
    dn.push(SEPARATOR);
    dn.push_str(rn);
    dn
}

/// Sanitized path components of a DN
///
/// Path-unsafe characters inside each segment become `_`. Empty segments are
/// dropped and `.` / `..` become `_`, so the components always stay below
/// the directory they are pushed onto.
pub fn dn_path_segments(dn: &str) -> Vec<String> {
    split_dn(dn)
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment {
            "." | ".." => "_".to_string(),
            _ => segment.replace(UNSAFE_PATH_CHARS, "_"),
        })
        .collect()
}

/// Sanitize a DN for use as a relative file path
pub fn sanitize_dn_path(dn: &str) -> String {
    dn_path_segments(dn).join("/")
}
