//! Pure path algebra over slash-separated strings.
//!
//! All functions here are string-level: no filesystem access, no current
//! directory. Paths may be local (`a/b`, `/a/b`, `C:\a\b`) or URL-shaped
//! (`scheme://host/path`); the discriminator is [`is_url`].

use std::path::Path;

/// Check whether a string is URL-shaped (contains `://`).
///
/// A heuristic discriminator between local and network addressing,
/// not a full grammar check.
#[inline]
pub fn is_url(path: &str) -> bool {
    path.contains("://")
}

/// Check whether a path is absolute: URL-shaped or platform-rooted.
#[inline]
pub fn is_absolute(path: &str) -> bool {
    is_url(path) || Path::new(path).is_absolute()
}

/// Normalize a path: backslashes to slashes, trailing slash stripped,
/// `..` segments resolved left-to-right against whatever precedes them.
///
/// A leading `..` with nothing to its left stays in place, and the root
/// segment of an absolute path is never escaped. A leading `//` network
/// prefix is preserved literally.
///
/// # Examples
/// ```
/// use modfs::path::normalize;
/// assert_eq!(normalize("a/b/../c"), "a/c");
/// assert_eq!(normalize("a/../../b"), "../b");
/// assert_eq!(normalize(r"a\b\"), "a/b");
/// ```
pub fn normalize(path: &str) -> String {
    let forward = path.replace('\\', "/");
    let trimmed = forward.trim_end_matches('/');

    let mut out: Vec<&str> = Vec::new();
    for seg in trimmed.split('/') {
        if seg == ".." {
            match out.last() {
                // resolvable segment to the left: consume it
                Some(&prev) if prev != ".." && !(prev.is_empty() && out.len() == 1) => {
                    out.pop();
                }
                // unresolvable leading `..` (or root): error-tolerant no-op
                _ => out.push(seg),
            }
        } else {
            out.push(seg);
        }
    }

    out.join("/")
}

/// Resolve a path against an explicit base directory.
///
/// Absolute paths normalize directly; relative ones are joined with
/// `base_dir` first.
pub fn full_path(path: &str, base_dir: &str) -> String {
    if is_absolute(path) {
        return normalize(path);
    }
    combine(base_dir, path)
}

/// Join a base directory with a tail path. An absolute tail wins outright.
pub fn combine(base_dir: &str, tail: &str) -> String {
    if is_absolute(tail) {
        return normalize(tail);
    }
    if base_dir.is_empty() {
        return normalize(tail);
    }
    if tail.is_empty() {
        return normalize(base_dir);
    }
    normalize(&format!("{}/{}", base_dir.trim_end_matches('/'), tail))
}

/// Directory part of a path: everything before the last slash, `""` if none.
pub fn directory_name(path: &str) -> String {
    let norm = normalize(path);
    match norm.rfind('/') {
        Some(pos) => norm[..pos].to_string(),
        None => String::new(),
    }
}

/// Final component of a path.
pub fn file_name(path: &str) -> String {
    let norm = normalize(path);
    match norm.rfind('/') {
        Some(pos) => norm[pos + 1..].to_string(),
        None => norm,
    }
}

/// Compute the minimal relative form of `path` with respect to `dir`.
///
/// Returns `path` unchanged (normalized) when it is URL-shaped or when the
/// two share no common root segment; callers detect the fallback with
/// [`is_absolute`] on the result.
pub fn relative_to(path: &str, dir: &str) -> String {
    let target = normalize(path);
    let base = normalize(dir);

    if is_url(&target) {
        return target;
    }

    let tgt_parts: Vec<&str> = target.split('/').collect();
    let dir_parts: Vec<&str> = base.split('/').collect();

    if tgt_parts.is_empty() || dir_parts.is_empty() || tgt_parts[0] != dir_parts[0] {
        return target;
    }

    let mut rel = String::new();
    let mut i = 0;
    while i < dir_parts.len() {
        if i >= tgt_parts.len() || tgt_parts[i] != dir_parts[i] {
            for _ in i..dir_parts.len() {
                rel.push_str("../");
            }
            break;
        }
        i += 1;
    }

    for (j, part) in tgt_parts.iter().enumerate().skip(i) {
        if j != i {
            rel.push('/');
        }
        rel.push_str(part);
    }

    rel
}

/// First successful relative form of `path` against `dirs`, else `path`.
pub fn relative_to_first<'a, I>(path: &str, dirs: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    for dir in dirs {
        let rel = relative_to(path, dir);
        if !is_absolute(&rel) {
            return rel;
        }
    }
    normalize(path)
}

/// Check whether normalized `path` begins with directory `dir`.
///
/// An empty `dir` matches everything.
pub fn starts_with_directory(path: &str, dir: &str) -> bool {
    if dir.is_empty() {
        return true;
    }
    let prefix = format!("{}/", normalize(dir).trim_end_matches('/'));
    normalize(path).starts_with(&prefix)
}

/// Relative form of `path` against the first of `dirs` it starts with.
///
/// Returns `(relative, index)` where index is 1-based; index 0 means the
/// path is not relative to any of the directories and is returned as-is.
pub fn relative_path_that_starts_with<'a, I>(path: &str, dirs: I) -> (String, usize)
where
    I: IntoIterator<Item = &'a str>,
{
    for (i, dir) in dirs.into_iter().enumerate() {
        if starts_with_directory(path, dir) {
            return (relative_to(path, dir), i + 1);
        }
    }
    (path.to_string(), 0)
}

/// Longest shared leading-segment prefix of two paths.
pub fn common_path(path1: &str, path2: &str) -> String {
    if path1.is_empty() || path2.is_empty() {
        return String::new();
    }

    let a = normalize(path1);
    let b = normalize(path2);

    if a == b {
        return a;
    }

    let parts1: Vec<&str> = a.split('/').collect();
    let parts2: Vec<&str> = b.split('/').collect();
    let len = parts1.len().min(parts2.len());

    for i in 0..=len {
        if i == len || parts1[i] != parts2[i] {
            return parts1[..i].join("/");
        }
    }

    String::new()
}

/// Longest shared prefix over a sequence of paths; `""` means "none yet".
pub fn common_path_all<'a, I>(paths: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut common: Option<String> = None;

    for path in paths {
        common = Some(match common {
            None => normalize(path),
            Some(c) => common_path(&c, path),
        });
    }

    common.unwrap_or_default()
}

/// Replace path-hostile characters in a filename, including `..` runs.
pub fn strip_file_name(filename: &str) -> String {
    let mut stripped = filename.replace("..", "_");
    for ch in ['/', '\\', ':', '*', '?', '"', '<', '>', '|'] {
        stripped = stripped.replace(ch, "_");
    }
    stripped
}

/// Check that a filename carries no separator, wildcard, or fragment marker.
pub fn is_valid_file_name(filename: &str) -> bool {
    !filename.is_empty()
        && !filename
            .chars()
            .any(|ch| matches!(ch, '#' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_parent_segments() {
        assert_eq!(normalize("a/b/../c"), "a/c");
        assert_eq!(normalize("a/../../b"), "../b");
        assert_eq!(normalize("a/b/../../../c"), "../c");
        assert_eq!(normalize("/a/../b"), "/b");
        // root segment is never escaped
        assert_eq!(normalize("/../a"), "/../a");
    }

    #[test]
    fn test_normalize_separators() {
        assert_eq!(normalize(r"a\b\c"), "a/b/c");
        assert_eq!(normalize("a/b/"), "a/b");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_network_prefix() {
        assert_eq!(normalize("//server/share/x"), "//server/share/x");
        assert_eq!(normalize("//server/share/../x"), "//server/x");
    }

    #[test]
    fn test_normalize_idempotent() {
        for p in [
            "a/b/../c",
            "a/../../b",
            "//server/share",
            "/a/b/c",
            r"x\y\..\z",
            "",
            "../..",
        ] {
            let once = normalize(p);
            assert_eq!(normalize(&once), once, "not idempotent for {p:?}");
        }
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("http://example.com/a"));
        assert!(is_url("ftp://host"));
        assert!(!is_url("/a/b"));
        assert!(!is_url("a:b"));
    }

    #[test]
    fn test_is_absolute() {
        assert!(is_absolute("http://example.com"));
        assert!(is_absolute("/a/b"));
        assert!(!is_absolute("a/b"));
        assert!(!is_absolute("../a"));
    }

    #[test]
    fn test_combine() {
        assert_eq!(combine("/base", "tail/x"), "/base/tail/x");
        assert_eq!(combine("/base/", "tail"), "/base/tail");
        assert_eq!(combine("/base", "/abs/x"), "/abs/x");
        assert_eq!(combine("/base", "http://h/x"), "http://h/x");
        assert_eq!(combine("", "a/b"), "a/b");
    }

    #[test]
    fn test_full_path() {
        assert_eq!(full_path("/abs/x", "/base"), "/abs/x");
        assert_eq!(full_path("rel/x", "/base"), "/base/rel/x");
        assert_eq!(full_path("../x", "/base/sub"), "/base/x");
    }

    #[test]
    fn test_directory_and_file_name() {
        assert_eq!(directory_name("/a/b/c.txt"), "/a/b");
        assert_eq!(file_name("/a/b/c.txt"), "c.txt");
        assert_eq!(directory_name("c.txt"), "");
        assert_eq!(file_name("c.txt"), "c.txt");
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(relative_to("/a/b/c.txt", "/a/b"), "c.txt");
        assert_eq!(relative_to("/a/x/y", "/a/b"), "../x/y");
        assert_eq!(relative_to("/a/b", "/a/b/c"), "../");
    }

    #[test]
    fn test_relative_to_fallbacks() {
        // URL-shaped target is returned unchanged
        let url = "http://h/a/b";
        assert_eq!(relative_to(url, "/a"), url);
        assert!(is_absolute(&relative_to(url, "/a")));
        // no common root segment
        assert_eq!(relative_to("/x/y", "q/w"), "/x/y");
    }

    #[test]
    fn test_relative_to_round_trip() {
        for (p, dir) in [
            ("/a/b/c.txt", "/a/b"),
            ("/a/x/y", "/a/b"),
            ("/root/deep/file", "/root/other/sub"),
        ] {
            let rel = relative_to(p, dir);
            assert!(!is_absolute(&rel));
            assert_eq!(combine(dir, &rel), normalize(p));
        }
    }

    #[test]
    fn test_relative_to_first() {
        assert_eq!(relative_to_first("/a/b/c", ["/x", "/a/b"]), "c");
        assert_eq!(relative_to_first("/a/b/c", ["/x", "/y"]), "/a/b/c");
    }

    #[test]
    fn test_starts_with_directory() {
        assert!(starts_with_directory("/a/b/c", "/a/b"));
        assert!(starts_with_directory("/a/b/c", "/a/b/"));
        assert!(!starts_with_directory("/a/bc/d", "/a/b"));
        // identical path is not "inside" the directory
        assert!(!starts_with_directory("/a/b", "/a/b"));
    }

    #[test]
    fn test_starts_with_empty_directory_always_true() {
        for p in ["", "/a", "a/b", "http://h/x"] {
            assert!(starts_with_directory(p, ""));
        }
    }

    #[test]
    fn test_relative_path_that_starts_with() {
        let (rel, idx) = relative_path_that_starts_with("/a/b/c", ["/x", "/a"]);
        assert_eq!((rel.as_str(), idx), ("b/c", 2));

        let (rel, idx) = relative_path_that_starts_with("/a/b/c", ["/x", "/y"]);
        assert_eq!((rel.as_str(), idx), ("/a/b/c", 0));
    }

    #[test]
    fn test_common_path() {
        assert_eq!(common_path("/a/b/c", "/a/b/d"), "/a/b");
        assert_eq!(common_path("/a/b", "/a/b"), "/a/b");
        assert_eq!(common_path("/a/b", "/a/b/c"), "/a/b");
        assert_eq!(common_path("/a", "/x"), "");
        assert_eq!(common_path("", "/a"), "");
    }

    #[test]
    fn test_common_path_all() {
        assert_eq!(common_path_all(["/a/b/c", "/a/b/d", "/a/x"]), "/a");
        assert_eq!(common_path_all(["/a/b"]), "/a/b");
        assert_eq!(common_path_all(std::iter::empty::<&str>()), "");
    }

    #[test]
    fn test_strip_file_name() {
        assert_eq!(strip_file_name("a..b/c"), "a_b_c");
        assert_eq!(strip_file_name("plain.txt"), "plain.txt");
    }

    #[test]
    fn test_is_valid_file_name() {
        assert!(is_valid_file_name("site.css"));
        assert!(!is_valid_file_name("a#b"));
        assert!(!is_valid_file_name("a/b"));
        assert!(!is_valid_file_name(""));
    }
}
