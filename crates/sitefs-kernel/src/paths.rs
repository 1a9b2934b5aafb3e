//! Logical and physical path helpers.
//!
//! Logical paths are site-relative, always use `/`, and compare
//! case-insensitively. Physical paths live on the backing storage and follow
//! a [`PathStyle`]; they are handled as strings so that Windows-style
//! configurations can be resolved (and tested) on any host.
//!
//! Everything here is pure except [`canonicalize_physical`], which reads
//! environment variables, and [`anchor_physical`], which reads the process
//! working directory for relative native paths. Only configured paths are
//! expanded; request-supplied segments never are.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, ResolveResult};

/// Characters accepted as separators when trimming mixed input.
pub const SEPARATORS: &[char] = &['/', '\\'];

/// Separator convention of physical paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStyle {
    /// `/` separated, rooted at `/`.
    Unix,
    /// `\` separated (`/` also accepted), drive or UNC prefixed.
    Windows,
}

impl PathStyle {
    /// Style of the host we are running on.
    pub const fn native() -> Self {
        if cfg!(windows) {
            PathStyle::Windows
        } else {
            PathStyle::Unix
        }
    }

    /// Separator used when building paths.
    pub fn separator(self) -> char {
        match self {
            PathStyle::Unix => '/',
            PathStyle::Windows => '\\',
        }
    }

    /// Returns true if `c` separates components in this style.
    pub fn is_separator(self, c: char) -> bool {
        match self {
            PathStyle::Unix => c == '/',
            PathStyle::Windows => c == '/' || c == '\\',
        }
    }

    /// Returns true if `path` does not depend on a working directory.
    pub fn is_absolute(self, path: &str) -> bool {
        match self {
            PathStyle::Unix => path.starts_with('/'),
            PathStyle::Windows => split_windows(path).1,
        }
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::native()
    }
}

/// Direction for [`normalize_separators`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeparatorDirection {
    /// `/` becomes the physical style's separator.
    ToPhysical,
    /// `\` becomes `/`.
    ToLogical,
}

// ============================================================================
// Logical paths
// ============================================================================

/// Case-insensitive string equality (Unicode lower-case folding).
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
        || a.chars()
            .flat_map(char::to_lowercase)
            .eq(b.chars().flat_map(char::to_lowercase))
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// How deeply `candidate` matches the front of `target`.
///
/// Returns 0 when `candidate` is not a segment-aligned prefix of `target`.
/// Otherwise returns one for the root plus one per matched segment, so `/`
/// matches everything with 1 and `/a/b` matches `/a/b/c` with 3. Comparison
/// is case-insensitive; `/ap` does not match `/app`.
pub fn prefix_segments(candidate: &str, target: &str) -> usize {
    let mut target_segments = segments(target);
    let mut matched = 1;
    for segment in segments(candidate) {
        match target_segments.next() {
            Some(t) if eq_ignore_case(segment, t) => matched += 1,
            _ => return 0,
        }
    }
    matched
}

/// Remove `prefix` from the start of `path` (case-insensitive), if present.
///
/// Case folding can change a character's byte length (`\u{212A}` KELVIN SIGN
/// folds to `k`), so the split point is searched on `path`'s own character
/// boundaries rather than taken from `prefix.len()`.
pub fn trim_start<'a>(path: &'a str, prefix: &str) -> &'a str {
    if prefix.is_empty() {
        return path;
    }
    if path
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    {
        return &path[prefix.len()..];
    }
    path.char_indices()
        .map(|(idx, c)| idx + c.len_utf8())
        .find(|&end| eq_ignore_case(&path[..end], prefix))
        .map_or(path, |end| &path[end..])
}

/// Drop the final `/`-delimited segment: `/a/b` → `/a`, `/a` → `/`.
///
/// The root has no parent; returns `None` for `/`.
pub fn remove_last_segment(path: &str) -> Option<&str> {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.rfind('/') {
        Some(0) | None => Some("/"),
        Some(idx) => Some(&trimmed[..idx]),
    }
}

/// Final segment of a logical path; empty for the root.
pub fn last_segment(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or("")
}

/// Convert separators between logical and physical form.
pub fn normalize_separators(path: &str, direction: SeparatorDirection, style: PathStyle) -> String {
    match direction {
        SeparatorDirection::ToPhysical => path.replace('/', &style.separator().to_string()),
        SeparatorDirection::ToLogical => path.replace('\\', "/"),
    }
}

/// Validate and normalize an incoming logical path.
///
/// Backslashes are folded to `/`, runs of `/` collapse to one, and a
/// missing leading `/` is added, so `a//docs\x` becomes `/a/docs/x`. A
/// single trailing `/` is kept. Empty input is rejected.
pub fn logical_path(path: &str) -> ResolveResult<String> {
    if path.is_empty() {
        return Err(ResolveError::invalid_argument("logical path is empty"));
    }
    let folded = normalize_separators(path, SeparatorDirection::ToLogical, PathStyle::Unix);
    let mut out = String::with_capacity(folded.len() + 1);
    out.push('/');
    for c in folded.chars() {
        if c != '/' || !out.ends_with('/') {
            out.push(c);
        }
    }
    Ok(out)
}

// ============================================================================
// Physical paths
// ============================================================================

/// Split a Windows path into (prefix, rooted, remainder).
///
/// The prefix is a drive (`C:`) or UNC share (`\\server\share`). UNC paths
/// are always rooted.
fn split_windows(path: &str) -> (&str, bool, &str) {
    let is_sep = |c: char| c == '/' || c == '\\';
    let mut chars = path.chars();
    let first = chars.next();
    let second = chars.next();

    if let (Some(a), Some(b)) = (first, second) {
        if is_sep(a) && is_sep(b) {
            let rest = &path[2..];
            let mut parts = rest.splitn(3, is_sep);
            let server = parts.next().unwrap_or("");
            let share = parts.next().unwrap_or("");
            let mut prefix_len = 2 + server.len();
            if !share.is_empty() {
                prefix_len += 1 + share.len();
            }
            let prefix_len = prefix_len.min(path.len());
            return (&path[..prefix_len], true, &path[prefix_len..]);
        }
        if a.is_ascii_alphabetic() && b == ':' {
            let rest = &path[2..];
            return (&path[..2], rest.starts_with(SEPARATORS), rest);
        }
    }
    ("", path.starts_with(SEPARATORS), path)
}

fn physical_root_len(path: &str, style: PathStyle) -> usize {
    match style {
        PathStyle::Unix => usize::from(path.starts_with('/')),
        PathStyle::Windows => {
            let (prefix, rooted, _) = split_windows(path);
            prefix.len() + usize::from(rooted)
        }
    }
}

/// Resolve `.` and `..` and fold separators, without touching storage.
///
/// `..` never climbs above the root of a rooted path. The result carries no
/// trailing separator except for a bare root (`/`, `C:\`).
pub fn lexical_normalize(path: &str, style: PathStyle) -> String {
    let sep = style.separator();
    let (prefix, rooted, rest): (Cow<'_, str>, bool, &str) = match style {
        PathStyle::Unix => (Cow::Borrowed(""), path.starts_with('/'), path),
        PathStyle::Windows => {
            let (prefix, rooted, rest) = split_windows(path);
            (Cow::Owned(prefix.replace('/', "\\")), rooted, rest)
        }
    };

    let mut stack: Vec<&str> = Vec::new();
    for segment in rest.split(|c: char| style.is_separator(c)) {
        match segment {
            "" | "." => {}
            ".." => {
                if stack.last().is_some_and(|s| *s != "..") {
                    stack.pop();
                } else if !rooted {
                    stack.push("..");
                }
            }
            s => stack.push(s),
        }
    }

    let mut out = String::with_capacity(path.len());
    out.push_str(&prefix);
    if rooted {
        out.push(sep);
    }
    out.push_str(&stack.join(&sep.to_string()));
    if out.is_empty() {
        out.push('.');
    }
    out
}

/// Append `relative` to `base` with exactly one separator between them.
pub fn join_physical(base: &str, relative: &str, style: PathStyle) -> String {
    if relative.is_empty() {
        return base.to_string();
    }
    if base.is_empty() {
        return relative.to_string();
    }
    if base.ends_with(|c: char| style.is_separator(c)) {
        format!("{base}{relative}")
    } else {
        format!("{base}{}{relative}", style.separator())
    }
}

/// Expand `%VAR%` references the way Windows does: unknown names stay as-is.
fn expand_percent_vars(path: &str) -> Cow<'_, str> {
    if !path.contains('%') {
        return Cow::Borrowed(path);
    }
    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                match std::env::var(name) {
                    Ok(value) => out.push_str(&value),
                    Err(_) => {
                        out.push('%');
                        out.push_str(name);
                        out.push('%');
                    }
                }
                rest = &after[end + 1..];
            }
            _ => {
                out.push('%');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Expand `~`, `$VAR` and (Windows style) `%VAR%` in a configured path.
pub fn expand_physical(path: &str, style: PathStyle) -> ResolveResult<String> {
    let expanded = shellexpand::full(path)
        .map_err(|e| ResolveError::invalid_physical_path(format!("{path}: {e}")))?;
    Ok(match style {
        PathStyle::Windows => expand_percent_vars(&expanded).into_owned(),
        PathStyle::Unix => expanded.into_owned(),
    })
}

/// Turn a configured physical path into its canonical absolute form.
///
/// Environment references are expanded, `.`/`..` resolved lexically, and a
/// relative path in the host's native style is anchored at the working
/// directory. Storage is never consulted, so symlinks are left alone.
pub fn canonicalize_physical(path: &str, style: PathStyle) -> ResolveResult<String> {
    let expanded = expand_physical(path, style)?;
    Ok(anchor_physical(&expanded, style))
}

/// [`canonicalize_physical`] without environment expansion.
///
/// For paths that already carry request-supplied segments: a file called
/// `price$list.txt` is a name, not a variable reference.
pub fn anchor_physical(path: &str, style: PathStyle) -> String {
    let normalized = lexical_normalize(path, style);
    if style.is_absolute(&normalized) || style != PathStyle::native() {
        return normalized;
    }

    match std::env::current_dir() {
        Ok(cwd) => {
            let cwd = dunce::simplified(&cwd).to_string_lossy().into_owned();
            lexical_normalize(&join_physical(&cwd, &normalized, style), style)
        }
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "no working directory to anchor relative physical path");
            normalized
        }
    }
}

/// Compare two canonical physical paths, ignoring case.
pub fn physical_eq(a: &str, b: &str) -> bool {
    eq_ignore_case(a, b)
}

/// Parent of a physical path, computed lexically. `None` at a root.
pub fn parent_physical(path: &str, style: PathStyle) -> Option<String> {
    let normalized = lexical_normalize(path, style);
    let root_len = physical_root_len(&normalized, style);
    let body = &normalized[root_len..];
    if body.is_empty() || body == "." {
        return None;
    }
    match body.rfind(|c: char| style.is_separator(c)) {
        Some(idx) => Some(normalized[..root_len + idx].to_string()),
        None if root_len > 0 => Some(normalized[..root_len].to_string()),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_segments_root_matches_everything() {
        assert_eq!(prefix_segments("/", "/"), 1);
        assert_eq!(prefix_segments("/", "/a/b"), 1);
    }

    #[test]
    fn test_prefix_segments_counts_depth() {
        assert_eq!(prefix_segments("/a", "/a/b/c"), 2);
        assert_eq!(prefix_segments("/a/b", "/a/b/c"), 3);
        assert_eq!(prefix_segments("/a/b", "/a/b"), 3);
        assert_eq!(prefix_segments("/a/b/", "/a/b"), 3);
    }

    #[test]
    fn test_prefix_segments_is_segment_aligned() {
        assert_eq!(prefix_segments("/ap", "/app"), 0);
        assert_eq!(prefix_segments("/ap", "/app/x"), 0);
        assert_eq!(prefix_segments("/app/x", "/app"), 0);
        assert_eq!(prefix_segments("/b", "/a/b"), 0);
    }

    #[test]
    fn test_prefix_segments_ignores_case() {
        assert_eq!(prefix_segments("/App1", "/app1/Sub"), 2);
        assert_eq!(prefix_segments("/ÄPP", "/äpp"), 2);
    }

    #[test]
    fn test_trim_start() {
        assert_eq!(trim_start("/app1/sub", "/app1"), "/sub");
        assert_eq!(trim_start("/APP1/sub", "/app1"), "/sub");
        assert_eq!(trim_start("/app1", "/app1"), "");
        assert_eq!(trim_start("/other", "/app1"), "/other");
        assert_eq!(trim_start("/a", ""), "/a");
        assert_eq!(trim_start("/a", "/abc"), "/a");
    }

    #[test]
    fn test_trim_start_folds_across_byte_lengths() {
        // KELVIN SIGN is three bytes and folds to the one-byte `k`.
        assert_eq!(trim_start("/\u{212A}it/x", "/kit"), "/x");
        assert_eq!(trim_start("/kit/x", "/\u{212A}it"), "/x");
        assert!(prefix_segments("/kit", "/\u{212A}it/x") > 0);
    }

    #[test]
    fn test_remove_last_segment() {
        assert_eq!(remove_last_segment("/a/b"), Some("/a"));
        assert_eq!(remove_last_segment("/a/b/"), Some("/a"));
        assert_eq!(remove_last_segment("/a"), Some("/"));
        assert_eq!(remove_last_segment("/"), None);
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("/a/b.txt"), "b.txt");
        assert_eq!(last_segment("/a/"), "a");
        assert_eq!(last_segment("/"), "");
    }

    #[test]
    fn test_normalize_separators() {
        assert_eq!(
            normalize_separators("a/b/c", SeparatorDirection::ToPhysical, PathStyle::Windows),
            "a\\b\\c"
        );
        assert_eq!(
            normalize_separators("a/b", SeparatorDirection::ToPhysical, PathStyle::Unix),
            "a/b"
        );
        assert_eq!(
            normalize_separators("\\a\\b", SeparatorDirection::ToLogical, PathStyle::Windows),
            "/a/b"
        );
    }

    #[test]
    fn test_logical_path_rejects_empty() {
        assert!(matches!(logical_path(""), Err(ResolveError::InvalidArgument(_))));
        assert_eq!(logical_path("\\app1\\x").unwrap(), "/app1/x");
    }

    #[test]
    fn test_logical_path_collapses_and_roots() {
        assert_eq!(logical_path("/a//docs/x").unwrap(), "/a/docs/x");
        assert_eq!(logical_path("//a/x").unwrap(), "/a/x");
        assert_eq!(logical_path("a/docs/x").unwrap(), "/a/docs/x");
        assert_eq!(logical_path("/a/").unwrap(), "/a/");
        assert_eq!(logical_path("//").unwrap(), "/");
        assert_eq!(logical_path("\\\\srv\\x").unwrap(), "/srv/x");
    }

    #[test]
    fn test_lexical_normalize_unix() {
        assert_eq!(lexical_normalize("/srv/a/../b/./c/", PathStyle::Unix), "/srv/b/c");
        assert_eq!(lexical_normalize("/../..", PathStyle::Unix), "/");
        assert_eq!(lexical_normalize("a/../../b", PathStyle::Unix), "../b");
        assert_eq!(lexical_normalize("", PathStyle::Unix), ".");
    }

    #[test]
    fn test_lexical_normalize_windows() {
        assert_eq!(
            lexical_normalize("C:\\sites\\s1\\..\\s2\\", PathStyle::Windows),
            "C:\\sites\\s2"
        );
        assert_eq!(lexical_normalize("C:/sites/s1", PathStyle::Windows), "C:\\sites\\s1");
        assert_eq!(lexical_normalize("C:\\", PathStyle::Windows), "C:\\");
        assert_eq!(
            lexical_normalize("\\\\fs01\\share\\web\\..\\app", PathStyle::Windows),
            "\\\\fs01\\share\\app"
        );
    }

    #[test]
    fn test_is_absolute() {
        assert!(PathStyle::Unix.is_absolute("/srv"));
        assert!(!PathStyle::Unix.is_absolute("srv"));
        assert!(PathStyle::Windows.is_absolute("C:\\srv"));
        assert!(PathStyle::Windows.is_absolute("\\\\fs01\\share"));
        assert!(!PathStyle::Windows.is_absolute("C:srv"));
        assert!(!PathStyle::Windows.is_absolute("srv\\x"));
    }

    #[test]
    fn test_join_physical() {
        assert_eq!(join_physical("/srv", "a/b", PathStyle::Unix), "/srv/a/b");
        assert_eq!(join_physical("/srv/", "a", PathStyle::Unix), "/srv/a");
        assert_eq!(join_physical("C:\\s1", "x", PathStyle::Windows), "C:\\s1\\x");
        assert_eq!(join_physical("C:\\s1", "", PathStyle::Windows), "C:\\s1");
    }

    #[test]
    fn test_canonicalize_foreign_style_stays_lexical() {
        let style = if PathStyle::native() == PathStyle::Unix {
            PathStyle::Windows
        } else {
            PathStyle::Unix
        };
        let canonical = canonicalize_physical("relative/dir", style).unwrap();
        assert!(!canonical.is_empty());
        assert!(!style.is_absolute(&canonical));
    }

    #[test]
    fn test_canonicalize_native_relative_is_anchored() {
        let style = PathStyle::native();
        let canonical = canonicalize_physical("some/rel/../dir", style).unwrap();
        assert!(style.is_absolute(&canonical));
        assert!(canonical.ends_with(&format!("some{}dir", style.separator())));
    }

    #[test]
    fn test_expand_physical_env() {
        // SAFETY: test-only variable with a unique name, not read elsewhere.
        unsafe { std::env::set_var("SITEFS_TEST_DRIVE", "D:") };
        assert_eq!(
            expand_physical("%SITEFS_TEST_DRIVE%\\inetpub", PathStyle::Windows).unwrap(),
            "D:\\inetpub"
        );
        assert_eq!(
            expand_physical("%SITEFS_TEST_UNSET_VAR%\\x", PathStyle::Windows).unwrap(),
            "%SITEFS_TEST_UNSET_VAR%\\x"
        );
        assert!(matches!(
            expand_physical("$SITEFS_TEST_UNSET_VAR/x", PathStyle::Unix),
            Err(ResolveError::InvalidPhysicalPath(_))
        ));
    }

    #[test]
    fn test_anchor_physical_keeps_dollar_names() {
        assert_eq!(
            anchor_physical("/srv/s1/price$list.txt", PathStyle::Unix),
            "/srv/s1/price$list.txt"
        );
        assert_eq!(
            anchor_physical("C:\\sites\\%WINDIR%\\..\\$HOME", PathStyle::Windows),
            "C:\\sites\\$HOME"
        );
    }

    #[test]
    fn test_physical_eq_ignores_case() {
        assert!(physical_eq("C:\\Sites\\S1", "c:\\sites\\s1"));
        assert!(!physical_eq("/srv/a", "/srv/b"));
    }

    #[test]
    fn test_parent_physical() {
        assert_eq!(parent_physical("/srv/a/b", PathStyle::Unix).as_deref(), Some("/srv/a"));
        assert_eq!(parent_physical("/srv", PathStyle::Unix).as_deref(), Some("/"));
        assert_eq!(parent_physical("/", PathStyle::Unix), None);
        assert_eq!(
            parent_physical("C:\\sites\\s1", PathStyle::Windows).as_deref(),
            Some("C:\\sites")
        );
        assert_eq!(
            parent_physical("C:\\sites", PathStyle::Windows).as_deref(),
            Some("C:\\")
        );
        assert_eq!(parent_physical("C:\\", PathStyle::Windows), None);
    }
}
