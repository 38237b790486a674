//! Accept/reject name filtering: whole-string, prefix, and leafname filter shapes, each sitting
//! on top of glob-to-regex compilation.
//!
//! Two glob dialects exist because dotted names and slash-separated paths disagree about what a
//! single `*` should cross: [`GlobDialect::Name`] treats `.` as an ordinary character (so `*`
//! freely crosses package boundaries, matching the simple form callers expect for
//! `com.example.*`), while [`GlobDialect::Path`] treats `/` the way a shell glob does (`*` stops
//! at a path separator, `**` crosses it, grounding this crate's path-shaped accept/reject lists
//! in the same convention `.gitignore`-style tools use).

use regex::Regex;

use crate::error::ScanError;

/// What part of a dotted name or path a [`Pattern`] is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterShape {
    /// The pattern must match the entire string, start to end. Supports globbing.
    WholeString,
    /// The string must start with the given literal prefix (no globbing).
    Prefix,
    /// The pattern is matched only against the last `.`-separated segment of the name. Supports
    /// globbing. Meaningful only for [`GlobDialect::Name`]-dialect patterns.
    Leafname,
}

/// Which glob grammar a pattern's `*`/`?`/`**` are interpreted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GlobDialect {
    /// The simple form, for dotted package/class names: `.` is a literal character, `*` matches
    /// any run of characters including across `.`.
    Name,
    /// The strict form, for filesystem-style paths: `*` matches any run of characters other than
    /// `/`, `**` matches across `/` as well, `?` matches exactly one character other than `/`.
    Path,
}

/// One compiled accept or reject rule.
#[derive(Debug, Clone)]
struct Pattern {
    shape: FilterShape,
    // Used for `Prefix`; globless, so a plain `str::starts_with` suffices.
    literal: Option<String>,
    // Used for `WholeString` and `Leafname`.
    regex: Option<Regex>,
}

impl Pattern {
    fn compile(raw: &str, shape: FilterShape, dialect: GlobDialect) -> Result<Self, ScanError> {
        match shape {
            FilterShape::Prefix => Ok(Self {
                shape,
                literal: Some(raw.to_owned()),
                regex: None,
            }),
            FilterShape::WholeString | FilterShape::Leafname => {
                let body = match dialect {
                    GlobDialect::Name => glob_to_regex_name(raw),
                    GlobDialect::Path => glob_to_regex_path(raw),
                };
                let regex = Regex::new(&format!("^{body}$"))
                    .map_err(|e| ScanError::argument(format!("invalid filter pattern {raw:?}: {e}")))?;
                Ok(Self {
                    shape,
                    literal: None,
                    regex: Some(regex),
                })
            }
        }
    }

    fn matches(&self, candidate: &str) -> bool {
        match self.shape {
            FilterShape::Prefix => candidate.starts_with(self.literal.as_deref().unwrap_or("")),
            FilterShape::WholeString => self.regex.as_ref().is_some_and(|r| r.is_match(candidate)),
            FilterShape::Leafname => {
                let leaf = candidate.rsplit('.').next().unwrap_or(candidate);
                self.regex.as_ref().is_some_and(|r| r.is_match(leaf))
            }
        }
    }

    /// The literal prefix this pattern stands for, if it is a boundary-free `Prefix`-shaped
    /// pattern (the only shape [`Filter::accept_has_prefix`] reasons about).
    fn as_literal_prefix(&self) -> Option<&str> {
        match self.shape {
            FilterShape::Prefix => self.literal.as_deref().map(trim_trailing_separator),
            _ => None,
        }
    }
}

fn trim_trailing_separator(s: &str) -> &str {
    s.strip_suffix(['.', '/']).unwrap_or(s)
}

fn escape_literal(regex: &mut String, c: char) {
    if matches!(c, '.' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|' | '\\') {
        regex.push('\\');
    }
    regex.push(c);
}

/// Converts a simple-form glob (only `*` and `?` are special; `.` is literal) into an equivalent
/// regex body, without anchors.
fn glob_to_regex_name(glob: &str) -> String {
    let mut regex = String::with_capacity(glob.len() * 2);
    for c in glob.chars() {
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            other => escape_literal(&mut regex, other),
        }
    }
    regex
}

/// Converts a strict-form path glob into an equivalent regex body, without anchors: `*` matches
/// within one path segment, `**` crosses segment boundaries, `?` matches one non-separator
/// character.
fn glob_to_regex_path(glob: &str) -> String {
    let mut regex = String::with_capacity(glob.len() * 2);
    let mut chars = glob.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                regex.push_str(".*");
            }
            '*' => regex.push_str("[^/]*"),
            '?' => regex.push_str("[^/]"),
            other => escape_literal(&mut regex, other),
        }
    }
    regex
}

/// True iff `shorter` is a prefix of `longer` at a `.`/`/` boundary (or an exact match) — e.g.
/// `"com.example"` is a boundary prefix of `"com.example.Widget"` but not of
/// `"com.exampleX.Widget"`.
fn is_boundary_prefix(shorter: &str, longer: &str) -> bool {
    longer
        .strip_prefix(shorter)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(['.', '/']))
}

/// An accept/reject filter over dotted names or paths: a candidate passes if it matches no reject
/// pattern, and either the accept list is empty or it matches at least one accept pattern.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    accept: Vec<Pattern>,
    reject: Vec<Pattern>,
    accept_prefixes: Vec<String>,
    reject_prefixes: Vec<String>,
}

impl Filter {
    /// An empty filter: every candidate passes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an accept pattern of the given shape, in the simple (dotted-name) glob form.
    pub fn accept(mut self, pattern: &str, shape: FilterShape) -> Result<Self, ScanError> {
        self.push_accept(Pattern::compile(pattern, shape, GlobDialect::Name)?);
        Ok(self)
    }

    /// Adds a reject pattern of the given shape, in the simple (dotted-name) glob form.
    pub fn reject(mut self, pattern: &str, shape: FilterShape) -> Result<Self, ScanError> {
        self.push_reject(Pattern::compile(pattern, shape, GlobDialect::Name)?);
        Ok(self)
    }

    /// Adds an accept pattern of the given shape, in the strict (filesystem-path) glob form:
    /// `*` stops at `/`, `**` crosses it, `?` matches one non-separator character.
    pub fn accept_path(mut self, pattern: &str, shape: FilterShape) -> Result<Self, ScanError> {
        self.push_accept(Pattern::compile(pattern, shape, GlobDialect::Path)?);
        Ok(self)
    }

    /// Adds a reject pattern of the given shape, in the strict (filesystem-path) glob form.
    pub fn reject_path(mut self, pattern: &str, shape: FilterShape) -> Result<Self, ScanError> {
        self.push_reject(Pattern::compile(pattern, shape, GlobDialect::Path)?);
        Ok(self)
    }

    fn push_accept(&mut self, pattern: Pattern) {
        if let Some(prefix) = pattern.as_literal_prefix() {
            self.accept_prefixes.push(prefix.to_owned());
            self.accept_prefixes.sort_unstable();
        }
        self.accept.push(pattern);
    }

    fn push_reject(&mut self, pattern: Pattern) {
        if let Some(prefix) = pattern.as_literal_prefix() {
            self.reject_prefixes.push(prefix.to_owned());
            self.reject_prefixes.sort_unstable();
        }
        self.reject.push(pattern);
    }

    /// Whether `candidate` passes this filter.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        if self.reject.iter().any(|p| p.matches(candidate)) {
            return false;
        }
        self.accept.is_empty() || self.accept.iter().any(|p| p.matches(candidate))
    }

    /// Whether this filter has no accept patterns, i.e. it accepts everything not rejected.
    #[must_use]
    pub fn has_no_accept_patterns(&self) -> bool {
        self.accept.is_empty()
    }

    /// Whether `candidate` either lies on the way to an accepted `Prefix` pattern, or is itself
    /// already underneath one — i.e. whether descending further from `candidate` could possibly
    /// still reach something this filter accepts. True unconditionally when there are no accept
    /// patterns at all (nothing is pruned).
    ///
    /// `candidate` begins with boundary-prefix `P` (plus `.`/`/`) for some accepted prefix, or an
    /// accepted prefix begins with `candidate` (plus `.`/`/`) — either direction counts as "some
    /// accepted item begins with `candidate`".
    #[must_use]
    pub fn accept_has_prefix(&self, candidate: &str) -> bool {
        has_prefix_relationship(candidate, &self.accept_prefixes, self.accept.is_empty())
    }

    /// As [`Self::accept_has_prefix`], but against the reject list: whether `candidate` lies on
    /// the way to, or underneath, a rejected `Prefix` pattern.
    #[must_use]
    pub fn reject_has_prefix(&self, candidate: &str) -> bool {
        has_prefix_relationship(candidate, &self.reject_prefixes, false)
    }

    /// Whether `candidate` exactly names one of this filter's accepted `Prefix` patterns (modulo
    /// a trailing separator) — the walker has arrived exactly at an accepted package or path, not
    /// merely somewhere along the way to one.
    #[must_use]
    pub fn accept_is_exact_prefix(&self, candidate: &str) -> bool {
        self.accept_prefixes.binary_search_by(|p| p.as_str().cmp(candidate)).is_ok()
    }
}

fn has_prefix_relationship(candidate: &str, prefixes: &[String], default_when_empty: bool) -> bool {
    if prefixes.is_empty() {
        return default_when_empty;
    }
    prefixes
        .iter()
        .any(|accepted| is_boundary_prefix(accepted, candidate) || is_boundary_prefix(candidate, accepted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_accepts_everything() {
        let filter = Filter::new();
        assert!(filter.matches("com.example.Widget"));
    }

    #[test]
    fn whole_string_glob_accept() {
        let filter = Filter::new().accept("com.example.*", FilterShape::WholeString).unwrap();
        assert!(filter.matches("com.example.Widget"));
        assert!(!filter.matches("com.other.Widget"));
    }

    #[test]
    fn prefix_accept_matches_subpackages() {
        let filter = Filter::new().accept("com.example.", FilterShape::Prefix).unwrap();
        assert!(filter.matches("com.example.sub.Widget"));
        assert!(!filter.matches("com.other.Widget"));
    }

    #[test]
    fn leafname_reject_matches_simple_name_only() {
        let filter = Filter::new().reject("*Test", FilterShape::Leafname).unwrap();
        assert!(!filter.matches("com.example.WidgetTest"));
        assert!(filter.matches("com.example.Widget"));
    }

    #[test]
    fn reject_takes_precedence_over_accept() {
        let filter = Filter::new()
            .accept("com.example.*", FilterShape::WholeString)
            .unwrap()
            .reject("com.example.Internal", FilterShape::WholeString)
            .unwrap();
        assert!(filter.matches("com.example.Widget"));
        assert!(!filter.matches("com.example.Internal"));
    }
}
