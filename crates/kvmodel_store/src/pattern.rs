//! Glob matching for scan patterns.

/// Matches `text` against a Redis-style glob `pattern`.
///
/// Supported syntax: `*` matches any run of characters (including the
/// empty run), `?` matches exactly one character, everything else
/// matches literally. Matching is byte-exact; callers are expected to
/// normalize case before building patterns.
///
/// # Example
///
/// ```rust
/// use kvmodel_store::glob_match;
///
/// assert!(glob_match("user:*", "user:1"));
/// assert!(glob_match("user:*1_*_kenyon*_*", "user:1:1_a@x.com_kenyon+haliwell_pw"));
/// assert!(!glob_match("user:*", "account:1"));
/// ```
#[must_use]
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pat: Vec<char> = pattern.chars().collect();
    let txt: Vec<char> = text.chars().collect();

    // Two-pointer match with backtracking to the most recent '*'.
    // The '*' branch must run before the literal comparison: a text
    // character can itself be '*', and a pattern '*' must never be
    // consumed as a literal match against it.
    let (mut p, mut t) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;

    while t < txt.len() {
        if p < pat.len() && pat[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if p < pat.len() && (pat[p] == '?' || pat[p] == txt[t]) {
            p += 1;
            t += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }

    while p < pat.len() && pat[p] == '*' {
        p += 1;
    }

    p == pat.len()
}
