/// Derive a URL slug from a post title.
///
/// Lower-cases the title, drops everything that is not an ASCII letter, digit,
/// whitespace or hyphen, turns whitespace runs into single hyphens and
/// collapses repeated hyphens. The result never starts or ends with a hyphen
/// and may be empty when the title has no letters or digits.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_hyphen = true;
        }
    }

    slug
}

/// `base`, or `base-N` for the smallest N >= 2 that `taken` rejects.
pub fn with_suffix(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_owned();
    }
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_owned())
}
