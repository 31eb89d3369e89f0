//! URL slug derivation.

/// Maps free text to a lowercase, hyphen-delimited identifier.
///
/// Every run of characters outside `[a-z0-9]` (after lowercasing) collapses
/// into one hyphen, and hyphens never lead or trail. The result may be empty
/// for input with no ASCII letters or digits. Uniqueness is the caller's
/// concern.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for ch in text.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch);
        } else {
            pending_separator = true;
        }
    }

    slug
}
