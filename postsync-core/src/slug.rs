//! Tag slug derivation.

const SEPARATOR: char = '-';

/// Derives a slug from a tag name.
///
/// The input is lower-cased; alphanumeric characters that are fixed points of
/// lower-casing are kept, every other run of characters collapses into a
/// single `-`, and separators never lead or trail. Already-slugified input is
/// returned unchanged.
///
/// Letters outside ASCII survive (`"Café"` gives `"café"`), so a slug is not
/// guaranteed to be ASCII; percent-encode it where a strict URL is needed.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if is_slug_char(c) {
            if pending_separator && !slug.is_empty() {
                slug.push(SEPARATOR);
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    slug
}

fn is_slug_char(c: char) -> bool {
    c.is_alphanumeric() && !c.is_uppercase() && c.to_lowercase().eq(std::iter::once(c))
}
