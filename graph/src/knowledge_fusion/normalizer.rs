/// Canonicalize a raw entity name into a comparable key.
///
/// Lowercases, trims, and strips interior whitespace plus the punctuation
/// that commonly varies between spellings of the same term (`.` `-` `_` `,`).
/// Total over any input; the empty string maps to itself.
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '.' | '-' | '_' | ','))
        .collect()
}
