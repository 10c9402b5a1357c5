//! Name handling shared by command parsing and reconciliation.

/// Replaces interior whitespace runs in a normalized name.
pub const NAME_DELIMITER: char = '_';

/// Canonical comparison key for a role/entity name.
///
/// Trims, collapses every interior whitespace run into [`NAME_DELIMITER`] and
/// lowercases. Both directories are keyed with this same function before they
/// are compared, so `"Fleet  Commanders"` and `"fleet_commanders"` match.
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (idx, word) in raw.split_whitespace().enumerate() {
        if idx > 0 {
            out.push(NAME_DELIMITER);
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}

/// Removes one matching pair of surrounding quotes (`"…"` or `'…'`).
///
/// Unpaired quotes (`"unterminated`) are kept verbatim.
pub fn strip_paired_quotes(input: &str) -> &str {
    for quote in ['"', '\''] {
        if input.len() >= 2 && input.starts_with(quote) && input.ends_with(quote) {
            return &input[1..input.len() - 1];
        }
    }
    input
}

/// Joins trailing argument tokens with single spaces and strips surrounding quotes.
pub fn join_trailing<S: AsRef<str>>(tokens: &[S]) -> String {
    let joined = tokens
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    strip_paired_quotes(&joined).to_string()
}

/// True when the input looks like a chat user mention (`<@123>` / `<@!123>`).
pub fn is_user_mention(input: &str) -> bool {
    let input = input.trim();
    input.starts_with("<@") && input.ends_with('>')
}
