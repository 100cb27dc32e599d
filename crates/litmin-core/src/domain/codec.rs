//! Placeholder codec.
//!
//! A template's literal segments are joined into one document with a
//! placeholder standing in for every `${...}` hole, handed to a minifier, and
//! split back apart on the same placeholder afterwards.

use crate::domain::TemplatePart;

/// Base token of the default placeholder.
///
/// The `@` prefix plus the `();` suffix makes the token read as an at-rule in
/// style sheets and as opaque text or an attribute in markup, so neither kind
/// of minifier drops it.
pub const PLACEHOLDER_BASE: &str = "@TEMPLATE_EXPRESSION";

/// Call-like suffix appended to [`PLACEHOLDER_BASE`].
pub const PLACEHOLDER_SUFFIX: &str = "();";

/// Derive a placeholder that does not occur in any part's text.
///
/// Starts from `base + suffix` and appends `_` to the base until neither the
/// full token nor the token without its final character appears in any part.
/// Checking the shortened form too keeps a lenient split from cutting literal
/// text that merely resembles the placeholder.
pub fn unique_placeholder(parts: &[TemplatePart], base: &str, suffix: &str) -> String {
    let mut stem = base.to_string();
    loop {
        let candidate = format!("{stem}{suffix}");
        let truncated = without_last_char(&candidate);
        if !parts.iter().any(|part| part.text.contains(truncated)) {
            return candidate;
        }
        stem.push('_');
    }
}

/// Join each part's text with `placeholder` between consecutive parts.
pub fn combine(parts: &[TemplatePart], placeholder: &str) -> String {
    let capacity = parts.iter().map(|p| p.text.len()).sum::<usize>()
        + placeholder.len() * parts.len().saturating_sub(1);
    let mut combined = String::with_capacity(capacity);
    for (index, part) in parts.iter().enumerate() {
        if index > 0 {
            combined.push_str(placeholder);
        }
        combined.push_str(&part.text);
    }
    combined
}

/// Split on exact occurrences of `placeholder`.
pub fn split_exact(text: &str, placeholder: &str) -> Vec<String> {
    if placeholder.is_empty() {
        return vec![text.to_string()];
    }
    text.split(placeholder).map(str::to_string).collect()
}

/// Split on `placeholder`, then split every piece again on the placeholder
/// with its trailing `terminator` removed.
///
/// Some minifiers drop a terminating `;` when the placeholder ends a
/// declaration block or an inline style. Placeholders from
/// [`unique_placeholder`] never occur in shortened form inside literal text,
/// so the second pass only finds placeholders the minifier truncated.
pub fn split_tolerant(text: &str, placeholder: &str, terminator: char) -> Vec<String> {
    let pieces = split_exact(text, placeholder);
    let Some(shortened) = placeholder.strip_suffix(terminator) else {
        return pieces;
    };
    if shortened.is_empty() {
        return pieces;
    }

    pieces
        .iter()
        .flat_map(|piece| piece.split(shortened).map(str::to_string))
        .collect()
}

fn without_last_char(token: &str) -> &str {
    match token.char_indices().last() {
        Some((index, _)) if index > 0 => &token[..index],
        _ => token,
    }
}
