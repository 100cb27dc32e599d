//! Text-level corrections applied around the third-party minifiers.
//!
//! Every function here works on plain strings. The minifiers are opaque, so
//! each fixup compares the text that went in with the text that came out.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;

use litmin_core::domain::codec::PLACEHOLDER_BASE;

use super::tags::{Attribute, StartTag, Token, tokenize};

/// Attributes dropped when their value is empty.
const EMPTY_REMOVABLE_ATTRIBUTES: &[&str] = &["class", "id", "style", "title", "lang", "dir"];

/// `type` values of a `<script>` that only restate the default.
const DEFAULT_SCRIPT_TYPES: &[&str] = &[
    "text/javascript",
    "application/javascript",
    "text/ecmascript",
    "application/ecmascript",
    "application/x-javascript",
    "text/jscript",
];

/// Lowercase prefix of the inert element name standing in for a placeholder
/// in tag-name position.
const NEUTRAL_TAG_BASE: &str = "template-expression";

fn placeholder_call() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"{}_*\(\)", regex::escape(PLACEHOLDER_BASE)))
            .expect("placeholder pattern is a valid regex")
    })
}

fn spaced_placeholder_call() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"({}_*)\s+\(\)", regex::escape(PLACEHOLDER_BASE)))
            .expect("spaced placeholder pattern is a valid regex")
    })
}

fn tag_placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"<(/?)({}_*\(\);)", regex::escape(PLACEHOLDER_BASE)))
            .expect("tag placeholder pattern is a valid regex")
    })
}

fn line_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]*\r?\n[ \t]*").expect("line break pattern is a valid regex"))
}

fn pseudo_function() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(::?[A-Za-z][A-Za-z0-9-]*)\(([^(){};]*)\)")
            .expect("pseudo-class pattern is a valid regex")
    })
}

// ── Placeholders ─────────────────────────────────────────────────────────────

/// Number of placeholder calls (`@TEMPLATE_EXPRESSION__()`) in `text`,
/// whether or not their terminator survived.
pub(crate) fn count_placeholders(text: &str) -> usize {
    placeholder_call().find_iter(text).count()
}

/// `@TEMPLATE_EXPRESSION ()` -> `@TEMPLATE_EXPRESSION()`.
///
/// Style printers write a space between an unknown at-rule's name and its
/// prelude.
pub(crate) fn join_placeholder_calls(text: &str) -> String {
    spaced_placeholder_call()
        .replace_all(text, "${1}()")
        .into_owned()
}

/// Put back the `;` that ended a declaration right after a placeholder.
///
/// `color: ${c}; margin: 0` combines to `color: @X();; margin: 0`. Style
/// printers keep one `;`, which the split then takes as the placeholder's
/// own, gluing the expression to the next declaration. Placeholders are
/// paired by order; with differing counts the text is returned as is.
pub(crate) fn restore_declaration_separators(original: &str, minified: &str) -> String {
    let separated: Vec<bool> = placeholder_call()
        .find_iter(original)
        .map(|m| {
            let rest = &original[m.end()..];
            rest.strip_prefix(';')
                .unwrap_or(rest)
                .trim_start()
                .starts_with(';')
        })
        .collect();
    if !separated.contains(&true) {
        return minified.to_string();
    }

    let ends: Vec<usize> = placeholder_call()
        .find_iter(minified)
        .map(|m| m.end())
        .collect();
    if ends.len() != separated.len() {
        return minified.to_string();
    }

    let mut out = minified.to_string();
    for (end, separated) in ends.into_iter().zip(separated).rev() {
        if !separated {
            continue;
        }
        let rest = &minified[end..];
        let (own, after) = match rest.strip_prefix(';') {
            Some(after) => (true, after),
            None => (false, rest),
        };
        let needs_separator = after
            .trim_start()
            .chars()
            .next()
            .is_some_and(|c| !matches!(c, ';' | '}' | '"' | '\''));
        if needs_separator {
            out.insert_str(end, if own { ";" } else { ";;" });
        }
    }
    out
}

/// Placeholders used as element names, swapped for inert names.
#[derive(Debug, Default)]
pub(crate) struct TagSwaps {
    swaps: Vec<(String, String)>,
}

impl TagSwaps {
    /// Replace `<PLACEHOLDER` and `</PLACEHOLDER` with a neutral element name
    /// that does not occur in `html`.
    pub fn neutralize(html: &str) -> (String, Self) {
        let mut swaps: Vec<(String, String)> = Vec::new();
        if !tag_placeholder().is_match(html) {
            return (html.to_string(), Self { swaps });
        }

        let lowered = html.to_ascii_lowercase();
        let mut base = NEUTRAL_TAG_BASE.to_string();
        while lowered.contains(&base) {
            base.push_str("-x");
        }

        let replaced = tag_placeholder().replace_all(html, |caps: &regex::Captures<'_>| {
            let token = &caps[2];
            let neutral = match swaps.iter().find(|(_, t)| t == token) {
                Some((neutral, _)) => neutral.clone(),
                None => {
                    let neutral = format!("{base}-{}", swaps.len());
                    swaps.push((neutral.clone(), token.to_string()));
                    neutral
                }
            };
            format!("<{}{neutral}", &caps[1])
        });

        (replaced.into_owned(), Self { swaps })
    }

    pub fn is_empty(&self) -> bool {
        self.swaps.is_empty()
    }

    /// Put the original placeholders back.
    pub fn restore(&self, html: &str) -> String {
        if self.swaps.is_empty() {
            return html.to_string();
        }
        let mut out = String::with_capacity(html.len());
        for token in tokenize(html) {
            match token {
                Token::Text(text) => out.push_str(text),
                Token::Start { tag, raw } => match self.original(&tag.name) {
                    Some(original) => {
                        out.push('<');
                        out.push_str(original);
                        out.push_str(&raw[1 + tag.name.len()..]);
                    }
                    None => out.push_str(raw),
                },
                Token::End { name, raw } => match self.original(&name) {
                    Some(original) => {
                        out.push_str("</");
                        out.push_str(original);
                        out.push_str(&raw[2 + name.len()..]);
                    }
                    None => out.push_str(raw),
                },
            }
        }
        out
    }

    fn original(&self, name: &str) -> Option<&str> {
        self.swaps
            .iter()
            .find(|(neutral, _)| neutral.eq_ignore_ascii_case(name))
            .map(|(_, token)| token.as_str())
    }
}

// ── Markup attributes and names ──────────────────────────────────────────────

/// Original spelling of element and attribute names, keyed by lowercase.
///
/// A key whose spellings disagree maps to `None` and is left alone.
#[derive(Debug, Default)]
pub(crate) struct NameCase {
    names: HashMap<String, Option<String>>,
}

impl NameCase {
    /// Collect mixed-case names from `html`. With `all == false` only names
    /// containing a placeholder are kept.
    pub fn collect(html: &str, all: bool) -> Self {
        let marker = PLACEHOLDER_BASE.trim_start_matches('@');
        let mut names: HashMap<String, Option<String>> = HashMap::new();
        let mut record = |name: &str| {
            if !(all || name.contains(marker)) {
                return;
            }
            let lower = name.to_ascii_lowercase();
            names
                .entry(lower)
                .and_modify(|seen| {
                    if seen.as_deref() != Some(name) {
                        *seen = None;
                    }
                })
                .or_insert_with(|| Some(name.to_string()));
        };

        for token in tokenize(html) {
            match token {
                Token::Start { tag, .. } => {
                    record(&tag.name);
                    for attribute in &tag.attributes {
                        record(&attribute.name);
                    }
                }
                Token::End { name, .. } => record(&name),
                Token::Text(_) => {}
            }
        }
        Self { names }
    }

    fn restore(&self, name: &mut String) -> bool {
        match self.names.get(&name.to_ascii_lowercase()) {
            Some(Some(original)) if original != name => {
                *name = original.clone();
                true
            }
            _ => false,
        }
    }
}

/// Start tags of the markup handed to the minifier, in document order.
#[derive(Debug, Default)]
pub(crate) struct SourceTags {
    tags: Vec<StartTag>,
}

impl SourceTags {
    pub fn collect(html: &str) -> Self {
        let tags = tokenize(html)
            .into_iter()
            .filter_map(|token| match token {
                Token::Start { tag, .. } => Some(tag),
                _ => None,
            })
            .collect();
        Self { tags }
    }

    /// The next source tag named `name` at or after `cursor`.
    fn pair(&self, name: &str, cursor: &mut usize) -> Option<&StartTag> {
        let offset = self.tags[*cursor..]
            .iter()
            .position(|tag| tag.name.eq_ignore_ascii_case(name))?;
        let index = *cursor + offset;
        *cursor = index + 1;
        Some(&self.tags[index])
    }
}

/// A `type` attribute that restates the default of its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefaultType {
    Script,
    Style,
}

impl DefaultType {
    fn of(tag: &str, attribute: &Attribute) -> Option<Self> {
        if !attribute.name.eq_ignore_ascii_case("type") {
            return None;
        }
        let value = attribute.value.as_deref()?.trim();
        if tag.eq_ignore_ascii_case("script")
            && DEFAULT_SCRIPT_TYPES.iter().any(|t| value.eq_ignore_ascii_case(t))
        {
            return Some(Self::Script);
        }
        let styled = tag.eq_ignore_ascii_case("style") || tag.eq_ignore_ascii_case("link");
        (styled && value.eq_ignore_ascii_case("text/css")).then_some(Self::Style)
    }
}

/// Which per-tag corrections [`fix_tags`] applies.
#[derive(Debug)]
pub(crate) struct TagFixups<'a> {
    /// Quote every unquoted attribute value with `"`.
    pub restore_quotes: bool,
    /// Drop `class=""` and friends.
    pub remove_empty: bool,
    /// Drop `type="text/javascript"` from scripts.
    pub remove_script_type: bool,
    /// Drop `type="text/css"` from styles and stylesheet links.
    pub remove_style_type: bool,
    pub names: &'a NameCase,
    /// What the minifier was given, to undo attribute reordering.
    pub source: &'a SourceTags,
}

impl TagFixups<'_> {
    fn removes(&self, kind: DefaultType) -> bool {
        match kind {
            DefaultType::Script => self.remove_script_type,
            DefaultType::Style => self.remove_style_type,
        }
    }
}

/// Rewrite start and end tags of minified markup.
///
/// Each start tag is paired with the next source tag of the same name. Its
/// attributes go back to source order, since every expression hole is bound
/// to the attribute it was written in. Placeholder values the minifier
/// dropped, such as the value of a boolean attribute, are put back. Tags
/// nothing applies to are copied byte for byte.
pub(crate) fn fix_tags(html: &str, fixups: &TagFixups<'_>) -> String {
    let mut out = String::with_capacity(html.len() + 16);
    let mut cursor = 0;
    for token in tokenize(html) {
        match token {
            Token::Text(text) => out.push_str(text),
            Token::Start { mut tag, raw } => {
                let element = tag.name.clone();
                let mut changed = false;

                if let Some(source) = fixups.source.pair(&element, &mut cursor) {
                    changed |= restore_attributes(&mut tag.attributes, &source.attributes, |a| {
                        a.value.as_deref().is_some_and(|v| v.contains(PLACEHOLDER_BASE))
                            || DefaultType::of(&element, a).is_some_and(|k| !fixups.removes(k))
                    });
                }

                let before = tag.attributes.len();
                tag.attributes.retain(|a| {
                    let default_type =
                        DefaultType::of(&element, a).is_some_and(|k| fixups.removes(k));
                    let empty = fixups.remove_empty
                        && a.value.as_deref().is_none_or(str::is_empty)
                        && EMPTY_REMOVABLE_ATTRIBUTES
                            .iter()
                            .any(|n| a.name.eq_ignore_ascii_case(n));
                    !(default_type || empty)
                });
                changed |= tag.attributes.len() != before;

                changed |= fixups.names.restore(&mut tag.name);
                for attribute in &mut tag.attributes {
                    changed |= fixups.names.restore(&mut attribute.name);
                    if fixups.restore_quotes && attribute.value.is_some() && attribute.quote.is_none()
                    {
                        attribute.quote = Some('"');
                        changed = true;
                    }
                }

                if changed {
                    tag.write(&mut out);
                } else {
                    out.push_str(raw);
                }
            }
            Token::End { mut name, raw } => {
                if fixups.names.restore(&mut name) {
                    out.push_str("</");
                    out.push_str(&name);
                    out.push_str(&raw[2 + name.len()..]);
                } else {
                    out.push_str(raw);
                }
            }
        }
    }
    out
}

/// Put `attributes` back into the order of `source`, re-adding source
/// attributes that `restore` selects when the minifier dropped them or their
/// value.
fn restore_attributes(
    attributes: &mut Vec<Attribute>,
    source: &[Attribute],
    restore: impl Fn(&Attribute) -> bool,
) -> bool {
    let mut used = vec![false; source.len()];
    let mut changed = false;
    let mut slotted: Vec<(usize, Attribute)> = Vec::with_capacity(source.len().max(attributes.len()));

    for mut attribute in attributes.drain(..) {
        let slot = (0..source.len())
            .find(|&i| !used[i] && source[i].name.eq_ignore_ascii_case(&attribute.name));
        if let Some(i) = slot {
            used[i] = true;
            if attribute.value.is_none() && source[i].value.is_some() && restore(&source[i]) {
                attribute.value = source[i].value.clone();
                attribute.quote = source[i].quote;
                changed = true;
            }
        }
        slotted.push((slot.unwrap_or(usize::MAX), attribute));
    }

    for (i, original) in source.iter().enumerate() {
        if !used[i] && restore(original) {
            slotted.push((i, original.clone()));
            changed = true;
        }
    }

    if slotted.windows(2).any(|pair| pair[0].0 > pair[1].0) {
        slotted.sort_by_key(|(slot, _)| *slot);
        changed = true;
    }
    attributes.extend(slotted.into_iter().map(|(_, attribute)| attribute));
    changed
}

/// Character references hidden from the minifier so it cannot decode them.
///
/// Every `&` outside `script` and `style` content becomes a private-use
/// character that does not occur in the markup.
#[derive(Debug)]
pub(crate) struct EntityGuard {
    sentinel: char,
}

impl EntityGuard {
    pub fn protect(html: &str) -> (String, Option<Self>) {
        let Some(sentinel) = unused_char(html, &[]).filter(|_| html.contains('&')) else {
            return (html.to_string(), None);
        };

        let mut out = String::with_capacity(html.len());
        let mut in_code = false;
        for token in tokenize(html) {
            match token {
                Token::Text(text) if in_code => out.push_str(text),
                Token::Text(text) => out.push_str(&text.replace('&', &sentinel.to_string())),
                Token::Start { tag, raw } => {
                    in_code = !tag.self_closing && tag.holds_code();
                    out.push_str(&raw.replace('&', &sentinel.to_string()));
                }
                Token::End { raw, .. } => {
                    in_code = false;
                    out.push_str(raw);
                }
            }
        }
        (out, Some(Self { sentinel }))
    }

    pub fn sentinel(&self) -> char {
        self.sentinel
    }

    pub fn restore(&self, html: &str) -> String {
        html.replace(self.sentinel, "&")
    }
}

/// Conditional comments (`<!--[if IE]>...<![endif]-->`) swapped for opaque
/// text while the rest of the document is minified.
#[derive(Debug)]
pub(crate) struct ConditionalComments {
    sentinel: char,
    comments: Vec<(String, String)>,
}

impl ConditionalComments {
    /// Swap every conditional comment for a marker. `reserved` characters
    /// are never used as the marker.
    pub fn extract(html: &str, reserved: &[char]) -> (String, Option<Self>) {
        if !conditional_comment().is_match(html) {
            return (html.to_string(), None);
        }
        let Some(sentinel) = unused_char(html, reserved) else {
            return (html.to_string(), None);
        };

        let mut comments = Vec::new();
        let replaced = conditional_comment().replace_all(html, |caps: &regex::Captures<'_>| {
            comments.push((caps[1].to_string(), caps[2].to_string()));
            format!("{sentinel}{}{sentinel}", comments.len() - 1)
        });
        (replaced.into_owned(), Some(Self { sentinel, comments }))
    }

    /// Put the comments back, passing each body through `body`.
    pub fn restore<E>(
        &self,
        html: &str,
        mut body: impl FnMut(&str) -> Result<String, E>,
    ) -> Result<String, E> {
        let mut out = html.to_string();
        for (index, (condition, content)) in self.comments.iter().enumerate().rev() {
            let marker = format!("{0}{index}{0}", self.sentinel);
            let Some(at) = out.find(&marker) else {
                continue;
            };
            let content = body(content.as_str())?;
            let comment = format!("<!--[if {condition}]>{content}<![endif]-->");
            out.replace_range(at..at + marker.len(), &comment);
        }
        Ok(out)
    }
}

fn conditional_comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<!--\[if ([^\]]*)\]>(.*?)<!\[endif\]-->")
            .expect("conditional comment pattern is a valid regex")
    })
}

/// First private-use character found neither in `text` nor in `reserved`.
fn unused_char(text: &str, reserved: &[char]) -> Option<char> {
    ('\u{E000}'..='\u{F8FF}').find(|c| !reserved.contains(c) && !text.contains(*c))
}

/// Collapse line breaks inside every `<svg ...>` start tag to single spaces.
///
/// Scans from the end so earlier offsets stay valid, and touches only the
/// start tag itself; whitespace-sensitive content elsewhere is untouched.
pub(crate) fn strip_svg_start_tag_newlines(html: &str) -> String {
    let mut out = html.to_string();
    let starts: Vec<usize> = html.match_indices("<svg").map(|(i, _)| i).collect();
    for start in starts.into_iter().rev() {
        let Some(close) = out[start..].find('>').map(|p| start + p + 1) else {
            continue;
        };
        let tag = &out[start..close];
        if !tag.contains('\n') {
            continue;
        }
        let mut stripped = line_break().replace_all(tag, " ").into_owned();
        for end in [" />", " >"] {
            if stripped.ends_with(end) {
                let at = stripped.len() - end.len();
                stripped.remove(at);
                break;
            }
        }
        out.replace_range(start..close, &stripped);
    }
    out
}

// ── Style ────────────────────────────────────────────────────────────────────

/// Put back the spacing inside functional pseudo-class arguments
/// (`:nth-child( 2n + 1 )`) that the style minifier removed or rewrote.
///
/// Occurrences of each pseudo-class are paired by order when the original
/// and minified text hold the same number of them; otherwise the despaced
/// form is searched for literally.
pub(crate) fn restore_selector_spacing(original: &str, minified: &str) -> String {
    let mut by_name: BTreeMap<&str, Vec<(&str, &str)>> = BTreeMap::new();
    for caps in pseudo_function().captures_iter(original) {
        let (Some(full), Some(name), Some(args)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        by_name
            .entry(name.as_str())
            .or_default()
            .push((full.as_str(), args.as_str()));
    }

    let mut result = minified.to_string();
    for (name, originals) in by_name {
        if !originals.iter().any(|(_, args)| args.contains(char::is_whitespace)) {
            continue;
        }

        let found: Vec<(usize, usize)> = pseudo_function()
            .captures_iter(&result)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                (caps.get(1)?.as_str() == name).then_some((full.start(), full.end()))
            })
            .collect();

        if found.len() == originals.len() {
            for ((start, end), (full, args)) in found.into_iter().zip(originals).rev() {
                if args.contains(char::is_whitespace) {
                    result.replace_range(start..end, full);
                }
            }
            continue;
        }

        for (full, args) in originals {
            if !args.contains(char::is_whitespace) {
                continue;
            }
            let despaced: String = args.chars().filter(|c| !c.is_whitespace()).collect();
            let compact = format!("{name}({despaced})");
            if let Some(at) = result.find(&compact) {
                result.replace_range(at..at + compact.len(), full);
            }
        }
    }
    result
}

/// Whitespace-only fallback used when the style minifier cannot be trusted
/// with a sheet: drop blank lines and squeeze runs of spaces.
pub(crate) fn degrade_style(style: &str) -> String {
    let joined = style
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let mut out = String::with_capacity(joined.len());
    let mut previous_space = false;
    for ch in joined.chars() {
        if ch == ' ' {
            if !previous_space {
                out.push(ch);
            }
            previous_space = true;
        } else {
            out.push(ch);
            previous_space = false;
        }
    }
    out
}

/// Whether a placeholder starts a statement inside a declaration block.
///
/// Style printers move nested rules after declarations, so a placeholder
/// standing in for declarations (`.a { ${mixin} color: red }`) would be
/// reordered.
pub(crate) fn placeholder_in_declarations(style: &str) -> bool {
    #[derive(Clone, Copy, PartialEq)]
    enum Block {
        Rules,
        Declarations,
    }

    fn block_kind(prelude: &str) -> Block {
        const GROUPING: &[&str] = &[
            "@media",
            "@supports",
            "@container",
            "@layer",
            "@document",
            "@scope",
            "@starting-style",
        ];
        let lower = prelude.to_ascii_lowercase();
        if GROUPING.iter().any(|g| lower.starts_with(g)) {
            Block::Rules
        } else {
            Block::Declarations
        }
    }

    let bytes = style.as_bytes();
    let mut stack: Vec<Block> = Vec::new();
    let mut statement_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = style[i + 2..].find("*/").map_or(bytes.len(), |p| i + 2 + p + 2);
                continue;
            }
            q @ (b'"' | b'\'') => {
                let mut j = i + 1;
                while j < bytes.len() && bytes[j] != q {
                    if bytes[j] == b'\\' {
                        j += 1;
                    }
                    j += 1;
                }
                i = j + 1;
                continue;
            }
            b'{' => {
                let prelude = style[statement_start..i].trim();
                stack.push(block_kind(prelude));
                statement_start = i + 1;
            }
            b'}' => {
                stack.pop();
                statement_start = i + 1;
            }
            b';' => statement_start = i + 1,
            b'@' => {
                let at_statement_start = style[statement_start..i].trim().is_empty();
                if at_statement_start
                    && stack.last() == Some(&Block::Declarations)
                    && placeholder_call().find_at(style, i).is_some_and(|m| m.start() == i)
                {
                    return true;
                }
            }
            _ => {}
        }
        i += 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain<'a>(names: &'a NameCase, source: &'a SourceTags) -> TagFixups<'a> {
        TagFixups {
            restore_quotes: false,
            remove_empty: false,
            remove_script_type: false,
            remove_style_type: false,
            names,
            source,
        }
    }

    #[test]
    fn joins_spaced_placeholder_calls() {
        assert_eq!(
            join_placeholder_calls(".a{}@TEMPLATE_EXPRESSION ();.b{}@TEMPLATE_EXPRESSION__  ();"),
            ".a{}@TEMPLATE_EXPRESSION();.b{}@TEMPLATE_EXPRESSION__();"
        );
    }

    #[test]
    fn counts_placeholders_with_or_without_terminator() {
        assert_eq!(
            count_placeholders("a@TEMPLATE_EXPRESSION();b@TEMPLATE_EXPRESSION()c"),
            2
        );
        assert_eq!(count_placeholders("@TEMPLATE_EXPRESSION ()"), 0);
    }

    #[test]
    fn tag_placeholders_round_trip() {
        let html = "<@TEMPLATE_EXPRESSION(); class=\"a\">x</@TEMPLATE_EXPRESSION();>";
        let (neutral, swaps) = TagSwaps::neutralize(html);
        assert!(!swaps.is_empty());
        assert_eq!(
            neutral,
            "<template-expression-0 class=\"a\">x</template-expression-0>"
        );
        assert_eq!(swaps.restore(&neutral), html);
    }

    #[test]
    fn neutral_name_avoids_existing_text() {
        let html = "<template-expression-0></template-expression-0><@TEMPLATE_EXPRESSION();>";
        let (neutral, swaps) = TagSwaps::neutralize(html);
        assert!(neutral.ends_with("<template-expression-x-0>"));
        assert_eq!(swaps.restore(&neutral), html);
    }

    #[test]
    fn quotes_are_restored() {
        let names = NameCase::default();
        let source = SourceTags::default();
        let fixups = TagFixups {
            restore_quotes: true,
            ..plain(&names, &source)
        };
        assert_eq!(
            fix_tags("<a href=/x title='t'>y</a>", &fixups),
            "<a href=\"/x\" title='t'>y</a>"
        );
    }

    #[test]
    fn empty_attributes_are_removed() {
        let names = NameCase::default();
        let source = SourceTags::default();
        let fixups = TagFixups {
            remove_empty: true,
            ..plain(&names, &source)
        };
        assert_eq!(
            fix_tags("<div class=\"\" id data-x=\"\">", &fixups),
            "<div data-x=\"\">"
        );
    }

    #[test]
    fn names_are_restored_when_unambiguous() {
        let names = NameCase::collect("<my-El viewBox=\"0\" onClick=\"x\" onclick=\"y\">", true);
        let source = SourceTags::default();
        let fixups = plain(&names, &source);
        assert_eq!(
            fix_tags("<my-el viewbox=0 onclick=x></my-el>", &fixups),
            "<my-El viewBox=0 onclick=x></my-El>"
        );
    }

    #[test]
    fn only_placeholder_names_when_case_insensitive() {
        let names = NameCase::collect("<p viewBox=\"0\" @TEMPLATE_EXPRESSION();>", false);
        let source = SourceTags::default();
        let fixups = plain(&names, &source);
        assert_eq!(
            fix_tags("<p viewbox=0 @template_expression();>", &fixups),
            "<p viewbox=0 @TEMPLATE_EXPRESSION();>"
        );
    }

    #[test]
    fn attributes_return_to_source_order() {
        let names = NameCase::default();
        let source = SourceTags::collect(
            "<a href=@TEMPLATE_EXPRESSION();  class=@TEMPLATE_EXPRESSION();>x</a><b z=1 y=2>",
        );
        let fixups = plain(&names, &source);
        assert_eq!(
            fix_tags(
                "<a class=@TEMPLATE_EXPRESSION(); href=@TEMPLATE_EXPRESSION();>x</a><b y=2 z=1>",
                &fixups
            ),
            "<a href=@TEMPLATE_EXPRESSION(); class=@TEMPLATE_EXPRESSION();>x</a><b z=1 y=2>"
        );
    }

    #[test]
    fn dropped_placeholder_values_come_back() {
        let names = NameCase::default();
        let source = SourceTags::collect(
            "<option selected=@TEMPLATE_EXPRESSION(); value=\"a\" hidden=\"hidden\">",
        );
        let fixups = plain(&names, &source);
        assert_eq!(
            fix_tags("<option hidden selected value=a>", &fixups),
            "<option selected=@TEMPLATE_EXPRESSION(); value=a hidden>"
        );
    }

    #[test]
    fn tags_the_minifier_dropped_do_not_shift_pairing() {
        let names = NameCase::default();
        let source = SourceTags::collect("<body><p b=@TEMPLATE_EXPRESSION(); a=1>");
        let fixups = plain(&names, &source);
        assert_eq!(
            fix_tags("<p a=1 b=@TEMPLATE_EXPRESSION();>", &fixups),
            "<p b=@TEMPLATE_EXPRESSION(); a=1>"
        );
    }

    #[test]
    fn default_type_attributes_follow_options() {
        let names = NameCase::default();
        let html = "<script type=\"text/javascript\">a()</script><style type=text/css></style><script type=module></script>";
        let source = SourceTags::collect(html);

        let removing = TagFixups {
            remove_script_type: true,
            remove_style_type: true,
            ..plain(&names, &source)
        };
        assert_eq!(
            fix_tags(html, &removing),
            "<script>a()</script><style></style><script type=module></script>"
        );

        let keeping = plain(&names, &source);
        assert_eq!(
            fix_tags("<script>a()</script><style></style><script type=module></script>", &keeping),
            html
        );
    }

    #[test]
    fn separator_after_value_placeholder_is_restored() {
        let original = ".a { color: @TEMPLATE_EXPRESSION();; margin: 0; b: @TEMPLATE_EXPRESSION();; }";
        assert_eq!(
            restore_declaration_separators(
                original,
                ".a{color:@TEMPLATE_EXPRESSION();margin:0;b:@TEMPLATE_EXPRESSION()}"
            ),
            ".a{color:@TEMPLATE_EXPRESSION();;margin:0;b:@TEMPLATE_EXPRESSION()}"
        );
    }

    #[test]
    fn separators_are_only_added_where_the_source_had_one() {
        let original = ".a{} @TEMPLATE_EXPRESSION(); .b{}";
        assert_eq!(
            restore_declaration_separators(original, ".a{}@TEMPLATE_EXPRESSION();.b{}"),
            ".a{}@TEMPLATE_EXPRESSION();.b{}"
        );
        let kept = "<p style=\"a:@TEMPLATE_EXPRESSION();;b:0\">";
        assert_eq!(restore_declaration_separators(kept, kept), kept);
    }

    #[test]
    fn entities_outside_code_are_hidden() {
        let html = "<p title=\"&amp;\">&lt;b&gt;</p><script>a&&b</script>";
        let (guarded, guard) = EntityGuard::protect(html);
        let guard = guard.unwrap();
        assert!(!guarded.contains("&amp;"));
        assert!(!guarded.contains("&lt;"));
        assert!(guarded.contains("a&&b"));
        assert!(guarded.contains(guard.sentinel()));
        assert_eq!(guard.restore(&guarded), html);
    }

    #[test]
    fn no_guard_without_ampersands() {
        let (guarded, guard) = EntityGuard::protect("<p>x</p>");
        assert_eq!(guarded, "<p>x</p>");
        assert!(guard.is_none());
    }

    #[test]
    fn conditional_comments_round_trip() {
        let html = "<div><!--[if IE]> <p> a </p> <![endif]--></div>";
        let (extracted, comments) = ConditionalComments::extract(html, &[]);
        let comments = comments.unwrap();
        assert!(!extracted.contains("<!--"));

        let verbatim = comments
            .restore(&extracted, |body| Ok::<_, ()>(body.to_string()))
            .unwrap();
        assert_eq!(verbatim, html);

        let trimmed = comments
            .restore(&extracted, |body| Ok::<_, ()>(body.trim().to_string()))
            .unwrap();
        assert_eq!(trimmed, "<div><!--[if IE]><p> a </p><![endif]--></div>");
    }

    #[test]
    fn svg_start_tag_newlines_are_stripped() {
        let html = "<pre>a\nb</pre><svg\nviewBox=\"0 0 1 1\"\n><path d=\"M0\n0\"/></svg>";
        assert_eq!(
            strip_svg_start_tag_newlines(html),
            "<pre>a\nb</pre><svg viewBox=\"0 0 1 1\"><path d=\"M0\n0\"/></svg>"
        );
    }

    #[test]
    fn selector_spacing_is_restored_by_position() {
        let original = "li:nth-child( 2n + 1 ) { color: red }";
        assert_eq!(
            restore_selector_spacing(original, "li:nth-child(odd){color:red}"),
            "li:nth-child( 2n + 1 ){color:red}"
        );
        assert_eq!(
            restore_selector_spacing(original, "li:nth-child(2n+1){color:red}"),
            "li:nth-child( 2n + 1 ){color:red}"
        );
    }

    #[test]
    fn selector_spacing_falls_back_to_literal_search() {
        let original = "a:nth-of-type( 2n ) {} b:nth-of-type( 2n ) {}";
        assert_eq!(
            restore_selector_spacing(original, "b:nth-of-type(2n){}"),
            "b:nth-of-type( 2n ){}"
        );
    }

    #[test]
    fn unspaced_selectors_are_left_alone() {
        assert_eq!(
            restore_selector_spacing(":is(a,b) {}", ":is(a,b){}"),
            ":is(a,b){}"
        );
    }

    #[test]
    fn degraded_style() {
        assert_eq!(
            degrade_style(".a {\n\n    color:  red;\n  }\n\n"),
            ".a {\n color: red;\n }"
        );
    }

    #[test]
    fn declaration_position_detection() {
        assert!(placeholder_in_declarations(
            ".a { @TEMPLATE_EXPRESSION(); color: red }"
        ));
        assert!(placeholder_in_declarations(
            ".a { color: red; @TEMPLATE_EXPRESSION_(); }"
        ));
        assert!(!placeholder_in_declarations(
            ".a { color: @TEMPLATE_EXPRESSION(); }"
        ));
        assert!(!placeholder_in_declarations(
            ".a {} @TEMPLATE_EXPRESSION(); .b {}"
        ));
        assert!(!placeholder_in_declarations(
            "@media print { @TEMPLATE_EXPRESSION(); }"
        ));
        assert!(!placeholder_in_declarations(
            ".a { content: \"{ @TEMPLATE_EXPRESSION(); }\" }"
        ));
    }
}
