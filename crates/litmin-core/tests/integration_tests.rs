//! Integration tests for litmin-core.
//!
//! These drive the public API with small in-test adapters, so they cover the
//! orchestration contract independently of the real minifiers.

use std::sync::Arc;

use base64::Engine as _;
use litmin_core::{
    application::{CollectedDiagnostics, DiagnosticKind, ports::*},
    domain::{SourceMap, codec},
    prelude::*,
};

/// Finds `` tag`...${...}...` `` literals without nesting support.
struct FlatLocator;

impl TemplateLocator for FlatLocator {
    fn locate(&self, source: &str, _file_name: &str) -> LitminResult<Vec<Template>> {
        let bytes = source.as_bytes();
        let mut templates = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] != b'`' {
                i += 1;
                continue;
            }
            let tag_start = source[..i]
                .rfind(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
                .map_or(0, |p| p + 1);
            let tag = &source[tag_start..i];

            let mut parts = Vec::new();
            let mut part_start = i + 1;
            let mut j = i + 1;
            while j < bytes.len() && bytes[j] != b'`' {
                if bytes[j] == b'$' && bytes.get(j + 1) == Some(&b'{') {
                    parts.push(TemplatePart::from_source(source, part_start, j).unwrap());
                    let close = source[j..].find('}').map(|p| j + p).unwrap();
                    part_start = close + 1;
                    j = close + 1;
                    continue;
                }
                j += 1;
            }
            parts.push(TemplatePart::from_source(source, part_start, j).unwrap());
            templates.push(if tag.is_empty() {
                Template::new(None, parts)
            } else {
                Template::tagged(tag, parts)
            });
            i = j + 1;
        }
        Ok(templates)
    }
}

/// Collapses whitespace runs to nothing in markup, and around `{};:` in
/// style.
struct SqueezeBackend;

impl MinifierBackend for SqueezeBackend {
    fn minify_markup(&self, markup: &str, _: &MarkupOptions) -> LitminResult<Minified> {
        Ok(Minified::new(
            markup.split_whitespace().collect::<Vec<_>>().join(""),
        ))
    }

    fn supports_style(&self) -> bool {
        true
    }

    fn minify_style(&self, style: &str, _: &StyleOptions) -> LitminResult<Minified> {
        let mut out = style.split_whitespace().collect::<Vec<_>>().join(" ");
        for token in ["{", "}", ";", ":"] {
            out = out
                .replace(&format!(" {token}"), token)
                .replace(&format!("{token} "), token);
        }
        Ok(Minified::new(out))
    }
}

fn minifier() -> LiteralMinifier {
    LiteralMinifier::new(Box::new(SqueezeBackend), Box::new(FlatLocator))
}

#[test]
fn test_markup_with_expressions() {
    let source = "const t = html`<div>\n  <span>${x}</span>\n</div>`;";
    let out = minifier().minify(source, "t.js").unwrap().unwrap();
    assert_eq!(out.code, "const t = html`<div><span>${x}</span></div>`;");
}

#[test]
fn test_style_template() {
    let source = "const s = css`\n  :host {\n    color: ${c};\n  }\n`;";
    let out = minifier().minify(source, "s.js").unwrap().unwrap();
    assert_eq!(out.code, "const s = css`:host{color:${c};}`;");
}

#[test]
fn test_mixed_templates_keep_code_between() {
    let source = "a(html`<p> 1 </p>`); b(`<p> 2 </p>`); c(svg`<g> </g>`);";
    let processed = minifier().process(source, "m.js").unwrap();
    assert_eq!(processed.stats.found, 3);
    assert_eq!(processed.stats.changed, 2);
    assert_eq!(processed.stats.skipped, 1);
    assert_eq!(
        processed.output.unwrap().code,
        "a(html`<p>1</p>`); b(`<p> 2 </p>`); c(svg`<g></g>`);"
    );
}

#[test]
fn test_output_is_idempotent() {
    let source = "html`<ul>\n  <li>${a}</li>\n  <li>${b}</li>\n</ul>`";
    let m = minifier();
    let first = m.minify(source, "i.js").unwrap().unwrap();
    assert_eq!(m.minify(&first.code, "i.js").unwrap(), None);
}

#[test]
fn test_many_templates_are_deterministic() {
    let source: String = (0..64)
        .map(|i| format!("f{i}(html`<b> {i} </b>`);\n"))
        .collect();
    let expected: String = (0..64).map(|i| format!("f{i}(html`<b>{i}</b>`);\n")).collect();

    for _ in 0..4 {
        let out = minifier().minify(&source, "many.js").unwrap().unwrap();
        assert_eq!(out.code, expected);
    }
}

#[test]
fn test_markup_escape_disables_markup_only() {
    let source = "html`<p> a </p>`; css`a { b: c }`; unsafeHTML(x);";
    let sink = Arc::new(CollectedDiagnostics::new());
    let out = minifier()
        .with_diagnostics(sink.clone())
        .minify(source, "e.js")
        .unwrap()
        .unwrap();
    assert_eq!(out.code, "html`<p> a </p>`; css`a{b:c}`; unsafeHTML(x);");

    let kinds: Vec<_> = sink.entries().into_iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::MarkupEscape]);
}

#[test]
fn test_source_map_points_back_to_original() {
    let source = "x = html`<p>  hi  </p>`;\ny = 1;";
    let out = minifier().minify(source, "map.js").unwrap().unwrap();
    let map = out.map.unwrap();

    assert_eq!(map.version, 3);
    assert_eq!(map.sources, vec!["map.js".to_string()]);
    assert_eq!(map.sources_content, vec![Some(source.to_string())]);

    let url = map.to_url().unwrap();
    let encoded = url
        .strip_prefix("data:application/json;charset=utf-8;base64,")
        .unwrap();
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .unwrap();
    let reparsed = SourceMap::from_json(std::str::from_utf8(&decoded).unwrap()).unwrap();
    assert_eq!(reparsed, map);
}

#[test]
fn test_placeholder_never_collides_with_literal_text() {
    let source = "html`<p>@TEMPLATE_EXPRESSION();</p>${x}<i>@TEMPLATE_EXPRESSION_()</i>`";
    let templates = FlatLocator.locate(source, "p.js").unwrap();
    let parts = &templates[0].parts;

    let placeholder = SqueezeBackend.placeholder(parts);
    assert_eq!(placeholder, "@TEMPLATE_EXPRESSION__();");
    for part in parts {
        assert!(!part.text.contains(&placeholder));
    }

    let combined = codec::combine(parts, &placeholder);
    assert_eq!(codec::split_exact(&combined, &placeholder).len(), parts.len());

    let out = minifier().minify(source, "p.js").unwrap();
    assert_eq!(out, None);
}
