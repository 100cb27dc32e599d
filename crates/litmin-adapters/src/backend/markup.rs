//! Markup minification with minify-html.

use std::sync::OnceLock;

use minify_html::Cfg;
use regex::Regex;
use tracing::trace;

use litmin_core::{
    application::{ApplicationError, ports::Minified},
    domain::MarkupOptions,
    error::LitminResult,
};

use super::fixups::{
    ConditionalComments, EntityGuard, NameCase, SourceTags, TagFixups, TagSwaps, fix_tags,
    join_placeholder_calls, restore_declaration_separators, restore_selector_spacing,
    strip_svg_start_tag_newlines,
};

fn comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"))
}

fn style_element() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<style[\s>]").expect("valid style regex"))
}

/// Translate markup options into a minify-html configuration.
///
/// Closing tags, `<html>`/`<head>` and attribute spacing are always kept:
/// a template is a fragment whose pieces get spliced back into code.
/// Options minify-html has no switch for are applied around it.
fn cfg_for(options: &MarkupOptions) -> Cfg {
    Cfg {
        do_not_minify_doctype: !options.use_short_doctype,
        ensure_spec_compliant_unquoted_attribute_values: true,
        keep_closing_tags: true,
        keep_comments: !options.remove_comments,
        keep_html_and_head_opening_tags: true,
        keep_input_type_text_attr: !options.remove_script_type_attributes,
        keep_spaces_between_attributes: true,
        keep_ssi_comments: !options.remove_comments,
        minify_css: options.minify_css,
        minify_js: options.minify_js,
        preserve_brace_template_syntax: false,
        preserve_chevron_percent_template_syntax: false,
        remove_bangs: false,
        remove_processing_instructions: false,
        ..Cfg::default()
    }
}

/// Strip ordinary comments, keeping conditional and `<!--!` comments.
fn strip_comments(markup: &str) -> String {
    comment()
        .replace_all(markup, |caps: &regex::Captures<'_>| {
            let text = &caps[0];
            if text.starts_with("<!--[if") || text.starts_with("<!--!") {
                text.to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

/// Minify a combined markup document.
pub(crate) fn minify_markup(markup: &str, options: &MarkupOptions) -> LitminResult<Minified> {
    if !options.collapse_whitespace {
        let code = if options.remove_comments {
            strip_comments(markup)
        } else {
            markup.to_string()
        };
        return Ok(Minified::new(code));
    }

    let (guarded, entities) = if options.decode_entities {
        (markup.to_string(), None)
    } else {
        EntityGuard::protect(markup)
    };
    let reserved: Vec<char> = entities.iter().map(EntityGuard::sentinel).collect();
    let (shielded, conditionals) = ConditionalComments::extract(&guarded, &reserved);

    let (neutral, swaps) = TagSwaps::neutralize(&shielded);
    if !swaps.is_empty() {
        trace!("Placeholder element names neutralized");
    }
    let names = NameCase::collect(&neutral, options.case_sensitive);
    let source = SourceTags::collect(&neutral);

    let bytes = minify_html::minify(neutral.as_bytes(), &cfg_for(options));
    let minified = String::from_utf8(bytes)
        .map_err(|e| ApplicationError::backend(format!("markup minifier produced invalid UTF-8: {e}")))?;

    let fixed = fix_tags(
        &minified,
        &TagFixups {
            restore_quotes: !options.remove_attribute_quotes,
            remove_empty: options.remove_empty_attributes,
            remove_script_type: options.remove_script_type_attributes,
            remove_style_type: options.remove_style_link_type_attributes,
            names: &names,
            source: &source,
        },
    );
    let mut restored = swaps.restore(&fixed);

    if let Some(conditionals) = &conditionals {
        restored = conditionals.restore(&restored, |body| {
            if options.process_conditional_comments && !body.contains("<!--") {
                minify_markup(body, options).map(|m| m.code)
            } else {
                Ok(body.to_string())
            }
        })?;
    }
    if let Some(entities) = &entities {
        restored = entities.restore(&restored);
    }

    let code = strip_svg_start_tag_newlines(&restored);
    let code = if style_element().is_match(markup) {
        restore_selector_spacing(markup, &code)
    } else {
        code
    };
    let code = join_placeholder_calls(&code);

    Ok(Minified::new(restore_declaration_separators(markup, &code)))
}
