//! Style sheet minification with lightningcss.
//!
//! Placeholders reach the parser as unknown at-rules
//! (`@TEMPLATE_EXPRESSION();`) or as unparsed property values. Both survive
//! printing; anything else the parser had to recover from sends the sheet to
//! the whitespace-only fallback.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::traits::ToCss;
use tracing::debug;

use litmin_core::{
    application::{ApplicationError, ports::Minified},
    domain::{StyleLevel, StyleOptions, codec::PLACEHOLDER_BASE},
    error::LitminResult,
};

use super::fixups::{
    count_placeholders, degrade_style, join_placeholder_calls, placeholder_in_declarations,
    restore_declaration_separators, restore_selector_spacing,
};

/// Minify a combined style document.
///
/// Parse errors are fatal. Recovered parse problems, other than the
/// placeholder's own unknown at-rule, yield the degraded output plus one
/// warning per problem.
pub(crate) fn minify_style(style: &str, options: &StyleOptions) -> LitminResult<Minified> {
    if options.level == StyleLevel::Zero {
        return Ok(Minified::new(style));
    }

    if placeholder_in_declarations(style) {
        return Ok(degraded(
            style,
            vec!["expression used in place of declarations; only whitespace was minified".into()],
        ));
    }

    let warnings = Arc::new(RwLock::new(Vec::new()));
    let parser_options = ParserOptions {
        error_recovery: true,
        warnings: Some(warnings.clone()),
        ..ParserOptions::default()
    };

    let mut sheet = StyleSheet::parse(style, parser_options)
        .map_err(|e| ApplicationError::backend(e.to_string()))?;

    let recovered: Vec<String> = warnings
        .read()
        .map(|w| w.iter().map(ToString::to_string).collect())
        .unwrap_or_default();
    let marker = PLACEHOLDER_BASE.trim_start_matches('@');
    let problems: Vec<String> = recovered
        .into_iter()
        .filter(|w| !w.contains(marker))
        .collect();
    if !problems.is_empty() {
        debug!(count = problems.len(), "Style sheet needed error recovery");
        return Ok(degraded(style, problems));
    }

    if options.level == StyleLevel::Two || options.merge_rules {
        sheet
            .minify(MinifyOptions::default())
            .map_err(|e| ApplicationError::backend(e.to_string()))?;
    }

    if options.remove_duplicate_rules {
        remove_duplicate_rules(&mut sheet.rules.0)?;
    }

    let printed = sheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| ApplicationError::backend(e.to_string()))?;

    let code = join_placeholder_calls(&printed.code);
    let code = restore_selector_spacing(style, &code);
    let code = restore_declaration_separators(style, &code);

    if count_placeholders(&code) != count_placeholders(style) {
        return Ok(degraded(
            style,
            vec!["style minifier dropped an expression; only whitespace was minified".into()],
        ));
    }

    Ok(Minified::new(code))
}

fn degraded(style: &str, warnings: Vec<String>) -> Minified {
    Minified {
        code: degrade_style(style),
        warnings,
    }
}

/// Drop every top-level style rule that is repeated verbatim later on.
fn remove_duplicate_rules(rules: &mut Vec<CssRule<'_>>) -> LitminResult<()> {
    let mut keys = Vec::with_capacity(rules.len());
    for rule in rules.iter() {
        let key = match rule {
            CssRule::Style(_) => Some(
                rule.to_css_string(PrinterOptions::default())
                    .map_err(|e| ApplicationError::backend(e.to_string()))?,
            ),
            _ => None,
        };
        keys.push(key);
    }

    let mut seen = HashSet::new();
    let mut keep = vec![true; keys.len()];
    for (index, key) in keys.into_iter().enumerate().rev() {
        if let Some(key) = key {
            keep[index] = seen.insert(key);
        }
    }

    let mut index = 0;
    rules.retain(|_| {
        let kept = keep[index];
        index += 1;
        kept
    });
    Ok(())
}
