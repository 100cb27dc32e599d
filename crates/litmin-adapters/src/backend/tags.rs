//! Minimal tag tokenizer for post-processing minified markup.
//!
//! Only what the fixups need: start tags with their attributes, end tags,
//! and everything else as opaque text. Comments, doctypes and the content of
//! raw-text elements (`script`, `style`, `textarea`, `title`) are text.

/// Elements whose content is never scanned for tags.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Attribute {
    pub name: String,
    pub value: Option<String>,
    pub quote: Option<char>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StartTag {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub self_closing: bool,
}

impl StartTag {
    /// `script` or `style`: content that is code, not text.
    pub fn holds_code(&self) -> bool {
        self.name.eq_ignore_ascii_case("script") || self.name.eq_ignore_ascii_case("style")
    }

    pub fn write(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for attribute in &self.attributes {
            out.push(' ');
            out.push_str(&attribute.name);
            if let Some(value) = &attribute.value {
                out.push('=');
                match attribute.quote {
                    Some(q) => {
                        out.push(q);
                        out.push_str(value);
                        out.push(q);
                    }
                    None => out.push_str(value),
                }
            }
        }
        if self.self_closing {
            let unquoted_last = self
                .attributes
                .last()
                .is_some_and(|a| a.value.is_some() && a.quote.is_none());
            if unquoted_last {
                out.push(' ');
            }
            out.push('/');
        }
        out.push('>');
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    Text(&'a str),
    Start { tag: StartTag, raw: &'a str },
    End { name: String, raw: &'a str },
}

/// Split `html` into text, start tags and end tags.
///
/// Concatenating the `raw`/text slices of the result gives back `html`.
pub(crate) fn tokenize(html: &str) -> Vec<Token<'_>> {
    let bytes = html.as_bytes();
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }
        let rest = &html[i..];

        if rest.starts_with("<!--") {
            i = rest.find("-->").map_or(html.len(), |p| i + p + 3);
            continue;
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            i = rest.find('>').map_or(html.len(), |p| i + p + 1);
            continue;
        }

        if let Some((name, len)) = parse_end_tag(rest) {
            push_text(&mut tokens, &html[text_start..i]);
            tokens.push(Token::End {
                name,
                raw: &html[i..i + len],
            });
            i += len;
            text_start = i;
            continue;
        }

        if let Some((tag, len)) = parse_start_tag(rest) {
            push_text(&mut tokens, &html[text_start..i]);
            let raw_text = !tag.self_closing
                && RAW_TEXT_ELEMENTS
                    .iter()
                    .any(|e| tag.name.eq_ignore_ascii_case(e));
            let closing = format!("</{}", tag.name.to_ascii_lowercase());
            tokens.push(Token::Start {
                tag,
                raw: &html[i..i + len],
            });
            i += len;
            text_start = i;

            if raw_text {
                i = html[i..]
                    .to_ascii_lowercase()
                    .find(&closing)
                    .map_or(html.len(), |p| i + p);
            }
            continue;
        }

        i += 1;
    }

    push_text(&mut tokens, &html[text_start..]);
    tokens
}

fn push_text<'a>(tokens: &mut Vec<Token<'a>>, text: &'a str) {
    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
}

fn is_name_end(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'/' || b == b'>'
}

fn parse_end_tag(rest: &str) -> Option<(String, usize)> {
    let b = rest.as_bytes();
    if b.len() < 3 || b[0] != b'<' || b[1] != b'/' || !b[2].is_ascii_alphabetic() {
        return None;
    }
    let mut i = 2;
    while i < b.len() && !is_name_end(b[i]) {
        i += 1;
    }
    let name = rest[2..i].to_string();
    let close = rest[i..].find('>')?;
    Some((name, i + close + 1))
}

fn parse_start_tag(rest: &str) -> Option<(StartTag, usize)> {
    let b = rest.as_bytes();
    if b.len() < 2 || b[0] != b'<' || !b[1].is_ascii_alphabetic() {
        return None;
    }
    let mut i = 1;
    while i < b.len() && !is_name_end(b[i]) {
        i += 1;
    }
    let name = rest[1..i].to_string();
    let mut attributes = Vec::new();

    loop {
        while i < b.len() && b[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= b.len() {
            return None;
        }
        match b[i] {
            b'>' => {
                let tag = StartTag {
                    name,
                    attributes,
                    self_closing: false,
                };
                return Some((tag, i + 1));
            }
            b'/' if b.get(i + 1) == Some(&b'>') => {
                let tag = StartTag {
                    name,
                    attributes,
                    self_closing: true,
                };
                return Some((tag, i + 2));
            }
            b'/' => {
                i += 1;
                continue;
            }
            _ => {}
        }

        let name_start = i;
        while i < b.len()
            && !b[i].is_ascii_whitespace()
            && b[i] != b'='
            && b[i] != b'>'
            && !(b[i] == b'/' && b.get(i + 1) == Some(&b'>'))
        {
            i += 1;
        }
        if i == name_start {
            i += 1;
        }
        let attr_name = rest[name_start..i].to_string();

        let mut j = i;
        while j < b.len() && b[j].is_ascii_whitespace() {
            j += 1;
        }
        if j < b.len() && b[j] == b'=' {
            i = j + 1;
            while i < b.len() && b[i].is_ascii_whitespace() {
                i += 1;
            }
            if i >= b.len() {
                return None;
            }
            let (value, quote) = if b[i] == b'"' || b[i] == b'\'' {
                let q = b[i] as char;
                let close = rest[i + 1..].find(q)?;
                let value = rest[i + 1..i + 1 + close].to_string();
                i += close + 2;
                (value, Some(q))
            } else {
                let start = i;
                while i < b.len() && !b[i].is_ascii_whitespace() && b[i] != b'>' {
                    i += 1;
                }
                (rest[start..i].to_string(), None)
            };
            attributes.push(Attribute {
                name: attr_name,
                value: Some(value),
                quote,
            });
        } else {
            attributes.push(Attribute {
                name: attr_name,
                value: None,
                quote: None,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reassemble(tokens: &[Token<'_>]) -> String {
        tokens
            .iter()
            .map(|t| match t {
                Token::Text(s) => *s,
                Token::Start { raw, .. } | Token::End { raw, .. } => *raw,
            })
            .collect()
    }

    #[test]
    fn tokens_cover_input() {
        let html = "<!-- c --><div class=a id=\"b\" hidden><br/>x</div><?pi?>";
        let tokens = tokenize(html);
        assert_eq!(reassemble(&tokens), html);
    }

    #[test]
    fn attributes_are_parsed() {
        let tokens = tokenize("<input type=text value='a b' disabled data-x = \"1\">");
        let Token::Start { tag, .. } = &tokens[0] else {
            panic!("expected start tag");
        };
        assert_eq!(tag.name, "input");
        assert_eq!(tag.attributes.len(), 4);
        assert_eq!(tag.attributes[0].value.as_deref(), Some("text"));
        assert_eq!(tag.attributes[0].quote, None);
        assert_eq!(tag.attributes[1].quote, Some('\''));
        assert_eq!(tag.attributes[2].value, None);
        assert_eq!(tag.attributes[3].name, "data-x");
        assert_eq!(tag.attributes[3].value.as_deref(), Some("1"));
    }

    #[test]
    fn raw_text_content_is_not_scanned() {
        let tokens = tokenize("<script>if (a<b) x='<p>'</script><p>");
        assert!(matches!(tokens[1], Token::Text("if (a<b) x='<p>'")));
        assert!(matches!(&tokens[2], Token::End { name, .. } if name == "script"));
        assert!(matches!(&tokens[3], Token::Start { tag, .. } if tag.name == "p"));
    }

    #[test]
    fn placeholder_tags_are_text() {
        let tokens = tokenize("<@X();>a</@X();>");
        assert_eq!(tokens, vec![Token::Text("<@X();>a</@X();>")]);
    }

    #[test]
    fn write_round_trips_simple_tags() {
        let tokens = tokenize("<a href=\"/x\" download>");
        let Token::Start { tag, raw } = &tokens[0] else {
            panic!("expected start tag");
        };
        let mut out = String::new();
        tag.write(&mut out);
        assert_eq!(out, *raw);
    }

    #[test]
    fn self_closing_after_unquoted_value_keeps_space() {
        let tag = StartTag {
            name: "img".into(),
            attributes: vec![Attribute {
                name: "src".into(),
                value: Some("a.png".into()),
                quote: None,
            }],
            self_closing: true,
        };
        let mut out = String::new();
        tag.write(&mut out);
        assert_eq!(out, "<img src=a.png />");
    }
}
