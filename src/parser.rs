//! Markup parser turning tagged text such as `[color=red]Hello[font=bold]World`
//! into [`PageContent`]
//!
//! Tags are standalone: `[color=red]` switches the color from that point on
//! and no closing tag is expected. Closing tags and unrecognised tags are
//! dropped without error.

use tracing::trace;

use crate::content::{DirectiveKind, PageContent, Segment};

/// A lexical token of the markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `[name]`, `[name=value]` or `[name=value key=value ...]`
    TagStart {
        name: String,
        options: Vec<(String, String)>,
    },
    /// `[/name]`
    TagEnd { name: String },
    /// A line break
    Newline,
    /// Literal text
    Data(String),
}

/// Single-pass tokenizer over markup text
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    rest: &'a str,
}

impl<'a> Tokenizer<'a> {
    /// Tokenize `input`
    pub fn new(input: &'a str) -> Self {
        Tokenizer { rest: input }
    }

    fn advance(&mut self, len: usize) -> &'a str {
        let (head, tail) = self.rest.split_at(len);
        self.rest = tail;
        head
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.rest.is_empty() {
            return None;
        }

        if self.rest.starts_with("\r\n") {
            self.advance(2);
            return Some(Token::Newline);
        }
        if self.rest.starts_with(&['\n', '\r'][..]) {
            self.advance(1);
            return Some(Token::Newline);
        }

        if self.rest.starts_with('[') {
            // a tag runs to the first ']' unless a new '[' or a line break comes first
            let close = self.rest[1..]
                .find(&['[', ']', '\n', '\r'][..])
                .map(|i| i + 1)
                .filter(|&i| self.rest.as_bytes()[i] == b']');

            if let Some(close) = close {
                if let Some(token) = parse_tag(&self.rest[1..close]) {
                    self.advance(close + 1);
                    return Some(token);
                }
            }
            return Some(Token::Data(self.advance(1).to_string()));
        }

        let end = self
            .rest
            .find(&['[', '\n', '\r'][..])
            .unwrap_or(self.rest.len());
        Some(Token::Data(self.advance(end).to_string()))
    }
}

fn is_tag_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '*'))
}

/// Parse the inside of `[...]`; `None` means the brackets are literal text
fn parse_tag(inner: &str) -> Option<Token> {
    let inner = inner.trim();

    if let Some(name) = inner.strip_prefix('/') {
        let name = name.trim();
        return is_tag_name(name).then(|| Token::TagEnd {
            name: name.to_ascii_lowercase(),
        });
    }

    let name_end = inner
        .find(|c: char| c == '=' || c.is_whitespace())
        .unwrap_or(inner.len());
    let (name, mut rest) = inner.split_at(name_end);
    if !is_tag_name(name) {
        return None;
    }
    let name = name.to_ascii_lowercase();

    let mut options = Vec::new();
    if let Some(after_eq) = rest.strip_prefix('=') {
        let (value, tail) = take_value(after_eq);
        options.push((name.clone(), value));
        rest = tail;
    }

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        let key_end = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        let (key, tail) = rest.split_at(key_end);
        match tail.strip_prefix('=') {
            Some(after_eq) => {
                let (value, tail) = take_value(after_eq);
                options.push((key.to_ascii_lowercase(), value));
                rest = tail;
            }
            None => {
                options.push((key.to_ascii_lowercase(), String::new()));
                rest = tail;
            }
        }
    }

    Some(Token::TagStart { name, options })
}

/// Read a bare or quoted option value, returning it and the unread remainder
fn take_value(input: &str) -> (String, &str) {
    for quote in ['"', '\''] {
        if let Some(quoted) = input.strip_prefix(quote) {
            return match quoted.find(quote) {
                Some(end) => (quoted[..end].to_string(), &quoted[end + 1..]),
                None => (quoted.to_string(), ""),
            };
        }
    }

    let end = input.find(char::is_whitespace).unwrap_or(input.len());
    (input[..end].to_string(), &input[end..])
}

fn option<'o>(options: &'o [(String, String)], key: &str) -> Option<&'o str> {
    options
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Value a directive carries for a given tag
fn directive_value(kind: DirectiveKind, name: &str, options: &[(String, String)]) -> String {
    match kind {
        DirectiveKind::DateTime => name.to_string(),
        DirectiveKind::Graphic => match option(options, name) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => format!(
                "{}{}",
                option(options, "page").unwrap_or_default(),
                option(options, "block").unwrap_or_default()
            ),
        },
        _ => option(options, name).unwrap_or_default().to_string(),
    }
}

/// Markup to page content parser
#[derive(Debug, Clone, Default)]
pub struct MarkupParser {
    keep_newlines: bool,
}

impl MarkupParser {
    /// Create a parser that drops line breaks
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse markup; never fails
    pub fn parse(&self, markup: &str) -> PageContent {
        let mut content = PageContent::new();
        let mut text = String::new();

        for token in Tokenizer::new(markup) {
            match token {
                Token::Data(data) => text.push_str(&data),
                Token::Newline if self.keep_newlines => text.push('\n'),
                Token::Newline => {}
                Token::TagStart { name, options } => match DirectiveKind::from_tag(&name) {
                    Some(kind) => {
                        if !text.is_empty() {
                            content.push(Segment::Text(std::mem::take(&mut text)));
                        }
                        let value = directive_value(kind, &name, &options);
                        content.push(Segment::directive(kind, value));
                    }
                    None => trace!(tag = %name, "dropping unrecognised markup tag"),
                },
                Token::TagEnd { name } => trace!(tag = %name, "ignoring closing markup tag"),
            }
        }

        if !text.is_empty() {
            content.push(Segment::Text(text));
        }
        content
    }
}

/// Builder for [`MarkupParser`]
#[derive(Debug, Default)]
pub struct MarkupParserBuilder {
    keep_newlines: bool,
}

impl MarkupParserBuilder {
    /// Create a new parser builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep line breaks as `\n` in text instead of dropping them
    pub fn with_newlines(mut self, keep: bool) -> Self {
        self.keep_newlines = keep;
        self
    }

    /// Build the parser
    pub fn build(self) -> MarkupParser {
        MarkupParser {
            keep_newlines: self.keep_newlines,
        }
    }
}

/// Parse markup with the default parser
pub fn parse_markup(markup: &str) -> PageContent {
    MarkupParser::new().parse(markup)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, options: &[(&str, &str)]) -> Token {
        Token::TagStart {
            name: name.to_string(),
            options: options
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_tokenize_tags_and_data() {
        let tokens: Vec<Token> = Tokenizer::new("[color=red]Hi[/color]\n[date]").collect();
        assert_eq!(
            tokens,
            vec![
                tag("color", &[("color", "red")]),
                Token::Data("Hi".to_string()),
                Token::TagEnd {
                    name: "color".to_string()
                },
                Token::Newline,
                tag("date", &[]),
            ]
        );
    }

    #[test]
    fn test_tokenize_options() {
        let tokens: Vec<Token> =
            Tokenizer::new("[GRAPHIC page=A block='2'][font=\"bold\" x]").collect();
        assert_eq!(
            tokens,
            vec![
                tag("graphic", &[("page", "A"), ("block", "2")]),
                tag("font", &[("font", "bold"), ("x", "")]),
            ]
        );
    }

    #[test]
    fn test_tokenize_literal_brackets() {
        let tokens: Vec<Token> = Tokenizer::new("a[b[c]d[").collect();
        assert_eq!(
            tokens,
            vec![
                Token::Data("a".to_string()),
                Token::Data("[".to_string()),
                Token::Data("b".to_string()),
                tag("c", &[]),
                Token::Data("d".to_string()),
                Token::Data("[".to_string()),
            ]
        );

        let tokens: Vec<Token> = Tokenizer::new("[]x[ = ]").collect();
        assert_eq!(tokens[0], Token::Data("[".to_string()));
        assert!(tokens.iter().all(|t| matches!(t, Token::Data(_))));
    }

    #[test]
    fn test_parse_color_text() {
        let content = parse_markup("[color=green]OK");
        assert_eq!(
            content.segments(),
            &[
                Segment::directive(DirectiveKind::Color, "green"),
                Segment::text("OK"),
            ]
        );
        assert_eq!(content.render().unwrap(), "<CE>OK");
    }

    #[test]
    fn test_unrecognised_tag_dropped() {
        let content = parse_markup("[bogus=1]Hi");
        assert_eq!(content.segments(), &[Segment::text("Hi")]);
    }

    #[test]
    fn test_parse_mixed_directives() {
        let content = parse_markup("[font=bold]Now [time] [bell=0.5][char=65][column]");
        assert_eq!(
            content.segments(),
            &[
                Segment::directive(DirectiveKind::Font, "bold"),
                Segment::text("Now "),
                Segment::directive(DirectiveKind::DateTime, "time"),
                Segment::text(" "),
                Segment::directive(DirectiveKind::Bell, "0.5"),
                Segment::directive(DirectiveKind::Character, "65"),
                Segment::directive(DirectiveKind::Column, ""),
            ]
        );
        assert_eq!(content.render().unwrap(), "<AB>Now <KT> <BA><U41><N00>");
    }

    #[test]
    fn test_parse_graphic_forms() {
        let content = parse_markup("[graphic=A1][graphic page=B block=2]");
        assert_eq!(content.render().unwrap(), "<GA1><GB2>");
    }

    #[test]
    fn test_closing_tags_and_newlines() {
        let content = parse_markup("[color=red]one[/color]\ntwo");
        assert_eq!(
            content.segments(),
            &[
                Segment::directive(DirectiveKind::Color, "red"),
                Segment::text("onetwo"),
            ]
        );

        let parser = MarkupParserBuilder::new().with_newlines(true).build();
        let content = parser.parse("one\r\ntwo");
        assert_eq!(content.segments(), &[Segment::text("one\ntwo")]);
    }

    #[test]
    fn test_builder_from_crate_root() {
        let parser = crate::MarkupParserBuilder::new().with_newlines(true).build();
        let content = parser.parse("[color=red]a\nb");
        assert_eq!(content.render().unwrap(), "<CB>a\nb");
    }

    #[test]
    fn test_parse_never_fails() {
        for input in ["", "[", "]", "[[[]]]", "[/]", "[color=]", "[=x]", "plain"] {
            let _ = parse_markup(input);
        }
        assert!(parse_markup("").is_empty());
    }
}
