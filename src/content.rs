//! Page content: literal text interleaved with zero-width display directives

use crate::codes::{Color, DateTimeKind, Font};
use crate::error::{Result, SignError};

/// Letters used for bell durations, indexed by half-seconds minus one
const BELL_LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Kind of an in-text directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DirectiveKind {
    /// `<A.>` font change
    Font,
    /// `<B.>` beep for a number of half-seconds
    Bell,
    /// `<C.>` color change
    Color,
    /// `<G..>` embed a stored graphic block
    Graphic,
    /// `<U..>` user-defined character
    Character,
    /// `<N..>` jump to a pixel column
    Column,
    /// `<K.>` insert the current date or time
    DateTime,
}

impl DirectiveKind {
    /// Resolve a markup tag name; `date` and `time` both map to [`DirectiveKind::DateTime`]
    pub fn from_tag(name: &str) -> Option<Self> {
        let kind = match name {
            "font" => DirectiveKind::Font,
            "bell" => DirectiveKind::Bell,
            "color" => DirectiveKind::Color,
            "graphic" => DirectiveKind::Graphic,
            "char" => DirectiveKind::Character,
            "column" => DirectiveKind::Column,
            "date" | "time" => DirectiveKind::DateTime,
            _ => return None,
        };
        Some(kind)
    }
}

/// One piece of page content
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Segment {
    /// Text sent verbatim
    Text(String),
    /// Display instruction applied at this position
    Directive { kind: DirectiveKind, value: String },
}

impl Segment {
    /// Build a text segment
    pub fn text(text: impl Into<String>) -> Self {
        Segment::Text(text.into())
    }

    /// Build a directive segment
    pub fn directive(kind: DirectiveKind, value: impl Into<String>) -> Self {
        Segment::Directive {
            kind,
            value: value.into(),
        }
    }

    /// Render this segment into `out`
    pub fn render_into(&self, out: &mut String) -> Result<()> {
        match self {
            Segment::Text(text) => out.push_str(text),
            Segment::Directive { kind, value } => out.push_str(&render_directive(*kind, value)?),
        }
        Ok(())
    }
}

/// The ordered content of a single page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageContent {
    segments: Vec<Segment>,
}

impl PageContent {
    /// Create empty page content
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.segments.push(Segment::text(text));
        self
    }

    /// Append a directive
    pub fn directive(mut self, kind: DirectiveKind, value: impl Into<String>) -> Self {
        self.segments.push(Segment::directive(kind, value));
        self
    }

    /// Append an already-built segment
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Segments in display order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Check if there is nothing to show
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Render to the sign's escape-tag vocabulary
    pub fn render(&self) -> Result<String> {
        let mut out = String::new();
        for segment in &self.segments {
            segment.render_into(&mut out)?;
        }
        Ok(out)
    }
}

impl From<&str> for PageContent {
    fn from(text: &str) -> Self {
        PageContent::new().text(text)
    }
}

impl From<String> for PageContent {
    fn from(text: String) -> Self {
        PageContent::new().text(text)
    }
}

impl From<Vec<Segment>> for PageContent {
    fn from(segments: Vec<Segment>) -> Self {
        PageContent { segments }
    }
}

impl FromIterator<Segment> for PageContent {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        PageContent {
            segments: iter.into_iter().collect(),
        }
    }
}

/// Render a single directive tag
///
/// Font, color, bell, character, column and date/time values fall back to a
/// default when they don't parse. Only values that parse but have no code
/// (a 20 second bell, character 300) and malformed graphic references fail.
pub fn render_directive(kind: DirectiveKind, value: &str) -> Result<String> {
    let tag = match kind {
        DirectiveKind::Font => {
            let font = Font::from_name(value).unwrap_or_default();
            format!("<A{}>", font.letter())
        }
        DirectiveKind::Bell => format!("<B{}>", bell_letter(value)?),
        DirectiveKind::Color => {
            let color = Color::from_name(value).unwrap_or_default();
            format!("<C{}>", color.letter())
        }
        DirectiveKind::Graphic => {
            let (page, block) = parse_graphic(value)?;
            format!("<G{}{}>", page, block)
        }
        DirectiveKind::Character => format!("<U{:02X}>", byte_code("Character", value)?),
        DirectiveKind::Column => format!("<N{:02X}>", byte_code("Column", value)?),
        DirectiveKind::DateTime => format!("<K{}>", DateTimeKind::from_name(value).letter()),
    };
    Ok(tag)
}

fn bell_letter(value: &str) -> Result<char> {
    let secs = value.trim().parse::<f64>().unwrap_or(1.0);
    let half_secs = (secs * 2.0 + 0.5).floor();
    if !(1.0..=BELL_LETTERS.len() as f64).contains(&half_secs) {
        return Err(SignError::invalid_value(format!(
            "Bell duration {:?} outside 0.5s-13s",
            value
        )));
    }
    Ok(BELL_LETTERS[half_secs as usize - 1] as char)
}

fn byte_code(what: &str, value: &str) -> Result<u8> {
    let code = value.trim().parse::<i64>().unwrap_or(0);
    u8::try_from(code).map_err(|_| {
        SignError::invalid_value(format!("{} code {} out of range [0, 255]", what, code))
    })
}

/// Split `A1`, `A,1` or `A 1` into a page letter and block number
fn parse_graphic(value: &str) -> Result<(char, u32)> {
    let value = value.trim();
    let mut chars = value.chars();
    let page = chars
        .next()
        .map(|c| c.to_ascii_uppercase())
        .filter(char::is_ascii_uppercase)
        .ok_or_else(|| {
            SignError::invalid_value(format!("Graphic {:?} does not start with a page letter", value))
        })?;

    let rest = chars.as_str().trim_start_matches(|c: char| c == ',' || c == ' ');
    let block = rest.parse::<u32>().map_err(|_| {
        SignError::invalid_value(format!("Graphic {:?} has no block number", value))
    })?;
    Ok((page, block))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text_and_color() {
        let content = PageContent::new()
            .directive(DirectiveKind::Color, "green")
            .text("OK");
        assert_eq!(content.render().unwrap(), "<CE>OK");
    }

    #[test]
    fn test_render_preserves_order() {
        let content = PageContent::new()
            .text("A")
            .directive(DirectiveKind::Font, "bold")
            .text("B")
            .directive(DirectiveKind::DateTime, "date");
        assert_eq!(content.render().unwrap(), "A<AB>B<KD>");
    }

    #[test]
    fn test_font_fallback() {
        assert_eq!(render_directive(DirectiveKind::Font, "narrow").unwrap(), "<AC>");
        assert_eq!(render_directive(DirectiveKind::Font, "gothic").unwrap(), "<AA>");
        assert_eq!(render_directive(DirectiveKind::Font, "").unwrap(), "<AA>");
    }

    #[test]
    fn test_color_fallback() {
        assert_eq!(render_directive(DirectiveKind::Color, "rainbow").unwrap(), "<CS>");
        assert_eq!(render_directive(DirectiveKind::Color, "mauve").unwrap(), "<CB>");
    }

    #[test]
    fn test_bell_durations() {
        assert_eq!(render_directive(DirectiveKind::Bell, "0.5").unwrap(), "<BA>");
        assert_eq!(render_directive(DirectiveKind::Bell, "1").unwrap(), "<BB>");
        assert_eq!(render_directive(DirectiveKind::Bell, "1.3").unwrap(), "<BC>");
        assert_eq!(render_directive(DirectiveKind::Bell, "13").unwrap(), "<BZ>");
        // unparsable counts as one second
        assert_eq!(render_directive(DirectiveKind::Bell, "loud").unwrap(), "<BB>");
        assert!(render_directive(DirectiveKind::Bell, "0").is_err());
        assert!(render_directive(DirectiveKind::Bell, "14").is_err());
    }

    #[test]
    fn test_character_and_column() {
        assert_eq!(render_directive(DirectiveKind::Character, "65").unwrap(), "<U41>");
        assert_eq!(render_directive(DirectiveKind::Character, "x").unwrap(), "<U00>");
        assert_eq!(render_directive(DirectiveKind::Column, "10").unwrap(), "<N0A>");
        assert_eq!(render_directive(DirectiveKind::Column, "1.5").unwrap(), "<N00>");
        assert!(render_directive(DirectiveKind::Column, "256").is_err());
        assert!(render_directive(DirectiveKind::Character, "-1").is_err());
    }

    #[test]
    fn test_graphic_reference() {
        assert_eq!(render_directive(DirectiveKind::Graphic, "A1").unwrap(), "<GA1>");
        assert_eq!(render_directive(DirectiveKind::Graphic, "b,2").unwrap(), "<GB2>");
        assert_eq!(render_directive(DirectiveKind::Graphic, "C 3").unwrap(), "<GC3>");
        assert!(render_directive(DirectiveKind::Graphic, "").is_err());
        assert!(render_directive(DirectiveKind::Graphic, "1A").is_err());
        assert!(render_directive(DirectiveKind::Graphic, "A").is_err());
    }

    #[test]
    fn test_datetime_fallback() {
        assert_eq!(render_directive(DirectiveKind::DateTime, "time").unwrap(), "<KT>");
        assert_eq!(render_directive(DirectiveKind::DateTime, "other").unwrap(), "<KT>");
    }

    #[test]
    fn test_render_failure_propagates() {
        let content: PageContent = vec![
            Segment::text("ring"),
            Segment::directive(DirectiveKind::Bell, "99"),
        ]
        .into();
        assert!(matches!(content.render(), Err(SignError::InvalidValue(_))));
    }
}
