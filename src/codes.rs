//! Enumerated protocol codes: effects, display methods, speeds, fonts, colors

use bitfield::bitfield;

use crate::error::{Result, SignError};

/// Transition effect used when a page appears (lead) or leaves (lag)
///
/// Letters run `A`-`S` with `O` left unused by the sign firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Effect {
    /// Show immediately
    Immediate,
    /// Open from the center outwards
    XOpen,
    CurtainUp,
    CurtainDown,
    ScrollLeft,
    ScrollRight,
    /// Open vertically
    VOpen,
    /// Close vertically
    VClose,
    ScrollUp,
    ScrollDown,
    Hold,
    Snow,
    Twinkle,
    BlockMove,
    Random,
    /// Built-in "Hello world" animation
    HelloWorld,
    /// Built-in "Welcome" animation
    Welcome,
    /// Built-in "Amplus" animation
    AmPlus,
}

impl Effect {
    /// Protocol letter for this effect
    pub fn letter(&self) -> char {
        match self {
            Effect::Immediate => 'A',
            Effect::XOpen => 'B',
            Effect::CurtainUp => 'C',
            Effect::CurtainDown => 'D',
            Effect::ScrollLeft => 'E',
            Effect::ScrollRight => 'F',
            Effect::VOpen => 'G',
            Effect::VClose => 'H',
            Effect::ScrollUp => 'I',
            Effect::ScrollDown => 'J',
            Effect::Hold => 'K',
            Effect::Snow => 'L',
            Effect::Twinkle => 'M',
            Effect::BlockMove => 'N',
            Effect::Random => 'P',
            Effect::HelloWorld => 'Q',
            Effect::Welcome => 'R',
            Effect::AmPlus => 'S',
        }
    }
}

impl TryFrom<char> for Effect {
    type Error = SignError;

    fn try_from(value: char) -> Result<Self> {
        match value.to_ascii_uppercase() {
            'A' => Ok(Effect::Immediate),
            'B' => Ok(Effect::XOpen),
            'C' => Ok(Effect::CurtainUp),
            'D' => Ok(Effect::CurtainDown),
            'E' => Ok(Effect::ScrollLeft),
            'F' => Ok(Effect::ScrollRight),
            'G' => Ok(Effect::VOpen),
            'H' => Ok(Effect::VClose),
            'I' => Ok(Effect::ScrollUp),
            'J' => Ok(Effect::ScrollDown),
            'K' => Ok(Effect::Hold),
            'L' => Ok(Effect::Snow),
            'M' => Ok(Effect::Twinkle),
            'N' => Ok(Effect::BlockMove),
            'P' => Ok(Effect::Random),
            'Q' => Ok(Effect::HelloWorld),
            'R' => Ok(Effect::Welcome),
            'S' => Ok(Effect::AmPlus),
            _ => Err(SignError::invalid_value(format!(
                "Unknown effect letter: {:?}",
                value
            ))),
        }
    }
}

/// How page text is drawn while it is held on screen (low nibble of the method byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DisplayMethod {
    Normal = 0x01,
    Blinking = 0x02,
    /// Play tune 1
    Song1 = 0x03,
    /// Play tune 2
    Song2 = 0x04,
    /// Play tune 3
    Song3 = 0x05,
}

impl DisplayMethod {
    /// Raw method code
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for DisplayMethod {
    type Error = SignError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(DisplayMethod::Normal),
            0x02 => Ok(DisplayMethod::Blinking),
            0x03 => Ok(DisplayMethod::Song1),
            0x04 => Ok(DisplayMethod::Song2),
            0x05 => Ok(DisplayMethod::Song3),
            _ => Err(SignError::invalid_value(format!(
                "Unknown display method: {:#04x}",
                value
            ))),
        }
    }
}

/// Effect speed (high nibble of the method byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Speed {
    Fast = 0x40,
    Medium = 0x50,
    Slow = 0x60,
    Slowest = 0x70,
}

impl Speed {
    /// Raw speed code
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for Speed {
    type Error = SignError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x40 => Ok(Speed::Fast),
            0x50 => Ok(Speed::Medium),
            0x60 => Ok(Speed::Slow),
            0x70 => Ok(Speed::Slowest),
            _ => Err(SignError::invalid_value(format!(
                "Unknown speed: {:#04x}",
                value
            ))),
        }
    }
}

bitfield! {
    /// The `<M.>` byte of a page: speed in bits 6-4, method in bits 3-0
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MethodByte(u8);
    impl Debug;
    pub u8, speed_bits, set_speed_bits: 6, 4;
    pub u8, method_bits, set_method_bits: 3, 0;
}

impl MethodByte {
    /// Pack a speed and a display method
    ///
    /// The codes occupy disjoint bit ranges, so the byte is their plain sum.
    pub fn new(speed: Speed, method: DisplayMethod) -> Self {
        MethodByte(speed.code() + method.code())
    }

    /// Raw byte as sent after `<M`
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Wire character for this byte
    pub fn as_char(&self) -> char {
        self.0 as char
    }

    /// Recover the speed, if the high bits name one
    pub fn speed(&self) -> Result<Speed> {
        Speed::try_from(self.speed_bits() << 4)
    }

    /// Recover the display method, if the low bits name one
    pub fn method(&self) -> Result<DisplayMethod> {
        DisplayMethod::try_from(self.method_bits())
    }
}

impl From<u8> for MethodByte {
    fn from(value: u8) -> Self {
        MethodByte(value)
    }
}

/// Character font selected by an `<A.>` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Font {
    #[default]
    Normal,
    Bold,
    Narrow,
    Large,
    Long,
}

impl Font {
    /// Look up a font by its markup name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "normal" => Some(Font::Normal),
            "bold" => Some(Font::Bold),
            "narrow" => Some(Font::Narrow),
            "large" => Some(Font::Large),
            "long" => Some(Font::Long),
            _ => None,
        }
    }

    /// Protocol letter
    pub fn letter(&self) -> char {
        match self {
            Font::Normal => 'A',
            Font::Bold => 'B',
            Font::Narrow => 'C',
            Font::Large => 'D',
            Font::Long => 'E',
        }
    }
}

/// Text color selected by a `<C.>` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Color {
    DimRed,
    #[default]
    Red,
    BrightRed,
    DimGreen,
    Green,
    BrightGreen,
    DimOrange,
    Orange,
    BrightOrange,
    Yellow,
    Lime,
    InvertedRed,
    InvertedGreen,
    InvertedOrange,
    RedOnGreen,
    GreenOnRed,
    /// Red, yellow and green stripes
    Ryg,
    Rainbow,
}

impl Color {
    /// Look up a color by its markup name (`dim-red`, `green-on-red`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name {
            "dim-red" => Color::DimRed,
            "red" => Color::Red,
            "bright-red" => Color::BrightRed,
            "dim-green" => Color::DimGreen,
            "green" => Color::Green,
            "bright-green" => Color::BrightGreen,
            "dim-orange" => Color::DimOrange,
            "orange" => Color::Orange,
            "bright-orange" => Color::BrightOrange,
            "yellow" => Color::Yellow,
            "lime" => Color::Lime,
            "inverted-red" => Color::InvertedRed,
            "inverted-green" => Color::InvertedGreen,
            "inverted-orange" => Color::InvertedOrange,
            "red-on-green" => Color::RedOnGreen,
            "green-on-red" => Color::GreenOnRed,
            "ryg" => Color::Ryg,
            "rainbow" => Color::Rainbow,
            _ => return None,
        };
        Some(color)
    }

    /// Protocol letter
    pub fn letter(&self) -> char {
        match self {
            Color::DimRed => 'A',
            Color::Red => 'B',
            Color::BrightRed => 'C',
            Color::DimGreen => 'D',
            Color::Green => 'E',
            Color::BrightGreen => 'F',
            Color::DimOrange => 'G',
            Color::Orange => 'H',
            Color::BrightOrange => 'I',
            Color::Yellow => 'J',
            Color::Lime => 'K',
            Color::InvertedRed => 'L',
            Color::InvertedGreen => 'M',
            Color::InvertedOrange => 'N',
            Color::RedOnGreen => 'P',
            Color::GreenOnRed => 'Q',
            Color::Ryg => 'R',
            Color::Rainbow => 'S',
        }
    }
}

/// Which clock field a `<K.>` tag inserts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DateTimeKind {
    Date,
    Time,
}

impl DateTimeKind {
    /// `date` selects the date; every other name falls back to the time
    pub fn from_name(name: &str) -> Self {
        match name {
            "date" => DateTimeKind::Date,
            _ => DateTimeKind::Time,
        }
    }

    /// Protocol letter
    pub fn letter(&self) -> char {
        match self {
            DateTimeKind::Date => 'D',
            DateTimeKind::Time => 'T',
        }
    }
}
