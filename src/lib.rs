//! # AM03127 LED Sign Protocol
//!
//! Encoder for the serial protocol spoken by AM03127-based scrolling LED
//! message boards.
//!
//! The sign accepts ASCII frames of the form `<ID01>payload..<E>` and answers
//! `ACK` when a frame is accepted. This library provides:
//!
//! - Frame envelope and XOR checksum
//! - The full command catalogue (pages, schedules, clock, brightness, graphics, ...)
//! - Page content with font, color, bell and clock directives
//! - A markup parser for tagged text like `[color=red]Hello`
//! - A thin session over any request/response [`Transport`]
//!
//! ## Features
//!
//! - `serde`: Enable serialization/deserialization support
//!
//! ## Example
//!
//! ```
//! use am03127::{parse_markup, Message, MethodByte, Page, SignId, WaitTime};
//! use am03127::codes::{DisplayMethod, Effect, Speed};
//!
//! let message = Message::SendPage {
//!     line: 1,
//!     page: Page::new(1)?,
//!     lead: Effect::ScrollLeft,
//!     method: MethodByte::new(Speed::Medium, DisplayMethod::Normal),
//!     wait: WaitTime::from_secs(2.0)?,
//!     lag: Effect::ScrollLeft,
//!     content: parse_markup("[color=green]OK"),
//! };
//! let frame = message.encode(SignId::new(1)?)?;
//! assert!(frame.starts_with(b"<ID01><L1><PA><FE><MQ><WC><FE><CE>OK"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codes;
pub mod content;
pub mod core;
pub mod encoding;
pub mod error;
pub mod message;
pub mod parser;
pub mod sign;

pub use codes::MethodByte;
pub use content::{DirectiveKind, PageContent, Segment};
pub use self::core::{Brightness, Page, Schedule, SignId, WaitTime};
pub use encoding::{Frame, FrameCodec};
pub use error::{Result, SignError};
pub use message::{Message, ScheduleTime};
pub use parser::{parse_markup, MarkupParser, MarkupParserBuilder};
pub use sign::{PageOptions, SendError, Sign, SignBuilder, SignConfig, Transport};

/// Protocol constants
pub mod wire {
    /// Number of page slots (`A`-`Z`)
    pub const PAGE_COUNT: u8 = 26;

    /// Number of schedule slots (`A`-`E`)
    pub const SCHEDULE_COUNT: u8 = 5;

    /// Sign ID used when none is configured
    pub const DEFAULT_SIGN_ID: u8 = 1;
}
