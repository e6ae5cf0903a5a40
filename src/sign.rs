//! Sign session: addresses messages, hands frames to a transport and checks
//! the acknowledgement

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use thiserror::Error;
use tracing::{debug, warn};

use crate::codes::{DisplayMethod, Effect, Font, MethodByte, Speed};
use crate::content::PageContent;
use crate::core::{Brightness, Page, Schedule, SignId, WaitTime};
use crate::encoding::FrameCodec;
use crate::error::SignError;
use crate::message::Message;
use crate::parser::MarkupParser;

/// Byte channel to a sign
///
/// Implementations write the frame, wait for the sign to process it and
/// return whatever it answered. Timeouts and retries belong here, not in the
/// session.
pub trait Transport {
    /// Fault raised by the channel
    type Error: std::error::Error + 'static;

    /// Write `frame` and read back the response
    fn send_and_receive(&mut self, frame: &[u8]) -> Result<Vec<u8>, Self::Error>;
}

/// Failure to complete a request/response exchange
#[derive(Error, Debug)]
pub enum SendError<E: std::error::Error + 'static> {
    /// The message could not be encoded
    #[error(transparent)]
    Encode(#[from] SignError),

    /// The transport failed before a response arrived
    #[error("Transport error: {0}")]
    Transport(#[source] E),
}

/// Page transition settings used when none are given explicitly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PageOptions {
    /// Display line
    pub line: u8,
    /// Effect when the page appears
    pub lead: Effect,
    pub speed: Speed,
    pub method: DisplayMethod,
    /// Hold time between lead and lag
    pub wait: WaitTime,
    /// Effect when the page leaves
    pub lag: Effect,
}

impl Default for PageOptions {
    fn default() -> Self {
        PageOptions {
            line: 1,
            lead: Effect::ScrollLeft,
            speed: Speed::Medium,
            method: DisplayMethod::Normal,
            wait: WaitTime::default(),
            lag: Effect::ScrollLeft,
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SignConfig {
    /// Address of the sign
    pub id: SignId,
    /// Defaults for [`Sign::send_page`]
    pub page: PageOptions,
}

/// Acknowledgement counters for a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignStats {
    /// Frames answered with the expected response
    pub acknowledged: u32,
    /// Frames answered with anything else
    pub rejected: u32,
    /// Raw bytes of the most recent response
    pub last_response: Option<Vec<u8>>,
}

impl SignStats {
    /// Record an acknowledged exchange
    pub fn record_ack(&mut self, response: Vec<u8>) {
        self.acknowledged += 1;
        self.last_response = Some(response);
    }

    /// Record an exchange whose response did not match
    pub fn record_rejection(&mut self, response: Vec<u8>) {
        self.rejected += 1;
        self.last_response = Some(response);
    }

    /// Number of completed exchanges
    pub fn total(&self) -> u32 {
        self.acknowledged + self.rejected
    }

    /// Share of exchanges not acknowledged (0.0 to 1.0)
    pub fn rejection_rate(&self) -> f32 {
        if self.total() > 0 {
            self.rejected as f32 / self.total() as f32
        } else {
            0.0
        }
    }
}

/// A sign reachable over a transport
#[derive(Debug)]
pub struct Sign<T: Transport> {
    transport: T,
    config: SignConfig,
    stats: SignStats,
}

impl<T: Transport> Sign<T> {
    /// Create a session
    pub fn new(transport: T, config: SignConfig) -> Self {
        Sign {
            transport,
            config,
            stats: SignStats::default(),
        }
    }

    /// Address frames are sent to
    pub fn id(&self) -> SignId {
        self.config.id
    }

    /// Session configuration
    pub fn config(&self) -> &SignConfig {
        &self.config
    }

    /// Acknowledgement counters
    pub fn stats(&self) -> &SignStats {
        &self.stats
    }

    /// Access the transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Release the transport
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Send a message and report whether the sign acknowledged it
    ///
    /// A wrong or missing response is `Ok(false)`; only encoding and transport
    /// failures are errors.
    pub fn send_message(&mut self, message: &Message) -> Result<bool, SendError<T::Error>> {
        let frame = message.encode(self.config.id)?;
        let expected = message.expected_response();

        debug!(
            id = %self.config.id,
            command = message.name(),
            bytes = frame.len(),
            "sending frame"
        );
        let response = self
            .transport
            .send_and_receive(&frame)
            .map_err(SendError::Transport)?;

        if FrameCodec::is_success(&response, &expected) {
            self.stats.record_ack(response);
            Ok(true)
        } else {
            warn!(
                id = %self.config.id,
                command = message.name(),
                response = ?FrameCodec::decode_response(&response),
                "sign did not acknowledge"
            );
            self.stats.record_rejection(response);
            Ok(false)
        }
    }

    /// Assign a new ID; later frames use it once the sign echoes it back
    pub fn set_id(&mut self, new_id: SignId) -> Result<bool, SendError<T::Error>> {
        let accepted = self.send_message(&Message::SetId { new_id })?;
        if accepted {
            self.config.id = new_id;
        }
        Ok(accepted)
    }

    /// Set the sign clock to the local time
    pub fn set_clock(&mut self) -> Result<bool, SendError<T::Error>> {
        self.send_message(&Message::set_clock_now())
    }

    /// Set the sign clock to `at`
    pub fn set_clock_at<D: Datelike + Timelike>(
        &mut self,
        at: &D,
    ) -> Result<bool, SendError<T::Error>> {
        self.send_message(&Message::set_clock(at))
    }

    /// Store content on a page using the configured transition settings
    pub fn send_page(
        &mut self,
        page: Page,
        content: impl Into<PageContent>,
    ) -> Result<bool, SendError<T::Error>> {
        let options = self.config.page;
        self.send_page_with(page, content, &options)
    }

    /// Store content on a page with explicit transition settings
    pub fn send_page_with(
        &mut self,
        page: Page,
        content: impl Into<PageContent>,
        options: &PageOptions,
    ) -> Result<bool, SendError<T::Error>> {
        let message = Message::SendPage {
            line: options.line,
            page,
            lead: options.lead,
            method: MethodByte::new(options.speed, options.method),
            wait: options.wait,
            lag: options.lag,
            content: content.into(),
        };
        self.send_message(&message)
    }

    /// Parse markup and store it on a page
    pub fn send_markup(&mut self, page: Page, markup: &str) -> Result<bool, SendError<T::Error>> {
        let content = MarkupParser::new().parse(markup);
        self.send_page(page, content)
    }

    /// Schedule `pages` between `start` and `end`
    ///
    /// Missing bounds default to 2000-01-01 and 2099-12-31. With `recurring`
    /// only the time of day of each bound is used.
    pub fn send_schedule(
        &mut self,
        schedule: Schedule,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
        pages: &str,
        recurring: bool,
    ) -> Result<bool, SendError<T::Error>> {
        let start = start.unwrap_or_else(|| midnight(2000, 1, 1));
        let end = end.unwrap_or_else(|| midnight(2099, 12, 31));
        self.send_message(&Message::schedule(schedule, &start, &end, pages, recurring))
    }

    /// Delete a page from a line
    pub fn delete_page(&mut self, page: Page, line: u8) -> Result<bool, SendError<T::Error>> {
        self.send_message(&Message::DeletePage { line, page })
    }

    /// Delete a schedule
    pub fn delete_schedule(&mut self, schedule: Schedule) -> Result<bool, SendError<T::Error>> {
        self.send_message(&Message::DeleteSchedule { schedule })
    }

    /// Delete all pages, schedules and graphics
    pub fn delete_all(&mut self) -> Result<bool, SendError<T::Error>> {
        self.send_message(&Message::DeleteAll)
    }

    /// Page to show when no schedule is active
    pub fn set_run_page(&mut self, page: Page) -> Result<bool, SendError<T::Error>> {
        self.send_message(&Message::SetRunPage { page })
    }

    /// Set brightness from a 0.0-1.0 level
    pub fn set_brightness(&mut self, level: f64) -> Result<bool, SendError<T::Error>> {
        let level = Brightness::from_level(level)?;
        self.send_message(&Message::SetBrightness { level })
    }

    /// Upload one graphic block
    pub fn send_graphic(
        &mut self,
        page: Page,
        block: u8,
        data: Vec<u8>,
    ) -> Result<bool, SendError<T::Error>> {
        self.send_message(&Message::SendGraphic { page, block, data })
    }

    /// Define a custom character
    pub fn send_character(
        &mut self,
        font: Font,
        code: u8,
        data: Vec<u8>,
    ) -> Result<bool, SendError<T::Error>> {
        self.send_message(&Message::SendCharacter { font, code, data })
    }

    /// Restore the factory character table
    pub fn reset_character_table(&mut self) -> Result<bool, SendError<T::Error>> {
        self.send_message(&Message::ResetCharacterTable)
    }
}

fn midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Builder for [`Sign`] sessions
#[derive(Debug, Default)]
pub struct SignBuilder {
    config: SignConfig,
}

impl SignBuilder {
    /// Create a builder for sign ID 1 with default page settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sign ID
    pub fn with_id(mut self, id: SignId) -> Self {
        self.config.id = id;
        self
    }

    /// Set the default page settings
    pub fn with_page_options(mut self, page: PageOptions) -> Self {
        self.config.page = page;
        self
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: SignConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the session over `transport`
    pub fn build<T: Transport>(self, transport: T) -> Sign<T> {
        Sign::new(transport, self.config)
    }
}
