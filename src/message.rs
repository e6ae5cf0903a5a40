//! Message catalogue for the AM03127 command set
//!
//! Every command renders to a payload string; [`Message::encode`] wraps it in
//! the frame envelope for a given sign ID.

use chrono::{Datelike, Local, Timelike};

use crate::codes::{Effect, Font, MethodByte};
use crate::content::PageContent;
use crate::core::{Brightness, Page, Schedule, SignId, WaitTime};
use crate::encoding::FrameCodec;
use crate::error::{Result, SignError};

/// Start or end point of a schedule window
///
/// A zeroed year, month and day makes the window recur daily on time of day
/// alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleTime {
    /// Two-digit year
    pub year: u8,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
}

impl ScheduleTime {
    /// Take the calendar date and time of day from a timestamp
    pub fn from_datetime<T: Datelike + Timelike>(at: &T) -> Self {
        ScheduleTime {
            year: two_digit_year(at.year()),
            month: at.month() as u8,
            day: at.day() as u8,
            hour: at.hour() as u8,
            minute: at.minute() as u8,
        }
    }

    /// Daily window point at `hour:minute`
    pub fn recurring(hour: u8, minute: u8) -> Self {
        ScheduleTime {
            year: 0,
            month: 0,
            day: 0,
            hour,
            minute,
        }
    }

    /// Check if the date part is zeroed
    pub fn is_recurring(&self) -> bool {
        self.year == 0 && self.month == 0 && self.day == 0
    }

    fn render_into(&self, out: &mut String) -> Result<()> {
        for (field, value) in [
            ("year", self.year),
            ("month", self.month),
            ("day", self.day),
            ("hour", self.hour),
            ("minute", self.minute),
        ] {
            out.push_str(&two_digits(field, value)?);
        }
        Ok(())
    }
}

/// A command for the sign
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Message {
    /// Assign a new ID to whichever sign receives the frame
    SetId { new_id: SignId },
    /// Set the internal clock
    SetClock {
        year: u8,
        /// ISO weekday, Monday = 1
        weekday: u8,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    },
    /// Store content on a page
    SendPage {
        line: u8,
        page: Page,
        lead: Effect,
        method: MethodByte,
        wait: WaitTime,
        lag: Effect,
        content: PageContent,
    },
    /// Show a list of pages within a time window
    SendSchedule {
        schedule: Schedule,
        start: ScheduleTime,
        end: ScheduleTime,
        /// Page letters, in play order
        pages: String,
    },
    /// Upload one block of a graphic
    SendGraphic { page: Page, block: u8, data: Vec<u8> },
    DeletePage { line: u8, page: Page },
    DeleteSchedule { schedule: Schedule },
    /// Wipe pages, schedules and graphics
    DeleteAll,
    /// Page to run when no schedule is active
    SetRunPage { page: Page },
    SetBrightness { level: Brightness },
    /// Define a custom character in a font's user table
    SendCharacter { font: Font, code: u8, data: Vec<u8> },
    /// Restore the factory character table
    ResetCharacterTable,
}

impl Message {
    /// Clock message for the given timestamp
    pub fn set_clock<T: Datelike + Timelike>(at: &T) -> Self {
        Message::SetClock {
            year: two_digit_year(at.year()),
            weekday: at.weekday().number_from_monday() as u8,
            month: at.month() as u8,
            day: at.day() as u8,
            hour: at.hour() as u8,
            minute: at.minute() as u8,
            second: at.second() as u8,
        }
    }

    /// Clock message for the local wall-clock time
    pub fn set_clock_now() -> Self {
        Self::set_clock(&Local::now())
    }

    /// Schedule message from two timestamps
    ///
    /// With `recurring` the dates are dropped and only the times of day are
    /// kept.
    pub fn schedule<T: Datelike + Timelike>(
        schedule: Schedule,
        start: &T,
        end: &T,
        pages: impl Into<String>,
        recurring: bool,
    ) -> Self {
        let (start, end) = if recurring {
            (
                ScheduleTime::recurring(start.hour() as u8, start.minute() as u8),
                ScheduleTime::recurring(end.hour() as u8, end.minute() as u8),
            )
        } else {
            (ScheduleTime::from_datetime(start), ScheduleTime::from_datetime(end))
        };

        Message::SendSchedule {
            schedule,
            start,
            end,
            pages: pages.into(),
        }
    }

    /// Short command name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Message::SetId { .. } => "SetId",
            Message::SetClock { .. } => "SetClock",
            Message::SendPage { .. } => "SendPage",
            Message::SendSchedule { .. } => "SendSchedule",
            Message::SendGraphic { .. } => "SendGraphic",
            Message::DeletePage { .. } => "DeletePage",
            Message::DeleteSchedule { .. } => "DeleteSchedule",
            Message::DeleteAll => "DeleteAll",
            Message::SetRunPage { .. } => "SetRunPage",
            Message::SetBrightness { .. } => "SetBrightness",
            Message::SendCharacter { .. } => "SendCharacter",
            Message::ResetCharacterTable => "ResetCharacterTable",
        }
    }

    /// Render the payload that goes between the ID header and the checksum
    ///
    /// For [`Message::SetId`] this is the whole identity frame, since that
    /// command has no envelope of its own.
    pub fn render_payload(&self) -> Result<Vec<u8>> {
        let mut out = String::new();
        let mut data: &[u8] = &[];

        match self {
            Message::SetId { new_id } => return Ok(FrameCodec::encode_identity(*new_id)),
            Message::SetClock {
                year,
                weekday,
                month,
                day,
                hour,
                minute,
                second,
            } => {
                out.push_str("<SC>");
                for (field, value) in [
                    ("year", *year),
                    ("weekday", *weekday),
                    ("month", *month),
                    ("day", *day),
                    ("hour", *hour),
                    ("minute", *minute),
                    ("second", *second),
                ] {
                    out.push_str(&two_digits(field, value)?);
                }
            }
            Message::SendPage {
                line,
                page,
                lead,
                method,
                wait,
                lag,
                content,
            } => {
                let content = content.render()?;
                let mut bytes = format!("<L{}><P{}><F{}><M", line, page.letter(), lead.letter())
                    .into_bytes();
                // raw byte, not a char: values above 0x7F must not be UTF-8 encoded
                bytes.push(method.value());
                bytes.extend_from_slice(
                    format!("><W{}><F{}>{}", wait.letter(), lag.letter(), content).as_bytes(),
                );
                return Ok(bytes);
            }
            Message::SendSchedule {
                schedule,
                start,
                end,
                pages,
            } => {
                out.push_str(&format!("<T{}>", schedule.letter()));
                start.render_into(&mut out)?;
                end.render_into(&mut out)?;
                out.push_str(&page_list(pages)?);
            }
            Message::SendGraphic {
                page,
                block,
                data: raw,
            } => {
                out.push_str(&format!("<G{}{}>", page.letter(), block));
                data = raw.as_slice();
            }
            Message::DeletePage { line, page } => {
                out.push_str(&format!("<DL{}P{}>", line, page.letter()));
            }
            Message::DeleteSchedule { schedule } => {
                out.push_str(&format!("<DT{}>", schedule.letter()));
            }
            Message::DeleteAll => out.push_str("<D*>"),
            Message::SetRunPage { page } => {
                out.push_str(&format!("<RP{}>", page.letter()));
            }
            Message::SetBrightness { level } => {
                out.push_str(&format!("<B{}>", level.letter()));
            }
            Message::SendCharacter {
                font,
                code,
                data: raw,
            } => {
                out.push_str(&format!("<F{}{:02X}>", font.letter(), code));
                data = raw.as_slice();
            }
            Message::ResetCharacterTable => out.push_str("<DU>"),
        }

        let mut bytes = out.into_bytes();
        bytes.extend_from_slice(data);
        Ok(bytes)
    }

    /// Encode the complete frame for the sign with `id`
    ///
    /// `id` is ignored for [`Message::SetId`].
    pub fn encode(&self, id: SignId) -> Result<Vec<u8>> {
        let payload = self.render_payload()?;
        match self {
            Message::SetId { .. } => Ok(payload),
            _ => Ok(FrameCodec::encode(id, &payload)),
        }
    }

    /// Response the sign sends when it accepts this message
    pub fn expected_response(&self) -> Vec<u8> {
        FrameCodec::expected_response(self)
    }
}

fn two_digit_year(year: i32) -> u8 {
    year.rem_euclid(100) as u8
}

fn two_digits(field: &str, value: u8) -> Result<String> {
    if value > 99 {
        return Err(SignError::invalid_field(format!(
            "{} {} does not fit two decimal digits",
            field, value
        )));
    }
    Ok(format!("{:02}", value))
}

fn page_list(pages: &str) -> Result<String> {
    if !pages.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(SignError::invalid_field(format!(
            "Schedule pages {:?} must be page letters",
            pages
        )));
    }
    Ok(pages.to_ascii_uppercase())
}
