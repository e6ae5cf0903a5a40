//! Indexed protocol values: sign IDs, pages, schedules, wait times and brightness

use crate::error::{Result, SignError};

const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Brightness slots; the last letter repeats.
const BRIGHTNESS_TABLE: [char; 5] = ['A', 'B', 'C', 'D', 'D'];

/// Sign address on the serial bus (1-255)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct SignId(u8);

impl SignId {
    /// Lowest assignable ID
    pub const MIN: u8 = 1;
    /// Highest assignable ID
    pub const MAX: u8 = 255;

    /// Create a new sign ID, rejecting 0
    pub fn new(id: u8) -> Result<Self> {
        if id < Self::MIN {
            return Err(SignError::invalid_value(format!(
                "Sign ID {} out of range [{}, {}]",
                id,
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(SignId(id))
    }

    /// Get the raw ID value
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Two-digit uppercase hex, as the ID appears on the wire
    pub fn to_hex(&self) -> String {
        format!("{:02X}", self.0)
    }
}

impl Default for SignId {
    fn default() -> Self {
        SignId(crate::wire::DEFAULT_SIGN_ID)
    }
}

impl TryFrom<u8> for SignId {
    type Error = SignError;

    fn try_from(value: u8) -> Result<Self> {
        SignId::new(value)
    }
}

impl From<SignId> for u8 {
    fn from(id: SignId) -> u8 {
        id.0
    }
}

impl std::fmt::Display for SignId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ID{}", self.to_hex())
    }
}

/// Page slot (1-26, shown on the wire as `A`-`Z`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct Page(u8);

impl Page {
    /// Number of page slots on the sign
    pub const COUNT: u8 = crate::wire::PAGE_COUNT;

    /// Create a page from its 1-based index
    pub fn new(index: u8) -> Result<Self> {
        if index == 0 || index > Self::COUNT {
            return Err(SignError::invalid_value(format!(
                "Page {} out of range [1, {}]",
                index,
                Self::COUNT
            )));
        }
        Ok(Page(index))
    }

    /// Create a page from its letter, case-insensitively
    pub fn from_letter(letter: char) -> Result<Self> {
        match letter.to_ascii_uppercase() {
            c @ 'A'..='Z' => Ok(Page(c as u8 - b'A' + 1)),
            _ => Err(SignError::invalid_value(format!(
                "Page letter {:?} is not A-Z",
                letter
            ))),
        }
    }

    /// 1-based page index
    pub fn index(&self) -> u8 {
        self.0
    }

    /// Protocol letter for this page
    pub fn letter(&self) -> char {
        ALPHABET[(self.0 - 1) as usize] as char
    }
}

impl Default for Page {
    fn default() -> Self {
        Page(1)
    }
}

impl TryFrom<u8> for Page {
    type Error = SignError;

    fn try_from(value: u8) -> Result<Self> {
        Page::new(value)
    }
}

impl From<Page> for u8 {
    fn from(page: Page) -> u8 {
        page.0
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Page {}", self.letter())
    }
}

/// Schedule slot (1-5, shown on the wire as `A`-`E`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct Schedule(u8);

impl Schedule {
    /// Number of schedule slots on the sign
    pub const COUNT: u8 = crate::wire::SCHEDULE_COUNT;

    /// Create a schedule from its 1-based index
    pub fn new(index: u8) -> Result<Self> {
        if index == 0 || index > Self::COUNT {
            return Err(SignError::invalid_value(format!(
                "Schedule {} out of range [1, {}]",
                index,
                Self::COUNT
            )));
        }
        Ok(Schedule(index))
    }

    /// Create a schedule from its letter, case-insensitively
    pub fn from_letter(letter: char) -> Result<Self> {
        match letter.to_ascii_uppercase() {
            c @ 'A'..='E' => Ok(Schedule(c as u8 - b'A' + 1)),
            _ => Err(SignError::invalid_value(format!(
                "Schedule letter {:?} is not A-E",
                letter
            ))),
        }
    }

    /// 1-based schedule index
    pub fn index(&self) -> u8 {
        self.0
    }

    /// Protocol letter for this schedule
    pub fn letter(&self) -> char {
        ALPHABET[(self.0 - 1) as usize] as char
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule(1)
    }
}

impl TryFrom<u8> for Schedule {
    type Error = SignError;

    fn try_from(value: u8) -> Result<Self> {
        Schedule::new(value)
    }
}

impl From<Schedule> for u8 {
    fn from(schedule: Schedule) -> u8 {
        schedule.0
    }
}

/// Time a page stays on screen between its lead and lag effects
///
/// Anything under a second is `A`; from there each whole second moves one
/// letter along `B`-`Z`, fractions truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "char", into = "char"))]
pub struct WaitTime(char);

impl WaitTime {
    /// Resolve a duration in seconds to its wait letter
    pub fn from_secs(duration: f64) -> Result<Self> {
        if duration.is_nan() {
            return Err(SignError::invalid_value("Wait time is NaN"));
        }
        if duration < 1.0 {
            return Ok(WaitTime('A'));
        }

        let whole = duration.floor();
        if whole >= ALPHABET.len() as f64 {
            return Err(SignError::invalid_value(format!(
                "Wait time {}s exceeds 25s",
                duration
            )));
        }
        Ok(WaitTime(ALPHABET[whole as usize] as char))
    }

    /// Use a wait letter directly
    pub fn from_letter(letter: char) -> Result<Self> {
        match letter.to_ascii_uppercase() {
            c @ 'A'..='Z' => Ok(WaitTime(c)),
            _ => Err(SignError::invalid_value(format!(
                "Wait letter {:?} is not A-Z",
                letter
            ))),
        }
    }

    /// Protocol letter
    pub fn letter(&self) -> char {
        self.0
    }
}

impl Default for WaitTime {
    fn default() -> Self {
        // two seconds
        WaitTime('C')
    }
}

impl TryFrom<char> for WaitTime {
    type Error = SignError;

    fn try_from(value: char) -> Result<Self> {
        WaitTime::from_letter(value)
    }
}

impl From<WaitTime> for char {
    fn from(wait: WaitTime) -> char {
        wait.0
    }
}

/// LED brightness code (`A`-`D`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "char", into = "char"))]
pub struct Brightness(char);

impl Brightness {
    /// Quantize a 0.0-1.0 level into quarters and pick its slot
    ///
    /// The table `[A, B, C, D, D]` is indexed by the quarter directly, so
    /// `0.0` is `A` and both the top quarter and full level land on the
    /// duplicated `D`. The device tool reads the same table from the far
    /// end (`1.0` as `A`); this ordering is the reverse of that.
    pub fn from_level(level: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&level) {
            return Err(SignError::invalid_value(format!(
                "Brightness level {} out of range [0.0, 1.0]",
                level
            )));
        }

        let quarters = (level / 0.25).floor() as usize;
        Ok(Brightness(BRIGHTNESS_TABLE[quarters]))
    }

    /// Use a brightness letter directly
    pub fn from_letter(letter: char) -> Result<Self> {
        match letter.to_ascii_uppercase() {
            c @ 'A'..='D' => Ok(Brightness(c)),
            _ => Err(SignError::invalid_value(format!(
                "Brightness letter {:?} is not A-D",
                letter
            ))),
        }
    }

    /// Protocol letter
    pub fn letter(&self) -> char {
        self.0
    }
}

impl TryFrom<char> for Brightness {
    type Error = SignError;

    fn try_from(value: char) -> Result<Self> {
        Brightness::from_letter(value)
    }
}

impl From<Brightness> for char {
    fn from(brightness: Brightness) -> char {
        brightness.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_id_range() {
        assert!(SignId::new(0).is_err());
        assert!(SignId::new(1).is_ok());
        assert_eq!(SignId::new(255).unwrap().to_hex(), "FF");
        assert_eq!(SignId::new(5).unwrap().to_hex(), "05");
    }

    #[test]
    fn test_page_letters() {
        assert_eq!(Page::new(1).unwrap().letter(), 'A');
        assert_eq!(Page::new(26).unwrap().letter(), 'Z');
        assert!(Page::new(0).is_err());
        assert!(Page::new(27).is_err());
        assert_eq!(Page::from_letter('c').unwrap().index(), 3);
        assert!(Page::from_letter('1').is_err());
    }

    #[test]
    fn test_schedule_letters() {
        assert_eq!(Schedule::new(1).unwrap().letter(), 'A');
        assert_eq!(Schedule::new(5).unwrap().letter(), 'E');
        assert!(Schedule::new(6).is_err());
        assert!(Schedule::from_letter('F').is_err());
        assert_eq!(Schedule::from_letter('b').unwrap().index(), 2);
    }

    #[test]
    fn test_wait_letters() {
        assert_eq!(WaitTime::from_secs(0.9).unwrap().letter(), 'A');
        assert_eq!(WaitTime::from_secs(-3.0).unwrap().letter(), 'A');
        assert_eq!(WaitTime::from_secs(1.0).unwrap().letter(), 'B');
        assert_eq!(WaitTime::from_secs(2.0).unwrap().letter(), 'C');
        assert_eq!(WaitTime::from_secs(2.7).unwrap().letter(), 'C');
        assert_eq!(WaitTime::from_secs(25.9).unwrap().letter(), 'Z');
        assert!(WaitTime::from_secs(26.0).is_err());
        assert!(WaitTime::from_secs(f64::NAN).is_err());
    }

    #[test]
    fn test_brightness_duplicated_slot() {
        let full = Brightness::from_level(1.0).unwrap();
        let top_quarter = Brightness::from_level(0.76).unwrap();
        assert_eq!(full, top_quarter);
        assert_eq!(full.letter(), 'D');

        assert_eq!(Brightness::from_level(0.0).unwrap().letter(), 'A');
        assert_eq!(Brightness::from_level(0.3).unwrap().letter(), 'B');
        assert_eq!(Brightness::from_level(0.5).unwrap().letter(), 'C');
        assert!(Brightness::from_level(1.01).is_err());
        assert!(Brightness::from_level(-0.1).is_err());
        assert!(Brightness::from_level(f64::NAN).is_err());
    }

    #[test]
    fn test_brightness_letters() {
        assert_eq!(Brightness::from_letter('b').unwrap().letter(), 'B');
        assert!(Brightness::from_letter('E').is_err());
        assert_eq!(Brightness::try_from('D').unwrap(), Brightness::from_level(1.0).unwrap());
    }

    #[test]
    #[cfg(feature = "serde")]
    fn test_serde_rejects_out_of_range_slots() {
        assert!(serde_json::from_str::<Page>("0").is_err());
        assert!(serde_json::from_str::<Page>("27").is_err());
        assert_eq!(serde_json::from_str::<Page>("26").unwrap().letter(), 'Z');

        assert!(serde_json::from_str::<Schedule>("9").is_err());
        assert_eq!(serde_json::from_str::<Schedule>("5").unwrap().letter(), 'E');

        assert!(serde_json::from_str::<SignId>("0").is_err());
    }

    #[test]
    #[cfg(feature = "serde")]
    fn test_serde_rejects_bad_letters() {
        assert!(serde_json::from_str::<WaitTime>("\"!\"").is_err());
        assert!(serde_json::from_str::<Brightness>("\"E\"").is_err());
        assert_eq!(
            serde_json::from_str::<WaitTime>("\"c\"").unwrap(),
            WaitTime::default()
        );
    }

    #[test]
    #[cfg(feature = "serde")]
    fn test_serde_round_trip_as_plain_values() {
        let page = Page::new(3).unwrap();
        assert_eq!(serde_json::to_string(&page).unwrap(), "3");
        assert_eq!(serde_json::from_str::<Page>("3").unwrap(), page);

        let wait = WaitTime::from_secs(2.0).unwrap();
        assert_eq!(serde_json::to_string(&wait).unwrap(), "\"C\"");
    }
}
