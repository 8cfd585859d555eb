use chrono::{DateTime, Utc};

/// Source of "now" for session timing.
///
/// Services take a `Clock` so tests can pin every timestamp.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    /// Wall-clock UTC time.
    #[default]
    System,
    /// Always reports the same instant.
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn system() -> Self {
        Self::System
    }

    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match *self {
            Self::System => Utc::now(),
            Self::Fixed(at) => at,
        }
    }
}

/// Milliseconds elapsed from `start` to `end`, clamped at zero.
///
/// A backdated `end` (clock skew, restored state) counts as no time elapsed.
#[must_use]
pub fn elapsed_millis(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    u64::try_from((end - start).num_milliseconds()).unwrap_or(0)
}

/// Formats a countdown as `M:SS`.
#[must_use]
pub fn format_countdown(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// 2023-11-14T22:13:20Z, the instant every test session starts at.
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// `FIXED_TEST_TIMESTAMP` as a `DateTime`.
///
/// # Panics
///
/// Never in practice; the constant is a valid timestamp.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}
