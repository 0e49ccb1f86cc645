use serde::{Deserialize, Serialize};
use std::{fmt, num::ParseIntError, str::FromStr};
use time::OffsetDateTime;

/// Identifier of a task (milliseconds since the Unix epoch at creation).
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl TaskId {
    /// Derive a fresh identifier from the clock, bumped past every existing id.
    ///
    /// The result is never lower than `max(existing) + 1`. Returns `None` when an
    /// existing id is already `u64::MAX`.
    #[must_use]
    pub fn allocate<I>(now: OffsetDateTime, existing: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        let millis = u64::try_from(now.unix_timestamp_nanos() / 1_000_000).unwrap_or(0);
        let floor = match existing.into_iter().max() {
            Some(max) => max.0.checked_add(1)?,
            None => 0,
        };
        Some(Self(millis.max(floor)))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}
