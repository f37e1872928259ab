use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

/// A slot as exchanged with the front end.
///
/// For offered slots `end` is the end of the containing free time; for
/// selected slots it is the appointment end.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub date: DateTime<FixedOffset>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub end: DateTime<FixedOffset>,
    #[serde(default)]
    pub summary: String,
}

impl TimeSlot {
    pub fn new(date: DateTime<FixedOffset>, end: DateTime<FixedOffset>, summary: &str) -> Self {
        TimeSlot {
            date,
            end,
            summary: summary.to_string(),
        }
    }

    pub fn span(&self) -> Duration {
        self.end - self.date
    }
}
