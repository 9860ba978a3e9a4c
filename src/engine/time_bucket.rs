#![forbid(unsafe_code)]

use std::fmt;

// ***************************************************************************
//                                Constants
// ***************************************************************************
// Lower bounds (inclusive) of each daytime bucket in local hours.  Anything
// outside [MORNING_START, NIGHT_START) is night.
const MORNING_START   : u32 = 5;
const AFTERNOON_START : u32 = 12;
const EVENING_START   : u32 = 17;
const NIGHT_START     : u32 = 21;

// ***************************************************************************
//                               TimeBucket
// ***************************************************************************
/// The part of the day a local hour falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeBucket {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeBucket {
    #[allow(dead_code)]
    pub const ALL: [TimeBucket; 4] = [
        TimeBucket::Morning,
        TimeBucket::Afternoon,
        TimeBucket::Evening,
        TimeBucket::Night,
    ];

    // ---------------------------------------------------------------------------
    // from_hour:
    // ---------------------------------------------------------------------------
    /** Classify a local hour (0-23) using half-open intervals:
     *
     *   [5,12) morning, [12,17) afternoon, [17,21) evening, otherwise night.
     *
     * Hours past 23 are treated as night rather than rejected.
     */
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            h if (MORNING_START..AFTERNOON_START).contains(&h) => TimeBucket::Morning,
            h if (AFTERNOON_START..EVENING_START).contains(&h) => TimeBucket::Afternoon,
            h if (EVENING_START..NIGHT_START).contains(&h) => TimeBucket::Evening,
            _ => TimeBucket::Night,
        }
    }

    /// Wire name used in the greeting_type response field.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeBucket::Morning => "morning",
            TimeBucket::Afternoon => "afternoon",
            TimeBucket::Evening => "evening",
            TimeBucket::Night => "night",
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
