#![forbid(unsafe_code)]

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use chrono_tz::Tz;

use crate::engine::phrase_table::{Language, DEFAULT_LANGUAGE};
use crate::engine::time_bucket::TimeBucket;
use crate::utils::errors::GreetingError;

// ***************************************************************************
//                                Constants
// ***************************************************************************
pub const DEFAULT_NAME     : &str  = "World";
pub const DEFAULT_TIMEZONE : &str  = "UTC";
pub const MAX_NAME_CHARS   : usize = 50;

// strftime patterns; day and month names are always rendered in English.
const DAY_FORMAT  : &str = "%A";
const DATE_FORMAT : &str = "%B %d, %Y";
const TIME_FORMAT : &str = "%H:%M";

// ***************************************************************************
//                              Request Types
// ***************************************************************************
// ---------------------------------------------------------------------------
// ResponseFormat:
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Text,
}

impl FromStr for ResponseFormat {
    type Err = GreetingError;

    /// Case-insensitive match against "json" and "text".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("json") {
            Ok(ResponseFormat::Json)
        } else if s.eq_ignore_ascii_case("text") {
            Ok(ResponseFormat::Text)
        } else {
            Err(GreetingError::InvalidFormat)
        }
    }
}

// ---------------------------------------------------------------------------
// GreetingQuery:
// ---------------------------------------------------------------------------
/// The raw, unvalidated query parameters of a greeting request.
#[derive(Debug, Clone, Default)]
pub struct GreetingQuery {
    pub name: Option<String>,
    pub timezone: Option<String>,
    pub format: Option<String>,
    pub language: Option<String>,
}

// ---------------------------------------------------------------------------
// GreetingRequest:
// ---------------------------------------------------------------------------
/// A greeting request with defaults applied, the name normalized and the
/// format validated.  Timezone and language are resolved by compute().
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetingRequest {
    pub name: String,
    pub timezone_name: String,
    pub language: String,
    pub format: ResponseFormat,
}

impl GreetingRequest {
    // ---------------------------------------------------------------------------
    // from_query:
    // ---------------------------------------------------------------------------
    /** Apply defaults to absent parameters, normalize the name and validate the
     * requested format.  An absent format means json, but a format that is
     * present must be json or text (an empty value is rejected).
     */
    pub fn from_query(query: &GreetingQuery) -> Result<Self, GreetingError> {
        let name = normalize_name(query.name.as_deref());
        let format = match &query.format {
            Some(f) => f.parse::<ResponseFormat>()?,
            None => ResponseFormat::Json,
        };

        Ok(GreetingRequest {
            name,
            timezone_name: query.timezone.clone().unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
            language: query.language.clone().unwrap_or_else(|| DEFAULT_LANGUAGE.code().to_string()),
            format,
        })
    }
}

// ***************************************************************************
//                              Result Type
// ***************************************************************************
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetingResult {
    pub greeting_phrase: &'static str,
    pub full_message: String,
    pub resolved_name: String,
    pub day_name: String,
    pub date_string: String,
    pub time_string: String,
    pub iso_timestamp: String,
    pub timezone_name: String,
    pub language_used: Language,
    pub bucket: TimeBucket,
}

// ***************************************************************************
//                            Public Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// compute:
// ---------------------------------------------------------------------------
/** Build the greeting for a request as seen at the instant `now`.
 *
 * The result depends only on the arguments, so the same request and instant
 * always produce the same greeting.  An unknown timezone is the only way this
 * can fail; an unsupported language quietly becomes English.
 */
pub fn compute(req: &GreetingRequest, now: DateTime<Utc>) -> Result<GreetingResult, GreetingError> {
    let tz = resolve_timezone(&req.timezone_name)?;
    let local = now.with_timezone(&tz);

    let language = Language::resolve(Some(&req.language));
    let bucket = TimeBucket::from_hour(local.hour());
    let greeting_phrase = language.phrase(bucket);

    let day_name = local.format(DAY_FORMAT).to_string();
    let date_string = local.format(DATE_FORMAT).to_string();
    let time_string = local.format(TIME_FORMAT).to_string();

    let full_message = format!(
        "{}, {}! Today is {}, {}. The current time is {} in {}.",
        greeting_phrase, req.name, day_name, date_string, time_string, req.timezone_name
    );

    Ok(GreetingResult {
        greeting_phrase,
        full_message,
        resolved_name: req.name.clone(),
        day_name,
        date_string,
        time_string,
        iso_timestamp: local.to_rfc3339_opts(SecondsFormat::Micros, false),
        timezone_name: req.timezone_name.clone(),
        language_used: language,
        bucket,
    })
}

// ---------------------------------------------------------------------------
// normalize_name:
// ---------------------------------------------------------------------------
/** Trim the name, substitute the default when nothing is left and keep at
 * most MAX_NAME_CHARS characters.  Truncation counts chars, so multi-byte
 * sequences are never split.
 */
pub fn normalize_name(name: Option<&str>) -> String {
    let trimmed = name.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return DEFAULT_NAME.to_string();
    }
    trimmed.chars().take(MAX_NAME_CHARS).collect()
}

// ---------------------------------------------------------------------------
// resolve_timezone:
// ---------------------------------------------------------------------------
/** Look up an IANA timezone name.  Exact names win; otherwise a
 * case-insensitive match is accepted (so "utc" and "europe/london" work).
 */
pub fn resolve_timezone(name: &str) -> Result<Tz, GreetingError> {
    name.parse::<Tz>()
        .ok()
        .or_else(|| Tz::from_str_insensitive(name).ok())
        .ok_or_else(|| GreetingError::InvalidTimezone(name.to_string()))
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).single().expect("valid test instant")
    }

    fn request(name: &str, tz: &str, lang: &str) -> GreetingRequest {
        let query = GreetingQuery {
            name: Some(name.to_string()),
            timezone: Some(tz.to_string()),
            format: None,
            language: Some(lang.to_string()),
        };
        GreetingRequest::from_query(&query).expect("valid query")
    }

    #[test]
    fn spanish_afternoon_in_utc() {
        let result = compute(&request("Ana", "UTC", "es"), at(2024, 1, 15, 14, 30)).unwrap();
        assert_eq!(result.bucket, TimeBucket::Afternoon);
        assert_eq!(result.greeting_phrase, "Buenas tardes");
        assert_eq!(result.full_message,
            "Buenas tardes, Ana! Today is Monday, January 15, 2024. The current time is 14:30 in UTC.");
        assert_eq!(result.day_name, "Monday");
        assert_eq!(result.date_string, "January 15, 2024");
        assert_eq!(result.time_string, "14:30");
        assert_eq!(result.iso_timestamp, "2024-01-15T14:30:00.000000+00:00");
        assert_eq!(result.language_used, Language::Es);
        assert_eq!(result.resolved_name, "Ana");
    }

    #[test]
    fn compute_is_deterministic() {
        let req = request("Bo", "Europe/Paris", "fr");
        let now = at(2024, 6, 1, 7, 5);
        assert_eq!(compute(&req, now).unwrap(), compute(&req, now).unwrap());
    }

    #[test]
    fn local_time_drives_the_bucket() {
        // 14:30Z is 20:00 in Kolkata (+05:30).
        let result = compute(&request("Ravi", "Asia/Kolkata", "hi"), at(2024, 1, 15, 14, 30)).unwrap();
        assert_eq!(result.time_string, "20:00");
        assert_eq!(result.bucket, TimeBucket::Evening);
        assert_eq!(result.greeting_phrase, "शुभ संध्या");
        assert_eq!(result.iso_timestamp, "2024-01-15T20:00:00.000000+05:30");
    }

    #[test]
    fn local_date_can_differ_from_utc_date() {
        // 03:00Z on Monday is 19:00 on Sunday in Los Angeles (-08:00).
        let result = compute(&request("Sam", "America/Los_Angeles", "en"), at(2024, 1, 15, 3, 0)).unwrap();
        assert_eq!(result.full_message,
            "Good evening, Sam! Today is Sunday, January 14, 2024. The current time is 19:00 in America/Los_Angeles.");
    }

    #[test]
    fn day_of_month_is_zero_padded() {
        let result = compute(&request("Kim", "UTC", "de"), at(2024, 3, 5, 23, 59)).unwrap();
        assert_eq!(result.date_string, "March 05, 2024");
        assert_eq!(result.greeting_phrase, "Gute Nacht");
    }

    #[test]
    fn unknown_language_falls_back() {
        let result = compute(&request("Ana", "UTC", "zz"), at(2024, 1, 15, 9, 0)).unwrap();
        assert_eq!(result.language_used, Language::En);
        assert_eq!(result.greeting_phrase, "Good morning");
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let err = compute(&request("Ana", "Not/AZone", "en"), at(2024, 1, 15, 9, 0)).unwrap_err();
        assert_eq!(err, GreetingError::InvalidTimezone("Not/AZone".to_string()));
        assert!(err.to_string().contains("Not/AZone"));
        assert!(resolve_timezone("").is_err());
    }

    #[test]
    fn timezone_lookup_ignores_case() {
        assert_eq!(resolve_timezone("utc").unwrap(), chrono_tz::UTC);
        assert_eq!(resolve_timezone("europe/london").unwrap(), chrono_tz::Europe::London);
        assert_eq!(resolve_timezone("US/Eastern").unwrap(), chrono_tz::US::Eastern);
        // The message keeps the name the client sent.
        let result = compute(&request("Ana", "utc", "en"), at(2024, 1, 15, 9, 0)).unwrap();
        assert!(result.full_message.ends_with("in utc."));
    }

    #[test]
    fn format_validation() {
        let mut query = GreetingQuery::default();
        assert_eq!(GreetingRequest::from_query(&query).unwrap().format, ResponseFormat::Json);

        query.format = Some("TEXT".to_string());
        assert_eq!(GreetingRequest::from_query(&query).unwrap().format, ResponseFormat::Text);

        query.format = Some("xml".to_string());
        assert_eq!(GreetingRequest::from_query(&query).unwrap_err(), GreetingError::InvalidFormat);

        query.format = Some(String::new());
        assert_eq!(GreetingRequest::from_query(&query).unwrap_err(), GreetingError::InvalidFormat);
    }

    #[test]
    fn defaults_are_applied() {
        let req = GreetingRequest::from_query(&GreetingQuery::default()).unwrap();
        assert_eq!(req.name, DEFAULT_NAME);
        assert_eq!(req.timezone_name, DEFAULT_TIMEZONE);
        assert_eq!(req.language, "en");
    }

    #[test]
    fn name_normalization() {
        assert_eq!(normalize_name(None), "World");
        assert_eq!(normalize_name(Some("")), "World");
        assert_eq!(normalize_name(Some("   ")), "World");
        assert_eq!(normalize_name(Some("  Ana \t")), "Ana");

        let long = "a".repeat(80);
        assert_eq!(normalize_name(Some(&long)).chars().count(), MAX_NAME_CHARS);

        // 60 two-byte characters keep 50 whole characters.
        let wide = "é".repeat(60);
        let cut = normalize_name(Some(&wide));
        assert_eq!(cut.chars().count(), 50);
        assert_eq!(cut, "é".repeat(50));
    }
}
