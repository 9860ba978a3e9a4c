#![forbid(unsafe_code)]

use std::fmt;

use crate::engine::time_bucket::TimeBucket;

// ***************************************************************************
//                                Constants
// ***************************************************************************
/// Language used when the client asks for nothing or for something we don't have.
pub const DEFAULT_LANGUAGE: Language = Language::En;

// ***************************************************************************
//                                Language
// ***************************************************************************
/// The fixed set of greeting languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    En,
    Es,
    Fr,
    De,
    Hi,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::En,
        Language::Es,
        Language::Fr,
        Language::De,
        Language::Hi,
    ];

    /// Exact, case-sensitive lookup of a language code.
    pub fn from_code(code: &str) -> Option<Self> {
        Language::ALL.into_iter().find(|l| l.code() == code)
    }

    // ---------------------------------------------------------------------------
    // resolve:
    // ---------------------------------------------------------------------------
    /** Map a requested code onto a supported language.  Unknown codes fall back
     * to the default language; they are never an error.
     */
    pub fn resolve(code: Option<&str>) -> Self {
        code.and_then(Language::from_code).unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::Hi => "hi",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Spanish",
            Language::Fr => "French",
            Language::De => "German",
            Language::Hi => "Hindi",
        }
    }

    // ---------------------------------------------------------------------------
    // phrase:
    // ---------------------------------------------------------------------------
    /** Look up the greeting for a bucket.  The match is exhaustive over both
     * enums, so every language defines every bucket.
     */
    pub fn phrase(&self, bucket: TimeBucket) -> &'static str {
        use TimeBucket::*;
        match (self, bucket) {
            (Language::En, Morning)   => "Good morning",
            (Language::En, Afternoon) => "Good afternoon",
            (Language::En, Evening)   => "Good evening",
            (Language::En, Night)     => "Good night",

            (Language::Es, Morning)   => "Buenos días",
            (Language::Es, Afternoon) => "Buenas tardes",
            (Language::Es, Evening)   => "Buenas tardes",
            (Language::Es, Night)     => "Buenas noches",

            (Language::Fr, Morning)   => "Bonjour",
            (Language::Fr, Afternoon) => "Bon après-midi",
            (Language::Fr, Evening)   => "Bonsoir",
            (Language::Fr, Night)     => "Bonne nuit",

            (Language::De, Morning)   => "Guten Morgen",
            (Language::De, Afternoon) => "Guten Tag",
            (Language::De, Evening)   => "Guten Abend",
            (Language::De, Night)     => "Gute Nacht",

            (Language::Hi, Morning)   => "सुप्रभात",
            (Language::Hi, Afternoon) => "नमस्ते",
            (Language::Hi, Evening)   => "शुभ संध्या",
            (Language::Hi, Night)     => "शुभ रात्रि",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
