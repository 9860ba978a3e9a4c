#![forbid(unsafe_code)]

// The greeting engine is a pure computation over the clock reading it is
// handed and the immutable tables defined in these modules.
pub mod greeting;
pub mod phrase_table;
pub mod time_bucket;
