// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Encode and decode iCalendar (RFC 5545) recurrence rules and schedule lines.
//!
//! ```
//! use cadence_ical::{Frequency, Terminator, parse_schedule};
//!
//! let schedule = parse_schedule(
//!     "DTSTART;TZID=America/New_York:20240101T090000\n\
//!      RRULE:FREQ=DAILY;COUNT=5\n\
//!      EXDATE;TZID=America/New_York:20240103T090000\n",
//! )?;
//! let rule = &schedule.rrules[0];
//! assert_eq!(rule.rule_type, Frequency::Daily);
//! assert_eq!(rule.terminator, Some(Terminator::Count(5)));
//! assert_eq!(rule.to_string(), "FREQ=DAILY;COUNT=5");
//! # Ok::<(), cadence_ical::Error>(())
//! ```

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
#![allow(clippy::single_match_else)]

pub mod diagnostic;
pub mod error;
pub mod keyword;
pub mod rrule;
pub mod schedule;
pub mod time;

pub use crate::diagnostic::{FnSink, NaiveTimeWarning, TracingSink, WarningSink};
pub use crate::error::{Error, Result};
pub use crate::rrule::{
    DEFAULT_INTERVAL, Frequency, RecurrenceRule, RuleParts, Terminator, Validation,
    ValidationKind, ValidationSet, WeekDay, decode_rule, encode_rule,
};
pub use crate::schedule::{ScheduleFieldSet, parse_schedule};
pub use crate::time::{
    TimeValue, format, format_duration, format_utc, format_with, parse, parse_duration,
};
