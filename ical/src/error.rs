// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Errors raised while decoding recurrence rules and schedule text.

/// Error type for decoding operations
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The rule text was empty
    #[error("empty iCalendar rule")]
    EmptyRule,

    /// A rule component is not a `NAME=VALUE` pair
    #[error("invalid iCalendar rule component '{component}'")]
    MalformedComponent {
        /// The offending component
        component: String,
    },

    /// The `INTERVAL` value is not a positive integer
    #[error("invalid recurrence interval '{value}'")]
    InvalidInterval {
        /// The rejected interval value
        value: String,
    },

    /// The rule has no `FREQ` part
    #[error("recurrence rule has no FREQ part")]
    MissingFrequency,

    /// The `FREQ` value is not one of the seven frequencies
    #[error("unknown recurrence frequency '{value}'")]
    UnknownFrequency {
        /// The unrecognized frequency value
        value: String,
    },

    /// A weekday token does not end in a known two-letter day code
    #[error("unknown weekday code '{code}'")]
    InvalidWeekday {
        /// The unrecognized weekday token
        code: String,
    },

    /// A date or date-time value could not be read
    #[error("invalid date-time value '{value}': {reason}")]
    InvalidTime {
        /// The unparsable value
        value: String,
        /// Why parsing failed
        reason: String,
    },

    /// A duration value could not be read
    #[error("invalid duration value '{value}': {reason}")]
    InvalidDuration {
        /// The unparsable value
        value: String,
        /// Why parsing failed
        reason: String,
    },
}

/// Result type alias for decoding operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
