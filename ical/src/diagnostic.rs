// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Side channel for warnings raised while encoding.
//!
//! Encoding never fails on a time value that carries no zone information; it
//! assumes UTC and reports a [`NaiveTimeWarning`] to the [`WarningSink`] the
//! caller handed in. Each call gets its own sink, so concurrent callers see
//! only their own warnings.

use std::fmt::{self, Display};
use std::panic::Location;

use jiff::civil;

/// A time value without zone information was encoded as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaiveTimeWarning {
    /// Source location of the encoding call.
    pub location: &'static Location<'static>,

    /// Wall-clock value that was assumed to be UTC.
    pub time: civil::DateTime,
}

impl Display for NaiveTimeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "time {} does not have timezone info, assuming UTC: {}",
            self.time, self.location
        )
    }
}

/// Receiver for encoding warnings.
pub trait WarningSink {
    /// Report one warning.
    fn warn(&mut self, warning: NaiveTimeWarning);
}

/// Forwards warnings to `tracing` at `WARN` level.
///
/// This is the sink used by the encoding functions that do not take one.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&mut self, warning: NaiveTimeWarning) {
        tracing::warn!(
            time = %warning.time,
            location = %warning.location,
            "time does not have timezone info, assuming UTC"
        );
    }
}

/// Collects warnings in order.
impl WarningSink for Vec<NaiveTimeWarning> {
    fn warn(&mut self, warning: NaiveTimeWarning) {
        self.push(warning);
    }
}

impl<S: WarningSink + ?Sized> WarningSink for &mut S {
    fn warn(&mut self, warning: NaiveTimeWarning) {
        (**self).warn(warning);
    }
}

/// Adapts a callback into a [`WarningSink`].
#[derive(Debug, Clone, Copy)]
pub struct FnSink<F>(pub F);

impl<F: FnMut(NaiveTimeWarning)> WarningSink for FnSink<F> {
    fn warn(&mut self, warning: NaiveTimeWarning) {
        (self.0)(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn warning() -> NaiveTimeWarning {
        NaiveTimeWarning {
            location: Location::caller(),
            time: civil::date(2024, 3, 1).at(8, 30, 0, 0),
        }
    }

    #[test]
    fn collects_into_vec() {
        let mut sink = Vec::new();
        sink.warn(warning());
        sink.warn(warning());
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].time, civil::date(2024, 3, 1).at(8, 30, 0, 0));
        assert_eq!(sink[0].location.file(), file!());
    }

    #[test]
    fn forwards_to_callback() {
        let mut seen = 0;
        let mut sink = FnSink(|_: NaiveTimeWarning| seen += 1);
        sink.warn(warning());
        assert_eq!(seen, 1);
    }

    #[test]
    fn mentions_location_in_message() {
        let w = warning();
        let msg = w.to_string();
        assert!(msg.contains("2024-03-01T08:30:00"));
        assert!(msg.contains(w.location.file()));
    }
}
