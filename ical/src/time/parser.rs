// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parsers for the date, date-time and duration tokens of RFC 5545 Section 3.3.

use chumsky::prelude::*;
use jiff::civil;

type Extra<'src> = extra::Err<Rich<'src, char>>;

/// A date or date-time token before any zone is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawDateTime {
    /// Wall-clock value, midnight for a bare date.
    pub(crate) datetime: civil::DateTime,

    /// Whether the token ended with `Z`.
    pub(crate) utc: bool,
}

/// Parse `YYYYMMDD`, `YYYYMMDDThhmmss` or `YYYYMMDDThhmmssZ`.
pub(crate) fn parse_date_time(src: &str) -> Result<RawDateTime, String> {
    date_time()
        .parse(src)
        .into_result()
        .map_err(|errs| describe(&errs))
}

/// Parse a duration into whole seconds.
pub(crate) fn parse_duration(src: &str) -> Result<u64, String> {
    duration()
        .parse(src)
        .into_result()
        .map_err(|errs| describe(&errs))
}

fn describe(errs: &[Rich<'_, char>]) -> String {
    errs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// ```txt
/// date-time  = date [ "T" time [ "Z" ] ]
/// ```
fn date_time<'src>() -> impl Parser<'src, &'src str, RawDateTime, Extra<'src>> {
    let time = just('T')
        .ignore_then(time())
        .then(just('Z').or_not().map(|z| z.is_some()));

    date().then(time.or_not()).map(|(date, time)| match time {
        Some((time, utc)) => RawDateTime {
            datetime: date.to_datetime(time),
            utc,
        },
        None => RawDateTime {
            datetime: date.to_datetime(civil::Time::midnight()),
            utc: false,
        },
    })
}

/// ```txt
/// date-value         = date-fullyear date-month date-mday
/// date-fullyear      = 4DIGIT
/// date-month         = 2DIGIT        ;01-12
/// date-mday          = 2DIGIT        ;01-28, 01-29, 01-30, 01-31
/// ```
fn date<'src>() -> impl Parser<'src, &'src str, civil::Date, Extra<'src>> {
    digits::<i16>(4)
        .then(digits::<i8>(2))
        .then(digits::<i8>(2))
        .try_map(|((year, month), day), span| {
            civil::Date::new(year, month, day).map_err(|e| Rich::custom(span, e))
        })
}

/// ```txt
/// time         = time-hour time-minute time-second
/// time-second  = 2DIGIT        ;00-60
/// ```
fn time<'src>() -> impl Parser<'src, &'src str, civil::Time, Extra<'src>> {
    digits::<i8>(2)
        .then(digits::<i8>(2))
        .then(digits::<i8>(2))
        .try_map(|((hour, minute), second), span| {
            // NOTE: leap second 60 is contracted to 59
            civil::Time::new(hour, minute, second.min(59), 0).map_err(|e| Rich::custom(span, e))
        })
}

/// ```txt
/// dur-value  = ["+"] "P" (dur-week / [dur-day] [dur-time])
/// dur-time   = "T" [dur-hour] [dur-minute] [dur-second]
/// ```
///
/// This is looser than RFC 5545: every component is optional, so the bare
/// `PT` written for a zero duration reads back as zero seconds.
fn duration<'src>() -> impl Parser<'src, &'src str, u64, Extra<'src>> {
    let time = just('T')
        .ignore_then(
            component('H', 3_600)
                .or_not()
                .then(component('M', 60).or_not())
                .then(component('S', 1).or_not()),
        )
        .map(|((h, m), s)| {
            h.unwrap_or(0)
                .saturating_add(m.unwrap_or(0))
                .saturating_add(s.unwrap_or(0))
        });

    let date = component('D', 86_400)
        .or_not()
        .then(time.or_not())
        .map(|(d, t)| d.unwrap_or(0).saturating_add(t.unwrap_or(0)));

    just('+')
        .or_not()
        .ignore_then(just('P'))
        .ignore_then(choice((component('W', 604_800), date)))
}

fn component<'src>(unit: char, seconds: u64) -> impl Parser<'src, &'src str, u64, Extra<'src>> {
    select! { c @ '0'..='9' => c }
        .repeated()
        .at_least(1)
        .at_most(19)
        .collect::<String>()
        .try_map(|s, span| {
            lexical::parse::<u64, _>(s.as_str()).map_err(|_| Rich::custom(span, "u64 out of range"))
        })
        .then_ignore(just(unit))
        .map(move |n| n.saturating_mul(seconds))
}

fn digits<'src, T>(count: usize) -> impl Parser<'src, &'src str, T, Extra<'src>>
where
    T: lexical::FromLexical,
{
    select! { c @ '0'..='9' => c }
        .repeated()
        .exactly(count)
        .collect::<String>()
        .try_map(|s, span| {
            lexical::parse::<T, _>(s.as_str())
                .map_err(|_| Rich::custom(span, "number out of range"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_date_time() {
        #[rustfmt::skip]
        let success_cases = [
            // examples from RFC 5545 Section 3.3.5
            ("19980118T230000",  civil::date(1998, 1, 18).at(23, 0, 0, 0), false),
            ("19980119T070000Z", civil::date(1998, 1, 19).at(7, 0, 0, 0), true),
            ("19970630T235960Z", civil::date(1997, 6, 30).at(23, 59, 59, 0), true),
            // date only
            ("19970714",         civil::date(1997, 7, 14).at(0, 0, 0, 0), false),
            ("20000229",         civil::date(2000, 2, 29).at(0, 0, 0, 0), false),
        ];
        for (src, datetime, utc) in success_cases {
            let result = parse_date_time(src).unwrap();
            assert_eq!(result, RawDateTime { datetime, utc }, "Failed for {src}");
        }

        let fail_cases = [
            "19980119T230000-0800", // numeric offset
            "19970714 133000",      // missing 'T'
            "19970714T250000",      // invalid hour
            "19970714T126000",      // invalid minute
            "19970230",             // invalid date
            "20241301",             // invalid month
            "19970714Z",            // 'Z' without time
            "19970714T1330",        // missing seconds
            "",
        ];
        for src in fail_cases {
            assert!(parse_date_time(src).is_err(), "Parse {src} should fail");
        }
    }

    #[test]
    fn parses_duration() {
        let success_cases = [
            ("PT", 0),
            ("PT1H1M1S", 3_661),
            ("PT1M30S", 90),
            ("PT15M", 900),
            ("PT2H", 7_200),
            ("+PT10S", 10),
            ("P1D", 86_400),
            ("P1DT12H", 129_600),
            ("P2W", 1_209_600),
        ];
        for (src, expected) in success_cases {
            assert_eq!(parse_duration(src).unwrap(), expected, "Failed for {src}");
        }

        let fail_cases = ["-PT1H", "T1H", "PT1X", "PT1S1M", "P1W2D", "1H"];
        for src in fail_cases {
            assert!(parse_duration(src).is_err(), "Parse {src} should fail");
        }
    }
}
