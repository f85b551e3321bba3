// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Ordered accumulator for the parts of one `RRULE` value.

use std::collections::HashMap;
use std::fmt::{self, Display};

use crate::rrule::RulePart;

/// Multi-valued rule parts, rendered as `KEY=v1,v2;KEY=...`.
///
/// Keys keep the order in which they were first touched, except that `FREQ`
/// is always rendered first. Keys without values are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleParts {
    order: Vec<String>,
    values: HashMap<String, Vec<String>>,
}

impl RuleParts {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Values stored under `key`, created empty on first access.
    pub fn entry(&mut self, key: &str) -> &mut Vec<String> {
        if !self.values.contains_key(key) {
            self.order.push(key.to_owned());
        }
        self.values.entry(key.to_owned()).or_default()
    }

    /// Values stored under `key`, if it was ever touched.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// Render the parts, `FREQ` first.
    #[must_use]
    pub fn render(&self) -> String {
        let freq = RulePart::Freq.as_str();
        let mut out = Vec::with_capacity(self.order.len());
        if let Some(values) = self.values.get(freq) {
            out.push(format!("{freq}={}", values.join(",")));
        }

        for key in self.order.iter().filter(|key| *key != freq) {
            match self.values.get(key) {
                Some(values) if !values.is_empty() => {
                    out.push(format!("{key}={}", values.join(",")));
                }
                _ => {}
            }
        }
        out.join(";")
    }
}

impl Display for RuleParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
