// nidaqmx/src/codes.rs
//
// Copyright (c) 2021-2025, nidaqmx-rs contributors
//
// Licensed under the MIT license:
//   <LICENSE or http://opensource.org/licenses/MIT>
// This file may not be copied, modified, or distributed except according
// to those terms.
//
//!
//! Symbolic names for driver status codes.
//!
//! The driver reports every outcome as a signed 32-bit code. A bundled
//! table covers the codes this binding inspects itself and the ones most
//! commonly seen in the field; the rest can be merged in from the text of
//! the vendor's `NIDAQmx.h` at context-construction time.

use std::collections::HashMap;

// Bundled subset of the vendor's code list, `DAQmxError`/`DAQmxWarning`
// prefixes stripped.
const BUILTIN: &[(i32, &str)] = &[
    (-200077, "InvalidAttributeValue"),
    (-200088, "InvalidTask"),
    (-200089, "DuplicateTask"),
    (-200170, "PhysicalChanDoesNotExist"),
    (-200220, "InvalidDeviceID"),
    (-200228, "BufferTooSmallForString"),
    (-200279, "SamplesNoLongerAvailable"),
    (-200284, "SamplesNotYetAvailable"),
    (-200479, "CanNotPerformOpWhileTaskRunning"),
    (-200486, "ChanNotInTask"),
    (-200560, "WaitUntilDoneDoesNotIndicateDone"),
    (200010, "StoppedBeforeDone"),
];

/// Map from raw driver status code to its symbolic name.
#[derive(Debug, Clone, Default)]
pub struct ErrorTable {
    codes: HashMap<i32, String>,
}

impl ErrorTable {
    /// An empty table; every lookup then falls back to the raw integer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The table bundled with the crate.
    pub fn builtin() -> Self {
        let codes = BUILTIN
            .iter()
            .map(|&(code, name)| (code, name.to_string()))
            .collect();
        Self { codes }
    }

    /// Builds a table from the text of the vendor's `NIDAQmx.h`.
    pub fn from_header(text: &str) -> Self {
        let mut table = Self::new();
        table.extend_from_header(text);
        table
    }

    /// Parses `#define DAQmxError…` and `#define DAQmxWarning…` lines and
    /// adds them to the table, replacing any existing entries.
    ///
    /// Lines that do not fit that shape are skipped. Returns the number of
    /// entries added or replaced.
    pub fn extend_from_header(&mut self, text: &str) -> usize {
        let mut added = 0;
        for line in text.lines() {
            let Some(rest) = line.trim_start().strip_prefix("#define ") else {
                continue;
            };
            let rest = rest.split("//").next().unwrap_or(rest);
            let mut parts = rest.split_whitespace();
            let (Some(name), Some(value)) = (parts.next(), parts.next()) else {
                continue;
            };
            let Some(symbol) = name
                .strip_prefix("DAQmxError")
                .or_else(|| name.strip_prefix("DAQmxWarning"))
                .map(|s| s.trim_start_matches('_'))
            else {
                continue;
            };
            let value = value.trim_start_matches('(').trim_end_matches(')');
            let Ok(code) = value.parse::<i32>() else {
                continue;
            };
            self.codes.insert(code, symbol.to_string());
            added += 1;
        }
        added
    }

    /// The symbolic name for a code, if known.
    pub fn name(&self, code: i32) -> Option<&str> {
        self.codes.get(&code).map(String::as_str)
    }

    /// Symbolic name when known, the decimal code otherwise.
    pub fn label(&self, code: i32) -> String {
        match self.name(code) {
            Some(name) => name.to_string(),
            None => code.to_string(),
        }
    }

    /// Number of known codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_the_buffer_retry_code() {
        let table = ErrorTable::builtin();
        assert_eq!(table.name(-200228), Some("BufferTooSmallForString"));
        assert!(!table.is_empty());
    }

    #[test]
    fn unknown_codes_fall_back_to_decimal() {
        let table = ErrorTable::builtin();
        assert_eq!(table.name(-1), None);
        assert_eq!(table.label(-1), "-1");
        assert_eq!(table.label(-200088), "InvalidTask");
    }

    #[test]
    fn parses_error_and_warning_defines() {
        let header = "\
// vendor header excerpt
#define DAQmxSuccess (0)
#define DAQmxErrorInvalidInstallation (-229771) // install trouble
  #define DAQmxWarningReturnedDataIsNotSorted (200012)
#define DAQmx_Val_Volts 10348
int not_a_define = 7;
#define DAQmxErrorBroken (abc)
";
        let table = ErrorTable::from_header(header);
        assert_eq!(table.len(), 2);
        assert_eq!(table.name(-229771), Some("InvalidInstallation"));
        assert_eq!(table.name(200012), Some("ReturnedDataIsNotSorted"));
        assert_eq!(table.name(10348), None);
    }

    #[test]
    fn header_entries_replace_builtin_ones() {
        let mut table = ErrorTable::builtin();
        let n = table.extend_from_header("#define DAQmxErrorStringBufTooSmall (-200228)\n");
        assert_eq!(n, 1);
        assert_eq!(table.name(-200228), Some("StringBufTooSmall"));
    }
}
