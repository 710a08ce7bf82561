// nidaqmx/src/status.rs
//
// Copyright (c) 2021-2025, nidaqmx-rs contributors
//
// Licensed under the MIT license:
//   <LICENSE or http://opensource.org/licenses/MIT>
// This file may not be copied, modified, or distributed except according
// to those terms.
//
//!
//! Status-code checking and error-string retrieval.
//!
//! Every driver call returns an `int32` status: zero for success, negative
//! for errors, positive for warnings. [`check`] turns that convention into
//! `Result`, asking the driver for its descriptive text on any nonzero code
//! and retrying with a doubled buffer as long as the driver reports
//! `DAQmxErrorBufferTooSmallForString`.

use std::os::raw::c_char;

use log::warn;
use textwrap::{Options, WrapAlgorithm};

use crate::ffi;
use super::*;

// Initial capacity for string-returning driver calls.
pub(crate) const DEFAULT_BUF_SIZE: usize = 3000;
// Capacity bound for the doubling retry loop.
pub(crate) const MAX_BUF_SIZE: usize = 1_000_000;

/// Source of driver-provided error text.
///
/// The driver keeps the description of the most recent failure in
/// thread-local state (`DAQmxGetExtendedErrorInfo`) and can also render a
/// generic description for any status code (`DAQmxGetErrorString`). Both
/// write a NUL-terminated string into a caller-supplied buffer.
pub(crate) trait ErrorText {
    fn extended_error_info(&self, buf: &mut [c_char]) -> ffi::int32;
    fn error_string(&self, code: ffi::int32, buf: &mut [c_char]) -> ffi::int32;
}

impl ErrorText for ffi::Api {
    fn extended_error_info(&self, buf: &mut [c_char]) -> ffi::int32 {
        unsafe { (self.get_extended_error_info)(buf.as_mut_ptr(), buf.len() as ffi::uInt32) }
    }

    fn error_string(&self, code: ffi::int32, buf: &mut [c_char]) -> ffi::int32 {
        unsafe { (self.get_error_string)(code, buf.as_mut_ptr(), buf.len() as ffi::uInt32) }
    }
}

// Decodes a NUL-terminated C string from a filled buffer.
pub(crate) fn string_from_buf(buf: &[c_char]) -> String {
    let bytes: Vec<u8> = buf
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

// Runs `attempt` against buffers of doubling capacity until it returns
// anything other than "buffer too small", then hands back that status and
// the decoded buffer. `op` names the operation for the overflow error.
pub(crate) fn grow_fetch<F>(op: &str, mut attempt: F) -> Result<(ffi::int32, String)>
where
    F: FnMut(&mut [c_char]) -> ffi::int32,
{
    let mut cap = DEFAULT_BUF_SIZE;
    while cap < MAX_BUF_SIZE {
        let mut buf = vec![0 as c_char; cap];
        match attempt(&mut buf) {
            ffi::DAQmxErrorBufferTooSmallForString => cap *= 2,
            ret => return Ok((ret, string_from_buf(&buf))),
        }
    }
    Err(Error::StringBufferOverflow {
        op: op.into(),
        limit: MAX_BUF_SIZE,
    })
}

/// Resolves a driver status code into a `Result`.
///
/// Zero returns immediately without touching the driver. For any other code
/// the extended error info is fetched first, falling back to the generic
/// string for the code when the extended info is unavailable; failure to
/// fetch text never masks the original status. Negative codes become
/// [`DriverError`]s carrying the symbolic name from `table` and the wrapped
/// driver text; positive codes are logged as warnings and passed through.
pub(crate) fn check<S>(
    src: &S,
    table: &ErrorTable,
    code: ffi::int32,
    function: &str,
    args: &str,
) -> Result<ffi::int32>
where
    S: ErrorText + ?Sized,
{
    if code == ffi::DAQmxSuccess {
        return Ok(code);
    }

    let (ret, text) = grow_fetch(function, |buf| {
        let ret = src.extended_error_info(buf);
        if ret == ffi::DAQmxSuccess || ret == ffi::DAQmxErrorBufferTooSmallForString {
            ret
        } else {
            src.error_string(code, buf)
        }
    })?;

    let message = if ret == ffi::DAQmxSuccess {
        Some(wrap_block(&text))
    } else {
        None
    };
    let symbol = table.name(code).map(String::from);
    let err = DriverError::new(function, args, symbol, code, message);

    if code < 0 {
        Err(err.into())
    } else {
        warn!("{}{} warning {}={}", function, args, err.label(), code);
        if let Some(text) = err.message() {
            warn!("{}", text.trim_start_matches('\n'));
        }
        Ok(code)
    }
}

// Word wrap at `width` columns. The driver's text can span several lines;
// it is flowed into one paragraph first, and first-fit breaking keeps the
// line breaks where the vendor's own tools put them.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let flowed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flowed.is_empty() {
        return Vec::new();
    }
    let options = Options::new(width).wrap_algorithm(WrapAlgorithm::FirstFit);
    textwrap::wrap(&flowed, options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

// Formats driver text the way it appears in an error: indented under the
// status line and closed with a dashed rule.
fn wrap_block(text: &str) -> String {
    let mut out = String::new();
    for line in wrap_text(text, 80) {
        out.push_str("\n  ");
        out.push_str(&line);
    }
    out.push_str("\n  ");
    out.push_str(&"-".repeat(10));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    #[derive(Clone, Copy)]
    enum Reply {
        TooSmall,
        Text(&'static str),
        Fail(i32),
    }

    // Scripted stand-in for the driver's two error-text calls. Queues hold
    // one reply per call; an exhausted queue keeps answering "too small".
    struct Stub {
        ext: RefCell<VecDeque<Reply>>,
        gen: RefCell<VecDeque<Reply>>,
        caps: RefCell<Vec<usize>>,
        lookups: RefCell<usize>,
    }

    impl Stub {
        fn new(ext: &[Reply], gen: &[Reply]) -> Self {
            Self {
                ext: RefCell::new(ext.iter().copied().collect()),
                gen: RefCell::new(gen.iter().copied().collect()),
                caps: RefCell::new(Vec::new()),
                lookups: RefCell::new(0),
            }
        }

        fn reply(queue: &RefCell<VecDeque<Reply>>, buf: &mut [c_char]) -> ffi::int32 {
            match queue.borrow_mut().pop_front().unwrap_or(Reply::TooSmall) {
                Reply::TooSmall => ffi::DAQmxErrorBufferTooSmallForString,
                Reply::Fail(code) => code,
                Reply::Text(text) => {
                    for (dst, &src) in buf.iter_mut().zip(text.as_bytes()) {
                        *dst = src as c_char;
                    }
                    buf[text.len()] = 0;
                    0
                }
            }
        }
    }

    impl ErrorText for Stub {
        fn extended_error_info(&self, buf: &mut [c_char]) -> ffi::int32 {
            self.caps.borrow_mut().push(buf.len());
            Self::reply(&self.ext, buf)
        }

        fn error_string(&self, _code: ffi::int32, buf: &mut [c_char]) -> ffi::int32 {
            *self.lookups.borrow_mut() += 1;
            Self::reply(&self.gen, buf)
        }
    }

    fn driver_err(res: Result<i32>) -> DriverError {
        match res {
            Err(Error::Driver(err)) => err,
            other => panic!("expected a driver error, got {:?}", other),
        }
    }

    #[test]
    fn success_makes_no_driver_calls() {
        let stub = Stub::new(&[], &[]);
        let table = ErrorTable::builtin();
        let res = check(&stub, &table, 0, "DAQmxStartTask", "()");
        assert_eq!(res.unwrap(), 0);
        assert!(stub.caps.borrow().is_empty());
        assert_eq!(*stub.lookups.borrow(), 0);
    }

    #[test]
    fn doubles_the_buffer_until_the_text_fits() {
        let stub = Stub::new(
            &[
                Reply::TooSmall,
                Reply::TooSmall,
                Reply::Text("Specified channel cannot be used."),
            ],
            &[],
        );
        let table = ErrorTable::builtin();
        let err = driver_err(check(
            &stub,
            &table,
            -200170,
            "DAQmxCreateAIVoltageChan",
            "(\"Dev1/ai0\")",
        ));

        assert_eq!(*stub.caps.borrow(), vec![3000, 6000, 12000]);
        assert_eq!(*stub.lookups.borrow(), 0);
        assert_eq!(err.code(), -200170);
        assert_eq!(err.symbol(), Some("PhysicalChanDoesNotExist"));
        assert_eq!(
            err.message(),
            Some("\n  Specified channel cannot be used.\n  ----------")
        );
        assert_eq!(
            err.to_string(),
            "DAQmxCreateAIVoltageChan(\"Dev1/ai0\") failed with error \
             PhysicalChanDoesNotExist=-200170:\
             \n  Specified channel cannot be used.\n  ----------"
        );
    }

    #[test]
    fn buffer_growth_stops_at_the_limit() {
        // Queues stay empty, so every attempt reports "too small".
        let stub = Stub::new(&[], &[]);
        let table = ErrorTable::builtin();
        let res = check(&stub, &table, -200088, "DAQmxStartTask", "()");

        assert!(matches!(
            res,
            Err(Error::StringBufferOverflow {
                limit: MAX_BUF_SIZE,
                ..
            })
        ));
        assert_eq!(
            *stub.caps.borrow(),
            vec![3000, 6000, 12000, 24000, 48000, 96000, 192000, 384000, 768000]
        );
        // The generic lookup never runs while the buffer is the problem.
        assert_eq!(*stub.lookups.borrow(), 0);
    }

    #[test]
    fn falls_back_to_the_generic_string() {
        let stub = Stub::new(
            &[Reply::Fail(-50103)],
            &[Reply::Text("Device identifier is invalid.")],
        );
        let table = ErrorTable::builtin();
        let err = driver_err(check(&stub, &table, -200220, "DAQmxCreateTask", "(\"t\")"));

        assert_eq!(*stub.lookups.borrow(), 1);
        assert_eq!(err.symbol(), Some("InvalidDeviceID"));
        assert_eq!(
            err.message(),
            Some("\n  Device identifier is invalid.\n  ----------")
        );
    }

    #[test]
    fn reports_the_code_even_without_text() {
        let stub = Stub::new(&[Reply::Fail(-50103)], &[Reply::Fail(-50103)]);
        let table = ErrorTable::builtin();
        let err = driver_err(check(&stub, &table, -200088, "DAQmxStopTask", "()"));

        assert_eq!(err.code(), -200088);
        assert_eq!(err.message(), None);
        assert_eq!(
            err.to_string(),
            "DAQmxStopTask() failed with error InvalidTask=-200088"
        );
    }

    #[test]
    fn unknown_codes_fall_back_to_the_decimal_label() {
        let stub = Stub::new(&[Reply::Fail(-1)], &[Reply::Fail(-1)]);
        let table = ErrorTable::builtin();
        let err = driver_err(check(&stub, &table, -999_999, "DAQmxStartTask", "()"));
        assert_eq!(
            err.to_string(),
            "DAQmxStartTask() failed with error -999999=-999999"
        );
    }

    #[test]
    fn positive_codes_warn_and_pass_through() {
        let stub = Stub::new(
            &[Reply::Text("Finite acquisition stopped before completion.")],
            &[],
        );
        let table = ErrorTable::builtin();
        let res = check(&stub, &table, 200010, "DAQmxStopTask", "()");

        assert_eq!(res.unwrap(), 200010);
        assert_eq!(*stub.caps.borrow(), vec![3000]);
    }

    #[test]
    fn wrap_respects_the_column_limit() {
        let text = "Requested value is not a supported value for this property. \
                    The property value may be invalid because it conflicts with \
                    another property, or the value is outside the range the \
                    device supports.";
        let lines = wrap_text(text, 80);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.len() <= 80));
        let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split(' ')).collect();
        assert_eq!(rejoined, text.split_whitespace().collect::<Vec<_>>());

        assert!(wrap_text("", 80).is_empty());
    }

    #[test]
    fn wrap_splits_words_longer_than_a_line() {
        let word = "x".repeat(200);
        let lines = wrap_text(&word, 80);
        assert_eq!(
            lines,
            vec!["x".repeat(80), "x".repeat(80), "x".repeat(40)]
        );
    }

    #[test]
    fn wrap_flows_multi_line_text_into_one_paragraph() {
        let lines = wrap_text("Task specified is invalid.\nTask Name: acquire", 80);
        assert_eq!(lines, vec!["Task specified is invalid. Task Name: acquire"]);
    }

    #[test]
    fn block_format_indents_and_closes_with_a_rule() {
        assert_eq!(
            wrap_block("Task cannot be started."),
            "\n  Task cannot be started.\n  ----------"
        );
        assert_eq!(wrap_block(""), "\n  ----------");
    }

    #[test]
    fn buffer_decode_stops_at_the_terminator() {
        let mut buf = vec![0 as c_char; 8];
        for (dst, &src) in buf.iter_mut().zip(b"abc\0def") {
            *dst = src as c_char;
        }
        assert_eq!(string_from_buf(&buf), "abc");
        assert_eq!(string_from_buf(&[]), "");
    }
}
