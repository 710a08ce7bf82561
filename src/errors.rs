// nidaqmx/src/errors.rs
//
// Copyright (c) 2021-2025, nidaqmx-rs contributors
//
// Licensed under the MIT license:
//   <LICENSE or http://opensource.org/licenses/MIT>
// This file may not be copied, modified, or distributed except according
// to those terms.
//
//!
//! Error definitions for the NI-DAQmx binding.

use std::{ffi, fmt};
use thiserror::Error;

/// A failed driver call: negative status code plus everything known about it.
///
/// Carries the driver function name, the rendered argument list, the
/// symbolic error name when the code appears in the error table, and the
/// driver's descriptive text wrapped for display.
#[derive(Debug)]
pub struct DriverError {
    function: String,
    args: String,
    symbol: Option<String>,
    code: i32,
    message: Option<String>,
}

impl DriverError {
    pub(crate) fn new(
        function: &str,
        args: &str,
        symbol: Option<String>,
        code: i32,
        message: Option<String>,
    ) -> Self {
        Self {
            function: function.into(),
            args: args.into(),
            symbol,
            code,
            message,
        }
    }

    /// The raw driver status code. Always negative.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// The driver function that failed.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// The `DAQmxError…` name, prefix stripped, if the code is known.
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    /// Symbolic name when known, the decimal code otherwise.
    pub fn label(&self) -> String {
        match &self.symbol {
            Some(name) => name.clone(),
            None => self.code.to_string(),
        }
    }

    /// The wrapped description text, if the driver provided one.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}{} failed with error {}={}",
            self.function,
            self.args,
            self.label(),
            self.code
        )?;
        match &self.message {
            Some(text) => write!(f, ":{}", text),
            None => Ok(()),
        }
    }
}

impl std::error::Error for DriverError {}

/// The Error type for the NI-DAQmx binding
#[derive(Error, Debug)]
pub enum Error {
    /// A negative status code returned by a driver call
    #[error(transparent)]
    Driver(#[from] DriverError),
    /// The driver library, or one of its entry points, could not be loaded
    #[error("{0}")]
    Load(#[from] nidaqmx_sys::LoadError),
    /// A string-returning call still reported its buffer too small at the
    /// growth limit; a fault in this binding or the driver, not the hardware
    #[error("string result for {op} did not fit in {limit} bytes")]
    StringBufferOverflow {
        /// The driver function whose string result would not fit.
        op: String,
        /// The capacity bound that was exceeded.
        limit: usize,
    },
    /// An unexpected NUL value in a string destined for the C library.
    #[error("{0}")]
    NulError(#[from] ffi::NulError),
    /// Sample data whose length does not divide evenly by the channel count
    #[error("{len} samples cannot be split across {channels} channels")]
    UnevenSampleCount {
        /// Total number of samples supplied.
        len: usize,
        /// Number of channels they were meant to cover.
        channels: usize,
    },
    /// Sample data whose channel count differs from the task's
    #[error("data carries {data} channels but the task has {task}")]
    ChannelCountMismatch {
        /// Channels in the supplied block.
        data: usize,
        /// Channels configured in the task.
        task: usize,
    },
    /// An operation that needs channels was attempted on a channel-less task
    #[error("Task has no channels")]
    NoChannels,
    /// A generic error with a string explanation
    #[error("{0}")]
    General(String),
}

/// The default result type for the NI-DAQmx binding
pub type Result<T> = std::result::Result<T, Error>;
