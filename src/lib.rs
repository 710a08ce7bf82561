// nidaqmx/src/lib.rs
//
// Copyright (c) 2021-2025, nidaqmx-rs contributors
//
// Licensed under the MIT license:
//   <LICENSE or http://opensource.org/licenses/MIT>
// This file may not be copied, modified, or distributed except according
// to those terms.
//
//!
//! The Rust NI-DAQmx crate.
//!
//! This is a Rust wrapper for _NI-DAQmx_, National Instruments' driver for
//! their data-acquisition hardware. The vendor library is loaded at run
//! time, so nothing links against it at build time; a [`Context`] owns the
//! loaded driver and hands out [`Task`]s for configuring channels, timing,
//! and triggering, and for moving analog samples in and out.
//!
//! For more information, see:
//!
//!   [NI-DAQmx](https://www.ni.com/en/support/downloads/drivers/download.ni-daq-mx.html)
//!
//!   [NI-DAQmx C Reference](https://www.ni.com/docs/en-US/bundle/ni-daqmx-c-api-ref/)
//!

// Lints
// This may be overkill.
#![deny(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

use std::fmt;

use nidaqmx_sys::{self as ffi};

pub use crate::codes::*;
pub use crate::context::*;
pub use crate::errors::*;
pub use crate::pattern::*;
pub use crate::samples::*;
pub use crate::task::*;
pub use crate::values::*;

mod status;

pub mod codes;
pub mod context;
pub mod errors;
pub mod pattern;
pub mod samples;
pub mod task;
pub mod values;

// --------------------------------------------------------------------------

/// A struct to hold version numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    /// The Major version number
    pub major: u32,
    /// The Minor version number
    pub minor: u32,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

// --------------------------------------------------------------------------
