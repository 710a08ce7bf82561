// nidaqmx/src/values.rs
//
// Copyright (c) 2021-2025, nidaqmx-rs contributors
//
// Licensed under the MIT license:
//   <LICENSE or http://opensource.org/licenses/MIT>
// This file may not be copied, modified, or distributed except according
// to those terms.
//
//!
//! Typed parameter values for driver calls.
//!
//! Each enum covers one of the driver's `DAQmx_Val_*` parameter groups, so
//! an out-of-vocabulary value cannot reach a foreign call. The textual
//! names accepted by [`FromStr`](std::str::FromStr) are the same lowercase
//! vocabulary the driver's scripting front ends use.

use std::{fmt, str::FromStr};

use crate::ffi;
use super::*;

fn unknown_value(what: &str, allowed: &[&str], got: &str) -> Error {
    Error::General(format!(
        "Expected {} in {:?}, got {:?}",
        what, allowed, got
    ))
}

/// Which edge of a clock or trigger signal is the active one.
#[repr(i32)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Act on the rising edge.
    #[default]
    Rising = ffi::DAQmx_Val_Rising,
    /// Act on the falling edge.
    Falling = ffi::DAQmx_Val_Falling,
}

impl Edge {
    pub(crate) fn raw(self) -> ffi::int32 {
        self as ffi::int32
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Rising => write!(f, "rising"),
            Self::Falling => write!(f, "falling"),
        }
    }
}

impl FromStr for Edge {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rising" => Ok(Self::Rising),
            "falling" => Ok(Self::Falling),
            _ => Err(unknown_value("edge", &["rising", "falling"], s)),
        }
    }
}

/// How many samples a timed task acquires or generates.
#[repr(i32)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SampleMode {
    /// A fixed number of samples per channel, then done.
    Finite = ffi::DAQmx_Val_FiniteSamps,
    /// Samples until the task is stopped.
    #[default]
    Continuous = ffi::DAQmx_Val_ContSamps,
    /// One sample per hardware clock tick.
    HwTimedSinglePoint = ffi::DAQmx_Val_HWTimedSinglePoint,
}

impl SampleMode {
    pub(crate) fn raw(self) -> ffi::int32 {
        self as ffi::int32
    }
}

impl fmt::Display for SampleMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Finite => write!(f, "finite"),
            Self::Continuous => write!(f, "continuous"),
            Self::HwTimedSinglePoint => write!(f, "hwtimed"),
        }
    }
}

impl FromStr for SampleMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "finite" => Ok(Self::Finite),
            "continuous" => Ok(Self::Continuous),
            "hwtimed" => Ok(Self::HwTimedSinglePoint),
            _ => Err(unknown_value(
                "sample mode",
                &["finite", "continuous", "hwtimed"],
                s,
            )),
        }
    }
}

/// Input terminal configuration for an analog channel.
#[repr(i32)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TerminalConfig {
    /// Whatever the device defaults to for the chosen terminal.
    #[default]
    Default = ffi::DAQmx_Val_Cfg_Default,
    /// Referenced single-ended.
    Rse = ffi::DAQmx_Val_RSE,
    /// Non-referenced single-ended.
    Nrse = ffi::DAQmx_Val_NRSE,
    /// Differential.
    Differential = ffi::DAQmx_Val_Diff,
    /// Pseudo-differential.
    PseudoDifferential = ffi::DAQmx_Val_PseudoDiff,
}

impl TerminalConfig {
    pub(crate) fn raw(self) -> ffi::int32 {
        self as ffi::int32
    }
}

impl fmt::Display for TerminalConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Rse => write!(f, "rse"),
            Self::Nrse => write!(f, "nrse"),
            Self::Differential => write!(f, "diff"),
            Self::PseudoDifferential => write!(f, "pseudodiff"),
        }
    }
}

impl FromStr for TerminalConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" => Ok(Self::Default),
            "rse" => Ok(Self::Rse),
            "nrse" => Ok(Self::Nrse),
            "diff" => Ok(Self::Differential),
            "pseudodiff" => Ok(Self::PseudoDifferential),
            _ => Err(unknown_value(
                "terminal configuration",
                &["default", "rse", "nrse", "diff", "pseudodiff"],
                s,
            )),
        }
    }
}

/// Memory layout of a multi-channel sample block.
#[repr(u32)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    /// All samples of channel 0, then all of channel 1, and so on.
    GroupByChannel = ffi::DAQmx_Val_GroupByChannel,
    /// Scan 0 across every channel, then scan 1, and so on (interleaved).
    #[default]
    GroupByScanNumber = ffi::DAQmx_Val_GroupByScanNumber,
}

impl FillMode {
    pub(crate) fn raw(self) -> ffi::bool32 {
        self as ffi::bool32
    }
}

impl fmt::Display for FillMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::GroupByChannel => write!(f, "group_by_channel"),
            Self::GroupByScanNumber => write!(f, "group_by_scan_number"),
        }
    }
}

impl FromStr for FillMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "group_by_channel" => Ok(Self::GroupByChannel),
            "group_by_scan_number" => Ok(Self::GroupByScanNumber),
            _ => Err(unknown_value(
                "fill mode",
                &["group_by_channel", "group_by_scan_number"],
                s,
            )),
        }
    }
}

/// Explicit task state transitions for [`Task::control`](crate::Task::control).
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    /// Start the task.
    Start = ffi::DAQmx_Val_Task_Start,
    /// Stop the task.
    Stop = ffi::DAQmx_Val_Task_Stop,
    /// Verify the configuration without reserving hardware.
    Verify = ffi::DAQmx_Val_Task_Verify,
    /// Program the hardware with the verified configuration.
    Commit = ffi::DAQmx_Val_Task_Commit,
    /// Reserve the hardware resources the task needs.
    Reserve = ffi::DAQmx_Val_Task_Reserve,
    /// Release reserved hardware resources.
    Unreserve = ffi::DAQmx_Val_Task_Unreserve,
    /// Stop immediately, aborting any pending reads or writes.
    Abort = ffi::DAQmx_Val_Task_Abort,
}

impl TaskAction {
    pub(crate) fn raw(self) -> ffi::int32 {
        self as ffi::int32
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Stop => write!(f, "stop"),
            Self::Verify => write!(f, "verify"),
            Self::Commit => write!(f, "commit"),
            Self::Reserve => write!(f, "reserve"),
            Self::Unreserve => write!(f, "unreserve"),
            Self::Abort => write!(f, "abort"),
        }
    }
}

impl FromStr for TaskAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "verify" => Ok(Self::Verify),
            "commit" => Ok(Self::Commit),
            "reserve" => Ok(Self::Reserve),
            "unreserve" => Ok(Self::Unreserve),
            "abort" => Ok(Self::Abort),
            _ => Err(unknown_value(
                "task action",
                &[
                    "start",
                    "stop",
                    "verify",
                    "commit",
                    "reserve",
                    "unreserve",
                    "abort",
                ],
                s,
            )),
        }
    }
}

/// Scaling applied to analog voltage samples.
///
/// A custom scale must already be configured in the driver under the name
/// it carries here, so "custom scale without a name" cannot be expressed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum VoltageUnits {
    /// Values in volts.
    #[default]
    Volts,
    /// Values scaled by the named custom scale.
    CustomScale(String),
}

impl VoltageUnits {
    pub(crate) fn raw(&self) -> ffi::int32 {
        match self {
            Self::Volts => ffi::DAQmx_Val_Volts,
            Self::CustomScale(_) => ffi::DAQmx_Val_FromCustomScale,
        }
    }

    pub(crate) fn scale_name(&self) -> Option<&str> {
        match self {
            Self::Volts => None,
            Self::CustomScale(name) => Some(name.as_str()),
        }
    }
}

impl fmt::Display for VoltageUnits {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Volts => write!(f, "volts"),
            Self::CustomScale(name) => write!(f, "custom_scale:{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_values_match_the_driver_constants() {
        assert_eq!(Edge::Rising.raw(), 10280);
        assert_eq!(Edge::Falling.raw(), 10171);
        assert_eq!(SampleMode::Finite.raw(), 10178);
        assert_eq!(SampleMode::Continuous.raw(), 10123);
        assert_eq!(SampleMode::HwTimedSinglePoint.raw(), 12522);
        assert_eq!(TerminalConfig::Default.raw(), -1);
        assert_eq!(TerminalConfig::Rse.raw(), 10083);
        assert_eq!(TerminalConfig::Nrse.raw(), 10078);
        assert_eq!(TerminalConfig::Differential.raw(), 10106);
        assert_eq!(TerminalConfig::PseudoDifferential.raw(), 12529);
        assert_eq!(FillMode::GroupByChannel.raw(), 0);
        assert_eq!(FillMode::GroupByScanNumber.raw(), 1);
        assert_eq!(TaskAction::Start.raw(), 0);
        assert_eq!(TaskAction::Abort.raw(), 6);
        assert_eq!(VoltageUnits::Volts.raw(), 10348);
        assert_eq!(VoltageUnits::CustomScale("s".into()).raw(), 10065);
    }

    #[test]
    fn vocabulary_parses_and_displays() {
        for name in ["rising", "falling"] {
            assert_eq!(name.parse::<Edge>().unwrap().to_string(), name);
        }
        for name in ["finite", "continuous", "hwtimed"] {
            assert_eq!(name.parse::<SampleMode>().unwrap().to_string(), name);
        }
        for name in ["default", "rse", "nrse", "diff", "pseudodiff"] {
            assert_eq!(name.parse::<TerminalConfig>().unwrap().to_string(), name);
        }
        for name in ["group_by_channel", "group_by_scan_number"] {
            assert_eq!(name.parse::<FillMode>().unwrap().to_string(), name);
        }
        for name in ["start", "stop", "verify", "commit", "reserve", "unreserve", "abort"] {
            assert_eq!(name.parse::<TaskAction>().unwrap().to_string(), name);
        }
    }

    #[test]
    fn out_of_vocabulary_names_are_rejected() {
        let err = "sideways".parse::<Edge>().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("edge"));
        assert!(text.contains("sideways"));
        assert!("".parse::<FillMode>().is_err());
        assert!("Start".parse::<TaskAction>().is_err());
    }

    #[test]
    fn custom_scale_carries_its_name() {
        let units = VoltageUnits::CustomScale("mv_per_g".into());
        assert_eq!(units.scale_name(), Some("mv_per_g"));
        assert_eq!(VoltageUnits::Volts.scale_name(), None);
        assert_eq!(VoltageUnits::default(), VoltageUnits::Volts);
    }
}
