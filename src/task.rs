// nidaqmx/src/task.rs
//
// Copyright (c) 2021-2025, nidaqmx-rs contributors
//
// Licensed under the MIT license:
//   <LICENSE or http://opensource.org/licenses/MIT>
// This file may not be copied, modified, or distributed except according
// to those terms.
//
//!
//! Tasks: the driver's unit of configuration and I/O.
//!
//! A task collects virtual channels, timing, and triggering into one
//! runnable unit. [`Task`] wraps the driver's task handle; channels are
//! added with the `create_*_channel` methods, timing and triggering with
//! the `configure_*` methods, and samples move through the `read_*` and
//! `write_*` methods. Clearing happens on drop, or explicitly through
//! [`Task::clear`] for callers who want the status.

use std::{ffi::CString, ptr, time::Duration};

use log::warn;

use crate::ffi;
use super::*;

/// A driver task.
///
/// Tasks can move between threads; the driver serializes concurrent calls
/// on the same handle. Interleaving reads or writes on one task from
/// several threads is still on the caller to avoid.
#[derive(Debug)]
pub struct Task {
    handle: ffi::TaskHandle,
    ctx: Context,
    name: String,
}

// SAFETY: the handle is an opaque token, not aliased memory, and the
// driver's C API is documented thread-safe.
unsafe impl Send for Task {}
unsafe impl Sync for Task {}

impl Task {
    pub(crate) fn create(ctx: &Context, name: &str) -> Result<Task> {
        let cname = CString::new(name)?;
        let mut handle: ffi::TaskHandle = ptr::null_mut();
        let ret = unsafe { (ctx.api().create_task)(cname.as_ptr(), &mut handle) };
        ctx.check(ret, "DAQmxCreateTask", &format!("({:?})", name))?;

        let mut task = Task {
            handle,
            ctx: ctx.clone(),
            name: name.to_string(),
        };
        if name.is_empty() {
            // The driver picked a unique name; learn it for reporting.
            task.name = task.query_name()?;
        }
        Ok(task)
    }

    /// The task's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The context the task was created from.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    fn query_name(&self) -> Result<String> {
        self.ctx
            .string_query("DAQmxGetTaskName", &self.args(), |buf| unsafe {
                (self.ctx.api().get_task_name)(self.handle, buf.as_mut_ptr(), buf.len() as ffi::uInt32)
            })
    }

    fn args(&self) -> String {
        format!("({:?})", self.name)
    }

    /// Starts the task.
    pub fn start(&self) -> Result<()> {
        let ret = unsafe { (self.ctx.api().start_task)(self.handle) };
        self.ctx.check(ret, "DAQmxStartTask", &self.args())?;
        Ok(())
    }

    /// Stops the task, returning it to the state before [`Task::start`].
    pub fn stop(&self) -> Result<()> {
        let ret = unsafe { (self.ctx.api().stop_task)(self.handle) };
        self.ctx.check(ret, "DAQmxStopTask", &self.args())?;
        Ok(())
    }

    /// Whether the task has completed its acquisition or generation.
    pub fn is_done(&self) -> Result<bool> {
        let mut done: ffi::bool32 = 0;
        let ret = unsafe { (self.ctx.api().is_task_done)(self.handle, &mut done) };
        self.ctx.check(ret, "DAQmxIsTaskDone", &self.args())?;
        Ok(done != 0)
    }

    /// Blocks until the task finishes. `None` waits indefinitely.
    pub fn wait_until_done(&self, timeout: Option<Duration>) -> Result<()> {
        let ret =
            unsafe { (self.ctx.api().wait_until_task_done)(self.handle, timeout_secs(timeout)) };
        self.ctx.check(ret, "DAQmxWaitUntilTaskDone", &self.args())?;
        Ok(())
    }

    /// Drives the task's state machine explicitly.
    pub fn control(&self, action: TaskAction) -> Result<()> {
        let ret = unsafe { (self.ctx.api().task_control)(self.handle, action.raw()) };
        self.ctx.check(
            ret,
            "DAQmxTaskControl",
            &format!("({:?}, {})", self.name, action),
        )?;
        Ok(())
    }

    /// Releases the task's driver resources, reporting any failure.
    ///
    /// Dropping a task clears it as well; this form is for callers who
    /// want the status.
    pub fn clear(mut self) -> Result<()> {
        let ret = unsafe { (self.ctx.api().clear_task)(self.handle) };
        // Keep drop from clearing the handle a second time.
        self.handle = ptr::null_mut();
        self.ctx.check(ret, "DAQmxClearTask", &self.args())?;
        Ok(())
    }

    /// The number of virtual channels in the task.
    pub fn num_channels(&self) -> Result<usize> {
        let mut n: ffi::uInt32 = 0;
        let ret = unsafe { (self.ctx.api().get_task_num_chans)(self.handle, &mut n) };
        self.ctx.check(ret, "DAQmxGetTaskNumChans", &self.args())?;
        Ok(n as usize)
    }

    /// The names of the task's virtual channels, in creation order.
    pub fn channel_names(&self) -> Result<Vec<String>> {
        let list = self
            .ctx
            .string_query("DAQmxGetTaskChannels", &self.args(), |buf| unsafe {
                (self.ctx.api().get_task_channels)(
                    self.handle,
                    buf.as_mut_ptr(),
                    buf.len() as ffi::uInt32,
                )
            })?;
        Ok(split_list(&list))
    }

    /// The names of the devices the task uses.
    pub fn device_names(&self) -> Result<Vec<String>> {
        let list = self
            .ctx
            .string_query("DAQmxGetTaskDevices", &self.args(), |buf| unsafe {
                (self.ctx.api().get_task_devices)(
                    self.handle,
                    buf.as_mut_ptr(),
                    buf.len() as ffi::uInt32,
                )
            })?;
        Ok(split_list(&list))
    }

    /// The task's channel names in compressed range notation.
    ///
    /// Four consecutive channels on one device come back as, for example,
    /// `"Dev1/ai0:3"` rather than a four-name list.
    pub fn channel_pattern(&self) -> Result<String> {
        Ok(compress_pattern(self.channel_names()?))
    }

    /// Samples available to read, per channel.
    pub fn samples_available(&self) -> Result<usize> {
        let mut n: ffi::uInt32 = 0;
        let ret = unsafe { (self.ctx.api().get_read_avail_samp_per_chan)(self.handle, &mut n) };
        self.ctx
            .check(ret, "DAQmxGetReadAvailSampPerChan", &self.args())?;
        Ok(n as usize)
    }

    /// Adds analog-input voltage channels to the task.
    ///
    /// `physical` names the lines singly (`"Dev1/ai0"`), as a range
    /// (`"Dev1/ai0:3"`), or as a comma-separated list; `name` optionally
    /// assigns the virtual channel name. Input is expected between `min`
    /// and `max` in the given units.
    pub fn create_ai_voltage_channel(
        &self,
        physical: &str,
        name: Option<&str>,
        terminal: TerminalConfig,
        min: f64,
        max: f64,
        units: VoltageUnits,
    ) -> Result<()> {
        let phys = CString::new(physical)?;
        let cname = CString::new(name.unwrap_or_default())?;
        let scale = match units.scale_name() {
            Some(scale) => Some(CString::new(scale)?),
            None => None,
        };
        let ret = unsafe {
            (self.ctx.api().create_ai_voltage_chan)(
                self.handle,
                phys.as_ptr(),
                cname.as_ptr(),
                terminal.raw(),
                min,
                max,
                units.raw(),
                scale.as_ref().map_or(ptr::null(), |s| s.as_ptr()),
            )
        };
        self.ctx.check(
            ret,
            "DAQmxCreateAIVoltageChan",
            &format!("({:?}, {:?})", physical, name.unwrap_or_default()),
        )?;
        Ok(())
    }

    /// Adds analog-output voltage channels to the task.
    ///
    /// Arguments mirror [`Task::create_ai_voltage_channel`]; outputs have
    /// no terminal configuration.
    pub fn create_ao_voltage_channel(
        &self,
        physical: &str,
        name: Option<&str>,
        min: f64,
        max: f64,
        units: VoltageUnits,
    ) -> Result<()> {
        let phys = CString::new(physical)?;
        let cname = CString::new(name.unwrap_or_default())?;
        let scale = match units.scale_name() {
            Some(scale) => Some(CString::new(scale)?),
            None => None,
        };
        let ret = unsafe {
            (self.ctx.api().create_ao_voltage_chan)(
                self.handle,
                phys.as_ptr(),
                cname.as_ptr(),
                min,
                max,
                units.raw(),
                scale.as_ref().map_or(ptr::null(), |s| s.as_ptr()),
            )
        };
        self.ctx.check(
            ret,
            "DAQmxCreateAOVoltageChan",
            &format!("({:?}, {:?})", physical, name.unwrap_or_default()),
        )?;
        Ok(())
    }

    /// Configures the task's sample clock.
    ///
    /// `None` for `source` uses the device's onboard clock. For finite
    /// acquisition `samples_per_channel` is the total to acquire per
    /// channel; for continuous acquisition it sizes the buffer.
    pub fn configure_sample_clock(
        &self,
        source: Option<&str>,
        rate: f64,
        edge: Edge,
        mode: SampleMode,
        samples_per_channel: u64,
    ) -> Result<()> {
        let source = source.unwrap_or("OnboardClock");
        let csource = CString::new(source)?;
        let ret = unsafe {
            (self.ctx.api().cfg_samp_clk_timing)(
                self.handle,
                csource.as_ptr(),
                rate,
                edge.raw(),
                mode.raw(),
                samples_per_channel,
            )
        };
        self.ctx.check(
            ret,
            "DAQmxCfgSampClkTiming",
            &format!("({:?}, {})", source, rate),
        )?;
        Ok(())
    }

    /// Arms a digital-edge start trigger on `source` (e.g. `"/Dev1/PFI0"`).
    pub fn configure_digital_edge_start_trigger(&self, source: &str, edge: Edge) -> Result<()> {
        let csource = CString::new(source)?;
        let ret = unsafe {
            (self.ctx.api().cfg_dig_edge_start_trig)(self.handle, csource.as_ptr(), edge.raw())
        };
        self.ctx
            .check(ret, "DAQmxCfgDigEdgeStartTrig", &format!("({:?})", source))?;
        Ok(())
    }

    /// Removes any configured start trigger; the task then starts on
    /// [`Task::start`] alone.
    pub fn disable_start_trigger(&self) -> Result<()> {
        let ret = unsafe { (self.ctx.api().disable_start_trig)(self.handle) };
        self.ctx.check(ret, "DAQmxDisableStartTrig", &self.args())?;
        Ok(())
    }

    /// Reads floating-point samples from every channel of the task.
    ///
    /// `samples` is the per-channel count to read; `None` reads whatever
    /// is already available without waiting for more. `None` for `timeout`
    /// waits indefinitely. When the driver hands back fewer scans than
    /// requested, the block is truncated to what actually arrived.
    pub fn read_analog(
        &self,
        samples: Option<usize>,
        timeout: Option<Duration>,
        fill: FillMode,
    ) -> Result<AnalogSamples> {
        let channels = self.num_channels()?;
        if channels == 0 {
            return Err(Error::NoChannels);
        }
        let per_chan = match samples {
            Some(n) => n,
            None => self.samples_available()?,
        };

        let mut block = AnalogSamples::zeroed(channels, per_chan, fill);
        let mut read: ffi::int32 = 0;
        let ret = unsafe {
            (self.ctx.api().read_analog_f64)(
                self.handle,
                per_chan as ffi::int32,
                timeout_secs(timeout),
                fill.raw(),
                block.as_mut_slice().as_mut_ptr(),
                (channels * per_chan) as ffi::uInt32,
                &mut read,
                ptr::null_mut(),
            )
        };
        self.ctx.check(
            ret,
            "DAQmxReadAnalogF64",
            &format!("({:?}, {} x {})", self.name, channels, per_chan),
        )?;

        let read = read.max(0) as usize;
        if read < per_chan {
            block.truncate_scans(read);
        }
        Ok(block)
    }

    /// Reads one sample from a single-channel task.
    pub fn read_analog_scalar(&self, timeout: Option<Duration>) -> Result<f64> {
        let mut value: ffi::float64 = 0.0;
        let ret = unsafe {
            (self.ctx.api().read_analog_scalar_f64)(
                self.handle,
                timeout_secs(timeout),
                &mut value,
                ptr::null_mut(),
            )
        };
        self.ctx
            .check(ret, "DAQmxReadAnalogScalarF64", &self.args())?;
        Ok(value)
    }

    /// Writes a block of samples to the task's output channels.
    ///
    /// The block's channel count must match the task's. With `auto_start`
    /// the driver starts the task if it is not already running. Returns
    /// the number of scans the driver accepted per channel.
    pub fn write_analog(
        &self,
        data: &AnalogSamples,
        auto_start: bool,
        timeout: Option<Duration>,
    ) -> Result<usize> {
        let channels = self.num_channels()?;
        if channels == 0 {
            return Err(Error::NoChannels);
        }
        if data.channels() != channels {
            return Err(Error::ChannelCountMismatch {
                data: data.channels(),
                task: channels,
            });
        }

        let mut written: ffi::int32 = 0;
        let ret = unsafe {
            (self.ctx.api().write_analog_f64)(
                self.handle,
                data.samples_per_channel() as ffi::int32,
                auto_start as ffi::bool32,
                timeout_secs(timeout),
                data.layout().raw(),
                data.as_slice().as_ptr(),
                &mut written,
                ptr::null_mut(),
            )
        };
        self.ctx.check(
            ret,
            "DAQmxWriteAnalogF64",
            &format!("({:?}, {} x {})", self.name, channels, data.samples_per_channel()),
        )?;
        Ok(written.max(0) as usize)
    }

    /// Writes one sample to a single-channel task.
    pub fn write_analog_scalar(
        &self,
        value: f64,
        auto_start: bool,
        timeout: Option<Duration>,
    ) -> Result<()> {
        let ret = unsafe {
            (self.ctx.api().write_analog_scalar_f64)(
                self.handle,
                auto_start as ffi::bool32,
                timeout_secs(timeout),
                value,
                ptr::null_mut(),
            )
        };
        self.ctx
            .check(ret, "DAQmxWriteAnalogScalarF64", &self.args())?;
        Ok(())
    }
}

impl PartialEq for Task {
    /// Two tasks are the same if they wrap the same driver handle.
    fn eq(&self, other: &Task) -> bool {
        self.handle == other.handle
    }
}

impl Drop for Task {
    /// Clears the task, releasing its driver resources.
    fn drop(&mut self) {
        if self.handle.is_null() {
            return;
        }
        let ret = unsafe { (self.ctx.api().clear_task)(self.handle) };
        if let Err(err) = self.ctx.check(ret, "DAQmxClearTask", &self.args()) {
            warn!("failed to clear task {:?}: {}", self.name, err);
        }
    }
}

// Timeout in driver seconds; `None` waits indefinitely.
fn timeout_secs(timeout: Option<Duration>) -> ffi::float64 {
    match timeout {
        Some(t) => t.as_secs_f64(),
        None => ffi::DAQmx_Val_WaitInfinitely,
    }
}

// Splits the driver's comma-separated list form, tolerating blanks.
fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
