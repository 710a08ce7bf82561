// nidaqmx-sys/src/lib.rs
//
//! Runtime bindings for the National Instruments NI-DAQmx driver library.
//!
//! The driver is distributed as a closed-source shared library
//! (`nicaiu.dll` on Windows, `libnidaqmx.so` on Linux) and is not present
//! on every machine that compiles against this crate, so nothing here links
//! at build time. [`Api::load`] opens the library with `libloading` and
//! resolves every entry point the safe wrapper uses, failing up front with
//! the name of any symbol the installed driver lacks.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

use std::{
    ffi::OsStr,
    fmt,
    os::raw::{c_char, c_void},
};

use libloading::Library;

#[cfg(unix)]
use libloading::os::unix::Symbol as RawSymbol;
#[cfg(windows)]
use libloading::os::windows::Symbol as RawSymbol;

// ----- Fixed-width scalar types of the driver's C API -----

pub type int8 = i8;
pub type uInt8 = u8;
pub type int16 = i16;
pub type uInt16 = u16;
pub type int32 = i32;
pub type uInt32 = u32;
pub type int64 = i64;
pub type uInt64 = u64;
pub type float32 = f32;
pub type float64 = f64;
/// 32-bit boolean taking the values 0 and 1.
pub type bool32 = uInt32;
/// Opaque handle to a driver task.
pub type TaskHandle = *mut c_void;

// ----- DAQmx_Val_* constants used by the wrapper -----

// Terminal configuration
pub const DAQmx_Val_Cfg_Default: int32 = -1;
pub const DAQmx_Val_RSE: int32 = 10083;
pub const DAQmx_Val_NRSE: int32 = 10078;
pub const DAQmx_Val_Diff: int32 = 10106;
pub const DAQmx_Val_PseudoDiff: int32 = 12529;

// Units
pub const DAQmx_Val_Volts: int32 = 10348;
pub const DAQmx_Val_FromCustomScale: int32 = 10065;

// Active edge
pub const DAQmx_Val_Rising: int32 = 10280;
pub const DAQmx_Val_Falling: int32 = 10171;

// Sample timing mode
pub const DAQmx_Val_FiniteSamps: int32 = 10178;
pub const DAQmx_Val_ContSamps: int32 = 10123;
pub const DAQmx_Val_HWTimedSinglePoint: int32 = 12522;

// Fill mode for multi-channel sample buffers
pub const DAQmx_Val_GroupByChannel: bool32 = 0;
pub const DAQmx_Val_GroupByScanNumber: bool32 = 1;

// Task control actions
pub const DAQmx_Val_Task_Start: int32 = 0;
pub const DAQmx_Val_Task_Stop: int32 = 1;
pub const DAQmx_Val_Task_Verify: int32 = 2;
pub const DAQmx_Val_Task_Commit: int32 = 3;
pub const DAQmx_Val_Task_Reserve: int32 = 4;
pub const DAQmx_Val_Task_Unreserve: int32 = 5;
pub const DAQmx_Val_Task_Abort: int32 = 6;

// Special argument values
pub const DAQmx_Val_Auto: int32 = -1;
pub const DAQmx_Val_WaitInfinitely: float64 = -1.0;

// ----- Status codes the binding itself inspects -----

pub const DAQmxSuccess: int32 = 0;
/// Reported by string-returning calls when the caller's buffer is too small.
pub const DAQmxErrorBufferTooSmallForString: int32 = -200228;

/// Shared-library names tried, in order, when no explicit path is given.
pub fn library_candidates() -> &'static [&'static str] {
    if cfg!(windows) {
        &["nicaiu.dll"]
    } else if cfg!(target_os = "macos") {
        &["libnidaqmx.dylib"]
    } else {
        &["libnidaqmx.so.1", "libnidaqmx.so"]
    }
}

/// Failure to open the driver library or bind one of its entry points.
#[derive(Debug)]
pub enum LoadError {
    /// The shared library could not be opened.
    Open {
        path: String,
        source: libloading::Error,
    },
    /// The library opened, but a required entry point is missing.
    Symbol {
        name: &'static str,
        source: libloading::Error,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "cannot open driver library {:?}: {}", path, source)
            }
            Self::Symbol { name, source } => {
                write!(f, "driver library lacks entry point {}: {}", name, source)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Symbol { source, .. } => Some(source),
        }
    }
}

/// The resolved entry points of a loaded driver library.
///
/// Every field is a raw symbol whose validity is tied to `lib`; the struct
/// keeps the library alive for as long as any symbol can be called.
pub struct Api {
    pub create_task: RawSymbol<unsafe extern "C" fn(*const c_char, *mut TaskHandle) -> int32>,
    pub clear_task: RawSymbol<unsafe extern "C" fn(TaskHandle) -> int32>,
    pub start_task: RawSymbol<unsafe extern "C" fn(TaskHandle) -> int32>,
    pub stop_task: RawSymbol<unsafe extern "C" fn(TaskHandle) -> int32>,
    pub is_task_done: RawSymbol<unsafe extern "C" fn(TaskHandle, *mut bool32) -> int32>,
    pub wait_until_task_done: RawSymbol<unsafe extern "C" fn(TaskHandle, float64) -> int32>,
    pub task_control: RawSymbol<unsafe extern "C" fn(TaskHandle, int32) -> int32>,
    pub get_task_name: RawSymbol<unsafe extern "C" fn(TaskHandle, *mut c_char, uInt32) -> int32>,
    pub get_task_channels:
        RawSymbol<unsafe extern "C" fn(TaskHandle, *mut c_char, uInt32) -> int32>,
    pub get_task_devices:
        RawSymbol<unsafe extern "C" fn(TaskHandle, *mut c_char, uInt32) -> int32>,
    pub get_task_num_chans: RawSymbol<unsafe extern "C" fn(TaskHandle, *mut uInt32) -> int32>,
    pub get_read_avail_samp_per_chan:
        RawSymbol<unsafe extern "C" fn(TaskHandle, *mut uInt32) -> int32>,
    pub create_ai_voltage_chan: RawSymbol<
        unsafe extern "C" fn(
            TaskHandle,
            *const c_char,
            *const c_char,
            int32,
            float64,
            float64,
            int32,
            *const c_char,
        ) -> int32,
    >,
    pub create_ao_voltage_chan: RawSymbol<
        unsafe extern "C" fn(
            TaskHandle,
            *const c_char,
            *const c_char,
            float64,
            float64,
            int32,
            *const c_char,
        ) -> int32,
    >,
    pub cfg_samp_clk_timing: RawSymbol<
        unsafe extern "C" fn(TaskHandle, *const c_char, float64, int32, int32, uInt64) -> int32,
    >,
    pub cfg_dig_edge_start_trig:
        RawSymbol<unsafe extern "C" fn(TaskHandle, *const c_char, int32) -> int32>,
    pub disable_start_trig: RawSymbol<unsafe extern "C" fn(TaskHandle) -> int32>,
    pub read_analog_f64: RawSymbol<
        unsafe extern "C" fn(
            TaskHandle,
            int32,
            float64,
            bool32,
            *mut float64,
            uInt32,
            *mut int32,
            *mut bool32,
        ) -> int32,
    >,
    pub read_analog_scalar_f64:
        RawSymbol<unsafe extern "C" fn(TaskHandle, float64, *mut float64, *mut bool32) -> int32>,
    pub write_analog_f64: RawSymbol<
        unsafe extern "C" fn(
            TaskHandle,
            int32,
            bool32,
            float64,
            bool32,
            *const float64,
            *mut int32,
            *mut bool32,
        ) -> int32,
    >,
    pub write_analog_scalar_f64:
        RawSymbol<unsafe extern "C" fn(TaskHandle, bool32, float64, float64, *mut bool32) -> int32>,
    pub get_extended_error_info: RawSymbol<unsafe extern "C" fn(*mut c_char, uInt32) -> int32>,
    pub get_error_string: RawSymbol<unsafe extern "C" fn(int32, *mut c_char, uInt32) -> int32>,
    pub get_sys_nidaq_major_version: RawSymbol<unsafe extern "C" fn(*mut uInt32) -> int32>,
    pub get_sys_nidaq_minor_version: RawSymbol<unsafe extern "C" fn(*mut uInt32) -> int32>,
    lib: Library,
}

impl Api {
    /// Opens the driver library at `path` and resolves every entry point.
    ///
    /// # Safety
    ///
    /// Opening a shared library runs its initialization code. The caller
    /// must ensure that `path` names a genuine NI-DAQmx driver library.
    pub unsafe fn load(path: &OsStr) -> Result<Self, LoadError> {
        let lib = Library::new(path).map_err(|source| LoadError::Open {
            path: path.to_string_lossy().into_owned(),
            source,
        })?;

        // The binding stays two-step: the field's symbol type only reaches
        // `Library::get` through the `into_raw` path call.
        macro_rules! sym {
            ($name:literal) => {{
                let s = lib
                    .get(concat!($name, "\0").as_bytes())
                    .map_err(|source| LoadError::Symbol {
                        name: $name,
                        source,
                    })?;
                libloading::Symbol::into_raw(s)
            }};
        }

        Ok(Self {
            create_task: sym!("DAQmxCreateTask"),
            clear_task: sym!("DAQmxClearTask"),
            start_task: sym!("DAQmxStartTask"),
            stop_task: sym!("DAQmxStopTask"),
            is_task_done: sym!("DAQmxIsTaskDone"),
            wait_until_task_done: sym!("DAQmxWaitUntilTaskDone"),
            task_control: sym!("DAQmxTaskControl"),
            get_task_name: sym!("DAQmxGetTaskName"),
            get_task_channels: sym!("DAQmxGetTaskChannels"),
            get_task_devices: sym!("DAQmxGetTaskDevices"),
            get_task_num_chans: sym!("DAQmxGetTaskNumChans"),
            get_read_avail_samp_per_chan: sym!("DAQmxGetReadAvailSampPerChan"),
            create_ai_voltage_chan: sym!("DAQmxCreateAIVoltageChan"),
            create_ao_voltage_chan: sym!("DAQmxCreateAOVoltageChan"),
            cfg_samp_clk_timing: sym!("DAQmxCfgSampClkTiming"),
            cfg_dig_edge_start_trig: sym!("DAQmxCfgDigEdgeStartTrig"),
            disable_start_trig: sym!("DAQmxDisableStartTrig"),
            read_analog_f64: sym!("DAQmxReadAnalogF64"),
            read_analog_scalar_f64: sym!("DAQmxReadAnalogScalarF64"),
            write_analog_f64: sym!("DAQmxWriteAnalogF64"),
            write_analog_scalar_f64: sym!("DAQmxWriteAnalogScalarF64"),
            get_extended_error_info: sym!("DAQmxGetExtendedErrorInfo"),
            get_error_string: sym!("DAQmxGetErrorString"),
            get_sys_nidaq_major_version: sym!("DAQmxGetSysNIDAQMajorVersion"),
            get_sys_nidaq_minor_version: sym!("DAQmxGetSysNIDAQMinorVersion"),
            lib,
        })
    }

    /// The loaded library object itself.
    pub fn library(&self) -> &Library {
        &self.lib
    }
}

impl fmt::Debug for Api {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Api").finish_non_exhaustive()
    }
}
