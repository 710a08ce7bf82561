// nidaqmx/src/context.rs
//
// Copyright (c) 2021-2025, nidaqmx-rs contributors
//
// Licensed under the MIT license:
//   <LICENSE or http://opensource.org/licenses/MIT>
// This file may not be copied, modified, or distributed except according
// to those terms.
//
//!
//! The loaded-driver context.
//!
//! A [`Context`] owns one loaded copy of the NI-DAQmx library: the resolved
//! entry points, the error-name table used to label status codes, and the
//! installed driver version. Tasks are created from a context and keep it
//! alive through a cheap handle clone, so the library is never unloaded
//! while anything can still call into it.

use std::{ffi::OsStr, os::raw::c_char, sync::Arc};

use crate::ffi;
use crate::status::{check, grow_fetch, ErrorText};
use super::*;

/// A loaded NI-DAQmx driver library.
#[derive(Debug, Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

#[derive(Debug)]
struct ContextInner {
    api: ffi::Api,
    table: ErrorTable,
    version: Version,
}

impl Context {
    /// Loads the driver from the platform's default library names.
    pub fn new() -> Result<Context> {
        Self::open(None, ErrorTable::builtin())
    }

    /// Loads the driver library at `path`.
    pub fn from_path(path: impl AsRef<OsStr>) -> Result<Context> {
        Self::open(Some(path.as_ref()), ErrorTable::builtin())
    }

    /// Loads the driver with a caller-supplied error-name table.
    ///
    /// `None` for `path` tries the platform's default library names. The
    /// table replaces the built-in one, so callers extending the built-ins
    /// should start from [`ErrorTable::builtin`].
    pub fn with_error_table(path: Option<&OsStr>, table: ErrorTable) -> Result<Context> {
        Self::open(path, table)
    }

    fn open(path: Option<&OsStr>, table: ErrorTable) -> Result<Context> {
        let api = match path {
            Some(path) => unsafe { ffi::Api::load(path) }?,
            None => Self::load_default()?,
        };
        // Also the load-time sanity check that calls reach the driver.
        let version = Self::query_version(&api, &table)?;
        Ok(Context {
            inner: Arc::new(ContextInner {
                api,
                table,
                version,
            }),
        })
    }

    // Tries the platform's default library names in order, reporting the
    // last failure when none opens.
    fn load_default() -> Result<ffi::Api> {
        let mut last: Option<ffi::LoadError> = None;
        for name in ffi::library_candidates() {
            match unsafe { ffi::Api::load(OsStr::new(name)) } {
                Ok(api) => return Ok(api),
                Err(err) => last = Some(err),
            }
        }
        match last {
            Some(err) => Err(err.into()),
            None => Err(Error::General(
                "no driver library candidates for this platform".into(),
            )),
        }
    }

    fn query_version(api: &ffi::Api, table: &ErrorTable) -> Result<Version> {
        let mut major: ffi::uInt32 = 0;
        let mut minor: ffi::uInt32 = 0;
        let ret = unsafe { (api.get_sys_nidaq_major_version)(&mut major) };
        check(api, table, ret, "DAQmxGetSysNIDAQMajorVersion", "()")?;
        let ret = unsafe { (api.get_sys_nidaq_minor_version)(&mut minor) };
        check(api, table, ret, "DAQmxGetSysNIDAQMinorVersion", "()")?;
        Ok(Version { major, minor })
    }

    /// The version of the installed driver.
    pub fn version(&self) -> Version {
        self.inner.version
    }

    /// The error-name table used to label status codes.
    pub fn error_table(&self) -> &ErrorTable {
        &self.inner.table
    }

    /// The driver's descriptive text for a status code.
    ///
    /// Zero and codes the driver has no text for resolve to `None`. Unlike
    /// the text attached to a [`DriverError`], the description comes back
    /// unwrapped and unindented.
    pub fn error_description(&self, code: i32) -> Result<Option<String>> {
        if code == ffi::DAQmxSuccess {
            return Ok(None);
        }
        let api = &self.inner.api;
        let (ret, text) = grow_fetch("DAQmxGetErrorString", |buf| api.error_string(code, buf))?;
        match ret {
            ffi::DAQmxSuccess if !text.is_empty() => Ok(Some(text)),
            _ => Ok(None),
        }
    }

    /// Applies the driver's status convention to a raw `code`.
    ///
    /// Works exactly like the checking this binding performs on its own
    /// calls: zero is a successful no-op, a negative code resolves to a
    /// [`DriverError`] carrying the driver's descriptive text, and a
    /// positive code logs a warning and passes through. `function` and
    /// `args` name the call being checked, in `function(args)` form, in
    /// any resulting error or warning.
    pub fn resolve_status(&self, code: i32, function: &str, args: &str) -> Result<i32> {
        self.check(code, function, args)
    }

    /// Creates a task.
    ///
    /// An empty `name` lets the driver pick a unique one.
    pub fn create_task(&self, name: &str) -> Result<Task> {
        Task::create(self, name)
    }

    /// Closes this handle to the context.
    ///
    /// Tasks created from the context keep the library loaded; it is
    /// released when the last handle drops.
    pub fn close(self) {}

    pub(crate) fn api(&self) -> &ffi::Api {
        &self.inner.api
    }

    pub(crate) fn check(&self, code: ffi::int32, function: &str, args: &str) -> Result<ffi::int32> {
        check(&self.inner.api, &self.inner.table, code, function, args)
    }

    // Fetches a string-valued driver attribute through the doubling retry
    // loop, checking the final status like any other call.
    pub(crate) fn string_query<F>(&self, function: &str, args: &str, f: F) -> Result<String>
    where
        F: Fn(&mut [c_char]) -> ffi::int32,
    {
        let (ret, text) = grow_fetch(function, |buf| f(buf))?;
        self.check(ret, function, args)?;
        Ok(text)
    }
}

impl PartialEq for Context {
    /// Two contexts are the same if they share the loaded library.
    fn eq(&self, other: &Context) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_library_reports_the_open_failure() {
        let err = Context::from_path("/no/such/libnidaqmx.so").unwrap_err();
        match err {
            Error::Load(load) => {
                assert!(load.to_string().contains("/no/such/libnidaqmx.so"));
            }
            other => panic!("expected a load error, got {:?}", other),
        }
    }

    // Needs an installed driver; run with `cargo test -- --ignored`.
    #[test]
    #[ignore]
    fn loads_the_installed_driver() {
        let ctx = Context::new().unwrap();
        assert!(ctx.version().major > 0);
        assert_eq!(ctx.error_table().name(-200088), Some("InvalidTask"));

        assert_eq!(ctx.resolve_status(0, "DAQmxStartTask", "()").unwrap(), 0);
        let err = ctx
            .resolve_status(-200088, "DAQmxStopTask", "(\"t\")")
            .unwrap_err();
        assert!(err
            .to_string()
            .starts_with("DAQmxStopTask(\"t\") failed with error InvalidTask=-200088"));
    }
}
