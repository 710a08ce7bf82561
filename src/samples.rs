// nidaqmx/src/samples.rs
//
// Copyright (c) 2021-2025, nidaqmx-rs contributors
//
// Licensed under the MIT license:
//   <LICENSE or http://opensource.org/licenses/MIT>
// This file may not be copied, modified, or distributed except according
// to those terms.
//
//!
//! Layout-tagged sample blocks for multi-channel analog I/O.
//!
//! The driver moves multi-channel data through flat `f64` buffers whose
//! meaning depends on a fill mode: grouped by channel (all of channel 0,
//! then all of channel 1, …) or grouped by scan (sample 0 of every channel,
//! then sample 1, …). [`AnalogSamples`] keeps the flat buffer together with
//! its shape and layout so the two interpretations cannot be confused, and
//! makes the transpose between them explicit.

use super::*;

/// A block of `f64` samples spanning one or more channels.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalogSamples {
    data: Vec<f64>,
    channels: usize,
    samples_per_channel: usize,
    layout: FillMode,
}

impl AnalogSamples {
    /// Wraps a flat buffer, which must divide evenly across `channels`.
    pub fn from_vec(data: Vec<f64>, channels: usize, layout: FillMode) -> Result<Self> {
        let samples_per_channel = per_channel_count(data.len(), channels)?;
        Ok(Self {
            data,
            channels,
            samples_per_channel,
            layout,
        })
    }

    // Zero-filled block sized for a pending read.
    pub(crate) fn zeroed(channels: usize, samples_per_channel: usize, layout: FillMode) -> Self {
        Self {
            data: vec![0.0; channels * samples_per_channel],
            channels,
            samples_per_channel,
            layout,
        }
    }

    /// Number of channels spanned.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Samples held for each channel.
    pub fn samples_per_channel(&self) -> usize {
        self.samples_per_channel
    }

    /// The memory layout of the flat buffer.
    pub fn layout(&self) -> FillMode {
        self.layout
    }

    /// Total sample count across all channels.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the block holds no samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The flat buffer, in the block's layout.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consumes the block, returning the flat buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// The sample of `channel` at scan `sample`.
    ///
    /// Panics when either index is out of range, like slice indexing.
    pub fn value(&self, channel: usize, sample: usize) -> f64 {
        assert!(
            channel < self.channels && sample < self.samples_per_channel,
            "sample ({}, {}) out of range for {}x{} block",
            channel,
            sample,
            self.channels,
            self.samples_per_channel
        );
        self.data[self.index(channel, sample)]
    }

    fn index(&self, channel: usize, sample: usize) -> usize {
        match self.layout {
            FillMode::GroupByChannel => channel * self.samples_per_channel + sample,
            FillMode::GroupByScanNumber => sample * self.channels + channel,
        }
    }

    /// All samples of one channel, in scan order.
    pub fn channel(&self, channel: usize) -> Vec<f64> {
        (0..self.samples_per_channel)
            .map(|s| self.value(channel, s))
            .collect()
    }

    /// One scan: the sample of every channel at `sample`.
    pub fn scan(&self, sample: usize) -> Vec<f64> {
        (0..self.channels).map(|c| self.value(c, sample)).collect()
    }

    /// The same samples rearranged into `layout`.
    ///
    /// A transpose of the flat buffer when the layout changes; otherwise the
    /// block passes through untouched.
    pub fn into_layout(self, layout: FillMode) -> Self {
        if layout == self.layout {
            return self;
        }
        let mut data = Vec::with_capacity(self.data.len());
        match layout {
            FillMode::GroupByChannel => {
                for c in 0..self.channels {
                    for s in 0..self.samples_per_channel {
                        data.push(self.value(c, s));
                    }
                }
            }
            FillMode::GroupByScanNumber => {
                for s in 0..self.samples_per_channel {
                    for c in 0..self.channels {
                        data.push(self.value(c, s));
                    }
                }
            }
        }
        Self {
            data,
            channels: self.channels,
            samples_per_channel: self.samples_per_channel,
            layout,
        }
    }

    // Keeps only the first `scans` scans; used after a short read.
    pub(crate) fn truncate_scans(&mut self, scans: usize) {
        if scans >= self.samples_per_channel {
            return;
        }
        match self.layout {
            FillMode::GroupByScanNumber => self.data.truncate(scans * self.channels),
            FillMode::GroupByChannel => {
                let mut data = Vec::with_capacity(scans * self.channels);
                for c in 0..self.channels {
                    let offset = c * self.samples_per_channel;
                    data.extend_from_slice(&self.data[offset..offset + scans]);
                }
                self.data = data;
            }
        }
        self.samples_per_channel = scans;
    }
}

// Samples per channel for a flat buffer of `len`, rejecting shapes that do
// not divide evenly.
pub(crate) fn per_channel_count(len: usize, channels: usize) -> Result<usize> {
    if channels == 0 {
        return Err(Error::NoChannels);
    }
    if len % channels != 0 {
        return Err(Error::UnevenSampleCount { len, channels });
    }
    Ok(len / channels)
}
