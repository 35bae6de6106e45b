// microtonal -- scales beyond twelve tones, rendered as audio and MIDI
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! This is the namespace for all parts dealing with data in sampled waves.

use std::fmt;
use std::str::FromStr;

use snafu::Snafu;

/// The periodic wave shapes a note can be rendered with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Waveform {
    Sine,
    Sawtooth,
    Square,
}

impl Waveform {
    pub const ALL: [Waveform; 3] = [Waveform::Sine, Waveform::Sawtooth, Waveform::Square];

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Square => "square",
        }
    }
}

impl Default for Waveform {
    fn default() -> Self {
        Waveform::Sine
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum WaveformError {
    #[snafu(display("Unsupported waveform type: {}", name))]
    UnsupportedWaveform { name: String },
}

/// Resolve a waveform by its name, ignoring case.
///
/// # Examples
///
/// ```
/// use microtonal::wave::*;
///
/// assert_eq!("sine".parse(), Ok(Waveform::Sine));
/// assert_eq!("Sawtooth".parse(), Ok(Waveform::Sawtooth));
/// assert_eq!(
///     "triangle".parse::<Waveform>(),
///     Err(WaveformError::UnsupportedWaveform { name: "triangle".to_string() })
/// );
/// ```
impl FromStr for Waveform {
    type Err = WaveformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Waveform::ALL
            .iter()
            .copied()
            .find(|waveform| waveform.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| WaveformError::UnsupportedWaveform { name: s.to_string() })
    }
}

/// Information about how audio is sampled.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SamplerInfo {
    /// Number of samples per second.
    pub sample_rate: u32,
}

impl SamplerInfo {
    /// Number of samples covering `seconds`, rounded to the nearest sample.
    ///
    /// ```
    /// use microtonal::wave::*;
    ///
    /// let info = SamplerInfo::default();
    /// assert_eq!(info.samples(0.5), 22050);
    /// assert_eq!(info.samples(0.1), 4410);
    /// ```
    pub fn samples(&self, seconds: f64) -> usize {
        (self.sample_rate as f64 * seconds).round() as usize
    }
}

impl Default for SamplerInfo {
    fn default() -> Self {
        SamplerInfo { sample_rate: 44100 }
    }
}
