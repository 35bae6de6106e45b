// microtonal -- scales beyond twelve tones, rendered as audio and MIDI
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

use std::f64::consts::PI;

use crate::wave::{SamplerInfo, Waveform};

/// An oscillator sampling a wave of some shape at a fixed frequency.
///
/// Samples are a pure function of time, so rendering the same tone twice yields
/// identical samples.
#[derive(Debug, Copy, Clone)]
pub struct Oscillator {
    shape: Waveform,
    frequency: f64,
}

impl Oscillator {
    pub fn new(shape: Waveform, frequency: f64) -> Self {
        Self { shape, frequency }
    }

    /// The value of the wave `t` seconds after its start.
    pub fn sample_at(&self, t: f64) -> f64 {
        let phase = self.frequency * t;
        match self.shape {
            Waveform::Sine => (2.0 * PI * phase).sin(),
            Waveform::Sawtooth => 2.0 * (phase - (0.5 + phase).floor()),
            Waveform::Square => sign((2.0 * PI * phase).sin()),
        }
    }

    /// Sample `duration` seconds of the wave.
    ///
    /// The sample times are evenly spaced over `[0, duration)`, excluding the endpoint.
    ///
    /// # Examples
    ///
    /// ```
    /// use microtonal::synth::oscillator::*;
    /// use microtonal::wave::*;
    ///
    /// let osc = Oscillator::new(Waveform::Square, 440.0);
    /// let samples = osc.render(0.5, SamplerInfo::default());
    /// assert_eq!(samples.len(), 22050);
    /// assert_eq!(samples[0], 0.0);
    /// assert_eq!(samples[1], 1.0);
    /// ```
    pub fn render(&self, duration: f64, info: SamplerInfo) -> Vec<f64> {
        let num_samples = info.samples(duration);
        let time_step = duration / num_samples as f64;
        (0..num_samples)
            .map(|i| self.sample_at(i as f64 * time_step))
            .collect()
    }
}

/// Sign of a sample, zero only at exact zero crossings.
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
