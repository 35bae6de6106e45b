// microtonal -- scales beyond twelve tones, rendered as audio and MIDI
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The reference pitch every scale is built around.

/// Defines the tuning of a scale by assigning a frequency to a certain MIDI note.
/// All generated frequencies are expressed relative to `base_frequency`, and their
/// nearest MIDI note numbers are computed relative to `base_midi_note`.
///
/// # Examples
///
/// ```
/// use microtonal::tuning::*;
/// assert_eq!(Tuning::default().frequency(57), 220.0);
/// assert_eq!(Tuning::default().frequency(81), 880.0);
/// assert_eq!(Tuning::default().midi_note(880.0), 81);
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tuning {
    pub base_frequency: f64,
    pub base_midi_note: i32,
}

impl Tuning {
    pub fn new(base_frequency: f64, base_midi_note: i32) -> Self {
        Tuning {
            base_frequency,
            base_midi_note,
        }
    }

    /// Return the nearest MIDI note of a frequency relative to this tuning.
    ///
    /// This is the single frequency to note mapping used by all scale generators:
    /// `round(12 * log2(f / base_frequency) + base_midi_note)`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use microtonal::tuning::*;
    /// let tuning = Tuning::default();
    /// assert_eq!(tuning.midi_note(440.0), 69);
    /// assert_eq!(tuning.midi_note(622.25), 75);
    /// assert_eq!(tuning.midi_note(460.0), 70);
    /// ```
    pub fn midi_note(&self, frequency: f64) -> i32 {
        let semitones = 12.0 * (frequency / self.base_frequency).log2();
        (semitones + self.base_midi_note as f64).round() as i32
    }

    /// Return the equal-tempered frequency of a MIDI note relative to this tuning.
    pub fn frequency(&self, midi_note: i32) -> f64 {
        let semitones = midi_note - self.base_midi_note;
        let octaves = semitones as f64 / 12.0;
        self.base_frequency * 2.0f64.powf(octaves)
    }
}

/// Default concert tuning, where A4 (MIDI note 69) corresponds to 440 Hz.
impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            base_frequency: 440.0,
            base_midi_note: 69,
        }
    }
}
