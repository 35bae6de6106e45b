// microtonal -- scales beyond twelve tones, rendered as audio and MIDI
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Definitions of what a note is.

use crate::tuning::Tuning;
use crate::util;

/// One pitch of a scale: its exact frequency and the nearest MIDI note.
///
/// Notes are only ever created by the scale generators, which derive `midi_note`
/// from `frequency` using the scale's [`Tuning`]. They are immutable afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Note {
    frequency: f64,
    midi_note: i32,
    name: Option<String>,
}

/// Names of the twelve semitones in an octave, starting at C.
const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

impl Note {
    pub(crate) fn new(tuning: &Tuning, frequency: f64, name: Option<String>) -> Note {
        Note {
            frequency,
            midi_note: tuning.midi_note(frequency),
            name,
        }
    }

    /// Frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// The nearest MIDI note, which may lie outside of the 0 - 127 MIDI range.
    pub fn midi_note(&self) -> i32 {
        self.midi_note
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name of the nearest note in standard notation, following the MIDI convention where
    /// C4 corresponds to index 60.
    /// Returns `None` if the note is not representable in the MIDI note system.
    ///
    /// # Examples
    ///
    /// ```
    /// use microtonal::scale::*;
    ///
    /// let scale = Scale::equal_temperament(Default::default(), 12, 1).unwrap();
    /// assert_eq!(scale.notes()[0].pitch_name().as_deref(), Some("A4"));
    /// assert_eq!(scale.notes()[3].pitch_name().as_deref(), Some("C5"));
    /// assert_eq!(scale.notes()[4].pitch_name().as_deref(), Some("C#5"));
    /// ```
    pub fn pitch_name(&self) -> Option<String> {
        if self.midi_note < 0 || self.midi_note > 127 {
            return None;
        }
        let pitch_class = PITCH_CLASSES[(self.midi_note % 12) as usize];
        // C4 is MIDI note number 60
        let octave = self.midi_note / 12 - 1;
        Some(format!("{}{}", pitch_class, octave))
    }

    /// Deviation in cents between the exact frequency and the equal-tempered
    /// frequency of `midi_note` under the given tuning.
    /// Lies within [-50, 50] for notes generated with the same tuning.
    pub fn cents_offset(&self, tuning: &Tuning) -> f64 {
        util::to_cents(self.frequency / tuning.frequency(self.midi_note))
    }
}
