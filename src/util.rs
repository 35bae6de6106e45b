// microtonal -- scales beyond twelve tones, rendered as audio and MIDI
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Utility functions for converting between pitch units.

/// Compute a factor measured in cents (1/100 of a semitone)
///
/// # Example
///
/// ```
/// # use microtonal::util::*;
///
/// assert_eq!(from_cents(1200.0), 2.0);
/// assert_eq!(from_cents(-16.0), 2.0f64.powf(-16.0 / 1200.0));
/// ```
pub fn from_cents(cents: f64) -> f64 {
    2.0f64.powf(cents / 1200.0)
}

/// Compute a factor measured in octaves (one octave corresponds to a factor of two).
///
/// # Example
///
/// ```
/// # use microtonal::util::*;
///
/// assert_eq!(from_octaves(3.0), 8.0);
/// assert_eq!(from_octaves(-1.0), 0.5);
/// ```
pub fn from_octaves(octaves: f64) -> f64 {
    2.0f64.powf(octaves)
}

/// The size of a frequency ratio in cents.
///
/// # Example
///
/// ```
/// # use microtonal::util::*;
///
/// assert_eq!(to_cents(2.0), 1200.0);
/// assert_eq!(to_cents(1.0), 0.0);
/// ```
pub fn to_cents(ratio: f64) -> f64 {
    1200.0 * ratio.log2()
}
