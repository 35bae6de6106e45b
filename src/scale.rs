// microtonal -- scales beyond twelve tones, rendered as audio and MIDI
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Scales and the algorithms generating them from a description of a tuning system.

use log::debug;
use snafu::{ensure, Snafu};

use crate::note::Note;
use crate::rational::Rational;
use crate::tuning::Tuning;
use crate::util;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum ScaleError {
    #[snafu(display("Invalid parameter `{}`: {}", name, reason))]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
}

/// Description of a tuning system from which the notes of a scale are generated.
#[derive(Debug, Clone, PartialEq)]
pub enum TuningSystem {
    /// The octave divided into `divisions_per_octave` equal logarithmic steps,
    /// repeated for `num_octaves` octaves.
    EqualTemperament {
        divisions_per_octave: u32,
        num_octaves: u32,
    },
    /// Integer multiples `1..=num_harmonics` of the base frequency.
    HarmonicSeries { num_harmonics: u32 },
    /// Arbitrary frequency ratios relative to the base frequency, in the given order.
    CustomRatios(Vec<f64>),
    /// Arbitrary pitches measured in cents above the base frequency, in the given order.
    Cents(Vec<f64>),
    ArabicRast,
    /// The 22 shrutis of Indian classical music.
    IndianShruti,
    /// A just approximation of the five-tone Javanese gamelan scale.
    IndonesianSlendro,
    /// A just approximation of the seven-tone Javanese gamelan scale.
    IndonesianPelog,
}

/// Upper bound on the number of notes a generator produces.
pub const MAX_NOTES: u32 = 100_000;

const ARABIC_RAST: [Rational; 8] = [
    Rational::from_int(1),
    Rational::new(9, 8),
    Rational::new(5, 4),
    Rational::new(4, 3),
    Rational::new(3, 2),
    Rational::new(5, 3),
    Rational::new(15, 8),
    Rational::from_int(2),
];

const INDIAN_SHRUTI_CENTS: [f64; 22] = [
    0.0, 90.0, 112.0, 182.0, 204.0, 294.0, 316.0, 386.0, 408.0, 498.0, 520.0, 590.0, 612.0, 702.0,
    792.0, 814.0, 884.0, 906.0, 996.0, 1018.0, 1088.0, 1110.0,
];

const INDONESIAN_SLENDRO: [Rational; 6] = [
    Rational::from_int(1),
    Rational::new(9, 8),
    Rational::new(5, 4),
    Rational::new(11, 8),
    Rational::new(3, 2),
    Rational::from_int(2),
];

const INDONESIAN_PELOG: [Rational; 8] = [
    Rational::from_int(1),
    Rational::new(9, 8),
    Rational::new(5, 4),
    Rational::new(4, 3),
    Rational::new(3, 2),
    Rational::new(13, 8),
    Rational::new(7, 4),
    Rational::from_int(2),
];

/// An ordered sequence of notes generated around a reference pitch.
///
/// The notes are kept in the order the generator produced them, they are never re-sorted.
/// Scales are immutable values: each generator constructs a fresh scale.
///
/// # Examples
///
/// ```
/// use microtonal::scale::*;
/// use microtonal::tuning::Tuning;
///
/// let scale = Scale::equal_temperament(Tuning::default(), 12, 1).unwrap();
/// assert_eq!(scale.len(), 12);
/// assert_eq!(scale.notes()[0].frequency(), 440.0);
/// assert_eq!(scale.notes()[0].midi_note(), 69);
/// assert!((scale.notes()[6].frequency() - 622.25).abs() < 0.01);
/// assert_eq!(scale.notes()[6].midi_note(), 75);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    tuning: Tuning,
    notes: Vec<Note>,
}

impl Scale {
    /// Generate the notes of a tuning system around the given reference pitch.
    pub fn generate(tuning: Tuning, system: &TuningSystem) -> Result<Scale, ScaleError> {
        let scale = match system {
            TuningSystem::EqualTemperament {
                divisions_per_octave,
                num_octaves,
            } => Self::equal_temperament(tuning, *divisions_per_octave, *num_octaves),
            TuningSystem::HarmonicSeries { num_harmonics } => {
                Self::harmonic_series(tuning, *num_harmonics)
            }
            TuningSystem::CustomRatios(ratios) => Self::custom_ratios(tuning, ratios),
            TuningSystem::Cents(cents) => Self::cents(tuning, cents),
            TuningSystem::ArabicRast => Self::arabic_rast(tuning),
            TuningSystem::IndianShruti => Self::indian_shruti(tuning),
            TuningSystem::IndonesianSlendro => Self::indonesian_slendro(tuning),
            TuningSystem::IndonesianPelog => Self::indonesian_pelog(tuning),
        }?;
        debug!("generated {:?} with {} notes", system, scale.len());
        Ok(scale)
    }

    /// Divide each octave into `divisions_per_octave` equal steps.
    /// Produces `divisions_per_octave * num_octaves` notes, starting at the base frequency
    /// and stopping one step short of the final octave.
    pub fn equal_temperament(
        tuning: Tuning,
        divisions_per_octave: u32,
        num_octaves: u32,
    ) -> Result<Scale, ScaleError> {
        ensure!(
            divisions_per_octave > 0,
            InvalidParameter {
                name: "divisions_per_octave",
                reason: "must be positive",
            }
        );
        ensure!(
            num_octaves > 0,
            InvalidParameter {
                name: "num_octaves",
                reason: "must be positive",
            }
        );
        let count = divisions_per_octave
            .checked_mul(num_octaves)
            .filter(|count| *count <= MAX_NOTES)
            .ok_or(ScaleError::InvalidParameter {
                name: "divisions_per_octave",
                reason: "too many notes",
            })?;

        let divisions = divisions_per_octave as f64;
        let frequencies = (0..count).map(|i| {
            let frequency = tuning.base_frequency * util::from_octaves(i as f64 / divisions);
            (frequency, None)
        });
        Self::from_frequencies(tuning, frequencies)
    }

    /// The first `num_harmonics` partials of the base frequency.
    ///
    /// ```
    /// use microtonal::scale::*;
    ///
    /// let scale = Scale::harmonic_series(Default::default(), 4).unwrap();
    /// assert_eq!(scale.frequencies(), vec![440.0, 880.0, 1320.0, 1760.0]);
    /// assert_eq!(scale.notes()[2].name(), Some("h3"));
    /// ```
    pub fn harmonic_series(tuning: Tuning, num_harmonics: u32) -> Result<Scale, ScaleError> {
        ensure!(
            num_harmonics > 0,
            InvalidParameter {
                name: "num_harmonics",
                reason: "must be positive",
            }
        );
        ensure!(
            num_harmonics <= MAX_NOTES,
            InvalidParameter {
                name: "num_harmonics",
                reason: "too many notes",
            }
        );
        let frequencies = (1..=num_harmonics).map(|i| {
            let frequency = tuning.base_frequency * i as f64;
            (frequency, Some(format!("h{}", i)))
        });
        Self::from_frequencies(tuning, frequencies)
    }

    /// Multiply the base frequency by each ratio, keeping the given order.
    pub fn custom_ratios(tuning: Tuning, ratios: &[f64]) -> Result<Scale, ScaleError> {
        ensure!(
            !ratios.is_empty(),
            InvalidParameter {
                name: "ratios",
                reason: "must not be empty",
            }
        );
        ensure!(
            ratios.iter().all(|r| r.is_finite() && *r > 0.0),
            InvalidParameter {
                name: "ratios",
                reason: "must all be positive",
            }
        );
        let frequencies = ratios
            .iter()
            .map(|ratio| (tuning.base_frequency * ratio, None));
        Self::from_frequencies(tuning, frequencies)
    }

    /// Place a note at each of the given offsets in cents above the base frequency.
    ///
    /// ```
    /// use microtonal::scale::*;
    ///
    /// let scale = Scale::cents(Default::default(), &[0.0, 1200.0]).unwrap();
    /// assert_eq!(scale.frequencies(), vec![440.0, 880.0]);
    /// assert_eq!(scale.notes()[1].name(), Some("1200c"));
    /// ```
    pub fn cents(tuning: Tuning, cents: &[f64]) -> Result<Scale, ScaleError> {
        ensure!(
            !cents.is_empty(),
            InvalidParameter {
                name: "cents",
                reason: "must not be empty",
            }
        );
        ensure!(
            cents.iter().all(|c| c.is_finite()),
            InvalidParameter {
                name: "cents",
                reason: "must all be finite",
            }
        );
        let frequencies = cents.iter().map(|c| {
            let frequency = tuning.base_frequency * util::from_cents(*c);
            (frequency, Some(format!("{}c", c)))
        });
        Self::from_frequencies(tuning, frequencies)
    }

    /// The Arabic Rast scale in just intonation: 1/1, 9/8, 5/4, 4/3, 3/2, 5/3, 15/8, 2/1.
    ///
    /// ```
    /// use microtonal::scale::*;
    ///
    /// let rast = Scale::arabic_rast(Default::default()).unwrap();
    /// assert_eq!(rast.len(), 8);
    /// assert_eq!(rast.notes()[1].frequency(), 495.0);
    /// assert_eq!(rast.notes()[1].name(), Some("9/8"));
    /// ```
    pub fn arabic_rast(tuning: Tuning) -> Result<Scale, ScaleError> {
        Self::just(tuning, &ARABIC_RAST)
    }

    /// The 22-tone shruti scale, given in cents between 0 and 1110.
    pub fn indian_shruti(tuning: Tuning) -> Result<Scale, ScaleError> {
        Self::cents(tuning, &INDIAN_SHRUTI_CENTS)
    }

    /// Slendro, approximated as 1/1, 9/8, 5/4, 11/8, 3/2, 2/1.
    pub fn indonesian_slendro(tuning: Tuning) -> Result<Scale, ScaleError> {
        Self::just(tuning, &INDONESIAN_SLENDRO)
    }

    /// Pelog, approximated as 1/1, 9/8, 5/4, 4/3, 3/2, 13/8, 7/4, 2/1.
    pub fn indonesian_pelog(tuning: Tuning) -> Result<Scale, ScaleError> {
        Self::just(tuning, &INDONESIAN_PELOG)
    }

    fn just(tuning: Tuning, intervals: &[Rational]) -> Result<Scale, ScaleError> {
        let frequencies = intervals.iter().map(|interval| {
            let frequency = tuning.base_frequency * interval.as_f64();
            (frequency, Some(interval.to_string()))
        });
        Self::from_frequencies(tuning, frequencies)
    }

    fn from_frequencies<I>(tuning: Tuning, frequencies: I) -> Result<Scale, ScaleError>
    where
        I: IntoIterator<Item = (f64, Option<String>)>,
    {
        ensure!(
            tuning.base_frequency.is_finite() && tuning.base_frequency > 0.0,
            InvalidParameter {
                name: "base_frequency",
                reason: "must be a positive number of Hz",
            }
        );
        let notes = frequencies
            .into_iter()
            .map(|(frequency, name)| Note::new(&tuning, frequency, name))
            .collect();
        Ok(Scale { tuning, notes })
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn base_frequency(&self) -> f64 {
        self.tuning.base_frequency
    }

    pub fn base_midi_note(&self) -> i32 {
        self.tuning.base_midi_note
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Note> {
        self.notes.iter()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn frequencies(&self) -> Vec<f64> {
        self.notes.iter().map(Note::frequency).collect()
    }
}

impl<'a> IntoIterator for &'a Scale {
    type Item = &'a Note;
    type IntoIter = std::slice::Iter<'a, Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 0.01, "{} != {}", a, e);
        }
    }

    #[test]
    fn equal_temperament_spans_one_octave() {
        for d in 1..=72 {
            let scale = Scale::equal_temperament(Tuning::default(), d, 1).unwrap();
            assert_eq!(scale.len(), d as usize);
            assert_eq!(scale.notes()[0].frequency(), 440.0);
            let last = scale.notes()[d as usize - 1].frequency();
            let expected = 440.0 * 2.0f64.powf((d - 1) as f64 / d as f64);
            assert!((last - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn equal_temperament_multiple_octaves() {
        let scale = Scale::equal_temperament(Tuning::default(), 24, 3).unwrap();
        assert_eq!(scale.len(), 72);
        assert!((scale.notes()[48].frequency() - 1760.0).abs() < 1e-9);
        assert_eq!(scale.notes()[48].midi_note(), 93);
    }

    #[test]
    fn every_note_round_trips_through_conversion() {
        let tuning = Tuning::new(415.3, 68);
        let systems = vec![
            TuningSystem::EqualTemperament {
                divisions_per_octave: 53,
                num_octaves: 2,
            },
            TuningSystem::HarmonicSeries { num_harmonics: 16 },
            TuningSystem::CustomRatios(vec![1.0, 1.25, 1.333, 1.5, 1.667, 2.0]),
            TuningSystem::ArabicRast,
            TuningSystem::IndianShruti,
            TuningSystem::IndonesianSlendro,
            TuningSystem::IndonesianPelog,
        ];
        for system in systems.iter() {
            let scale = Scale::generate(tuning, system).unwrap();
            assert!(!scale.is_empty());
            for note in scale.iter() {
                assert_eq!(note.midi_note(), tuning.midi_note(note.frequency()));
            }
        }
    }

    #[test]
    fn harmonic_series_is_increasing() {
        let scale = Scale::harmonic_series(Tuning::default(), 16).unwrap();
        let freqs = scale.frequencies();
        assert_eq!(freqs.len(), 16);
        for (i, f) in freqs.iter().enumerate() {
            assert_eq!(*f, 440.0 * (i + 1) as f64);
        }
        assert!(freqs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn arabic_rast_frequencies() {
        let scale = Scale::arabic_rast(Tuning::default()).unwrap();
        assert_close(
            &scale.frequencies(),
            &[440.0, 495.0, 550.0, 586.67, 660.0, 733.33, 825.0, 880.0],
        );
    }

    #[test]
    fn fixed_scales_sizes() {
        let tuning = Tuning::default();
        assert_eq!(Scale::indian_shruti(tuning).unwrap().len(), 22);
        assert_eq!(Scale::indonesian_slendro(tuning).unwrap().len(), 6);
        assert_eq!(Scale::indonesian_pelog(tuning).unwrap().len(), 8);

        let shruti = Scale::indian_shruti(tuning).unwrap();
        let last = shruti.notes()[21].frequency();
        assert!((last - 440.0 * 2.0f64.powf(1110.0 / 1200.0)).abs() < 1e-9);
        assert_eq!(shruti.notes()[13].name(), Some("702c"));
    }

    #[test]
    fn custom_ratios_keep_input_order() {
        let scale = Scale::custom_ratios(Tuning::default(), &[2.0, 1.0, 1.5]).unwrap();
        assert_eq!(scale.frequencies(), vec![880.0, 440.0, 660.0]);
        assert_eq!(scale.notes()[0].midi_note(), 81);
        assert_eq!(scale.notes()[0].name(), None);
    }

    #[test]
    fn rejects_degenerate_parameters() {
        let tuning = Tuning::default();
        let invalid = |name| ScaleError::InvalidParameter {
            name,
            reason: "must be positive",
        };
        assert_eq!(
            Scale::equal_temperament(tuning, 0, 1),
            Err(invalid("divisions_per_octave"))
        );
        assert_eq!(
            Scale::equal_temperament(tuning, 12, 0),
            Err(invalid("num_octaves"))
        );
        assert_eq!(
            Scale::harmonic_series(tuning, 0),
            Err(invalid("num_harmonics"))
        );
        assert!(matches!(
            Scale::custom_ratios(tuning, &[]),
            Err(ScaleError::InvalidParameter { name: "ratios", .. })
        ));
        assert!(matches!(
            Scale::custom_ratios(tuning, &[1.0, -0.5]),
            Err(ScaleError::InvalidParameter { name: "ratios", .. })
        ));
        assert!(matches!(
            Scale::cents(tuning, &[]),
            Err(ScaleError::InvalidParameter { name: "cents", .. })
        ));
        assert!(matches!(
            Scale::cents(tuning, &[0.0, f64::NAN]),
            Err(ScaleError::InvalidParameter { name: "cents", .. })
        ));
        assert!(matches!(
            Scale::custom_ratios(tuning, &[1.0, f64::INFINITY]),
            Err(ScaleError::InvalidParameter { name: "ratios", .. })
        ));
        assert!(matches!(
            Scale::equal_temperament(Tuning::new(f64::NAN, 69), 12, 1),
            Err(ScaleError::InvalidParameter {
                name: "base_frequency",
                ..
            })
        ));
        assert!(matches!(
            Scale::arabic_rast(Tuning::new(0.0, 69)),
            Err(ScaleError::InvalidParameter {
                name: "base_frequency",
                ..
            })
        ));
    }

    #[test]
    fn rejects_oversized_scales() {
        let tuning = Tuning::default();
        let too_many = ScaleError::InvalidParameter {
            name: "divisions_per_octave",
            reason: "too many notes",
        };
        assert_eq!(
            Scale::equal_temperament(tuning, u32::MAX, 2),
            Err(too_many.clone())
        );
        assert_eq!(
            Scale::equal_temperament(tuning, 4_000_000_000, 1),
            Err(too_many)
        );
        assert_eq!(
            Scale::harmonic_series(tuning, MAX_NOTES + 1),
            Err(ScaleError::InvalidParameter {
                name: "num_harmonics",
                reason: "too many notes",
            })
        );
        assert_eq!(
            Scale::equal_temperament(tuning, MAX_NOTES, 1).map(|s| s.len()),
            Ok(MAX_NOTES as usize)
        );
    }

    #[test]
    fn generation_builds_independent_scales() {
        let a = Scale::generate(Tuning::default(), &TuningSystem::ArabicRast).unwrap();
        let b = Scale::generate(Tuning::new(220.0, 57), &TuningSystem::ArabicRast).unwrap();
        assert_eq!(a.len(), b.len());
        assert_eq!(a.notes()[0].frequency(), 440.0);
        assert_eq!(b.notes()[0].frequency(), 220.0);
        assert_eq!(b.notes()[0].midi_note(), 57);
        assert_eq!(b.base_midi_note(), 57);
    }
}
