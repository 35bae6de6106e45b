// microtonal -- scales beyond twelve tones, rendered as audio and MIDI
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! A catalog of example scales demonstrating different tuning systems.

use crate::scale::{Scale, ScaleError, TuningSystem};
use crate::tuning::Tuning;

/// A named scale of the catalog.
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: &'static str,
    pub scale: Scale,
    pub description: Option<&'static str>,
}

/// The example scales, in a fixed order.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<Entry>,
}

/// Name, tuning system and description of every catalog entry.
fn definitions() -> Vec<(&'static str, TuningSystem, Option<&'static str>)> {
    let edo = |divisions_per_octave| TuningSystem::EqualTemperament {
        divisions_per_octave,
        num_octaves: 1,
    };
    vec![
        ("12-TET", edo(12), None),
        ("Quarter-tone", edo(24), None),
        ("Third-tone", edo(36), None),
        (
            "Harmonic",
            TuningSystem::HarmonicSeries { num_harmonics: 16 },
            None,
        ),
        (
            "Just Intonation",
            TuningSystem::CustomRatios(vec![1.0, 1.25, 1.333, 1.5, 1.667, 2.0]),
            None,
        ),
        (
            "Arabic Rast",
            TuningSystem::ArabicRast,
            Some(
                "The Arabic Rast scale is a fundamental scale in Arabic music. \
                 It is characterized by its use of quarter tones and its unique intervallic structure.",
            ),
        ),
        (
            "Indian Shruti",
            TuningSystem::IndianShruti,
            Some(
                "The Indian Shruti scale is a 22-tone scale used in Indian classical music. \
                 It provides a more fine-grained division of the octave than Western 12-tone scales.",
            ),
        ),
        (
            "Indonesian Slendro",
            TuningSystem::IndonesianSlendro,
            Some(
                "The Indonesian Slendro is a pentatonic scale used in Javanese gamelan music. \
                 It is characterized by its roughly equidistant intervals, which differ from Western tuning.",
            ),
        ),
        (
            "Indonesian Pelog",
            TuningSystem::IndonesianPelog,
            Some(
                "The Indonesian Pelog is a seven-tone scale also used in Javanese gamelan music. \
                 It is known for its unequal intervals and its contrast with the Slendro scale.",
            ),
        ),
    ]
}

/// Build the example scales around concert pitch (A4 = 440 Hz).
///
/// Every call returns freshly generated scales.
///
/// # Examples
///
/// ```
/// use microtonal::catalog;
///
/// let catalog = catalog::example_scales();
/// assert_eq!(catalog.len(), 9);
/// assert_eq!(catalog.get("Quarter-tone").unwrap().len(), 24);
/// assert_eq!(catalog.get("indonesian slendro").unwrap().len(), 6);
/// ```
pub fn example_scales() -> Catalog {
    example_scales_at(Tuning::default()).expect("built-in scales are valid")
}

/// Build the example scales around an arbitrary reference pitch.
pub fn example_scales_at(tuning: Tuning) -> Result<Catalog, ScaleError> {
    let entries = definitions()
        .into_iter()
        .map(|(name, system, description)| {
            Ok(Entry {
                name,
                scale: Scale::generate(tuning, &system)?,
                description,
            })
        })
        .collect::<Result<Vec<_>, ScaleError>>()?;
    Ok(Catalog { entries })
}

impl Catalog {
    /// Look up a scale by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&Scale> {
        self.entry(name).map(|entry| &entry.scale)
    }

    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_scales(self) -> Vec<(&'static str, Scale)> {
        self.entries
            .into_iter()
            .map(|entry| (entry.name, entry.scale))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn catalog_order_and_sizes() {
        let catalog = example_scales();
        let names: Vec<_> = catalog.names().collect();
        assert_eq!(
            names,
            vec![
                "12-TET",
                "Quarter-tone",
                "Third-tone",
                "Harmonic",
                "Just Intonation",
                "Arabic Rast",
                "Indian Shruti",
                "Indonesian Slendro",
                "Indonesian Pelog",
            ]
        );
        let sizes: Vec<_> = catalog.iter().map(|entry| entry.scale.len()).collect();
        assert_eq!(sizes, vec![12, 24, 36, 16, 6, 8, 22, 6, 8]);
    }

    #[test]
    fn every_definition_builds() {
        for (name, system, _) in definitions() {
            let scale = Scale::generate(Tuning::default(), &system);
            assert!(scale.map_or(false, |s| !s.is_empty()), "{} failed", name);
        }
        assert_eq!(example_scales().len(), definitions().len());
    }

    #[test]
    fn descriptions_only_for_traditional_scales() {
        let catalog = example_scales();
        assert!(catalog.entry("12-TET").unwrap().description.is_none());
        assert!(catalog.entry("Indian Shruti").unwrap().description.is_some());
        assert!(catalog.entry("Bohlen-Pierce").is_none());
    }

    #[test]
    fn calls_are_independent() {
        let a = example_scales().into_scales();
        let b = example_scales_at(Tuning::new(220.0, 57))
            .unwrap()
            .into_scales();
        assert_eq!(a.len(), b.len());
        for ((name_a, scale_a), (name_b, scale_b)) in a.iter().zip(b.iter()) {
            assert_eq!(name_a, name_b);
            assert_eq!(scale_a.len(), scale_b.len());
            assert_eq!(scale_a.notes()[0].frequency(), 440.0);
            assert_eq!(scale_b.notes()[0].frequency(), 220.0);
        }
        assert_eq!(example_scales().into_scales(), a);
    }

    #[test]
    fn just_intonation_ratios() {
        let catalog = example_scales();
        let just = catalog.get("Just Intonation").unwrap();
        let freqs = just.frequencies();
        assert!((freqs[2] - 586.52).abs() < 1e-9);
        assert_eq!(freqs[5], 880.0);
    }
}
