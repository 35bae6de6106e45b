// microtonal -- scales beyond twelve tones, rendered as audio and MIDI
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! This namespace contains all the parts converting from scales to wave data or MIDI events.

pub mod oscillator;

use std::convert::TryFrom;

use log::{debug, info, warn};
use snafu::{ensure, Snafu};

use crate::midi::{MidiDevice, MidiError, MidiSink, MidirDevice, DEFAULT_CHANNEL, DEFAULT_VELOCITY};
use crate::scale::Scale;
use crate::wave::{SamplerInfo, Waveform};
use oscillator::Oscillator;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum SynthError {
    #[snafu(display("Invalid parameter `{}`: {}", name, reason))]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
}

/// Longest buffer `render` produces, in seconds.
pub const MAX_RENDER_SECONDS: f64 = 3600.0;

/// Where a scale is played to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Render the scale into a sample buffer.
    Audio,
    /// Send the notes to a MIDI port, the default port if `port` is `None`.
    Midi { port: Option<String> },
}

/// How a scale is played.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayOptions {
    /// Length of every note in seconds.
    pub note_duration: f64,
    /// Silence after every note in seconds.
    pub gap: f64,
    pub waveform: Waveform,
    pub output: Output,
}

impl Default for PlayOptions {
    fn default() -> Self {
        PlayOptions {
            note_duration: 0.5,
            gap: 0.1,
            waveform: Waveform::Sine,
            output: Output::Audio,
        }
    }
}

/// The MIDI sink currently held open, along with the port it was opened for.
struct OpenSink<S> {
    port: Option<String>,
    sink: S,
}

/// Plays scales one note at a time, either as audio samples or as MIDI notes.
///
/// At most one MIDI sink is open at a time. It is opened on the first MIDI playback,
/// kept for subsequent ones on the same port, and closed when switching to audio
/// playback, switching ports, calling [`Synthesizer::close_midi`] or dropping the synthesizer.
pub struct Synthesizer<D: MidiDevice = MidirDevice> {
    info: SamplerInfo,
    device: D,
    midi: Option<OpenSink<D::Sink>>,
}

impl Synthesizer<MidirDevice> {
    pub fn new(sample_rate: u32) -> Self {
        Synthesizer::with_device(sample_rate, MidirDevice::default())
    }
}

impl Default for Synthesizer<MidirDevice> {
    fn default() -> Self {
        Synthesizer::new(SamplerInfo::default().sample_rate)
    }
}

impl<D: MidiDevice> Synthesizer<D> {
    pub fn with_device(sample_rate: u32, device: D) -> Self {
        Synthesizer {
            info: SamplerInfo { sample_rate },
            device,
            midi: None,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.info.sample_rate
    }

    /// A single note of `duration` seconds.
    pub fn tone(&self, frequency: f64, duration: f64, waveform: Waveform) -> Vec<f64> {
        Oscillator::new(waveform, frequency).render(duration, self.info)
    }

    /// Render all notes of the scale in order, each followed by `options.gap` seconds of silence.
    ///
    /// # Examples
    ///
    /// ```
    /// use microtonal::scale::Scale;
    /// use microtonal::synth::*;
    ///
    /// let synth = Synthesizer::new(44100);
    /// let scale = Scale::indonesian_slendro(Default::default()).unwrap();
    /// let audio = synth.render(&scale, &PlayOptions::default()).unwrap();
    /// assert_eq!(audio.len(), 6 * (22050 + 4410));
    /// ```
    pub fn render(&self, scale: &Scale, options: &PlayOptions) -> Result<Vec<f64>, SynthError> {
        ensure!(
            self.info.sample_rate > 0,
            InvalidParameter {
                name: "sample_rate",
                reason: "must be positive",
            }
        );
        ensure!(
            options.note_duration.is_finite() && options.note_duration > 0.0,
            InvalidParameter {
                name: "note_duration",
                reason: "must be a positive number of seconds",
            }
        );
        ensure!(
            options.note_duration <= MAX_RENDER_SECONDS,
            InvalidParameter {
                name: "note_duration",
                reason: "too long",
            }
        );
        ensure!(
            options.gap.is_finite() && options.gap >= 0.0,
            InvalidParameter {
                name: "gap",
                reason: "must not be negative",
            }
        );
        ensure!(
            options.gap <= MAX_RENDER_SECONDS,
            InvalidParameter {
                name: "gap",
                reason: "too long",
            }
        );

        let note_samples = self.info.samples(options.note_duration);
        let gap_samples = self.info.samples(options.gap);
        let max_samples = self.info.samples(MAX_RENDER_SECONDS);
        let total_samples = note_samples
            .checked_add(gap_samples)
            .and_then(|per_note| per_note.checked_mul(scale.len()))
            .filter(|total| *total <= max_samples)
            .ok_or(SynthError::InvalidParameter {
                name: "note_duration",
                reason: "rendered scale too long",
            })?;
        let mut audio = Vec::with_capacity(total_samples);
        for note in scale {
            audio.extend(self.tone(note.frequency(), options.note_duration, options.waveform));
            audio.resize(audio.len() + gap_samples, 0.0);
        }
        debug!(
            "rendered {} notes as {} samples ({:.2} seconds)",
            scale.len(),
            audio.len(),
            audio.len() as f64 / self.info.sample_rate as f64
        );
        Ok(audio)
    }

    /// Play a scale to the configured output.
    ///
    /// Returns the rendered samples for audio output, and `None` for MIDI output.
    /// An unavailable MIDI port is logged and playback degrades to a no-op.
    pub fn play_scale(
        &mut self,
        scale: &Scale,
        options: &PlayOptions,
    ) -> Result<Option<Vec<f64>>, SynthError> {
        match &options.output {
            Output::Audio => {
                self.close_midi();
                self.render(scale, options).map(Some)
            }
            Output::Midi { port } => {
                if let Err(err) = self.play_midi(scale, port.as_deref()) {
                    warn!("MIDI playback disabled: {}", err);
                }
                Ok(None)
            }
        }
    }

    /// Send a note-on immediately followed by a note-off for every note of the scale.
    ///
    /// Timing between the notes is left to the receiving device.
    /// Fails only if no sink could be opened; notes outside of the MIDI range
    /// and failed sends are logged and skipped. Returns the number of notes sent.
    pub fn play_midi(&mut self, scale: &Scale, port: Option<&str>) -> Result<usize, MidiError> {
        let sink = self.open_midi(port)?;
        let mut sent = 0;
        for note in scale {
            let key = match u8::try_from(note.midi_note()) {
                Ok(key) if key < 128 => key,
                _ => {
                    warn!("note {} outside of MIDI range, skipped", note.midi_note());
                    continue;
                }
            };
            let result = sink
                .send_note_on(key, DEFAULT_VELOCITY, DEFAULT_CHANNEL)
                .and_then(|_| sink.send_note_off(key, DEFAULT_VELOCITY, DEFAULT_CHANNEL));
            match result {
                Ok(()) => sent += 1,
                Err(err) => warn!("note {} not sent: {}", key, err),
            }
        }
        debug!("sent {} of {} notes via MIDI", sent, scale.len());
        Ok(sent)
    }

    /// Open a sink on the given port unless one is already open on it.
    fn open_midi(&mut self, port: Option<&str>) -> Result<&mut D::Sink, MidiError> {
        let open = match self.midi.take() {
            Some(open) if open.port.as_deref() == port => open,
            stale => {
                if let Some(stale) = stale {
                    info!("switching MIDI port");
                    stale.sink.close();
                }
                OpenSink {
                    port: port.map(str::to_string),
                    sink: self.device.open(port)?,
                }
            }
        };
        Ok(&mut self.midi.insert(open).sink)
    }

    pub fn is_midi_open(&self) -> bool {
        self.midi.is_some()
    }

    /// Close the MIDI sink, if one is open.
    pub fn close_midi(&mut self) {
        if let Some(open) = self.midi.take() {
            open.sink.close();
        }
    }
}

impl<D: MidiDevice> Drop for Synthesizer<D> {
    fn drop(&mut self) {
        self.close_midi();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::midi::testing::*;
    use crate::tuning::Tuning;

    fn midi_output(port: Option<&str>) -> PlayOptions {
        PlayOptions {
            output: Output::Midi {
                port: port.map(str::to_string),
            },
            ..Default::default()
        }
    }

    #[test]
    fn buffer_length_law() {
        let synth = Synthesizer::with_device(44100, RecordingDevice::default());
        let scale = Scale::equal_temperament(Tuning::default(), 12, 1).unwrap();
        for waveform in Waveform::ALL.iter() {
            let options = PlayOptions {
                waveform: *waveform,
                ..Default::default()
            };
            let audio = synth.render(&scale, &options).unwrap();
            assert_eq!(audio.len(), 12 * (22050 + 4410));
        }
    }

    #[test]
    fn notes_are_followed_by_silence() {
        let synth = Synthesizer::with_device(1000, RecordingDevice::default());
        let scale = Scale::custom_ratios(Tuning::new(100.0, 45), &[1.0, 2.0]).unwrap();
        let options = PlayOptions {
            note_duration: 0.25,
            waveform: Waveform::Sawtooth,
            ..Default::default()
        };
        let audio = synth.render(&scale, &options).unwrap();
        assert_eq!(audio.len(), 2 * (250 + 100));

        let first = synth.tone(100.0, 0.25, Waveform::Sawtooth);
        let second = synth.tone(200.0, 0.25, Waveform::Sawtooth);
        assert_eq!(&audio[0..250], &first[..]);
        assert!(audio[250..350].iter().all(|s| *s == 0.0));
        assert_eq!(&audio[350..600], &second[..]);
        assert!(audio[600..].iter().all(|s| *s == 0.0));
    }

    #[test]
    fn rejects_invalid_timing() {
        let synth = Synthesizer::with_device(44100, RecordingDevice::default());
        let scale = Scale::arabic_rast(Tuning::default()).unwrap();
        let bad_duration = PlayOptions {
            note_duration: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            synth.render(&scale, &bad_duration),
            Err(SynthError::InvalidParameter {
                name: "note_duration",
                ..
            })
        ));
        let bad_gap = PlayOptions {
            gap: -0.1,
            ..Default::default()
        };
        assert!(synth.render(&scale, &bad_gap).is_err());
        let nan_duration = PlayOptions {
            note_duration: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            synth.render(&scale, &nan_duration),
            Err(SynthError::InvalidParameter {
                name: "note_duration",
                ..
            })
        ));

        let silent = Synthesizer::with_device(0, RecordingDevice::default());
        assert_eq!(
            silent.render(&scale, &PlayOptions::default()),
            Err(SynthError::InvalidParameter {
                name: "sample_rate",
                reason: "must be positive",
            })
        );
    }

    #[test]
    fn rejects_oversized_buffers() {
        let synth = Synthesizer::with_device(44100, RecordingDevice::default());
        let scale = Scale::arabic_rast(Tuning::default()).unwrap();
        let endless = PlayOptions {
            note_duration: 1e15,
            ..Default::default()
        };
        assert_eq!(
            synth.render(&scale, &endless),
            Err(SynthError::InvalidParameter {
                name: "note_duration",
                reason: "too long",
            })
        );
        let endless_gap = PlayOptions {
            gap: 1e15,
            ..Default::default()
        };
        assert!(synth.render(&scale, &endless_gap).is_err());

        // each note fits, the whole scale does not
        let long_notes = PlayOptions {
            note_duration: MAX_RENDER_SECONDS,
            ..Default::default()
        };
        assert_eq!(
            synth.render(&scale, &long_notes),
            Err(SynthError::InvalidParameter {
                name: "note_duration",
                reason: "rendered scale too long",
            })
        );
    }

    #[test]
    fn midi_mode_sends_note_pairs() {
        let device = RecordingDevice::default();
        let mut synth = Synthesizer::with_device(44100, device.clone());
        let scale = Scale::arabic_rast(Tuning::default()).unwrap();

        let result = synth.play_scale(&scale, &midi_output(None)).unwrap();
        assert_eq!(result, None);
        assert!(synth.is_midi_open());

        let mut expected = vec![];
        for note in scale.iter() {
            let key = note.midi_note() as u8;
            expected.push(vec![0x90, key, 64]);
            expected.push(vec![0x80, key, 64]);
        }
        assert_eq!(device.messages(), expected);
        assert_eq!(device.messages()[0], vec![0x90, 69, 64]);
    }

    #[test]
    fn midi_sink_is_reused_and_switched() {
        let device = RecordingDevice::default();
        let mut synth = Synthesizer::with_device(44100, device.clone());
        let scale = Scale::custom_ratios(Tuning::default(), &[1.0]).unwrap();

        synth.play_scale(&scale, &midi_output(None)).unwrap();
        synth.play_scale(&scale, &midi_output(None)).unwrap();
        synth.play_scale(&scale, &midi_output(Some("other"))).unwrap();
        let audio = synth.play_scale(&scale, &PlayOptions::default()).unwrap();
        assert!(audio.is_some());
        assert!(!synth.is_midi_open());

        let on = Recorded::Message(vec![0x90, 69, 64]);
        let off = Recorded::Message(vec![0x80, 69, 64]);
        assert_eq!(
            device.recorded(),
            vec![
                Recorded::Open(None),
                on.clone(),
                off.clone(),
                on.clone(),
                off.clone(),
                Recorded::Close,
                Recorded::Open(Some("other".to_string())),
                on,
                off,
                Recorded::Close,
            ]
        );
    }

    #[test]
    fn closing_without_sink_is_noop() {
        let device = RecordingDevice::default();
        let mut synth = Synthesizer::with_device(44100, device.clone());
        synth.close_midi();
        synth.close_midi();
        assert!(device.recorded().is_empty());
    }

    #[test]
    fn drop_releases_sink() {
        let device = RecordingDevice::default();
        let scale = Scale::custom_ratios(Tuning::default(), &[1.0]).unwrap();
        {
            let mut synth = Synthesizer::with_device(44100, device.clone());
            synth.play_midi(&scale, None).unwrap();
        }
        assert_eq!(device.recorded().last(), Some(&Recorded::Close));
    }

    #[test]
    fn unavailable_midi_degrades_to_noop() {
        let device = RecordingDevice {
            unavailable: true,
            ..Default::default()
        };
        let mut synth = Synthesizer::with_device(44100, device.clone());
        let scale = Scale::arabic_rast(Tuning::default()).unwrap();
        assert_eq!(synth.play_scale(&scale, &midi_output(None)), Ok(None));
        assert!(!synth.is_midi_open());
        assert!(device.recorded().is_empty());
        assert!(matches!(
            synth.play_midi(&scale, None),
            Err(MidiError::MidiUnavailable { .. })
        ));
    }

    #[test]
    fn out_of_range_notes_are_skipped() {
        let device = RecordingDevice::default();
        let mut synth = Synthesizer::with_device(44100, device.clone());
        // the 32nd harmonic of 440 Hz lies above MIDI note 127
        let scale = Scale::harmonic_series(Tuning::default(), 40).unwrap();
        let sent = synth.play_midi(&scale, None).unwrap();
        let in_range = scale.iter().filter(|n| n.midi_note() <= 127).count();
        assert!(in_range < scale.len());
        assert_eq!(sent, in_range);
        assert_eq!(device.messages().len(), 2 * in_range);
    }
}
