// microtonal -- scales beyond twelve tones, rendered as audio and MIDI
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Sending notes to external MIDI devices.
//!
//! The synthesizer only talks to the [`MidiDevice`] and [`MidiSink`] traits.
//! [`MidirDevice`] implements them on top of the system MIDI output ports.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};
use midir::{MidiOutput, MidiOutputConnection};
use midly::num::{u15, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use snafu::{ensure, ResultExt, Snafu};

use crate::scale::Scale;

/// Velocity used for all notes played by the synthesizer.
pub const DEFAULT_VELOCITY: u8 = 64;
/// Channel used for all notes played by the synthesizer.
pub const DEFAULT_CHANNEL: u8 = 0;
/// Resolution of written MIDI files.
pub const TICKS_PER_BEAT: u16 = 480;

/// Beats per second at the default MIDI file tempo of 120 bpm.
const BEATS_PER_SECOND: f64 = 2.0;
/// Largest delta time a MIDI file event can carry.
const MAX_DELTA: u32 = (1 << 28) - 1;

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const CONTROL_CHANGE: u8 = 0xB0;

#[derive(Debug, Snafu)]
pub enum MidiError {
    #[snafu(display("MIDI output unavailable: {}", reason))]
    MidiUnavailable { reason: String },
    #[snafu(display("Could not send MIDI message: {}", source))]
    SendMessage { source: midir::SendError },
    #[snafu(display("MIDI {} out of range: {}", what, value))]
    InvalidMessage { what: &'static str, value: u8 },
    #[snafu(display("Cannot express {} seconds in a MIDI file", seconds))]
    InvalidTiming { seconds: f64 },
    #[snafu(display("Could not write MIDI file {}: {}", path.display(), source))]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// An open MIDI output accepting channel messages.
pub trait MidiSink {
    /// Send a raw MIDI message.
    fn send(&mut self, message: &[u8]) -> Result<(), MidiError>;

    /// Release the underlying port.
    fn close(self);

    fn send_note_on(&mut self, note: u8, velocity: u8, channel: u8) -> Result<(), MidiError> {
        let message = channel_message(NOTE_ON, channel, note, velocity)?;
        self.send(&message)
    }

    fn send_note_off(&mut self, note: u8, velocity: u8, channel: u8) -> Result<(), MidiError> {
        let message = channel_message(NOTE_OFF, channel, note, velocity)?;
        self.send(&message)
    }

    fn send_control_change(&mut self, control: u8, value: u8, channel: u8) -> Result<(), MidiError> {
        let message = channel_message(CONTROL_CHANGE, channel, control, value)?;
        self.send(&message)
    }
}

/// Something MIDI sinks can be opened on.
pub trait MidiDevice {
    type Sink: MidiSink;

    /// Open the port with the given name, or the default port if `None`.
    /// Fails with [`MidiError::MidiUnavailable`] when no such port exists.
    fn open(&mut self, port: Option<&str>) -> Result<Self::Sink, MidiError>;
}

/// Build a three byte channel voice message.
///
/// # Examples
///
/// ```
/// use microtonal::midi::*;
///
/// assert_eq!(channel_message(0x90, 0, 69, 64).unwrap(), [0x90, 69, 64]);
/// assert_eq!(channel_message(0x80, 15, 60, 0).unwrap(), [0x8F, 60, 0]);
/// assert!(channel_message(0x90, 16, 60, 64).is_err());
/// assert!(channel_message(0x90, 0, 128, 64).is_err());
/// ```
pub fn channel_message(status: u8, channel: u8, data1: u8, data2: u8) -> Result<[u8; 3], MidiError> {
    ensure!(
        channel < 16,
        InvalidMessage {
            what: "channel",
            value: channel
        }
    );
    ensure!(
        data1 < 128,
        InvalidMessage {
            what: "data byte",
            value: data1
        }
    );
    ensure!(
        data2 < 128,
        InvalidMessage {
            what: "data byte",
            value: data2
        }
    );
    Ok([status | channel, data1, data2])
}

/// Opens ports of the system MIDI output.
#[derive(Debug, Clone)]
pub struct MidirDevice {
    client_name: String,
}

impl MidirDevice {
    pub fn new(client_name: &str) -> Self {
        MidirDevice {
            client_name: client_name.to_string(),
        }
    }
}

impl Default for MidirDevice {
    fn default() -> Self {
        MidirDevice::new("microtonal")
    }
}

impl MidiDevice for MidirDevice {
    type Sink = MidiPort;

    fn open(&mut self, port: Option<&str>) -> Result<MidiPort, MidiError> {
        let output = MidiOutput::new(&self.client_name).map_err(|err| MidiError::MidiUnavailable {
            reason: err.to_string(),
        })?;

        let ports = output.ports();
        let selected = match port {
            Some(wanted) => ports
                .iter()
                .find(|p| output.port_name(p).map_or(false, |name| name == wanted)),
            None => ports.first(),
        }
        .cloned()
        .ok_or_else(|| MidiError::MidiUnavailable {
            reason: match port {
                Some(wanted) => format!("no output port named {:?}", wanted),
                None => "no output ports available".to_string(),
            },
        })?;

        let name = output
            .port_name(&selected)
            .unwrap_or_else(|_| "<unnamed>".to_string());
        let connection = output
            .connect(&selected, &self.client_name)
            .map_err(|err| MidiError::MidiUnavailable {
                reason: format!("could not connect to {}: {}", name, err),
            })?;
        info!("opened MIDI output port {}", name);

        Ok(MidiPort { name, connection })
    }
}

/// A connected system MIDI output port.
pub struct MidiPort {
    name: String,
    connection: MidiOutputConnection,
}

impl MidiPort {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl MidiSink for MidiPort {
    fn send(&mut self, message: &[u8]) -> Result<(), MidiError> {
        self.connection.send(message).context(SendMessage)
    }

    fn close(self) {
        info!("closing MIDI output port {}", self.name);
        self.connection.close();
    }
}

/// Names of the available MIDI output ports.
/// Returns an empty list if the MIDI system cannot be accessed.
pub fn output_ports() -> Vec<String> {
    match MidiOutput::new("microtonal") {
        Ok(output) => output
            .ports()
            .iter()
            .filter_map(|port| output.port_name(port).ok())
            .collect(),
        Err(err) => {
            warn!("cannot access MIDI output: {}", err);
            vec![]
        }
    }
}

/// Play notes one after another, holding each for `note_duration` and pausing for `gap`
/// before the next one.
pub fn play_paced<S: MidiSink>(
    sink: &mut S,
    notes: &[u8],
    note_duration: Duration,
    gap: Duration,
) -> Result<(), MidiError> {
    for note in notes.iter().copied() {
        debug!("note {} on", note);
        sink.send_note_on(note, DEFAULT_VELOCITY, DEFAULT_CHANNEL)?;
        thread::sleep(note_duration);
        sink.send_note_off(note, DEFAULT_VELOCITY, DEFAULT_CHANNEL)?;
        thread::sleep(gap);
    }
    Ok(())
}

/// The MIDI keys of the scale's notes, skipping notes outside of the MIDI range.
pub fn midi_keys(scale: &Scale) -> Vec<u8> {
    scale
        .iter()
        .filter_map(|note| {
            let key = note.midi_note();
            if (0..128).contains(&key) {
                Some(key as u8)
            } else {
                warn!("note {} outside of MIDI range, skipped", key);
                None
            }
        })
        .collect()
}

/// Delta time in ticks for a duration at the default tempo.
fn ticks(seconds: f64) -> Result<u28, MidiError> {
    let ticks = (seconds * BEATS_PER_SECOND * TICKS_PER_BEAT as f64).round();
    ensure!(
        ticks.is_finite() && ticks >= 0.0 && ticks <= MAX_DELTA as f64,
        InvalidTiming { seconds }
    );
    Ok(u28::new(ticks as u32))
}

/// A single track MIDI file playing the keys one after another.
///
/// Every note is held for `note_duration` seconds, followed by `gap` seconds of silence,
/// at the default tempo of 120 bpm.
///
/// # Examples
///
/// ```
/// use microtonal::midi::*;
///
/// let smf = sequence_file(&[69, 71], 0.5, 0.0).unwrap();
/// assert_eq!(smf.tracks.len(), 1);
/// // two note pairs and the end of the track
/// assert_eq!(smf.tracks[0].len(), 5);
/// ```
pub fn sequence_file(keys: &[u8], note_duration: f64, gap: f64) -> Result<Smf<'static>, MidiError> {
    let hold = ticks(note_duration)?;
    let pause = ticks(gap)?;
    let channel = u4::new(DEFAULT_CHANNEL);
    let vel = u7::new(DEFAULT_VELOCITY);

    let mut track = Vec::with_capacity(keys.len() * 2 + 1);
    for (i, key) in keys.iter().copied().enumerate() {
        ensure!(
            key < 128,
            InvalidMessage {
                what: "key",
                value: key
            }
        );
        let key = u7::new(key);
        track.push(TrackEvent {
            delta: if i == 0 { u28::new(0) } else { pause },
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn { key, vel },
            },
        });
        track.push(TrackEvent {
            delta: hold,
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff { key, vel },
            },
        });
    }
    track.push(TrackEvent {
        delta: pause,
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_BEAT)),
    ));
    smf.tracks.push(track);
    Ok(smf)
}

/// Write the notes of a scale to a standard MIDI file.
pub fn write_file(
    path: &Path,
    scale: &Scale,
    note_duration: f64,
    gap: f64,
) -> Result<(), MidiError> {
    let smf = sequence_file(&midi_keys(scale), note_duration, gap)?;
    smf.save(path).context(WriteFile { path })?;
    info!("wrote {} notes to {}", scale.len(), path.display());
    Ok(())
}
