// microtonal -- scales beyond twelve tones, rendered as audio and MIDI
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! `microtonal` plays scales of different tuning systems, as audio or via MIDI.

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use log::{info, warn};
use structopt::StructOpt;

use microtonal::catalog;
use microtonal::midi::{self, MidiDevice, MidiSink, MidirDevice};
use microtonal::output::{self, SoxTarget};
use microtonal::rational::Rational;
use microtonal::scale::Scale;
use microtonal::synth::{Output, PlayOptions, Synthesizer};
use microtonal::tuning::Tuning;
use microtonal::wave::Waveform;

#[derive(Debug, StructOpt)]
#[structopt(name = "microtonal", about = "Playing scales beyond twelve tones")]
struct Opt {
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: usize,

    /// List the example scales and exit.
    #[structopt(long)]
    list: bool,

    /// List the MIDI output ports and exit.
    #[structopt(long)]
    list_ports: bool,

    /// Name or number of an example scale (see `--list`).
    scale: Option<String>,

    /// Divide the octave into this many equal steps instead of playing an example scale.
    #[structopt(long, conflicts_with_all = &["scale", "ratios"])]
    edo: Option<u32>,

    /// Number of octaves generated with `--edo`.
    #[structopt(long, default_value = "1")]
    octaves: u32,

    /// Comma separated frequency ratios to play instead of an example scale, e.g. `1,9/8,1.25`.
    #[structopt(long, use_delimiter = true, parse(try_from_str = parse_ratio), conflicts_with = "scale")]
    ratios: Vec<f64>,

    /// Frequency of the reference note in Hz.
    #[structopt(long, default_value = "440")]
    base_frequency: f64,

    /// MIDI note of the reference frequency.
    #[structopt(long, default_value = "69")]
    base_midi: i32,

    /// Waveform of the notes: sine, sawtooth or square.
    #[structopt(short, long, default_value = "sine")]
    waveform: Waveform,

    /// Length of every note in seconds.
    #[structopt(short, long, default_value = "0.5")]
    duration: f64,

    /// Silence after every note in seconds.
    #[structopt(long, default_value = "0.1")]
    gap: f64,

    #[structopt(long, default_value = "44100")]
    sample_rate: u32,

    /// Send the notes to a MIDI port instead of playing audio.
    #[structopt(long)]
    midi: bool,

    /// MIDI output port, the first available port if not given.
    #[structopt(long, requires = "midi")]
    port: Option<String>,

    /// Hold every MIDI note for `--duration` seconds instead of sending all notes at once.
    #[structopt(long, requires = "midi")]
    hold: bool,

    /// Output file (any sox-supported format, or a MIDI file with `--midi`).
    /// The scale is played directly if not given.
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
}

/// Accepts both fractions like `9/8` and decimals like `1.125`.
fn parse_ratio(s: &str) -> Result<f64, String> {
    s.parse::<Rational>()
        .map(Rational::as_f64)
        .or_else(|_| s.trim().parse::<f64>())
        .map_err(|_| format!("invalid ratio {:?}", s))
}

fn main() -> Result<(), Box<dyn Error>> {
    let opt = Opt::from_args();

    let level = match opt.verbose {
        0 => log::Level::Info,
        1 => log::Level::Debug,
        _ => log::Level::Trace,
    };
    simple_logger::init_with_level(level)?;

    if opt.list {
        for (i, name) in catalog::example_scales().names().enumerate() {
            println!("{}. {}", i + 1, name);
        }
        return Ok(());
    }
    if opt.list_ports {
        let ports = midi::output_ports();
        if ports.is_empty() {
            println!("No MIDI ports available");
        }
        for (i, port) in ports.iter().enumerate() {
            println!("{}. {}", i + 1, port);
        }
        return Ok(());
    }

    let tuning = Tuning::new(opt.base_frequency, opt.base_midi);
    let (name, scale, description) = select_scale(&opt, tuning)?;

    println!("{}:", name);
    for (i, note) in scale.iter().enumerate() {
        let pitch = note.pitch_name().unwrap_or_else(|| "-".to_string());
        print!(
            "Note {}: {:.2} Hz (MIDI {}, {} {:+.1}c)",
            i + 1,
            note.frequency(),
            note.midi_note(),
            pitch,
            note.cents_offset(&tuning)
        );
        match note.name() {
            Some(interval) => println!(" {}", interval),
            None => println!(),
        }
    }
    if let Some(description) = description {
        println!("\n{}", description);
    }

    if let (true, Some(path)) = (opt.midi, opt.output.as_deref()) {
        midi::write_file(path, &scale, opt.duration, opt.gap)?;
        return Ok(());
    }
    if opt.midi && opt.hold {
        return play_held(&opt, &scale);
    }

    let options = PlayOptions {
        note_duration: opt.duration,
        gap: opt.gap,
        waveform: opt.waveform,
        output: if opt.midi {
            Output::Midi {
                port: opt.port.clone(),
            }
        } else {
            Output::Audio
        },
    };
    let mut synth = Synthesizer::new(opt.sample_rate);
    if let Some(audio) = synth.play_scale(&scale, &options)? {
        let target = match opt.output.as_deref() {
            None => SoxTarget::Play,
            Some(path) => SoxTarget::File(path),
        };
        output::play(&audio, synth.sample_rate(), target)?;
    }
    synth.close_midi();
    Ok(())
}

fn select_scale(
    opt: &Opt,
    tuning: Tuning,
) -> Result<(String, Scale, Option<&'static str>), Box<dyn Error>> {
    if let Some(divisions) = opt.edo {
        let scale = Scale::equal_temperament(tuning, divisions, opt.octaves)?;
        return Ok((format!("{}-EDO", divisions), scale, None));
    }
    if !opt.ratios.is_empty() {
        let scale = Scale::custom_ratios(tuning, &opt.ratios)?;
        return Ok(("Custom ratios".to_string(), scale, None));
    }

    let catalog = catalog::example_scales_at(tuning)?;
    let wanted = opt
        .scale
        .as_deref()
        .ok_or("no scale given, pick one of `--list`, or use `--edo` or `--ratios`")?;
    let entry = match wanted.parse::<usize>() {
        Ok(number) => number.checked_sub(1).and_then(|i| catalog.iter().nth(i)),
        Err(_) => catalog.entry(wanted),
    }
    .ok_or_else(|| format!("unknown scale {:?}, see `--list`", wanted))?;
    Ok((entry.name.to_string(), entry.scale.clone(), entry.description))
}

/// Play the notes via MIDI in real time, holding each one for the note duration.
fn play_held(opt: &Opt, scale: &Scale) -> Result<(), Box<dyn Error>> {
    if !(opt.duration.is_finite() && opt.duration > 0.0 && opt.gap.is_finite() && opt.gap >= 0.0) {
        return Err("note duration must be positive and gap must not be negative".into());
    }
    let mut device = MidirDevice::default();
    let mut sink = match device.open(opt.port.as_deref()) {
        Ok(sink) => sink,
        Err(err) => {
            warn!("{}", err);
            return Ok(());
        }
    };
    info!("playing on {}", sink.name());

    let result = midi::play_paced(
        &mut sink,
        &midi::midi_keys(scale),
        Duration::from_secs_f64(opt.duration),
        Duration::from_secs_f64(opt.gap),
    );
    sink.close();
    Ok(result?)
}
