// microtonal -- scales beyond twelve tones, rendered as audio and MIDI
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Easy interface for getting sound to play using a sox subprocess.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;

/// Where sox sends the audio.
#[derive(Debug, Clone, Copy)]
pub enum SoxTarget<'a> {
    /// The default audio device.
    Play,
    /// A file of any sox supported format, determined by its extension.
    File(&'a Path),
}

/// Run sox, reading mono little endian `f64` samples from the stream passed to `callback`.
/// Waits for sox to finish before returning.
pub fn with_sox<R, F: FnOnce(&mut dyn io::Write) -> io::Result<R>>(
    sample_rate: u32,
    target: SoxTarget,
    callback: F,
) -> io::Result<R> {
    let mut command = match target {
        SoxTarget::Play => Command::new("play"),
        SoxTarget::File(_) => Command::new("sox"),
    };
    command
        .arg("--channels")
        .arg("1")
        .arg("--rate")
        .arg(format!("{}", sample_rate))
        .arg("--type")
        .arg("f64")
        .arg("/dev/stdin");
    if let SoxTarget::File(path) = target {
        command.arg(path);
    }
    debug!("running {:?}", command);

    let mut player = command.stdin(Stdio::piped()).spawn()?;
    let mut audio_stream = player
        .stdin
        .take()
        .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "sox stdin not captured"))?;

    let result = callback(&mut audio_stream);

    drop(audio_stream);
    let status = player.wait()?;
    if !status.success() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("sox exited with {}", status),
        ));
    }

    result
}
