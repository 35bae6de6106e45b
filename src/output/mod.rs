// microtonal -- scales beyond twelve tones, rendered as audio and MIDI
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Getting rendered audio out of the program.

pub mod sox;

use std::io::{self, Write};

use log::info;

pub use sox::SoxTarget;

/// Copy the `f64` samples to little endian bytes.
///
/// Returns the number of samples that were actually copied.
/// Might be less than the number of input samples if the output buffer was not large enough.
///
/// ```
/// use microtonal::output::*;
///
/// let mut bytes = [0u8; 12];
/// assert_eq!(copy_f64_bytes(&[1.0, -1.0], &mut bytes), 1);
/// assert_eq!(&bytes[0..8], &1.0f64.to_le_bytes());
/// ```
pub fn copy_f64_bytes(audio: &[f64], bytes: &mut [u8]) -> usize {
    let mut processed = 0;
    for (sample, target) in audio.iter().zip(bytes.chunks_exact_mut(8)) {
        target.copy_from_slice(&sample.to_le_bytes());
        processed += 1;
    }
    processed
}

/// Play a mono buffer to completion, or write it to a file.
pub fn play(audio: &[f64], sample_rate: u32, target: SoxTarget) -> io::Result<()> {
    info!(
        "playing {} samples ({:.2} seconds) at {} Hz",
        audio.len(),
        audio.len() as f64 / sample_rate as f64,
        sample_rate
    );
    sox::with_sox(sample_rate, target, |audio_stream| {
        // 10 ms chunks at 44100 Hz
        let mut byte_buffer = vec![0u8; 441 * 8];
        for chunk in audio.chunks(441) {
            let n = copy_f64_bytes(chunk, &mut byte_buffer);
            audio_stream.write_all(&byte_buffer[..n * 8])?;
        }
        audio_stream.flush()
    })
}
