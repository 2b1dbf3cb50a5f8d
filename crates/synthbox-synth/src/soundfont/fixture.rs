//! Minimal SoundFont 2 file for tests.
//!
//! One looping square-wave sample, one instrument, two presets on bank 0:
//! [`PROGRAM_LOUD`] plays it as is, [`PROGRAM_QUIET`] adds the maximum
//! initial attenuation. Uses only std so integration tests can include it.

#![allow(dead_code)]

use std::io::Write;

pub const PROGRAM_LOUD: i32 = 0;
pub const PROGRAM_QUIET: i32 = 1;

const SAMPLE_FRAMES: u32 = 100;
const SAMPLE_PADDING: u32 = 100;
const LOOP_START: u32 = 10;
const LOOP_END: u32 = 90;

const GEN_INSTRUMENT: u16 = 41;
const GEN_INITIAL_ATTENUATION: u16 = 48;
const GEN_SAMPLE_ID: u16 = 53;
const GEN_SAMPLE_MODES: u16 = 54;

fn chunk(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 8);
    out.extend_from_slice(id);
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(body);
    out
}

fn list(kind: &[u8; 4], chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut body = kind.to_vec();
    for c in chunks {
        body.extend_from_slice(c);
    }
    chunk(b"LIST", &body)
}

fn name(s: &str) -> [u8; 20] {
    let mut out = [0u8; 20];
    out[..s.len()].copy_from_slice(s.as_bytes());
    out
}

fn preset_header(label: &str, program: u16, bag: u16) -> Vec<u8> {
    let mut out = name(label).to_vec();
    out.extend_from_slice(&program.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes()); // bank
    out.extend_from_slice(&bag.to_le_bytes());
    out.extend_from_slice(&[0u8; 12]); // library, genre, morphology
    out
}

fn bag(generator: u16) -> Vec<u8> {
    let mut out = generator.to_le_bytes().to_vec();
    out.extend_from_slice(&0u16.to_le_bytes());
    out
}

fn generator(kind: u16, amount: u16) -> Vec<u8> {
    let mut out = kind.to_le_bytes().to_vec();
    out.extend_from_slice(&amount.to_le_bytes());
    out
}

fn instrument_header(label: &str, bag: u16) -> Vec<u8> {
    let mut out = name(label).to_vec();
    out.extend_from_slice(&bag.to_le_bytes());
    out
}

fn sample_header(label: &str, end: u32, loop_start: u32, loop_end: u32, kind: u16) -> Vec<u8> {
    let mut out = name(label).to_vec();
    for value in [0, end, loop_start, loop_end, 44100u32] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.push(60); // original pitch
    out.push(0); // pitch correction
    out.extend_from_slice(&0u16.to_le_bytes()); // sample link
    out.extend_from_slice(&kind.to_le_bytes());
    out
}

/// The complete `.sf2` file.
pub fn soundfont_bytes() -> Vec<u8> {
    let info = list(b"INFO", &[chunk(b"ifil", &[2, 0, 1, 0])]);

    // 20-frame square wave followed by the zero padding SF2 requires
    let mut samples = Vec::new();
    for i in 0..SAMPLE_FRAMES + SAMPLE_PADDING {
        let value: i16 = match i {
            i if i >= SAMPLE_FRAMES => 0,
            i if (i / 10) % 2 == 0 => 16000,
            _ => -16000,
        };
        samples.extend_from_slice(&value.to_le_bytes());
    }
    let sdta = list(b"sdta", &[chunk(b"smpl", &samples)]);

    let phdr = [
        preset_header("Loud", PROGRAM_LOUD as u16, 0),
        preset_header("Quiet", PROGRAM_QUIET as u16, 1),
        preset_header("EOP", 0, 2),
    ]
    .concat();
    let pbag = [bag(0), bag(1), bag(3)].concat();
    let pgen = [
        generator(GEN_INSTRUMENT, 0),
        generator(GEN_INITIAL_ATTENUATION, 1440),
        generator(GEN_INSTRUMENT, 0),
        generator(0, 0),
    ]
    .concat();
    let inst = [instrument_header("Square", 0), instrument_header("EOI", 1)].concat();
    let ibag = [bag(0), bag(2)].concat();
    let igen = [
        generator(GEN_SAMPLE_MODES, 1),
        generator(GEN_SAMPLE_ID, 0),
        generator(0, 0),
    ]
    .concat();
    let shdr = [
        sample_header("Square", SAMPLE_FRAMES, LOOP_START, LOOP_END, 1),
        sample_header("EOS", 0, 0, 0, 0),
    ]
    .concat();

    let pdta = list(
        b"pdta",
        &[
            chunk(b"phdr", &phdr),
            chunk(b"pbag", &pbag),
            chunk(b"pmod", &[0u8; 10]),
            chunk(b"pgen", &pgen),
            chunk(b"inst", &inst),
            chunk(b"ibag", &ibag),
            chunk(b"imod", &[0u8; 10]),
            chunk(b"igen", &igen),
            chunk(b"shdr", &shdr),
        ],
    );

    let mut body = b"sfbk".to_vec();
    body.extend_from_slice(&info);
    body.extend_from_slice(&sdta);
    body.extend_from_slice(&pdta);
    chunk(b"RIFF", &body)
}

/// Write the SoundFont to a temporary `.sf2` file, removed on drop.
pub fn write_soundfont() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".sf2")
        .tempfile()
        .expect("create temporary SoundFont");
    file.write_all(&soundfont_bytes())
        .expect("write temporary SoundFont");
    file.flush().expect("flush temporary SoundFont");
    file
}

/// Root mean square of a block.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}
