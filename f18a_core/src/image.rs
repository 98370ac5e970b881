//! Core image files: a headerless sequence of 32-bit big-endian words.
//! The first 64 words seed RAM, the next 64 seed ROM, anything further is
//! ignored. Words with bits above the 18-bit range are clipped, with a
//! diagnostic per offending word.

use crate::cpu::MAX_VAL;
use crate::memory::{RAM_WORDS, ROM_WORDS};

use nom::be_u32;
use nom::IResult;

use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("error reading image '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug)]
pub struct Image {
    pub ram: [u32; RAM_WORDS],
    pub rom: [u32; ROM_WORDS],
    /// Number of words the image actually provided (RAM + ROM).
    pub words: usize,
}

fn parse_words(input: &[u8]) -> IResult<&[u8], Vec<u32>> {
    // A trailing partial word is dropped, as the original's 4-byte-unit
    // read did.
    many0!(input, complete!(be_u32))
}

impl Image {
    pub fn load(path: &Path) -> Result<Image, ImageError> {
        let io_err = |source| ImageError::Io {
            path: path.display().to_string(),
            source,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(io_err)?;

        let image = Image::from_bytes(&bytes);
        println!(
            "loaded image from {}: 0x{:05x} words",
            path.display(),
            image.words
        );
        Ok(image)
    }

    pub fn from_bytes(bytes: &[u8]) -> Image {
        let words = match parse_words(bytes) {
            IResult::Done(_rest, words) => words,
            _ => Vec::new(),
        };

        let mut image = Image {
            ram: [0; RAM_WORDS],
            rom: [0; ROM_WORDS],
            words: words.len().min(RAM_WORDS + ROM_WORDS),
        };

        for (index, &raw) in words.iter().take(RAM_WORDS + ROM_WORDS).enumerate() {
            let mut word = raw;
            if word & !MAX_VAL != 0 {
                println!(
                    "word at 0x{:x} (0x{:x}) has high bits set! clipping to range!",
                    index, word
                );
                word &= MAX_VAL;
            }
            if index < RAM_WORDS {
                image.ram[index] = word;
            } else {
                image.rom[index - RAM_WORDS] = word;
            }
        }

        image
    }
}
