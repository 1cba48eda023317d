use std::io::{self, Read};

use log::warn;
use thiserror::Error;

const WORD_BYTES: usize = 2;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image is too short to hold an origin")]
    MissingOrigin,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A program image: a load origin followed by the words stored from there on.
/// On disk every word is big-endian and the origin is the first word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub origin: u16,
    pub words: Vec<u16>,
}

impl Image {
    pub fn new(origin: u16, words: Vec<u16>) -> Self {
        Image{origin, words}
    }

    pub fn read(mut input: impl Read) -> Result<Self, ImageError> {
        let mut bytes = vec![];
        input.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        let chunks = bytes.chunks_exact(WORD_BYTES);
        if !chunks.remainder().is_empty() {
            warn!("Image: ignoring trailing byte {:#04x}", chunks.remainder()[0]);
        }

        let mut words = chunks.map(|w| u16::from_be_bytes([w[0], w[1]]));
        let origin = words.next().ok_or(ImageError::MissingOrigin)?;
        Ok(Image{origin, words: words.collect()})
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        std::iter::once(self.origin)
            .chain(self.words.iter().copied())
            .flat_map(u16::to_be_bytes)
            .collect()
    }

    // (address, word) pairs, wrapping past the top of memory.
    pub fn placed(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.words.iter()
            .enumerate()
            .map(|(i, word)| (self.origin.wrapping_add(i as u16), *word))
    }
}
