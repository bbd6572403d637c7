use std::io::{self, Read, Seek};

use crate::Error;

/// Compression wrapped around a tar stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TarCompress {
    None,
    Gzip,
}

impl TarCompress {
    /// Create a decoder for this compression codec.
    pub fn decoder<R: Read>(self, reader: R) -> Result<Decoder<R>, Error> {
        match self {
            Self::None => Ok(Decoder::Passthrough(reader)),
            #[cfg(feature = "gzip")]
            Self::Gzip => Ok(Decoder::Gzip(Box::new(flate2::read::GzDecoder::new(
                reader,
            )))),
            #[cfg(not(feature = "gzip"))]
            Self::Gzip => Err(Error::UnsupportedFormat),
        }
    }
}

/// Decoder wrapper for tar decompression.
#[derive(Debug)]
pub enum Decoder<R> {
    Passthrough(R),
    #[cfg(feature = "gzip")]
    Gzip(Box<flate2::read::GzDecoder<R>>),
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Passthrough(r) => r.read(buf),
            #[cfg(feature = "gzip")]
            Self::Gzip(d) => d.read(buf),
        }
    }
}

pub fn detect_format(data: &[u8]) -> Option<TarCompress> {
    match data {
        [0x1F, 0x8B, ..] => Some(TarCompress::Gzip),
        _ if is_tar_header(data) => Some(TarCompress::None),
        _ => None,
    }
}

fn is_tar_header(data: &[u8]) -> bool {
    data.len() >= 263 && data[257..262] == *b"ustar"
}

/// Sniff the format from the first block of `reader`, then rewind it.
pub fn detect_from_reader<R: Read + Seek>(reader: &mut R) -> io::Result<Option<TarCompress>> {
    let mut header = [0u8; 512];
    let mut filled = 0;
    while filled < header.len() {
        match reader.read(&mut header[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    reader.rewind()?;
    Ok(detect_format(&header[..filled]))
}
