use std::io::{self, Read};

use flate2::read::DeflateDecoder;
use flate2::Crc;

use crate::io::ReadAt;

use super::structures::{CompressionMethod, ZipFileEntry};

/// Reads a fixed byte range of a [`ReadAt`] source sequentially.
pub(crate) struct RangeReader<'a, R: ReadAt> {
    reader: &'a R,
    pos: u64,
    end: u64,
}

impl<'a, R: ReadAt> RangeReader<'a, R> {
    fn new(reader: &'a R, offset: u64, len: u64) -> Self {
        Self {
            reader,
            pos: offset,
            end: offset.saturating_add(len),
        }
    }
}

impl<R: ReadAt> Read for RangeReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.end.saturating_sub(self.pos);
        if remaining == 0 || buf.is_empty() {
            return Ok(0);
        }
        let want = buf.len().min(usize::try_from(remaining).unwrap_or(usize::MAX));
        let n = self.reader.read_at(self.pos, &mut buf[..want])?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "entry data truncated",
            ));
        }
        self.pos += n as u64;
        Ok(n)
    }
}

enum Decoder<'a, R: ReadAt> {
    Stored(RangeReader<'a, R>),
    Deflate(DeflateDecoder<RangeReader<'a, R>>),
}

/// Stream over the decompressed content of one archive entry.
///
/// The CRC-32 of everything read is checked against the Central Directory
/// once the stream is exhausted.
pub struct EntryReader<'a, R: ReadAt> {
    decoder: Decoder<'a, R>,
    crc: Crc,
    expected_crc: u32,
    expected_size: u64,
    verified: bool,
}

impl<'a, R: ReadAt> EntryReader<'a, R> {
    pub(super) fn new(reader: &'a R, data_offset: u64, entry: &ZipFileEntry) -> io::Result<Self> {
        let raw = RangeReader::new(reader, data_offset, entry.compressed_size);
        let decoder = match entry.compression_method {
            CompressionMethod::Stored => Decoder::Stored(raw),
            CompressionMethod::Deflate => Decoder::Deflate(DeflateDecoder::new(raw)),
            CompressionMethod::Unknown(method) => {
                return Err(io::Error::new(
                    io::ErrorKind::Unsupported,
                    format!("unsupported compression method {method}"),
                ));
            }
        };
        Ok(Self {
            decoder,
            crc: Crc::new(),
            expected_crc: entry.crc32,
            expected_size: entry.uncompressed_size,
            verified: false,
        })
    }

    fn verify(&mut self) -> io::Result<()> {
        if self.verified {
            return Ok(());
        }
        self.verified = true;
        if u64::from(self.crc.amount()) != self.expected_size & 0xFFFF_FFFF {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "size mismatch: expected {} bytes, got {}",
                    self.expected_size,
                    self.crc.amount()
                ),
            ));
        }
        if self.crc.sum() != self.expected_crc {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "CRC-32 mismatch"));
        }
        Ok(())
    }
}

impl<R: ReadAt> Read for EntryReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = match &mut self.decoder {
            Decoder::Stored(r) => r.read(buf)?,
            Decoder::Deflate(r) => r.read(buf)?,
        };
        if n == 0 && !buf.is_empty() {
            self.verify()?;
        }
        self.crc.update(&buf[..n]);
        Ok(n)
    }
}
