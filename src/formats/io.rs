//! Input plumbing shared by the table readers
//!
//! Opens plain, gzip or bzip2 files behind one `BufRead` and iterates
//! lines with a reused buffer.

use memchr::memchr2_iter;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Default buffer size for BufReader (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Compression format of a data file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Plain text (uncompressed)
    Plain,
    /// Gzip compressed (.gz)
    Gzip,
    /// Bzip2 compressed (.bz2)
    Bzip2,
}

/// Detect compression format from file extension, then magic bytes
pub fn detect_compression(path: &Path) -> io::Result<CompressionFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("gz") => return Ok(CompressionFormat::Gzip),
        Some("bz2") => return Ok(CompressionFormat::Bzip2),
        _ => {}
    }

    let mut file = File::open(path)?;
    let mut magic = [0u8; 3];
    let bytes_read = file.read(&mut magic)?;

    if bytes_read >= 2 && magic[..2] == [0x1f, 0x8b] {
        return Ok(CompressionFormat::Gzip);
    }
    // "BZh"
    if bytes_read >= 3 && magic == [0x42, 0x5a, 0x68] {
        return Ok(CompressionFormat::Bzip2);
    }
    Ok(CompressionFormat::Plain)
}

/// Open a possibly compressed file for buffered line reading
pub fn open_reader(path: &Path) -> io::Result<Box<dyn BufRead + Send>> {
    let format = detect_compression(path)?;
    let file = File::open(path)?;
    let reader: Box<dyn BufRead + Send> = match format {
        CompressionFormat::Gzip => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            flate2::read::MultiGzDecoder::new(file),
        )),
        CompressionFormat::Bzip2 => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            bzip2::read::BzDecoder::new(file),
        )),
        CompressionFormat::Plain => Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file)),
    };
    Ok(reader)
}

/// Line iterator that reuses a buffer to avoid allocations
pub struct LineIterator<R: BufRead> {
    reader: R,
    buffer: String,
    line_number: usize,
}

impl<R: BufRead> LineIterator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::with_capacity(1024),
            line_number: 0,
        }
    }

    /// Read the next line without its line terminator, with its 1-based number
    /// Returns None at EOF
    pub fn next_line(&mut self) -> Option<io::Result<(usize, &str)>> {
        self.buffer.clear();
        match self.reader.read_line(&mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                if self.buffer.ends_with('\n') {
                    self.buffer.pop();
                    if self.buffer.ends_with('\r') {
                        self.buffer.pop();
                    }
                }
                Some(Ok((self.line_number, &self.buffer)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Split a record on tabs and semicolons, dropping empty fields
///
/// ```
/// use om38to13::formats::io::split_fields;
///
/// assert_eq!(split_fields("S;chr1:1-2\t\tchr1:3-4"), vec!["S", "chr1:1-2", "chr1:3-4"]);
/// ```
pub fn split_fields(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    let mut fields = Vec::with_capacity(4);
    let mut start = 0;
    for pos in memchr2_iter(b'\t', b';', bytes).chain(std::iter::once(bytes.len())) {
        if pos > start {
            fields.push(&line[start..pos]);
        }
        start = pos + 1;
    }
    fields
}
