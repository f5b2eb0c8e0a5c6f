//! BEDPE ingestion for raw PET records.
//!
//! Input is seven tab-separated fields per line, no header:
//! `chrom1 start1 end1 chrom2 start2 end2 count`.
//!
//! Ingestion stops at the first malformed row. Everything parsed before it is
//! returned together with the failure, so the caller decides whether to go on
//! with the partial set or abort.

use crate::config::ConfigError;
use crate::parsing::{parse_i64_fast, should_skip_line, split_bedpe_fields, trim_line_end};
use crate::pet::PetRecord;
use memchr::memchr;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;

/// Minimum file size to use mmap (smaller files use buffered I/O)
const MMAP_THRESHOLD: usize = 64 * 1024;

/// Errors that can occur while reading PETs or configuring a run.
#[derive(Error, Debug)]
pub enum BedpeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Input truncated at line {line} after {recovered} PETs: {message}")]
    Truncated {
        recovered: usize,
        line: usize,
        message: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, BedpeError>;

/// Records read before ingestion stopped, plus the failure that stopped it.
#[derive(Debug)]
pub struct Recovered {
    pub records: Vec<PetRecord>,
    pub failure: Option<BedpeError>,
}

impl Recovered {
    /// True if the whole input was consumed (or the record limit reached).
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Turn a partial read into an error.
    pub fn into_strict(self) -> Result<Vec<PetRecord>> {
        match self.failure {
            None => Ok(self.records),
            Some(BedpeError::Parse { line, message }) => Err(BedpeError::Truncated {
                recovered: self.records.len(),
                line,
                message,
            }),
            Some(e) => Err(e),
        }
    }
}

/// Iterator over PET records in an in-memory BEDPE buffer.
pub struct BedpeRecords<'a> {
    data: &'a [u8],
    pos: usize,
    line_number: usize,
    records_read: usize,
}

impl<'a> BedpeRecords<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            line_number: 0,
            records_read: 0,
        }
    }

    /// Line number of the last line consumed (1-based).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    fn next_line(&mut self) -> Option<&'a [u8]> {
        if self.pos >= self.data.len() {
            return None;
        }
        let rest = &self.data[self.pos..];
        let line = match memchr(b'\n', rest) {
            Some(nl) => {
                self.pos += nl + 1;
                &rest[..nl]
            }
            None => {
                self.pos = self.data.len();
                rest
            }
        };
        self.line_number += 1;
        Some(trim_line_end(line))
    }

    fn parse_line(&self, line: &[u8]) -> Result<PetRecord> {
        let fields = split_bedpe_fields(line).map_err(|found| BedpeError::Parse {
            line: self.line_number,
            message: format!("Expected 7 fields, got {}", found),
        })?;

        let chrom1 = self.parse_chrom(fields[0], "chrom1")?;
        let start1 = self.parse_int(fields[1], "start1")?;
        let end1 = self.parse_int(fields[2], "end1")?;
        let chrom2 = self.parse_chrom(fields[3], "chrom2")?;
        let start2 = self.parse_int(fields[4], "start2")?;
        let end2 = self.parse_int(fields[5], "end2")?;
        let count = self.parse_int(fields[6], "count")?;

        Ok(
            PetRecord::new(chrom1, start1, end1, chrom2, start2, end2, count)
                .with_source_index(self.records_read),
        )
    }

    fn parse_chrom(&self, bytes: &[u8], field_name: &str) -> Result<String> {
        if bytes.is_empty() {
            return Err(BedpeError::Parse {
                line: self.line_number,
                message: format!("Empty {}", field_name),
            });
        }
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| BedpeError::Parse {
                line: self.line_number,
                message: format!("Invalid UTF-8 in {}", field_name),
            })
    }

    fn parse_int(&self, bytes: &[u8], field_name: &str) -> Result<i64> {
        parse_i64_fast(bytes).ok_or_else(|| BedpeError::Parse {
            line: self.line_number,
            message: format!(
                "Invalid {}: '{}'",
                field_name,
                String::from_utf8_lossy(bytes)
            ),
        })
    }
}

impl Iterator for BedpeRecords<'_> {
    type Item = Result<PetRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.next_line()?;
            if should_skip_line(line) {
                continue;
            }
            let result = self.parse_line(line);
            if result.is_ok() {
                self.records_read += 1;
            }
            return Some(result);
        }
    }
}

/// Parse a BEDPE buffer, stopping at the first malformed row or at `limit` records.
pub fn recover_pets(data: &[u8], limit: Option<usize>) -> Recovered {
    let mut records = Vec::new();
    let mut failure = None;

    for result in BedpeRecords::new(data) {
        if limit.is_some_and(|n| records.len() >= n) {
            break;
        }
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }

    Recovered { records, failure }
}

/// Read PETs from a file, memory-mapping large inputs.
///
/// I/O errors are returned as `Err`; malformed rows end up in `Recovered::failure`.
pub fn read_pets<P: AsRef<Path>>(path: P, limit: Option<usize>) -> Result<Recovered> {
    let file = File::open(path)?;
    let file_size = file.metadata()?.len() as usize;

    if file_size >= MMAP_THRESHOLD {
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(recover_pets(&mmap[..], limit))
    } else {
        read_pets_from_reader(file, limit)
    }
}

/// Read PETs from any readable source (e.g. stdin).
pub fn read_pets_from_reader<R: Read>(mut reader: R, limit: Option<usize>) -> Result<Recovered> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    Ok(recover_pets(&data, limit))
}

/// Parse PETs from a string, failing on the first malformed row (useful for testing).
pub fn parse_pets(content: &str) -> Result<Vec<PetRecord>> {
    BedpeRecords::new(content.as_bytes()).collect()
}
