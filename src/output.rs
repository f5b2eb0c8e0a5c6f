//! Buffered BEDPE output.
//!
//! Uses itoa for integer formatting to avoid allocation per row.

use crate::bedpe::BedpeError;
use crate::pet::PetRecord;
use std::io::{BufWriter, Write};

/// Buffer size for BedpeWriter (8MB default).
const DEFAULT_BUFFER_SIZE: usize = 8 * 1024 * 1024;

/// BEDPE row writer.
pub struct BedpeWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
    rows_written: usize,
}

impl<W: Write> BedpeWriter<W> {
    /// Create a new BedpeWriter with default 8MB buffer.
    pub fn new(output: W) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, output)
    }

    /// Create a new BedpeWriter with specified buffer size.
    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            itoa_buf: itoa::Buffer::new(),
            rows_written: 0,
        }
    }

    /// Write one PET as a 7-field row followed by newline.
    #[inline]
    pub fn write_pet(&mut self, pet: &PetRecord) -> Result<(), BedpeError> {
        self.writer.write_all(pet.chrom1.as_bytes())?;
        self.write_int_field(pet.anchor1.start)?;
        self.write_int_field(pet.anchor1.end)?;
        self.writer.write_all(b"\t")?;
        self.writer.write_all(pet.chrom2.as_bytes())?;
        self.write_int_field(pet.anchor2.start)?;
        self.write_int_field(pet.anchor2.end)?;
        self.write_int_field(pet.count)?;
        self.writer.write_all(b"\n")?;
        self.rows_written += 1;
        Ok(())
    }

    #[inline]
    fn write_int_field(&mut self, n: i64) -> Result<(), BedpeError> {
        self.writer.write_all(b"\t")?;
        self.writer.write_all(self.itoa_buf.format(n).as_bytes())?;
        Ok(())
    }

    /// Number of rows written so far.
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush the buffer.
    pub fn flush(&mut self) -> Result<(), BedpeError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W, BedpeError> {
        self.writer
            .into_inner()
            .map_err(|e| BedpeError::Io(e.into_error()))
    }
}
