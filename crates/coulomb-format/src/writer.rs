//! Document writer.
//!
//! [`DocumentWriter`] streams a saved simulation to any `Write` sink.
//! The `SIMULATION` and `FIELD` lines are written immediately on
//! construction.

use std::io::Write;

use coulomb_core::ParticleParams;

use crate::codec::{encode_fields, encode_header, encode_particle};
use crate::error::FormatError;
use crate::types::{Document, FieldsRecord, SimulationHeader};

/// Writes a saved simulation to a byte stream.
///
/// Generic over `W: Write` so tests can use `Vec<u8>` and production
/// code can use `BufWriter<File>`.
///
/// # Examples
///
/// ```
/// use coulomb_core::{DVec3, ParticleParams};
/// use coulomb_format::{DocumentReader, DocumentWriter, FieldsRecord, SimulationHeader};
///
/// let header = SimulationHeader { time: 1.0, precision: 0.25, interactions: false };
/// let mut buf = Vec::new();
/// let mut writer = DocumentWriter::new(&mut buf, &header, &FieldsRecord::default()).unwrap();
/// writer
///     .write_particle(&ParticleParams::new(1.0, 2.0, DVec3::ZERO, DVec3::Y))
///     .unwrap();
/// assert_eq!(writer.particles_written(), 1);
/// drop(writer);
///
/// let reader = DocumentReader::open(buf.as_slice()).unwrap();
/// assert_eq!(reader.header(), &header);
/// ```
pub struct DocumentWriter<W: Write> {
    writer: W,
    particles_written: usize,
}

impl<W: Write> DocumentWriter<W> {
    /// Create a new writer, immediately writing the header and field lines.
    pub fn new(
        mut writer: W,
        header: &SimulationHeader,
        fields: &FieldsRecord,
    ) -> Result<Self, FormatError> {
        encode_header(&mut writer, header)?;
        encode_fields(&mut writer, fields)?;
        Ok(Self {
            writer,
            particles_written: 0,
        })
    }

    /// Append one `PARTICLE` line.
    pub fn write_particle(&mut self, params: &ParticleParams) -> Result<(), FormatError> {
        encode_particle(&mut self.writer, params)?;
        self.particles_written += 1;
        Ok(())
    }

    /// Number of particles written so far.
    pub fn particles_written(&self) -> usize {
        self.particles_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), FormatError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> Result<W, FormatError> {
        self.flush()?;
        Ok(self.writer)
    }
}

/// Write a whole document to `writer`.
pub fn write_document<W: Write>(writer: W, doc: &Document) -> Result<(), FormatError> {
    let mut out = DocumentWriter::new(writer, &doc.header, &doc.fields)?;
    for params in &doc.particles {
        out.write_particle(params)?;
    }
    out.flush()
}
