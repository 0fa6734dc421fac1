//! Document reader.
//!
//! [`DocumentReader`] reads records from any `BufRead` source. The
//! `SIMULATION` header is validated on construction.

use std::io::BufRead;

use log::debug;

use crate::codec::parse_line;
use crate::error::FormatError;
use crate::types::{Document, FieldsRecord, Record, SimulationHeader};
use crate::{TAG_FIELD, TAG_SIMULATION};

/// Reads a saved simulation line by line.
///
/// Generic over `R: BufRead` so tests can use `&[u8]` and production
/// code can use `BufReader<File>`.
pub struct DocumentReader<R: BufRead> {
    reader: R,
    header: SimulationHeader,
    line: usize,
    buf: String,
    seen_fields: bool,
}

impl<R: BufRead> DocumentReader<R> {
    /// Open a document, reading and validating the `SIMULATION` line.
    ///
    /// The header must be the very first line.
    pub fn open(mut reader: R) -> Result<Self, FormatError> {
        let mut buf = String::new();
        if reader.read_line(&mut buf)? == 0 {
            return Err(FormatError::MissingSimulationHeader);
        }
        let header = match parse_line(1, &buf) {
            Ok(Some(Record::Simulation(header))) => header,
            Ok(_) => return Err(FormatError::MissingSimulationHeader),
            Err(FormatError::UnknownTag { .. }) => return Err(FormatError::MissingSimulationHeader),
            Err(e) => return Err(e),
        };
        Ok(Self {
            reader,
            header,
            line: 1,
            buf,
            seen_fields: false,
        })
    }

    /// The `SIMULATION` header.
    pub fn header(&self) -> &SimulationHeader {
        &self.header
    }

    /// Number of lines consumed so far, blank lines included.
    pub fn lines_read(&self) -> usize {
        self.line
    }

    /// Read the next `FIELD` or `PARTICLE` record, or `None` at end of input.
    pub fn next_record(&mut self) -> Result<Option<Record>, FormatError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let line = self.line;
            match parse_line(line, &self.buf)? {
                None => continue,
                Some(Record::Simulation(_)) => {
                    return Err(FormatError::DuplicateRecord {
                        line,
                        tag: TAG_SIMULATION,
                    })
                }
                Some(Record::Fields(_)) if self.seen_fields => {
                    return Err(FormatError::DuplicateRecord {
                        line,
                        tag: TAG_FIELD,
                    })
                }
                Some(record) => {
                    if matches!(record, Record::Fields(_)) {
                        self.seen_fields = true;
                    }
                    return Ok(Some(record));
                }
            }
        }
    }

    /// Convert into a record iterator.
    pub fn records(self) -> RecordIter<R> {
        RecordIter {
            inner: self,
            done: false,
        }
    }

    /// Read the remaining records into a [`Document`].
    ///
    /// Fails with [`FormatError::NoParticles`] if no `PARTICLE` line
    /// was found.
    pub fn into_document(mut self) -> Result<Document, FormatError> {
        let mut fields = FieldsRecord::default();
        let mut particles = Vec::new();
        while let Some(record) = self.next_record()? {
            match record {
                Record::Fields(f) => fields = f,
                Record::Particle(p) => particles.push(p),
                Record::Simulation(_) => {}
            }
        }
        if particles.is_empty() {
            return Err(FormatError::NoParticles);
        }
        debug!(
            "read document: {} particles over {} lines",
            particles.len(),
            self.line
        );
        Ok(Document {
            header: self.header,
            fields,
            particles,
        })
    }
}

/// Iterator adapter over document records.
pub struct RecordIter<R: BufRead> {
    inner: DocumentReader<R>,
    done: bool,
}

impl<R: BufRead> Iterator for RecordIter<R> {
    type Item = Result<Record, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.inner.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Read a whole document from `reader`.
pub fn read_document<R: BufRead>(reader: R) -> Result<Document, FormatError> {
    DocumentReader::open(reader)?.into_document()
}
