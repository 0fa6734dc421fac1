//! Plain-text save/load format for Coulomb simulations.
//!
//! A saved simulation is a line-oriented UTF-8 document: one header
//! line with the time domain, one line with the external fields, then
//! one line per particle in collection order.
//!
//! # Architecture
//!
//! - [`codec`] tokenizes and parses single lines into typed [`Record`]s
//! - [`DocumentWriter`] streams a document to any `Write` sink
//! - [`DocumentReader`] reads one back from any `BufRead` source
//! - [`files`] picks file names and handles save/load against a directory
//!
//! # Format
//!
//! ```text
//! SIMULATION T:<float> P:<float> I:<0|1>
//! FIELD E:[<x>,<y>,<z>] M:[<x>,<y>,<z>]
//! PARTICLE M:<float> C:<float> R:[<x>,<y>,<z>] V:[<x>,<y>,<z>] S:<0|1>
//! ```
//!
//! Each line starts with a tag followed by space-separated `KEY:VALUE`
//! tokens. A value is a bare decimal or a bracketed, comma-separated
//! list of one to three decimals.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod files;
pub mod reader;
pub mod types;
pub mod writer;

pub use error::FormatError;
pub use reader::{read_document, DocumentReader, RecordIter};
pub use types::{Document, FieldsRecord, Record, SimulationHeader};
pub use writer::{write_document, DocumentWriter};

/// Tag of the time-domain header line. Must be the first line.
pub const TAG_SIMULATION: &str = "SIMULATION";

/// Tag of the external field line.
pub const TAG_FIELD: &str = "FIELD";

/// Tag of a particle line.
pub const TAG_PARTICLE: &str = "PARTICLE";
