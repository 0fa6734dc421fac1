//! Line tokenizer, parser and encoder.
//!
//! Grammar, per line:
//!
//! ```text
//! line   := TAG (' '+ token)*
//! token  := KEY ':' value
//! value  := number | '[' number (',' number){0,2} ']'
//! ```
//!
//! Whitespace is allowed after list commas so files written as
//! `[1.0, 2.0, 3.0]` load as well as `[1,2,3]`. Every failure surfaces
//! as a [`FormatError`] carrying the line number.

use std::io::Write;

use coulomb_core::{DVec3, ParticleParams};
use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::error::FormatError;
use crate::types::{FieldsRecord, Record, SimulationHeader};
use crate::{TAG_FIELD, TAG_PARTICLE, TAG_SIMULATION};

/// Total time key of the `SIMULATION` line.
pub const KEY_TIME: &str = "T";
/// Step size key of the `SIMULATION` line.
pub const KEY_PRECISION: &str = "P";
/// Interaction flag key of the `SIMULATION` line.
pub const KEY_INTERACTIONS: &str = "I";
/// Electric field key of the `FIELD` line.
pub const KEY_ELECTRIC: &str = "E";
/// Magnetic field key of the `FIELD` line.
pub const KEY_MAGNETIC: &str = "M";
/// Mass key of a `PARTICLE` line.
pub const KEY_MASS: &str = "M";
/// Charge key of a `PARTICLE` line.
pub const KEY_CHARGE: &str = "C";
/// Initial position key of a `PARTICLE` line.
pub const KEY_POSITION: &str = "R";
/// Initial velocity key of a `PARTICLE` line.
pub const KEY_VELOCITY: &str = "V";
/// Stationary flag key of a `PARTICLE` line.
pub const KEY_STATIONARY: &str = "S";

/// Most components a list value may hold.
const MAX_LIST_LEN: usize = 3;

// ── Values ──────────────────────────────────────────────────────

/// A parsed token value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A bare decimal.
    Scalar(f64),
    /// A bracketed list of one to three decimals.
    List(SmallVec<[f64; MAX_LIST_LEN]>),
}

// ── Scanner ─────────────────────────────────────────────────────

struct Scanner<'a> {
    line: usize,
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(line: usize, src: &'a str) -> Self {
        Self { line, src, pos: 0 }
    }

    fn malformed(&self, detail: impl Into<String>) -> FormatError {
        FormatError::MalformedValue {
            line: self.line,
            detail: detail.into(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Read a run of non-whitespace characters.
    fn word(&mut self) -> &'a str {
        let rest = self.rest();
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    fn key(&mut self) -> Result<&'a str, FormatError> {
        let rest = self.rest();
        let end = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        if end == 0 || !rest[end..].starts_with(':') {
            let token = rest.split_whitespace().next().unwrap_or(rest);
            return Err(self.malformed(format!("expected KEY:VALUE, got '{token}'")));
        }
        self.pos += end + 1;
        Ok(&rest[..end])
    }

    fn value(&mut self) -> Result<Value, FormatError> {
        if self.rest().starts_with('[') {
            self.list()
        } else {
            let word = self.word();
            if word.is_empty() {
                return Err(self.malformed("missing value"));
            }
            Ok(Value::Scalar(self.number(word)?))
        }
    }

    fn list(&mut self) -> Result<Value, FormatError> {
        let rest = self.rest();
        let close = rest
            .find(']')
            .ok_or_else(|| self.malformed("unterminated list"))?;
        let inner = &rest[1..close];
        self.pos += close + 1;
        if !(self.at_end() || self.rest().starts_with(char::is_whitespace)) {
            return Err(self.malformed("unexpected text after list"));
        }

        let mut items = SmallVec::new();
        if inner.trim().is_empty() {
            return Err(self.malformed("empty list"));
        }
        for part in inner.split(',') {
            if items.len() == MAX_LIST_LEN {
                return Err(self.malformed(format!(
                    "list holds more than {MAX_LIST_LEN} numbers"
                )));
            }
            items.push(self.number(part.trim())?);
        }
        Ok(Value::List(items))
    }

    fn number(&self, text: &str) -> Result<f64, FormatError> {
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(self.malformed(format!("'{text}' is not a finite number"))),
        }
    }
}

// ── Token map ───────────────────────────────────────────────────

/// The `KEY:VALUE` tokens of one line, consumed key by key.
struct Tokens {
    line: usize,
    tag: &'static str,
    values: IndexMap<String, Value>,
}

impl Tokens {
    fn scan(line: usize, tag: &'static str, body: &str) -> Result<Self, FormatError> {
        let mut scanner = Scanner::new(line, body);
        let mut values = IndexMap::new();
        loop {
            scanner.skip_whitespace();
            if scanner.at_end() {
                break;
            }
            let key = scanner.key()?;
            let value = scanner.value()?;
            if values.insert(key.to_string(), value).is_some() {
                return Err(FormatError::DuplicateKey {
                    line,
                    key: key.to_string(),
                });
            }
        }
        Ok(Self { line, tag, values })
    }

    fn take(&mut self, key: &'static str) -> Result<Value, FormatError> {
        self.values
            .shift_remove(key)
            .ok_or(FormatError::MissingKey {
                line: self.line,
                tag: self.tag,
                key,
            })
    }

    fn scalar(&mut self, key: &'static str) -> Result<f64, FormatError> {
        match self.take(key)? {
            Value::Scalar(v) => Ok(v),
            Value::List(_) => Err(FormatError::MalformedValue {
                line: self.line,
                detail: format!("'{key}' expects a number, got a list"),
            }),
        }
    }

    fn vector(&mut self, key: &'static str) -> Result<DVec3, FormatError> {
        match self.take(key)? {
            Value::List(items) if items.len() == 3 => Ok(DVec3::new(items[0], items[1], items[2])),
            Value::List(items) => Err(FormatError::WrongArity {
                line: self.line,
                key,
                found: items.len(),
            }),
            Value::Scalar(_) => Err(FormatError::WrongArity {
                line: self.line,
                key,
                found: 1,
            }),
        }
    }

    fn flag(&mut self, key: &'static str) -> Result<bool, FormatError> {
        let value = self.scalar(key)?;
        if value == 0.0 {
            Ok(false)
        } else if value == 1.0 {
            Ok(true)
        } else {
            Err(FormatError::InvalidFlag {
                line: self.line,
                key,
                value,
            })
        }
    }

    /// Reject any key the record did not consume.
    fn finish(self) -> Result<(), FormatError> {
        match self.values.into_keys().next() {
            Some(key) => Err(FormatError::UnknownKey {
                line: self.line,
                tag: self.tag,
                key,
            }),
            None => Ok(()),
        }
    }
}

// ── Line parsing ────────────────────────────────────────────────

/// Parse one line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: usize, text: &str) -> Result<Option<Record>, FormatError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let (tag, body) = text.split_once(char::is_whitespace).unwrap_or((text, ""));

    let record = match tag {
        TAG_SIMULATION => {
            let mut tokens = Tokens::scan(line, TAG_SIMULATION, body)?;
            let header = SimulationHeader {
                time: tokens.scalar(KEY_TIME)?,
                precision: tokens.scalar(KEY_PRECISION)?,
                interactions: tokens.flag(KEY_INTERACTIONS)?,
            };
            tokens.finish()?;
            Record::Simulation(header)
        }
        TAG_FIELD => {
            let mut tokens = Tokens::scan(line, TAG_FIELD, body)?;
            let fields = FieldsRecord {
                electric: tokens.vector(KEY_ELECTRIC)?,
                magnetic: tokens.vector(KEY_MAGNETIC)?,
            };
            tokens.finish()?;
            Record::Fields(fields)
        }
        TAG_PARTICLE => {
            let mut tokens = Tokens::scan(line, TAG_PARTICLE, body)?;
            let params = ParticleParams {
                mass: tokens.scalar(KEY_MASS)?,
                charge: tokens.scalar(KEY_CHARGE)?,
                position: tokens.vector(KEY_POSITION)?,
                velocity: tokens.vector(KEY_VELOCITY)?,
                stationary: tokens.flag(KEY_STATIONARY)?,
            };
            tokens.finish()?;
            params
                .validate()
                .map_err(|source| FormatError::InvalidRecord { line, source })?;
            Record::Particle(params)
        }
        other => {
            return Err(FormatError::UnknownTag {
                line,
                tag: other.to_string(),
            })
        }
    };
    Ok(Some(record))
}

// ── Encoding ────────────────────────────────────────────────────

struct Vec3Text(DVec3);

impl std::fmt::Display for Vec3Text {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{},{}]", self.0.x, self.0.y, self.0.z)
    }
}

/// Write the `SIMULATION` line.
pub fn encode_header(w: &mut dyn Write, header: &SimulationHeader) -> Result<(), FormatError> {
    writeln!(
        w,
        "{TAG_SIMULATION} {KEY_TIME}:{} {KEY_PRECISION}:{} {KEY_INTERACTIONS}:{}",
        header.time,
        header.precision,
        u8::from(header.interactions),
    )?;
    Ok(())
}

/// Write the `FIELD` line.
pub fn encode_fields(w: &mut dyn Write, fields: &FieldsRecord) -> Result<(), FormatError> {
    writeln!(
        w,
        "{TAG_FIELD} {KEY_ELECTRIC}:{} {KEY_MAGNETIC}:{}",
        Vec3Text(fields.electric),
        Vec3Text(fields.magnetic),
    )?;
    Ok(())
}

/// Write one `PARTICLE` line.
pub fn encode_particle(w: &mut dyn Write, params: &ParticleParams) -> Result<(), FormatError> {
    writeln!(
        w,
        "{TAG_PARTICLE} {KEY_MASS}:{} {KEY_CHARGE}:{} {KEY_POSITION}:{} {KEY_VELOCITY}:{} {KEY_STATIONARY}:{}",
        params.mass,
        params.charge,
        Vec3Text(params.position),
        Vec3Text(params.velocity),
        u8::from(params.stationary),
    )?;
    Ok(())
}
