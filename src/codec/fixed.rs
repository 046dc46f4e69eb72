//! Fixed-width record layouts.
//!
//! # Responsibilities
//! - Describe a record as a table of named fields (offset, length, kind)
//! - Write domain values into a record (pad, truncate, zero-fill)
//! - Read domain values out of a record (trim, parse, scale)
//! - Walk repeating blocks, count-driven or remaining-length-driven
//!
//! # Design Decisions
//! - One `Field` constant drives both directions, so encode and decode
//!   cannot drift apart
//! - All offsets and lengths count characters, never bytes
//! - Reads are clamped to the available text; a short record yields empty
//!   fields instead of a panic
//! - Fixed-point amounts use `rust_decimal`, never binary floating point

use rust_decimal::Decimal;

/// Pad `s` with trailing spaces, or truncate it, to exactly `length` characters.
pub fn pad_or_truncate(s: &str, length: usize) -> String {
    let mut out: String = s.chars().take(length).collect();
    let used = out.chars().count();
    out.extend(std::iter::repeat(' ').take(length - used));
    out
}

/// How a field's characters are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Left-justified text, space padded.
    Text,
    /// Zero-padded whole number.
    Integer,
    /// Zero-padded digits holding `value * 10^scale`.
    Decimal { scale: u32, signed: bool },
}

/// A single column in a fixed-width record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub length: usize,
    pub kind: FieldKind,
}

impl Field {
    pub const fn text(name: &'static str, offset: usize, length: usize) -> Self {
        Self { name, offset, length, kind: FieldKind::Text }
    }

    pub const fn integer(name: &'static str, offset: usize, length: usize) -> Self {
        Self { name, offset, length, kind: FieldKind::Integer }
    }

    /// Unsigned fixed-point amount with `scale` implied decimal places.
    pub const fn decimal(name: &'static str, offset: usize, length: usize, scale: u32) -> Self {
        Self { name, offset, length, kind: FieldKind::Decimal { scale, signed: false } }
    }

    /// One past the last character of this field.
    pub const fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// A named record layout.
#[derive(Debug)]
pub struct Layout {
    pub name: &'static str,
    pub length: usize,
    pub fields: &'static [Field],
}

/// Problems found when checking a layout table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("{layout}: field {field} starts at {offset}, expected {expected}")]
    Gap { layout: &'static str, field: &'static str, offset: usize, expected: usize },
    #[error("{layout}: fields cover {covered} characters, layout declares {declared}")]
    Length { layout: &'static str, covered: usize, declared: usize },
}

impl Layout {
    /// Verify the fields are contiguous, ordered and cover `length` exactly.
    pub fn check(&self) -> Result<(), LayoutError> {
        let mut expected = 0;
        for field in self.fields {
            if field.offset != expected {
                return Err(LayoutError::Gap {
                    layout: self.name,
                    field: field.name,
                    offset: field.offset,
                    expected,
                });
            }
            expected = field.end();
        }
        if expected != self.length {
            return Err(LayoutError::Length { layout: self.name, covered: expected, declared: self.length });
        }
        Ok(())
    }

    /// Start writing a record of this layout.
    pub fn writer(&'static self) -> RecordWriter {
        RecordWriter::new(self)
    }
}

/// Builds one fixed-width record. Unwritten fields stay blank.
#[derive(Debug)]
pub struct RecordWriter {
    layout: &'static Layout,
    buf: Vec<char>,
}

impl RecordWriter {
    pub fn new(layout: &'static Layout) -> Self {
        Self { layout, buf: vec![' '; layout.length] }
    }

    fn put(&mut self, field: &Field, rendered: &str) {
        debug_assert!(field.end() <= self.layout.length, "{} outside {}", field.name, self.layout.name);
        let end = field.end().min(self.buf.len());
        for (slot, c) in self.buf[field.offset.min(end)..end]
            .iter_mut()
            .zip(pad_or_truncate(rendered, field.length).chars())
        {
            *slot = c;
        }
    }

    /// Left-justified text.
    pub fn text(&mut self, field: &Field, value: &str) -> &mut Self {
        self.put(field, value);
        self
    }

    /// Zero-padded whole number.
    pub fn integer(&mut self, field: &Field, value: i64) -> &mut Self {
        let rendered = format!("{:0width$}", value, width = field.length);
        self.put(field, &rendered);
        self
    }

    /// Zero-padded implied-decimal amount; rounds to the field's scale.
    pub fn decimal(&mut self, field: &Field, value: Decimal) -> &mut Self {
        let (scale, signed) = match field.kind {
            FieldKind::Decimal { scale, signed } => (scale, signed),
            _ => (0, true),
        };
        let mut scaled = value.round_dp(scale);
        scaled.rescale(scale);
        let mantissa = if signed { scaled.mantissa() } else { scaled.mantissa().abs() };
        let rendered = format!("{:0width$}", mantissa, width = field.length);
        self.put(field, &rendered);
        self
    }

    pub fn finish(self) -> String {
        self.buf.into_iter().collect()
    }
}

/// Read-only view over one record's characters.
#[derive(Debug, Clone, Copy)]
pub struct RecordReader<'a> {
    chars: &'a [char],
}

impl<'a> RecordReader<'a> {
    pub fn new(chars: &'a [char]) -> Self {
        Self { chars }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Characters of `field`, clamped to what is present.
    pub fn raw(&self, field: &Field) -> String {
        let start = field.offset.min(self.chars.len());
        let end = field.end().min(self.chars.len());
        self.chars[start..end].iter().collect()
    }

    /// Text with trailing padding removed.
    pub fn text(&self, field: &Field) -> String {
        self.raw(field).trim_end().to_string()
    }

    /// Whole number; blank or unparseable input reads as zero.
    pub fn integer(&self, field: &Field) -> i64 {
        let raw = self.raw(field);
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return 0;
        }
        trimmed.parse().unwrap_or_else(|_| {
            tracing::debug!(field = field.name, value = %trimmed, "Non-numeric integer field, reading as 0");
            0
        })
    }

    /// Implied-decimal amount: `digits / 10^scale`.
    ///
    /// Sign characters are ignored unless the field is marked signed.
    pub fn decimal(&self, field: &Field) -> Decimal {
        let (scale, signed) = match field.kind {
            FieldKind::Decimal { scale, signed } => (scale, signed),
            _ => (0, true),
        };
        let raw = self.raw(field);
        let trimmed = raw.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (signed, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            if !digits.is_empty() {
                tracing::debug!(field = field.name, value = %trimmed, "Non-numeric amount field, reading as 0");
            }
            return Decimal::ZERO;
        }
        let Ok(units) = digits.parse::<i64>() else {
            return Decimal::ZERO;
        };
        let amount = Decimal::new(units, scale);
        if negative {
            -amount
        } else {
            amount
        }
    }
}

/// How many blocks a repeating group holds.
#[derive(Debug, Clone, Copy)]
pub enum BlockCount {
    /// A count field read before the blocks.
    Declared(Field),
    /// As many whole blocks as fit in the remaining text.
    Remaining,
}

/// A run of same-layout blocks inside a body.
#[derive(Debug, Clone, Copy)]
pub struct RepeatingGroup {
    /// Offset of the first block within the body.
    pub start: usize,
    pub count: BlockCount,
    pub layout: &'static Layout,
}

impl RepeatingGroup {
    /// Block count claimed by the body (for `Remaining`, the number that fit).
    pub fn declared(&self, body: &[char]) -> usize {
        match self.count {
            BlockCount::Declared(field) => RecordReader::new(body).integer(&field).max(0) as usize,
            BlockCount::Remaining => body.len().saturating_sub(self.start) / self.layout.length,
        }
    }

    /// Complete blocks only; stops at the last block that fits.
    pub fn blocks<'a>(&self, body: &'a [char]) -> Vec<RecordReader<'a>> {
        let declared = self.declared(body);
        let block_len = self.layout.length;
        let mut blocks = Vec::with_capacity(declared.min(body.len() / block_len.max(1)));
        for i in 0..declared {
            let start = self.start + i * block_len;
            let end = start + block_len;
            if end > body.len() {
                tracing::debug!(
                    layout = self.layout.name,
                    declared,
                    parsed = blocks.len(),
                    "Body ends before declared block count"
                );
                break;
            }
            blocks.push(RecordReader::new(&body[start..end]));
        }
        blocks
    }
}
