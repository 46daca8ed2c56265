//! Record ID generation with date-based sequencing.
//!
//! Every vendor, assessment, and question gets an ID of the form
//! `P-YYYY-MM-DD-SSS-XXX`: a one-letter kind prefix, the creation date, a
//! base36 sequence within that date, and a random base36 suffix.

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use rand::Rng;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

const BASE36_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// The kind of record an ID belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Vendor,
    Assessment,
    Question,
}

impl IdKind {
    pub fn prefix(&self) -> char {
        match self {
            Self::Vendor => 'v',
            Self::Assessment => 'a',
            Self::Question => 'q',
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "v" => Some(Self::Vendor),
            "a" => Some(Self::Assessment),
            "q" => Some(Self::Question),
            _ => None,
        }
    }
}

/// Generate a new ID for today, sequenced after the `existing` IDs.
pub fn generate_id<'a>(kind: IdKind, existing: impl IntoIterator<Item = &'a str>) -> String {
    let date = Local::now().date_naive();
    let seq = next_sequence_for_date(kind, date, existing);
    format_id(kind, date, seq, &random_base36(3))
}

fn format_id(kind: IdKind, date: NaiveDate, seq: u32, suffix: &str) -> String {
    format!(
        "{}-{}-{}-{}",
        kind.prefix(),
        date.format("%Y-%m-%d"),
        format_base36(seq, 3),
        suffix
    )
}

/// Get the next sequence number for a kind and date.
fn next_sequence_for_date<'a>(
    kind: IdKind,
    date: NaiveDate,
    existing: impl IntoIterator<Item = &'a str>,
) -> u32 {
    existing
        .into_iter()
        .filter_map(|id| id.parse::<RecordId>().ok())
        .filter(|id| id.kind == kind && id.date == date)
        .map(|id| id.sequence)
        .max()
        .unwrap_or(0)
        + 1
}

/// Format a number as base36 with zero-padding.
pub fn format_base36(n: u32, width: usize) -> String {
    if n == 0 {
        return "0".repeat(width);
    }

    let mut result = Vec::new();
    let mut num = n;

    while num > 0 {
        let digit = (num % 36) as usize;
        result.push(BASE36_CHARS[digit] as char);
        num /= 36;
    }

    result.reverse();
    let s: String = result.into_iter().collect();

    if s.len() < width {
        format!("{:0>width$}", s, width = width)
    } else {
        s
    }
}

/// Parse a base36 string to a number.
fn parse_base36(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }

    let mut result = 0u32;
    for c in s.chars() {
        let pos = BASE36_CHARS.iter().position(|&b| b as char == c)?;
        result = result.checked_mul(36)?.checked_add(pos as u32)?;
    }

    Some(result)
}

/// Generate a random base36 string of the given length.
fn random_base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36_CHARS[rng.gen_range(0..36)] as char)
        .collect()
}

/// A parsed record ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordId {
    pub kind: IdKind,
    pub date: NaiveDate,
    pub sequence: u32,
    pub suffix: String,
}

impl FromStr for RecordId {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split('-').collect();
        if parts.len() != 6 {
            return Err(anyhow!("Invalid record ID '{}'", input));
        }

        let kind = IdKind::from_prefix(parts[0])
            .ok_or_else(|| anyhow!("Invalid record ID '{}': unknown prefix", input))?;
        let date = NaiveDate::parse_from_str(&parts[1..4].join("-"), "%Y-%m-%d")
            .map_err(|_| anyhow!("Invalid record ID '{}': bad date", input))?;
        let sequence = parse_base36(parts[4])
            .ok_or_else(|| anyhow!("Invalid record ID '{}': bad sequence", input))?;
        let suffix = parts[5];
        if suffix.is_empty() || parse_base36(suffix).is_none() {
            return Err(anyhow!("Invalid record ID '{}': bad suffix", input));
        }

        Ok(Self {
            kind,
            date,
            sequence,
            suffix: suffix.to_string(),
        })
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            format_id(self.kind, self.date, self.sequence, &self.suffix)
        )
    }
}

/// Whether `input` looks like an ID of the given kind (as opposed to a name).
pub fn is_id_of(kind: IdKind, input: &str) -> bool {
    input
        .parse::<RecordId>()
        .map(|id| id.kind == kind)
        .unwrap_or(false)
}
