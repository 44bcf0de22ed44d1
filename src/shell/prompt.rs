//! Line-oriented prompts.
//!
//! Each prompt writes a label, reads one line and trims it. On updates the current
//! value is shown in brackets and an empty answer keeps it.

use super::Shell;
use crate::errors::{Error, Result};
use std::io::{BufRead, ErrorKind, Write};

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Reads the menu choice; `None` at end of input.
    pub(super) fn read_menu_choice(&mut self) -> Result<Option<String>> {
        write!(self.output, "Opción: ")?;
        self.output.flush()?;
        self.next_line()
    }

    /// Reads one trimmed line. End of input in the middle of an action is an error.
    pub(super) fn read_line(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;
        self.next_line()?.ok_or_else(|| {
            Error::Io(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                "entrada terminada",
            ))
        })
    }

    /// Reads a replacement value; empty input keeps `current` and yields `None`.
    pub(super) fn read_optional(&mut self, label: &str, current: &str) -> Result<Option<String>> {
        let value = self.read_line(&format!("{label} [{current}]"))?;
        Ok((!value.is_empty()).then_some(value))
    }

    /// Reads a whole number.
    pub(super) fn read_i32(&mut self, label: &str) -> Result<i32> {
        let value = self.read_line(label)?;
        parse_i32(label, &value)
    }

    /// Reads a decimal number.
    pub(super) fn read_f64(&mut self, label: &str) -> Result<f64> {
        let value = self.read_line(label)?;
        parse_f64(label, &value)
    }

    /// Reads a replacement whole number; empty input keeps the current value.
    pub(super) fn read_optional_i32(&mut self, label: &str, current: i32) -> Result<Option<i32>> {
        self.read_optional(label, &current.to_string())?
            .map(|value| parse_i32(label, &value))
            .transpose()
    }

    /// Reads a replacement decimal number; empty input keeps the current value.
    pub(super) fn read_optional_f64(&mut self, label: &str, current: f64) -> Result<Option<f64>> {
        self.read_optional(label, &format!("{current:.2}"))?
            .map(|value| parse_f64(label, &value))
            .transpose()
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Parses a whole number typed for `field`.
pub fn parse_i32(field: &str, value: &str) -> Result<i32> {
    value.trim().parse().map_err(|_| Error::InvalidInput {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Parses a finite decimal number typed for `field`; a decimal comma is accepted.
pub fn parse_f64(field: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| Error::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
        })
}
