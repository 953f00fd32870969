//! JSON I/O handling for CLI
//!
//! - Input: one JSON object on stdin
//! - Output: one JSON object per line on stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::{CliError, CliResult};

/// Output line. Serialized directly, so `data` keeps its own field order.
#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Envelope<'a, T: Serialize> {
    Ok { data: &'a T },
    Error { code: &'a str, message: &'a str },
}

/// Read a JSON request from stdin
pub fn read_request<T: DeserializeOwned>() -> CliResult<T> {
    read_request_from(io::stdin().lock())
}

/// Read a JSON request from `reader`. The object may span lines.
pub fn read_request_from<T: DeserializeOwned, R: Read>(mut reader: R) -> CliResult<T> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    Ok(serde_json::from_str(&input)?)
}

/// Write a success response to stdout
pub fn write_response<T: Serialize>(data: &T) -> CliResult<()> {
    write_response_to(&mut io::stdout().lock(), data)
}

pub fn write_response_to<T: Serialize, W: Write>(writer: &mut W, data: &T) -> CliResult<()> {
    write_line(writer, &Envelope::Ok { data })
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_error_to(&mut io::stdout().lock(), code, message)
}

pub fn write_error_to<W: Write>(writer: &mut W, code: &str, message: &str) -> CliResult<()> {
    let envelope: Envelope<'_, ()> = Envelope::Error { code, message };
    write_line(writer, &envelope)
}

/// Write a bare JSON value to stdout
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

fn write_line<T: Serialize, W: Write>(writer: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
