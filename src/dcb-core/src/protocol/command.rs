// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use crate::error::{DcbError, DcbResult};

pub const OP_DIGITAL_OUTPUT: &str = "DOP";
pub const OP_DISPENSE: &str = "DSP";
pub const OP_MOVE: &str = "MSP";

const FORM_QUERY: char = '?';
const FORM_ACTION: char = ':';
const FIELD_SEPARATOR: char = ':';

/// A parsed board request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `DOP?<idx>`
    QueryDigitalOutput { index: usize },
    /// `DSP:<idx>`
    StartPour { index: usize },
    /// `MSP?<idx>`
    QueryTarget { index: usize },
    /// `MSP:<idx>:<target>`
    MoveTo { index: usize, target: i64 },
}

impl Command {
    pub fn index(&self) -> usize {
        match *self {
            Command::QueryDigitalOutput { index }
            | Command::StartPour { index }
            | Command::QueryTarget { index }
            | Command::MoveTo { index, .. } => index,
        }
    }
}

/// Parse one request line.
///
/// A single trailing `\n` or `\r\n` is ignored; anything else that does not
/// match the grammar exactly is rejected.
pub fn parse_command(line: &str) -> DcbResult<Command> {
    let line = strip_terminator(line);

    let op = line
        .get(..3)
        .ok_or_else(|| DcbError::malformed("line shorter than an op code"))?;
    if !matches!(op, OP_DIGITAL_OUTPUT | OP_DISPENSE | OP_MOVE) {
        return Err(DcbError::UnknownOperation(op.to_string()));
    }

    // Byte 3 is ASCII whenever the op code matched.
    let rest = &line[3..];
    let form = rest
        .chars()
        .next()
        .ok_or_else(|| DcbError::malformed(format!("{} without '?' or ':'", op)))?;
    let args = &rest[form.len_utf8()..];

    match (op, form) {
        (OP_DIGITAL_OUTPUT, FORM_QUERY) => Ok(Command::QueryDigitalOutput {
            index: parse_index(args)?,
        }),
        (OP_DISPENSE, FORM_ACTION) => Ok(Command::StartPour {
            index: parse_index(args)?,
        }),
        (OP_MOVE, FORM_QUERY) => Ok(Command::QueryTarget {
            index: parse_index(args)?,
        }),
        (OP_MOVE, FORM_ACTION) => {
            let (index, target) = args.split_once(FIELD_SEPARATOR).ok_or_else(|| {
                DcbError::malformed(format!("{} action needs '<idx>:<target>'", op))
            })?;
            Ok(Command::MoveTo {
                index: parse_index(index)?,
                target: parse_target(target)?,
            })
        }
        _ => Err(DcbError::malformed(format!(
            "{} does not support form '{}'",
            op, form
        ))),
    }
}

fn strip_terminator(line: &str) -> &str {
    match line.strip_suffix('\n') {
        Some(line) => line.strip_suffix('\r').unwrap_or(line),
        None => line,
    }
}

fn parse_index(field: &str) -> DcbResult<usize> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DcbError::malformed(format!("invalid unit index {:?}", field)));
    }
    field
        .parse()
        .map_err(|e| DcbError::malformed(format!("unit index {:?}: {}", field, e)))
}

fn parse_target(field: &str) -> DcbResult<i64> {
    let digits = field.strip_prefix('-').unwrap_or(field);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DcbError::malformed(format!(
            "invalid target position {:?}",
            field
        )));
    }
    field
        .parse()
        .map_err(|e| DcbError::malformed(format!("target position {:?}: {}", field, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_each_operation() {
        assert_eq!(
            parse_command("DOP?3"),
            Ok(Command::QueryDigitalOutput { index: 3 })
        );
        assert_eq!(parse_command("DSP:0"), Ok(Command::StartPour { index: 0 }));
        assert_eq!(parse_command("MSP?1"), Ok(Command::QueryTarget { index: 1 }));
        assert_eq!(
            parse_command("MSP:1:250"),
            Ok(Command::MoveTo {
                index: 1,
                target: 250
            })
        );
    }

    #[test]
    fn test_parse_multi_digit_and_negative_fields() {
        assert_eq!(
            parse_command("MSP:12:-40"),
            Ok(Command::MoveTo {
                index: 12,
                target: -40
            })
        );
        assert_eq!(
            parse_command("DOP?15"),
            Ok(Command::QueryDigitalOutput { index: 15 })
        );
    }

    #[test]
    fn test_parse_strips_one_line_terminator() {
        assert_eq!(parse_command("DSP:2\n"), Ok(Command::StartPour { index: 2 }));
        assert_eq!(
            parse_command("MSP?0\r\n"),
            Ok(Command::QueryTarget { index: 0 })
        );
        assert!(parse_command("MSP?0\n\n").is_err());
        assert!(parse_command("MSP?0 ").is_err());
    }

    #[test]
    fn test_unknown_operation() {
        assert_eq!(
            parse_command("XYZ?0"),
            Err(DcbError::UnknownOperation("XYZ".to_string()))
        );
        assert!(matches!(
            parse_command("dop?0"),
            Err(DcbError::UnknownOperation(_))
        ));
    }

    #[test]
    fn test_malformed_commands() {
        for line in [
            "",
            "DO",
            "DOP",
            "DOP?",
            "DOP?x",
            "DOP?-1",
            "DOP?+1",
            "DOP:1",
            "DSP?1",
            "DSP=1",
            "MSP:1",
            "MSP:1:",
            "MSP:1:abc",
            "MSP:1:5:6",
            "MSP:a:5",
            "MSP:1:99999999999999999999",
            "MSP?99999999999999999999999",
            "MSP?1:2",
        ] {
            assert!(
                matches!(parse_command(line), Err(DcbError::Malformed(_))),
                "expected malformed for {:?}, got {:?}",
                line,
                parse_command(line)
            );
        }
    }

    #[test]
    fn test_non_ascii_input_is_rejected() {
        assert!(parse_command("DÖP?1").is_err());
        assert!(parse_command("MSP?①").is_err());
    }

    #[test]
    fn test_command_index() {
        assert_eq!(
            Command::MoveTo {
                index: 4,
                target: 1
            }
            .index(),
            4
        );
        assert_eq!(Command::StartPour { index: 2 }.index(), 2);
    }
}
