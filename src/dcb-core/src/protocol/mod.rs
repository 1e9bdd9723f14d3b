// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Wire format of the board protocol.
//!
//! Requests are single lines addressed by position: a three letter op code,
//! a form byte (`?` query, `:` action) and `:`-separated decimal fields.
//! Every request is answered by exactly one newline-terminated line.

pub mod command;
pub mod response;

pub use command::{parse_command, Command};
pub use response::{Response, DELIMITER};
