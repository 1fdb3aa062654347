// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Grammars of the `cross` and `++` commands.
//!
//! ```text
//! cross  [-v] <command>
//! ++ [ws] <token> [-v] [<command>]
//! all <project>/<command> ...
//!    token = [<version>][=<home>][!]
//!
//! "crossbuild"  --> NoMatch  (keyword must end at whitespace / end of input)
//! "+++2.13"     --> NoMatch  (marker must not run into another '+')
//! ```
//!
//! `NoMatch` lets the dispatcher try the next grammar; every other
//! [`ParseError`] is reported to the user.


use std::path::PathBuf;

use super::{BATCH_KEYWORD, CROSS_KEYWORD, CrossArgs, SWITCH_MARKER, SwitchArgs, VERBOSE_FLAG, VersionSpec};
use crate::error::ParseError;
use crate::graph::ProjectRef;

/// Parses `cross [-v] <command>`.
///
/// # Errors
///
/// `ParseError::NoMatch` when the input is not a cross command,
/// `ParseError::MissingCommand` when no command follows.
pub fn parse_cross(input: &str) -> Result<CrossArgs, ParseError> {
    let rest = strip_keyword(input.trim_start(), CROSS_KEYWORD).ok_or(ParseError::NoMatch {
        grammar: CROSS_KEYWORD,
    })?;

    let (verbose, rest) = take_verbose(rest.trim_start());
    let command = rest.trim();
    if command.is_empty() {
        return Err(ParseError::MissingCommand {
            keyword: CROSS_KEYWORD,
        });
    }

    Ok(CrossArgs {
        command: command.to_string(),
        verbose,
    })
}

/// Parses `++<version>[!][=<home>] [-v] [<command>]`.
///
/// # Errors
///
/// `ParseError::NoMatch` when the input is not a switch command,
/// `ParseError::MissingVersion` when the marker stands alone, and
/// `ParseError::InvalidVersion` for an unusable version token.
pub fn parse_switch(input: &str) -> Result<SwitchArgs, ParseError> {
    let no_match = ParseError::NoMatch {
        grammar: SWITCH_MARKER,
    };
    let rest = input.trim_start().strip_prefix(SWITCH_MARKER).ok_or(no_match.clone())?;
    if rest.starts_with('+') {
        return Err(no_match);
    }

    let rest = rest.trim_start();
    if rest.is_empty() {
        return Err(ParseError::MissingVersion {
            marker: SWITCH_MARKER,
        });
    }

    let token_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let (token, rest) = rest.split_at(token_end);
    let spec = parse_version_token(token)?;

    let (verbose, rest) = take_verbose(rest.trim_start());
    let command = rest.trim();

    Ok(SwitchArgs {
        spec,
        verbose,
        command: (!command.is_empty()).then(|| command.to_string()),
    })
}

/// Parses `all <project>/<command> ...` into its qualified entries.
///
/// Entries are separated by whitespace, so batched commands are single words.
/// A project without `{unit}` belongs to `default_unit`.
///
/// # Errors
///
/// `ParseError::NoMatch` when the input is not a batch,
/// `ParseError::MissingCommand` when it lists nothing, and
/// `ParseError::Unqualified` for an entry without a project.
pub fn parse_batch<'a>(
    input: &'a str,
    default_unit: &str,
) -> Result<Vec<(ProjectRef, &'a str)>, ParseError> {
    let rest = strip_keyword(input.trim_start(), BATCH_KEYWORD).ok_or(ParseError::NoMatch {
        grammar: BATCH_KEYWORD,
    })?;

    let entries = rest
        .split_whitespace()
        .map(|token| {
            ProjectRef::split_qualified(token, default_unit)
                .filter(|(_, command)| !command.is_empty())
                .ok_or_else(|| ParseError::Unqualified {
                    token: token.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if entries.is_empty() {
        return Err(ParseError::MissingCommand {
            keyword: BATCH_KEYWORD,
        });
    }
    Ok(entries)
}

fn parse_version_token(token: &str) -> Result<VersionSpec, ParseError> {
    let invalid = |message: &str| ParseError::InvalidVersion {
        token: token.to_string(),
        message: message.to_string(),
    };

    let (body, force) = match token.strip_suffix('!') {
        Some(body) => (body, true),
        None => (token, false),
    };
    if body.is_empty() {
        return Err(invalid("version is empty"));
    }
    if body.starts_with('-') {
        return Err(invalid("version must not start with '-'"));
    }

    match body.split_once('=') {
        Some((_, "")) => Err(invalid("home path after '=' is empty")),
        Some((version, home)) => Ok(VersionSpec::Home {
            home: PathBuf::from(home),
            version_override: (!version.is_empty()).then(|| version.to_string()),
            force,
        }),
        None => Ok(VersionSpec::Named {
            name: body.to_string(),
            force,
        }),
    }
}

/// A command split on its project qualifier, if it has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualified<'a> {
    /// No `<project>/` prefix; targets the current aggregate.
    Plain(&'a str),
    /// `<project>/<remainder>`.
    Project { project: &'a str, remainder: &'a str },
}

/// Splits `<identifier>/<anything>`; anything else is [`Qualified::Plain`].
#[must_use]
pub fn parse_project_qualified(command: &str) -> Qualified<'_> {
    match command.split_once('/') {
        Some((project, remainder)) if is_identifier(project) => {
            Qualified::Project { project, remainder }
        }
        _ => Qualified::Plain(command),
    }
}

/// `[A-Za-z_][A-Za-z0-9_-]*`
#[must_use]
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Returns the text after `keyword` if the keyword ends at whitespace or end of input.
fn strip_keyword<'a>(input: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = input.strip_prefix(keyword)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest),
        Some(_) => None,
    }
}

fn take_verbose(input: &str) -> (bool, &str) {
    strip_keyword(input, VERBOSE_FLAG).map_or((false, input), |rest| (true, rest.trim_start()))
}
