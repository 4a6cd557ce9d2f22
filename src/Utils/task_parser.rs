//! Parameter files: one line of numbers in the order `Method::parameter_names` gives,
//! for example `2 3 1e-8 100` for the chord method. Values are separated by spaces, tabs
//! or commas. Comment lines (starting with //, #, % or ;) and blank lines are skipped, only
//! the first data line is read and tokens beyond the needed ones are ignored.
use crate::numerical::roots_api::{Method, MethodParams};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{space0, space1},
    multi::separated_list0,
    sequence::delimited,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParamError {
    #[error("cannot read parameter file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("console input failed: {0}")]
    Console(#[from] io::Error),
    #[error("no parameter line found")]
    Empty,
    #[error("{method} needs {expected} values ({names}), got {got}")]
    MissingFields {
        method: Method,
        expected: usize,
        got: usize,
        names: String,
    },
    #[error("{name} = '{token}' is not a number")]
    NotANumber { name: &'static str, token: String },
    #[error("maxIter = '{token}' is not a whole number")]
    NotAnInteger { token: String },
    #[error("invalid value of {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

fn parse_token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\r' | '\n')).parse(input)
}

/// splits one data line into raw tokens
pub fn parse_parameter_line(input: &str) -> IResult<&str, Vec<&str>> {
    let separator = alt((delimited(space0, tag(","), space0), space1));
    let mut parser = delimited(space0, separated_list0(separator, parse_token), space0);
    parser.parse(input)
}

/// first line that is neither blank nor a comment
fn first_data_line(input: &str) -> Option<&str> {
    input.lines().map(str::trim).find(|line| {
        !line.is_empty()
            && !line.starts_with("//")
            && !line.starts_with('#')
            && !line.starts_with('%')
            && !line.starts_with(';')
    })
}

fn parse_real(name: &'static str, token: &str) -> Result<f64, ParamError> {
    let value = token.parse::<f64>().map_err(|_| ParamError::NotANumber {
        name,
        token: token.to_string(),
    })?;
    if !value.is_finite() {
        return Err(ParamError::InvalidValue {
            name,
            reason: format!("{} is not a finite number", token),
        });
    }
    Ok(value)
}

fn parse_max_iter(token: &str) -> Result<usize, ParamError> {
    let value = token
        .parse::<usize>()
        .map_err(|_| ParamError::NotAnInteger {
            token: token.to_string(),
        })?;
    if value == 0 {
        return Err(ParamError::InvalidValue {
            name: "maxIter",
            reason: "must be positive".to_string(),
        });
    }
    Ok(value)
}

/// Converts raw tokens (file order) into the parameter bag of `method`.
pub fn params_from_tokens(method: Method, tokens: &[&str]) -> Result<MethodParams, ParamError> {
    let names = method.parameter_names();
    if tokens.len() < names.len() {
        return Err(ParamError::MissingFields {
            method,
            expected: names.len(),
            got: tokens.len(),
            names: names.join(" "),
        });
    }
    let (real_names, _) = names.split_at(names.len() - 1);
    let reals = real_names
        .iter()
        .zip(tokens)
        .map(|(name, token)| parse_real(*name, token))
        .collect::<Result<Vec<f64>, ParamError>>()?;
    let max_iter = parse_max_iter(tokens[names.len() - 1])?;
    let params = MethodParams::from_values(method, &reals, max_iter).ok_or(
        ParamError::MissingFields {
            method,
            expected: names.len(),
            got: tokens.len(),
            names: names.join(" "),
        },
    )?;
    let eps = params.config().tolerance;
    if eps <= 0.0 {
        return Err(ParamError::InvalidValue {
            name: "eps",
            reason: format!("must be positive, got {}", eps),
        });
    }
    Ok(params)
}

/// Reads the parameters of `method` from the text of a parameter file.
pub fn read_parameters(method: Method, text: &str) -> Result<MethodParams, ParamError> {
    let line = first_data_line(text).ok_or(ParamError::Empty)?;
    let (_, tokens) = parse_parameter_line(line).map_err(|_| ParamError::Empty)?;
    params_from_tokens(method, &tokens)
}

pub fn read_parameter_file(method: Method, path: &Path) -> Result<MethodParams, ParamError> {
    let text = fs::read_to_string(path).map_err(|source| ParamError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_parameters(method, &text)
}
