use crate::Utils::task_parser::{ParamError, params_from_tokens, read_parameter_file};
use crate::numerical::roots_api::{Method, MethodParams};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Where the parameters of a solve come from
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterSource {
    File(PathBuf),
    Console,
}

impl ParameterSource {
    pub fn read<R: BufRead, W: Write>(
        &self,
        method: Method,
        input: &mut R,
        output: &mut W,
    ) -> Result<MethodParams, ParamError> {
        match self {
            ParameterSource::File(path) => read_parameter_file(method, path),
            ParameterSource::Console => prompt_parameters(method, input, output),
        }
    }
}

/// Asks for every parameter of `method` in turn. The first token of each answer is used;
/// values go through the same checks as a parameter file.
pub fn prompt_parameters<R: BufRead, W: Write>(
    method: Method,
    input: &mut R,
    output: &mut W,
) -> Result<MethodParams, ParamError> {
    let mut answers: Vec<String> = Vec::new();
    for name in method.parameter_names() {
        write!(output, "{} = ", name)?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        match line.split_whitespace().next() {
            Some(token) => answers.push(token.to_string()),
            None => break,
        }
    }
    let tokens: Vec<&str> = answers.iter().map(String::as_str).collect();
    params_from_tokens(method, &tokens)
}
