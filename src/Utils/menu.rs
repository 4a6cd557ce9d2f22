//! Console menu: pick an equation or a system from the catalogue, pick a method, read the
//! parameters from a file or the keyboard, solve and show the report. Reads from any
//! `BufRead` and writes to any `Write`.
use crate::Examples::equation_catalogue::{EquationCatalogue, EquationKind};
use crate::Utils::logger::save_trace_to_csv;
use crate::Utils::param_source::ParameterSource;
use crate::Utils::plots::{PlotSettings, plot_equation, plot_system};
use crate::Utils::report::render_report;
use crate::Utils::settings::AppSettings;
use crate::numerical::nonlinear_functions::{SymbolicFunction, SymbolicSystem};
use crate::numerical::root_result::RootResult;
use crate::numerical::roots_api::{Equation, Method, solve};
use log::{info, warn};
use std::error::Error;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use strum::IntoEnumIterator;

enum Answer<T> {
    Value(T),
    Cancel,
    EndOfInput,
}

enum Flow {
    Continue,
    Quit,
}

pub struct Menu<'a, R: BufRead, W: Write> {
    catalogue: &'a EquationCatalogue,
    settings: &'a AppSettings,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(catalogue: &'a EquationCatalogue, settings: &'a AppSettings, input: R, output: W) -> Self {
        Self {
            catalogue,
            settings,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Main loop; returns on "3", "q" or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "\n1. Nonlinear equation\n2. Nonlinear system\n3. Exit")?;
            let Some(answer) = self.ask("Choose an option: ")? else {
                return Ok(());
            };
            let flow = match answer.as_str() {
                "1" => self.session(EquationKind::Scalar)?,
                "2" => self.session(EquationKind::System)?,
                "3" | "q" => return Ok(()),
                other => {
                    writeln!(self.output, "Unknown option '{}'", other)?;
                    Flow::Continue
                }
            };
            if let Flow::Quit = flow {
                return Ok(());
            }
        }
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn choose_equation(&mut self, kind: EquationKind) -> io::Result<Answer<usize>> {
        let catalogue = self.catalogue;
        let equations = catalogue.equations(kind);
        for (i, equation) in equations.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, equation)?;
        }
        loop {
            let Some(answer) = self.ask("Equation number (q to cancel): ")? else {
                return Ok(Answer::EndOfInput);
            };
            if answer == "q" {
                return Ok(Answer::Cancel);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=equations.len()).contains(&n) => return Ok(Answer::Value(n)),
                _ => writeln!(
                    self.output,
                    "Enter a number between 1 and {}",
                    equations.len()
                )?,
            }
        }
    }

    fn choose_method(&mut self, kind: EquationKind) -> io::Result<Answer<Method>> {
        let methods: Vec<Method> = match kind {
            EquationKind::Scalar => Method::iter().filter(|m| m.arity() == 1).collect(),
            EquationKind::System => return Ok(Answer::Value(Method::SystemFixedPoint)),
        };
        for (i, method) in methods.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, method.title())?;
        }
        loop {
            let Some(answer) = self.ask("Method (q to cancel): ")? else {
                return Ok(Answer::EndOfInput);
            };
            if answer == "q" {
                return Ok(Answer::Cancel);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=methods.len()).contains(&n) => {
                    return Ok(Answer::Value(methods[n - 1]));
                }
                _ => writeln!(self.output, "Enter a number between 1 and {}", methods.len())?,
            }
        }
    }

    fn choose_source(&mut self) -> io::Result<Answer<ParameterSource>> {
        loop {
            let Some(answer) = self.ask("Parameter source (file/console, q to cancel): ")? else {
                return Ok(Answer::EndOfInput);
            };
            match answer.to_lowercase().as_str() {
                "q" => return Ok(Answer::Cancel),
                "console" => return Ok(Answer::Value(ParameterSource::Console)),
                "file" => {
                    let Some(path) = self.ask("Parameter file: ")? else {
                        return Ok(Answer::EndOfInput);
                    };
                    return Ok(Answer::Value(ParameterSource::File(PathBuf::from(path))));
                }
                _ => writeln!(self.output, "Type 'file' or 'console'")?,
            }
        }
    }

    fn session(&mut self, kind: EquationKind) -> io::Result<Flow> {
        let number = match self.choose_equation(kind)? {
            Answer::Value(n) => n,
            Answer::Cancel => return Ok(Flow::Continue),
            Answer::EndOfInput => return Ok(Flow::Quit),
        };
        let catalogue = self.catalogue;
        let Some(equation) = catalogue.get(kind, number) else {
            return Ok(Flow::Continue);
        };
        let method = match self.choose_method(kind)? {
            Answer::Value(m) => m,
            Answer::Cancel => return Ok(Flow::Continue),
            Answer::EndOfInput => return Ok(Flow::Quit),
        };
        let source = match self.choose_source()? {
            Answer::Value(s) => s,
            Answer::Cancel => return Ok(Flow::Continue),
            Answer::EndOfInput => return Ok(Flow::Quit),
        };
        writeln!(
            self.output,
            "{} parameters: {}",
            method.title(),
            method.parameter_names().join(" ")
        )?;
        let params = match source.read(method, &mut self.input, &mut self.output) {
            Ok(params) => params,
            Err(e) => {
                writeln!(self.output, "\nCannot use these parameters: {}", e)?;
                return Ok(Flow::Continue);
            }
        };
        info!("solving {} with {}: {}", equation, method, params);
        match solve(equation, &params) {
            Ok(result) => {
                writeln!(
                    self.output,
                    "\n{}",
                    render_report(equation, &params, &result, self.settings.show_trace)
                )?;
                self.save_outputs(kind, number, equation, &result)?;
            }
            Err(e) => writeln!(self.output, "\nSolver error: {}", e)?,
        }
        Ok(Flow::Continue)
    }

    /// plot and trace files; failures are reported, never fatal
    fn save_outputs(
        &mut self,
        kind: EquationKind,
        number: usize,
        equation: &Equation,
        result: &RootResult,
    ) -> io::Result<()> {
        if !self.settings.plot && !self.settings.save_trace {
            return Ok(());
        }
        let dir = self.settings.plot_dir.clone();
        if let Err(e) = fs::create_dir_all(&dir) {
            warn!("cannot create directory {}: {}", dir.display(), e);
            return Ok(());
        }
        let stem = match kind {
            EquationKind::Scalar => format!("equation_{}_{}", number, result.method),
            EquationKind::System => format!("system_{}_{}", number, result.method),
        };
        if self.settings.save_trace {
            let path = dir.join(format!("{}_trace.csv", stem));
            match save_trace_to_csv(result, &path) {
                Ok(()) => writeln!(self.output, "Trace saved to {}", path.display())?,
                Err(e) => warn!("cannot save trace to {}: {}", path.display(), e),
            }
        }
        if self.settings.plot {
            let path = dir.join(format!("{}.png", stem));
            let settings = PlotSettings::default();
            let plotted: Result<(), Box<dyn Error>> = match equation {
                Equation::Single(single) => SymbolicFunction::from_equation(single)
                    .map_err(Box::<dyn Error>::from)
                    .and_then(|f| plot_equation(&f, result.value.as_scalar(), &path, &settings)),
                Equation::Pair(first, second) => SymbolicSystem::from_equations(first, second)
                    .map_err(Box::<dyn Error>::from)
                    .and_then(|s| plot_system(&s, result.value.as_pair(), &path, &settings)),
            };
            match plotted {
                Ok(()) => writeln!(self.output, "Plot saved to {}", path.display())?,
                Err(e) => warn!("cannot plot into {}: {}", path.display(), e),
            }
        }
        Ok(())
    }
}
