//! Console Commands
//!
//! The interactive form: each input line is one event. Edits only change
//! the form; inference runs on `predict` and nothing else.

use std::io::{self, BufRead, Write};

use crate::logic::features::{FormError, SensorForm, FEATURE_COUNT};
use crate::logic::model::ModelStore;
use crate::logic::pipeline::{self, PredictionResult};
use super::render;

const HELP: &str = "\
Commands:
  set <field> <value>     set a sensor (field = 1-12 or name, e.g. `set pH 6.5`)
  inc <field> / dec <field>   step a sensor up or down
  values <v1> ... <v12>   set all twelve sensors in panel order
  show                    redraw the sensor panel
  reset                   restore all defaults
  predict                 🔍 Predict AQI & Quality
  json                    last prediction as JSON
  status                  loaded model artifacts
  help                    this text
  quit                    leave";

// ============================================================================
// COMMAND PARSING
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set { field: String, value: f64 },
    Increment(String),
    Decrement(String),
    SetAll(Vec<f64>),
    Show,
    Reset,
    Predict,
    Json,
    Status,
    Help,
    Quit,
    Empty,
}

/// Input line that isn't a valid command
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown command '{0}' - type `help`")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a number")]
    NotANumber(String),
}

fn parse_number(token: &str) -> Result<f64, ParseError> {
    token
        .parse::<f64>()
        .map_err(|_| ParseError::NotANumber(token.to_string()))
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((verb, args)) = tokens.split_first() else {
            return Ok(Command::Empty);
        };

        match verb.to_lowercase().as_str() {
            "set" => {
                // Field names may contain spaces ("wind speed"), the value is last
                let (value, field) = args
                    .split_last()
                    .filter(|(_, field)| !field.is_empty())
                    .ok_or(ParseError::Usage("set <field> <value>"))?;
                Ok(Command::Set {
                    field: field.join(" "),
                    value: parse_number(value)?,
                })
            }
            "inc" | "+" if !args.is_empty() => Ok(Command::Increment(args.join(" "))),
            "dec" | "-" if !args.is_empty() => Ok(Command::Decrement(args.join(" "))),
            "inc" | "+" => Err(ParseError::Usage("inc <field>")),
            "dec" | "-" => Err(ParseError::Usage("dec <field>")),
            "values" => {
                if args.len() != FEATURE_COUNT {
                    return Err(ParseError::Usage("values <v1> ... <v12>"));
                }
                let values = args.iter().map(|t| parse_number(t)).collect::<Result<Vec<_>, _>>()?;
                Ok(Command::SetAll(values))
            }
            "show" | "panel" => Ok(Command::Show),
            "reset" => Ok(Command::Reset),
            "predict" | "p" => Ok(Command::Predict),
            "json" => Ok(Command::Json),
            "status" => Ok(Command::Status),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// Whether the loop keeps reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// One user's form state plus the result currently on screen
#[derive(Debug, Default)]
pub struct Session {
    form: SensorForm,
    last_result: Option<PredictionResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &SensorForm {
        &self.form
    }

    pub fn last_result(&self) -> Option<&PredictionResult> {
        self.last_result.as_ref()
    }

    /// Apply one command
    pub fn handle(&mut self, store: &ModelStore, command: Command, out: &mut impl Write) -> io::Result<Flow> {
        match command {
            Command::Set { field, value } => {
                let stored = SensorForm::resolve(&field).and_then(|index| {
                    self.form.set(index, value).map(|stored| (index, stored))
                });
                report_edit(out, stored)?;
            }
            Command::Increment(field) => {
                let stored = SensorForm::resolve(&field)
                    .and_then(|index| self.form.step_up(index).map(|stored| (index, stored)));
                report_edit(out, stored)?;
            }
            Command::Decrement(field) => {
                let stored = SensorForm::resolve(&field)
                    .and_then(|index| self.form.step_down(index).map(|stored| (index, stored)));
                report_edit(out, stored)?;
            }
            Command::SetAll(values) => match self.form.set_all(&values) {
                Ok(()) => render::panel(out, &self.form)?,
                Err(e) => writeln!(out, "{}", e)?,
            },
            Command::Show => render::panel(out, &self.form)?,
            Command::Reset => {
                self.form.reset();
                render::panel(out, &self.form)?;
            }
            Command::Predict => {
                // Result from the previous trigger is gone either way
                self.last_result = None;
                match pipeline::predict(store, &self.form.vector()) {
                    Ok(result) => {
                        render::prediction(out, &result)?;
                        self.last_result = Some(result);
                    }
                    Err(e) => {
                        log::error!("Prediction failed: {}", e);
                        render::prediction_error(out, &e)?;
                    }
                }
            }
            Command::Json => match self.last_result() {
                Some(result) => {
                    let json = serde_json::to_string_pretty(result)
                        .map_err(io::Error::other)?;
                    writeln!(out, "{}", json)?;
                }
                None => writeln!(out, "No prediction yet - type `predict`")?,
            },
            Command::Status => render::status(out, store.metadata())?,
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Stop),
            Command::Empty => {}
        }

        Ok(Flow::Continue)
    }
}

/// Echo the stored (possibly clamped) value of an edited field
fn report_edit(out: &mut impl Write, edit: Result<(usize, f64), FormError>) -> io::Result<()> {
    match edit.and_then(|(index, stored)| SensorForm::spec(index).map(|spec| (spec, stored))) {
        Ok((spec, stored)) => writeln!(out, "{} = {:.prec$}", spec.label(), stored, prec = spec.precision()),
        Err(e) => writeln!(out, "{}", e),
    }
}

/// Read commands until EOF or `quit`
pub fn run_session(store: &ModelStore, input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
    let mut session = Session::new();

    render::header(out)?;
    render::panel(out, session.form())?;
    writeln!(out, "Type `help` for commands, `predict` to run the models.")?;

    for line in input.lines() {
        let line = line?;
        let flow = match Command::parse(&line) {
            Ok(command) => session.handle(store, command, out)?,
            Err(e) => {
                writeln!(out, "{}", e)?;
                Flow::Continue
            }
        };
        out.flush()?;

        if flow == Flow::Stop {
            break;
        }
    }

    render::footer(out)
}

// ============================================================================
// TESTS
// ============================================================================
