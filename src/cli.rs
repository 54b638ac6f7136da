//! Command-line surface of the `predict` binary.
//!
//! Every field is resolved on its own: an explicit flag wins, then the
//! built-in default when `--defaults` is given, then an interactive prompt.
//! Without a terminal the missing field is fatal.

use std::io::{self, BufRead, Write};

use clap::Parser;

use crate::config::PredictDefaults;
use crate::error::{PipelineError, Result};
use crate::record::FeatureRecord;

/// Predict the price of a single house with the trained pipeline.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "predict", version)]
pub struct PredictArgs {
    /// Living area in square feet
    #[arg(long)]
    pub area: Option<i64>,

    /// Number of bedrooms
    #[arg(long)]
    pub bedrooms: Option<i64>,

    /// Number of bathrooms
    #[arg(long)]
    pub bathrooms: Option<i64>,

    /// Year of construction
    #[arg(long = "year_built")]
    pub year_built: Option<i64>,

    /// Years since construction
    #[arg(long)]
    pub age: Option<i64>,

    /// City the house is in
    #[arg(long, value_parser = non_blank)]
    pub location: Option<String>,

    /// Use sample default values for missing inputs
    #[arg(long)]
    pub defaults: bool,
}

impl PredictArgs {
    /// Resolve all six fields into a record.
    ///
    /// `interactive` says whether a terminal is attached; when it is false the
    /// prompter is never touched.
    pub fn resolve<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
        interactive: bool,
    ) -> Result<FeatureRecord> {
        let mut int_field = |name: &'static str, flag: Option<i64>, default: i64| {
            self.resolve_int(prompter, interactive, name, flag, default)
        };
        let area = int_field("area", self.area, PredictDefaults::AREA)?;
        let bedrooms = int_field("bedrooms", self.bedrooms, PredictDefaults::BEDROOMS)?;
        let bathrooms = int_field("bathrooms", self.bathrooms, PredictDefaults::BATHROOMS)?;
        let year_built = int_field("year_built", self.year_built, PredictDefaults::YEAR_BUILT)?;
        let age = int_field("age", self.age, PredictDefaults::AGE)?;

        let location = match &self.location {
            Some(location) => location.clone(),
            None if self.defaults => PredictDefaults::LOCATION.to_string(),
            None if !interactive => return Err(PipelineError::MissingArgument { name: "location" }),
            None => prompter.require_text("location").map_err(PipelineError::Terminal)?,
        };

        Ok(FeatureRecord {
            area,
            bedrooms,
            bathrooms,
            year_built,
            age,
            location,
        })
    }

    fn resolve_int<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
        interactive: bool,
        name: &'static str,
        flag: Option<i64>,
        default: i64,
    ) -> Result<i64> {
        if let Some(value) = flag {
            return Ok(value);
        }
        if self.defaults {
            return Ok(default);
        }
        if !interactive {
            return Err(PipelineError::MissingArgument { name });
        }
        prompter.require_int(name).map_err(PipelineError::Terminal)
    }
}

fn non_blank(value: &str) -> std::result::Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("location must not be empty".to_string());
    }
    Ok(value.to_string())
}

/// Line-oriented prompts over any reader/writer pair.
///
/// End of input reads as an empty line.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self, name: &str) -> io::Result<String> {
        write!(self.output, "{name}: ")?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    /// One attempt at an integer. Empty input yields `None`; so does
    /// unparseable input, after a notice that the default will be used.
    pub fn prompt_int(&mut self, name: &str) -> io::Result<Option<i64>> {
        let value = self.read_line(name)?;
        if value.is_empty() {
            return Ok(None);
        }
        match value.parse() {
            Ok(v) => Ok(Some(v)),
            Err(_) => {
                writeln!(self.output, "Invalid input, using default.")?;
                Ok(None)
            }
        }
    }

    /// Ask until a valid integer is given. The "using default" notice from
    /// [`prompt_int`](Self::prompt_int) never actually falls back: every
    /// `None` asks again.
    pub fn require_int(&mut self, name: &str) -> io::Result<i64> {
        let mut value = self.prompt_int(name)?;
        loop {
            if let Some(v) = value {
                return Ok(v);
            }
            writeln!(
                self.output,
                "Please enter a valid integer for {name} (try again)"
            )?;
            value = self.prompt_int(name)?;
        }
    }

    /// Ask until a non-empty value is given.
    pub fn require_text(&mut self, name: &str) -> io::Result<String> {
        let mut value = self.read_line(name)?;
        while value.is_empty() {
            writeln!(
                self.output,
                "Please enter a non-empty value for {name} (try again)"
            )?;
            value = self.read_line(name)?;
        }
        Ok(value)
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }
}

/// Render a prediction for display: truncated to an integer when it fits,
/// the raw value otherwise.
pub fn display_price(prediction: f64) -> String {
    if prediction.is_finite() && prediction.abs() < i64::MAX as f64 {
        (prediction.trunc() as i64).to_string()
    } else {
        prediction.to_string()
    }
}
