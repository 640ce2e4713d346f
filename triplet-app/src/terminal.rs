use std::io::{BufRead, Write};

use triplet_core::{Response, Stimulus, TrialType};
use triplet_experiment::{ExperimentError, Presenter, Screen};

/// Presents screens on a text console. Button screens list numbered
/// choices and re-prompt until a valid number is entered.
pub struct TerminalPresenter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPresenter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> Result<String, ExperimentError> {
        let mut line = String::new();
        let n = self.input.read_line(&mut line).map_err(io_err)?;
        if n == 0 {
            return Err(ExperimentError::Presenter("input closed".into()));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl<R: BufRead, W: Write> Presenter for TerminalPresenter<R, W> {
    fn present(&mut self, screen: &Screen) -> Result<Option<Response>, ExperimentError> {
        writeln!(self.output, "\n{}", strip_tags(&screen.stimulus)).map_err(io_err)?;

        if screen.trial_type == TrialType::SurveyText {
            write!(self.output, "> ").map_err(io_err)?;
            self.output.flush().map_err(io_err)?;
            let line = self.read_line()?;
            return Ok(Some(Response::text(line.trim())));
        }

        if !screen.trial_type.takes_buttons() {
            write!(self.output, "[Enter] ").map_err(io_err)?;
            self.output.flush().map_err(io_err)?;
            let line = self.read_line()?;
            let key = line.chars().next().map(String::from).unwrap_or_else(|| "Enter".into());
            return Ok(Some(Response::Key(key)));
        }

        for (i, choice) in screen.choices.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, choice.label()).map_err(io_err)?;
        }
        loop {
            write!(self.output, "> ").map_err(io_err)?;
            self.output.flush().map_err(io_err)?;
            let line = self.read_line()?;
            match line.trim().parse::<usize>() {
                Ok(n) if (1..=screen.choices.len()).contains(&n) => {
                    return Ok(Some(Response::Button(n - 1)));
                }
                _ => writeln!(self.output, "Enter a number from 1 to {}", screen.choices.len())
                    .map_err(io_err)?,
            }
        }
    }

    fn finish(&mut self, message: &str) -> Result<(), ExperimentError> {
        writeln!(self.output, "\n{}", strip_tags(message)).map_err(io_err)
    }
}

fn io_err(e: std::io::Error) -> ExperimentError {
    ExperimentError::Presenter(e.to_string())
}

/// Drops markup, turning block-level breaks into newlines.
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut tag = String::new();
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                let name = tag.trim_start_matches('/').split_whitespace().next().unwrap_or("");
                if matches!(name, "br" | "p" | "div" | "h2") && !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            _ if in_tag => tag.push(c),
            _ => out.push(c),
        }
    }
    out.trim().to_string()
}
