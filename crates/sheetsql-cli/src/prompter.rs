//! Line-based prompts on a terminal.

use std::io::{self, BufRead, Write};

use camino::Utf8PathBuf;
use owo_colors::OwoColorize;
use sheetsql::{Error, Mode, Prompter, Result, TwoWay};

/// Asks questions on `output` and reads answers from `input`, one line at a
/// time. End of input aborts the run.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

fn terminal_error(source: io::Error) -> Error {
    Error::Io {
        path: Utf8PathBuf::from("<terminal>"),
        source,
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Result<String> {
        self.output.flush().map_err(terminal_error)?;
        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(terminal_error)?;
        if read == 0 {
            return Err(Error::Aborted);
        }
        Ok(line.trim().to_string())
    }

    /// Show numbered options until one is picked by number or by name.
    fn pick(&mut self, prompt: &str, options: &[&str]) -> Result<usize> {
        loop {
            writeln!(self.output, "{}", prompt.bold()).map_err(terminal_error)?;
            for (i, option) in options.iter().enumerate() {
                writeln!(self.output, "  {} {}", format!("[{}]", i + 1).cyan(), option)
                    .map_err(terminal_error)?;
            }
            write!(self.output, "> ").map_err(terminal_error)?;

            let answer = self.read_line()?;
            if let Ok(n) = answer.parse::<usize>()
                && (1..=options.len()).contains(&n)
            {
                return Ok(n - 1);
            }
            if let Some(i) = options
                .iter()
                .position(|o| o.eq_ignore_ascii_case(&answer))
            {
                return Ok(i);
            }
            writeln!(self.output, "{}", "Please pick one of the options.".yellow())
                .map_err(terminal_error)?;
        }
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn choose_mode(&mut self) -> Result<Mode> {
        let names = Mode::ALL.map(Mode::as_str);
        let picked = self.pick("What would you like to do?", &names)?;
        Ok(Mode::ALL[picked])
    }

    fn choose_two_way(&mut self, prompt: &str, first: &str, second: &str) -> Result<TwoWay> {
        match self.pick(prompt, &[first, second])? {
            0 => Ok(TwoWay::First),
            _ => Ok(TwoWay::Second),
        }
    }

    fn confirm(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}").map_err(terminal_error)
    }

    fn choose_from_list(&mut self, prompt: &str, items: &[String]) -> Result<String> {
        if items.is_empty() {
            writeln!(self.output, "{}", "Nothing to choose from.".red()).map_err(terminal_error)?;
            return Err(Error::Aborted);
        }
        let options: Vec<&str> = items.iter().map(String::as_str).collect();
        let picked = self.pick(prompt, &options)?;
        Ok(items[picked].clone())
    }

    fn enter_text(&mut self, prompt: &str, label: &str) -> Result<String> {
        writeln!(self.output, "{}", prompt.bold()).map_err(terminal_error)?;
        write!(self.output, "{label}: ").map_err(terminal_error)?;
        self.read_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompter(input: &str) -> TerminalPrompter<&[u8], Vec<u8>> {
        TerminalPrompter::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn test_pick_by_number_or_name() {
        let mut p = prompter("2\nscripts\n");
        assert_eq!(p.choose_mode().unwrap(), Mode::Template);
        assert_eq!(p.choose_mode().unwrap(), Mode::Scripts);
    }

    #[test]
    fn test_invalid_answer_asks_again() {
        let mut p = prompter("7\nmaybe\nexcel\n");
        assert_eq!(
            p.choose_two_way("Where?", "SQL", "Excel").unwrap(),
            TwoWay::Second
        );
        let shown = String::from_utf8(p.output).unwrap();
        assert_eq!(shown.matches("Please pick one of the options.").count(), 2);
    }

    #[test]
    fn test_end_of_input_aborts() {
        let mut p = prompter("");
        assert!(matches!(p.enter_text("Path?", "Path"), Err(Error::Aborted)));
        let mut p = prompter("");
        assert!(matches!(
            p.choose_from_list("Pick", &["a".to_string()]),
            Err(Error::Aborted)
        ));
    }

    #[test]
    fn test_list_and_text() {
        let mut p = prompter("Archive\n  out.sql  \n");
        let items = vec!["Plant".to_string(), "Archive".to_string()];
        assert_eq!(p.choose_from_list("Database", &items).unwrap(), "Archive");
        assert_eq!(p.enter_text("Save to", "Path").unwrap(), "out.sql");
    }
}
