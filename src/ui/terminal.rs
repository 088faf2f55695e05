use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use anyhow::{Context, Result};

/// Marker printed after every prompt.
const PROMPT_MARKER: &str = ":->";

/// Line-oriented console. Reads one answer per prompt and writes plain lines;
/// generic so tests can script the input and capture the output.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<BufReader<Stdin>, Stdout> {
    /// Console bound to the process's standard streams.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Write one line of output.
    pub fn say(&mut self, line: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", line.as_ref()).context("failed to write to terminal")
    }

    pub fn say_all<I, S>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.say(line)?;
        }
        Ok(())
    }

    /// Print `prompt` and wait for one line. Returns `None` once the input is
    /// exhausted. The trailing newline is stripped; the rest of the line is
    /// returned as typed, with invalid UTF-8 replaced rather than rejected.
    pub fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        if !prompt.is_empty() {
            writeln!(self.output, "{prompt}").context("failed to write prompt")?;
        }
        write!(self.output, "{PROMPT_MARKER}").context("failed to write prompt")?;
        self.output.flush().context("failed to flush terminal")?;

        let mut raw = Vec::new();
        let read = self
            .input
            .read_until(b'\n', &mut raw)
            .context("failed to read from terminal")?;
        if read == 0 {
            return Ok(None);
        }
        // Terminals in a legacy code page can send bytes that are not UTF-8.
        let mut line = String::from_utf8_lossy(&raw).into_owned();
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn prompt_reads_lines_until_eof() {
        let mut console = Console::new(Cursor::new("first\r\n Second \n"), Vec::new());
        assert_eq!(console.prompt("one").unwrap().as_deref(), Some("first"));
        assert_eq!(console.prompt("").unwrap().as_deref(), Some(" Second "));
        assert_eq!(console.prompt("three").unwrap(), None);

        let output = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(output, "one\n:->:->three\n:->");
    }

    #[test]
    fn non_utf8_input_is_read_lossily() {
        let mut console = Console::new(Cursor::new(b"s \x82\xa0\nq\n".to_vec()), Vec::new());
        let line = console.prompt("").unwrap().unwrap();
        assert!(line.starts_with("s "));
        assert!(line.contains(char::REPLACEMENT_CHARACTER));
        assert_eq!(console.prompt("").unwrap().as_deref(), Some("q"));
        assert_eq!(console.prompt("").unwrap(), None);
    }

    #[test]
    fn say_all_writes_each_line() {
        let mut console = Console::new(Cursor::new(""), Vec::new());
        console.say_all(["a", "b"]).unwrap();
        assert_eq!(String::from_utf8(console.into_output()).unwrap(), "a\nb\n");
    }
}
