use std::{
    fmt::Display,
    io::{BufRead, Write},
};

use crate::Error;

/// Line-oriented terminal conversation. Generic over the reader and writer so
/// a run can be driven from in-memory buffers.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R, W> Prompt<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Shows `question` and returns the trimmed answer. End of input counts
    /// as an empty answer.
    pub fn ask(&mut self, question: &str) -> Result<String, Error> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_owned())
    }

    pub fn say(&mut self, message: impl Display) -> Result<(), Error> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }
}
