use std::io::{BufRead, Write};

use tracing::debug;

use crate::command::{Command, CORE_CATEGORY, USAGE_LEARN};
use crate::error::Result;
use crate::log::MemoryLog;

/// How a console session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Farewell,
    EndOfInput,
}

/// Line-oriented console over any reader/writer pair.
pub struct Session<R, W> {
    input: R,
    output: W,
    prompt: String,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            prompt: "> ".into(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Reads commands until a farewell or end of input.
    pub fn run(&mut self, log: &mut MemoryLog) -> Result<SessionEnd> {
        self.say(&format!("systems online. {} memories active.", log.len()))?;
        let mut line = String::new();
        loop {
            write!(self.output, "{}", self.prompt)?;
            self.output.flush()?;
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(SessionEnd::EndOfInput);
            }
            let command = Command::parse(&line);
            debug!(?command, "console input");
            if !self.execute(log, command)? {
                return Ok(SessionEnd::Farewell);
            }
        }
    }

    /// Applies one command. Returns `false` once the session should end.
    pub fn execute(&mut self, log: &mut MemoryLog, command: Command) -> Result<bool> {
        match command {
            Command::Exit => {
                self.say("entering hibernation. memories secured.")?;
                return Ok(false);
            }
            Command::SaveCore(text) => {
                let record = log.commit(CORE_CATEGORY, &text)?;
                writeln!(self.output, "   > writing memory [{}]... ok.", record.category)?;
                self.say("this is a truth. I have kept it.")?;
            }
            Command::Learn { category, fact } => {
                let record = log.commit(&category, &fact)?;
                writeln!(self.output, "   > writing memory [{}]... ok.", record.category)?;
                self.say("integrated.")?;
            }
            Command::LearnUsage => writeln!(self.output, "[system] {USAGE_LEARN}")?,
            Command::Recall(keyword) => {
                writeln!(self.output, "[searching] query: '{keyword}'")?;
                let found = log.recall(&keyword);
                if found.is_empty() {
                    writeln!(self.output, "   > [null] no data found in deep storage.")?;
                }
                for record in found {
                    writeln!(self.output, "   > [{}] {}", record.category, record.content)?;
                }
            }
            Command::Chat(_) => self.say("I am listening. Command unrecognized, but I am here.")?,
        }
        Ok(true)
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "[motes] {text}")?;
        Ok(())
    }
}
