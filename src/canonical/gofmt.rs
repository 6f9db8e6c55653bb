use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;
use tracing::debug;

use super::Canonicalize;

/// Formats through an external `gofmt` process, which also rejects anything
/// that is not syntactically valid Go.
pub struct Gofmt {
    program: String,
}

impl Gofmt {
    pub fn new() -> Gofmt {
        Gofmt {
            program: "gofmt".to_string(),
        }
    }

    /// Use a different executable, for example an absolute path to gofmt.
    pub fn with_program(program: &str) -> Gofmt {
        Gofmt {
            program: program.to_string(),
        }
    }
}

impl Default for Gofmt {
    fn default() -> Self {
        Gofmt::new()
    }
}

impl Canonicalize for Gofmt {
    fn canonicalize(&self, text: &str) -> Result<String, String> {
        debug!("Running {}", self.program);

        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|error| format!("failed to start {}: {}", self.program, error))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| format!("failed to open stdin of {}", self.program))?;

        // Feed input from another thread so a large file can't deadlock
        // against a full stdout pipe.
        let input = text.to_string();
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child
            .wait_with_output()
            .map_err(|error| format!("failed waiting for {}: {}", self.program, error))?;

        let written = writer.join();

        debug!("Process output: {:?}", output.status);

        // gofmt's own complaint is more useful than the broken pipe it
        // causes when it exits early.
        if !output
            .status
            .success()
        {
            return Err(String::from_utf8_lossy(&output.stderr)
                .trim()
                .to_string());
        }

        match written {
            Ok(Ok(())) => {}
            Ok(Err(error)) => {
                return Err(format!("failed writing to {}: {}", self.program, error));
            }
            Err(_) => return Err(format!("writer for {} panicked", self.program)),
        }

        String::from_utf8(output.stdout)
            .map_err(|error| format!("{} produced invalid UTF-8: {}", self.program, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_an_error() {
        let gofmt = Gofmt::with_program("/nonexistent/gofmt");
        let result = gofmt.canonicalize("package main\n");

        let problem = result.unwrap_err();
        assert!(problem.starts_with("failed to start /nonexistent/gofmt"));
    }
}
