//! Interactive confirmation gate for destructive operations.

use std::io::{self, BufRead, Write};

/// Ask `question` and wait for an answer. Only a literal `y` confirms;
/// anything else, including end of input, declines.
pub fn confirm<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> io::Result<bool> {
    writeln!(output, "{question}")?;
    write!(output, "y/n: ")?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        writeln!(output)?;
        return Ok(false);
    }
    Ok(answer.trim() == "y")
}

/// [`confirm`] against the process's stdin and stdout.
pub fn confirm_on_terminal(question: &str) -> io::Result<bool> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    confirm(question, &mut stdin.lock(), &mut stdout.lock())
}
