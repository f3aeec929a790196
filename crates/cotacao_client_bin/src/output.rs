use quote_model::Quote;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Asks until the answer is `y` or `n`. End of input counts as `n`.
pub fn confirm_save<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<bool> {
    loop {
        write!(output, "Save data in file y/n: ")?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            return Ok(false);
        }

        match answer.trim() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => continue,
        }
    }
}

/// Overwrites `path` with the ask price line.
pub fn save_quote(path: &Path, quote: &Quote) -> io::Result<()> {
    fs::write(path, format!("Dólar: {}", quote.ask))
}
