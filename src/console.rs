use std::io::{self, BufRead, Write};

use frontend::pages::Confirm;

/// Prints `label` and reads one trimmed line from stdin.
pub fn prompt(label: &str) -> io::Result<String> {
    let mut out = io::stdout().lock();
    write!(out, "{}: ", label)?;
    out.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Like [`prompt`], but an empty answer yields `default`.
pub fn prompt_or(label: &str, default: &str) -> io::Result<String> {
    let answer = prompt(&format!("{} [{}]", label, default))?;
    Ok(if answer.is_empty() { default.to_string() } else { answer })
}

/// Reads lines until an empty one.
pub fn prompt_multiline(label: &str) -> io::Result<String> {
    println!("{} (finish with an empty line):", label);
    let mut lines = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

/// y/N confirmation on stdin; anything but "y" or "yes" declines.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt_text: &str) -> bool {
        match prompt(&format!("{} [y/N]", prompt_text)) {
            Ok(answer) => matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}
