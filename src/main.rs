mod commands;
mod error;
mod execute;
mod redirection;
mod resolve;
mod tokenize;

use std::io::{self, BufRead, Write};

use anyhow::Context;

use crate::commands::Flow;

const PROMPT: &str = "$ ";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let stdin = io::stdin();
    let mut input = Vec::new();
    loop {
        print!("{}", PROMPT);
        io::stdout().flush().context("failed to write prompt")?;

        input.clear();
        let read = stdin
            .lock()
            .read_until(b'\n', &mut input)
            .context("failed to read input")?;
        if read == 0 {
            log::debug!("end of input");
            return Ok(());
        }
        // Bytes that are not UTF-8 become U+FFFD.
        let text = String::from_utf8_lossy(&input);
        let line = text.trim_end_matches(['\n', '\r']);

        match execute::run_line(line) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit(code)) => {
                io::stdout().flush().context("failed to flush output")?;
                std::process::exit(code);
            }
            Err(e) => eprintln!("{}", e),
        }
    }
}
