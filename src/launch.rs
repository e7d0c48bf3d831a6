use std::io;
use std::process::{Command, Stdio};

// Tries each platform handler in turn; the first one that spawns wins.
pub fn open_url(url: &str) -> io::Result<()> {
    let mut last_err = io::Error::new(io::ErrorKind::NotFound, "no url handler available");
    for mut command in handler_commands(url) {
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        match command.spawn() {
            Ok(_) => {
                tracing::debug!(url, handler = ?command.get_program(), "launched url handler");
                return Ok(());
            }
            Err(err) => last_err = err,
        }
    }
    Err(last_err)
}

fn handler_commands(url: &str) -> Vec<Command> {
    open::commands(url)
}
