use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::process::Command;

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};

use crate::error::{EnvError, Result};

pub(crate) fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| EnvError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads `path`, treating a missing file as `None`.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(EnvError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub(crate) fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|source| EnvError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// `$EDITOR`, if set to something other than whitespace.
pub(crate) fn editor_from_env() -> Option<String> {
    match env::var("EDITOR") {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

/// Runs `editor` on `path`. With `fullscreen` set, the alternate screen and
/// raw mode are left for the duration and restored afterwards.
pub(crate) fn run_editor_command(editor: &str, path: &Path, fullscreen: bool) -> Result<()> {
    let mut parts = editor.split_whitespace();
    let command = parts
        .next()
        .ok_or_else(|| EnvError::Editor("EDITOR is empty".to_string()))?;
    let args: Vec<&str> = parts.collect();

    if fullscreen {
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
    }

    let status_result = Command::new(command).args(&args).arg(path).status();

    let restore_result = if fullscreen {
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            Clear(ClearType::All),
            MoveTo(0, 0)
        )
        .and_then(|_| enable_raw_mode())
    } else {
        Ok(())
    };

    let status =
        status_result.map_err(|err| EnvError::Editor(format!("failed to start {command}: {err}")))?;
    restore_result?;
    if !status.success() {
        return Err(EnvError::Editor(format!("{command} exited with {status}")));
    }
    Ok(())
}
