//! The copy-template flow: locate, pick, check the target, write, fill
//! placeholders, then register the target in `.gitignore`.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{EnvError, Result};
use crate::gitignore::{Prompt, ensure_ignored};
use crate::locator::locate_templates;
use crate::models::{PlaceholderMarker, Severity, TemplateFile};
use crate::parser::process_template;
use crate::system::{read_file, write_file};

pub(crate) const TARGET_NAME: &str = ".env";

const EXISTING_CHOICES: [&str; 3] = ["Open", "Overwrite", "Cancel"];

/// Everything the flow needs from the user.
pub(crate) trait Host: Prompt {
    /// Pick one of several templates. `None` when dismissed.
    fn select_template(&mut self, templates: &[TemplateFile]) -> Result<Option<usize>>;

    fn open_existing(&mut self, path: &Path) -> Result<()>;

    /// Walks the user through the tab stops of `snippet` in order.
    ///
    /// Returns the filled text, or `None` when the session was abandoned.
    fn insert_interactive_template(
        &mut self,
        snippet: &str,
        stops: &[PlaceholderMarker],
    ) -> Result<Option<String>>;

    fn notify(&mut self, severity: Severity, message: &str);
}

#[derive(Clone, Debug)]
pub(crate) struct Options {
    pub(crate) interactive: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { interactive: true }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Created {
        target: PathBuf,
        filled: bool,
        ignored: bool,
    },
    OpenedExisting(PathBuf),
    Cancelled,
}

pub(crate) fn run<H: Host + ?Sized>(
    root: &Path,
    options: &Options,
    host: &mut H,
) -> Result<Outcome> {
    if !root.is_dir() {
        return Err(EnvError::NoWorkspace(root.to_path_buf()));
    }

    let mut templates = locate_templates(root);
    info!("found {} template(s) under {}", templates.len(), root.display());
    let template = match templates.len() {
        0 => return Err(EnvError::NoTemplateFound(root.to_path_buf())),
        1 => templates.remove(0),
        _ => match host.select_template(&templates)? {
            Some(index) if index < templates.len() => templates.swap_remove(index),
            _ => {
                debug!("template selection dismissed");
                return Ok(Outcome::Cancelled);
            }
        },
    };
    debug!("using template {}", template.path.display());

    let target = template
        .path
        .parent()
        .unwrap_or(root)
        .join(TARGET_NAME);
    let target_label = display_relative(root, &target);

    if target.exists() {
        let message = format!("{target_label} already exists.");
        match host.ask(Severity::Warning, &message, &EXISTING_CHOICES)? {
            Some(0) => {
                host.open_existing(&target)?;
                return Ok(Outcome::OpenedExisting(target));
            }
            Some(1) => debug!("overwriting {}", target.display()),
            _ => return Ok(Outcome::Cancelled),
        }
    }

    let content = read_file(&template.path)?;
    let processed = process_template(&content);
    write_file(&target, &processed.plain)?;
    info!("wrote {} bytes to {}", processed.plain.len(), target.display());

    let mut filled = false;
    let mut message = format!("Created {target_label} from {}", template.relative);
    if processed.has_placeholder() {
        if options.interactive {
            if let Some(text) =
                host.insert_interactive_template(&processed.snippet, &processed.markers)?
            {
                write_file(&target, &text)?;
                filled = true;
            }
        } else if let Some(offset) = processed.first_offset {
            let (line, column) = line_column(&processed.plain, offset);
            message.push_str(&format!(
                ", {} placeholder(s) to fill, first at {line}:{column}",
                processed.markers.len()
            ));
        }
    }

    let ignored = ensure_ignored(root, TARGET_NAME, host)?;
    host.notify(Severity::Info, &message);

    Ok(Outcome::Created {
        target,
        filled,
        ignored,
    })
}

fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

/// 1-based line and column of the character at `offset`.
fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for ch in text.chars().take(offset) {
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}
