use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::models::Severity;
use crate::system::{read_optional, write_file};

pub(crate) const GITIGNORE: &str = ".gitignore";

/// Lines of an ignore-rules file.
#[derive(Clone, Debug, Default)]
pub(crate) struct IgnoreRules {
    content: String,
}

impl IgnoreRules {
    pub(crate) fn parse(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// True when a line reads `name`, `/name` or `*.ext` for the name's extension.
    pub(crate) fn contains(&self, name: &str) -> bool {
        let rooted = format!("/{name}");
        let wildcard = extension_of(name).map(|ext| format!("*.{ext}"));
        self.content.lines().map(str::trim).any(|line| {
            line == name || line == rooted || wildcard.as_deref() == Some(line)
        })
    }

    /// Content with `name` appended on its own line.
    pub(crate) fn appended(&self, name: &str) -> String {
        let mut content = self.content.clone();
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(name);
        content.push('\n');
        content
    }
}

fn extension_of(name: &str) -> Option<&str> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() { None } else { Some(ext) }
}

/// A blocking question with named choices. `None` means the prompt was dismissed.
pub(crate) trait Prompt {
    fn ask(&mut self, severity: Severity, message: &str, choices: &[&str])
    -> Result<Option<usize>>;
}

/// Makes sure `entry` is listed in `root/.gitignore`, asking first.
///
/// Returns whether the file was changed.
pub(crate) fn ensure_ignored<P: Prompt + ?Sized>(
    root: &Path,
    entry: &str,
    host: &mut P,
) -> Result<bool> {
    let path = root.join(GITIGNORE);
    let rules = IgnoreRules::parse(&read_optional(&path)?.unwrap_or_default());
    if rules.contains(entry) {
        debug!("{entry} already ignored in {}", path.display());
        return Ok(false);
    }

    let message = format!("{entry} is not in {GITIGNORE}. Add it?");
    match host.ask(Severity::Warning, &message, &["Yes", "No"])? {
        Some(0) => {
            write_file(&path, &rules.appended(entry))?;
            info!("added {entry} to {}", path.display());
            Ok(true)
        }
        _ => Ok(false),
    }
}
