use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TemplateFile {
    pub(crate) path: PathBuf,
    pub(crate) name: String,
    pub(crate) relative: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ParsedLine<'a> {
    Assignment { key: &'a str, value: &'a str },
    Passthrough { raw: &'a str },
}

/// A placeholder value turned into tab stop `index` (1-based, file order)
/// on the 0-based `line` of the template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PlaceholderMarker {
    pub(crate) index: usize,
    pub(crate) line: usize,
    pub(crate) key: String,
    pub(crate) default: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ProcessedTemplate {
    pub(crate) plain: String,
    pub(crate) snippet: String,
    pub(crate) markers: Vec<PlaceholderMarker>,
    pub(crate) first_offset: Option<usize>,
}

impl ProcessedTemplate {
    pub(crate) fn has_placeholder(&self) -> bool {
        !self.markers.is_empty()
    }
}

/// One piece of snippet text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Token {
    Text(String),
    Stop { index: usize, default: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Field {
    pub(crate) index: usize,
    pub(crate) label: String,
    pub(crate) value: String,
    pub(crate) edited: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Severity {
    Info,
    Warning,
    Error,
}
