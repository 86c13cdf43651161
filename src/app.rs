use std::path::Path;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::widgets::ListState;
use ratatui::{DefaultTerminal, Frame};
use tracing::debug;

use crate::error::Result;
use crate::flow::Host;
use crate::gitignore::Prompt;
use crate::models::{Field, PlaceholderMarker, Severity, TemplateFile, Token};
use crate::parser::{collect_fields, parse_snippet, render_snippet};
use crate::system::{editor_from_env, run_editor_command};
use crate::ui::{render_editor, render_prompt, render_select};

/// Result of feeding one key to a screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Step<T> {
    Continue,
    Done(Option<T>),
}

pub(crate) trait Screen {
    type Output;

    fn draw(&mut self, frame: &mut Frame);
    fn on_key(&mut self, key: KeyEvent) -> Step<Self::Output>;
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

#[derive(Clone, Debug)]
pub(crate) struct SelectState {
    pub(crate) title: String,
    pub(crate) items: Vec<String>,
    pub(crate) list_state: ListState,
    pub(crate) list_scroll: usize,
}

impl SelectState {
    pub(crate) fn new(templates: &[TemplateFile]) -> Self {
        let items = templates
            .iter()
            .map(|template| format!("{}  ({})", template.name, template.relative))
            .collect::<Vec<_>>();
        let mut list_state = ListState::default();
        if !items.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            title: format!("Select a template ({})", items.len()),
            items,
            list_state,
            list_scroll: 0,
        }
    }

    fn move_list(&mut self, delta: isize) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, (len - 1) as isize) as usize;
        self.list_state.select(Some(next));
    }
}

impl Screen for SelectState {
    type Output = usize;

    fn draw(&mut self, frame: &mut Frame) {
        render_select(frame, self);
    }

    fn on_key(&mut self, key: KeyEvent) -> Step<usize> {
        if is_interrupt(&key) {
            return Step::Done(None);
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Step::Done(None),
            KeyCode::Down | KeyCode::Char('j') => self.move_list(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_list(-1),
            KeyCode::Home => self.move_list(isize::MIN / 2),
            KeyCode::End => self.move_list(isize::MAX / 2),
            KeyCode::Enter => {
                if let Some(selected) = self.list_state.selected() {
                    return Step::Done(Some(selected));
                }
            }
            _ => {}
        }
        Step::Continue
    }
}

#[derive(Clone, Debug)]
pub(crate) struct PromptState {
    pub(crate) severity: Severity,
    pub(crate) message: String,
    pub(crate) choices: Vec<String>,
    pub(crate) selected: usize,
}

impl PromptState {
    pub(crate) fn new(severity: Severity, message: &str, choices: &[&str]) -> Self {
        Self {
            severity,
            message: message.to_string(),
            choices: choices.iter().map(|choice| choice.to_string()).collect(),
            selected: 0,
        }
    }

    fn shortcut(&self, ch: char) -> Option<usize> {
        let ch = ch.to_ascii_lowercase();
        self.choices.iter().position(|choice| {
            choice
                .chars()
                .next()
                .is_some_and(|first| first.to_ascii_lowercase() == ch)
        })
    }
}

impl Screen for PromptState {
    type Output = usize;

    fn draw(&mut self, frame: &mut Frame) {
        render_prompt(frame, self);
    }

    fn on_key(&mut self, key: KeyEvent) -> Step<usize> {
        if is_interrupt(&key) || self.choices.is_empty() {
            return Step::Done(None);
        }
        let len = self.choices.len();
        match key.code {
            KeyCode::Esc => return Step::Done(None),
            KeyCode::Right | KeyCode::Tab => self.selected = (self.selected + 1) % len,
            KeyCode::Left | KeyCode::BackTab => self.selected = (self.selected + len - 1) % len,
            KeyCode::Enter => return Step::Done(Some(self.selected)),
            KeyCode::Char(ch) => {
                if let Some(index) = self.shortcut(ch) {
                    return Step::Done(Some(index));
                }
            }
            _ => {}
        }
        Step::Continue
    }
}

#[derive(Clone, Debug)]
pub(crate) struct EditorState {
    pub(crate) tokens: Vec<Token>,
    pub(crate) fields: Vec<Field>,
    pub(crate) active_field: usize,
    pub(crate) field_scroll: usize,
}

impl EditorState {
    pub(crate) fn new(snippet: &str, stops: &[PlaceholderMarker]) -> Self {
        let tokens = parse_snippet(snippet, stops);
        let fields = collect_fields(&tokens, stops);
        Self {
            tokens,
            fields,
            active_field: 0,
            field_scroll: 0,
        }
    }

    pub(crate) fn rendered(&self) -> String {
        render_snippet(&self.tokens, &self.fields)
    }

    fn next_field(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.active_field = (self.active_field + 1) % self.fields.len();
    }

    fn prev_field(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        if self.active_field == 0 {
            self.active_field = self.fields.len() - 1;
        } else {
            self.active_field -= 1;
        }
    }

    /// The first keystroke on a stop replaces its default.
    fn push_char(&mut self, ch: char) {
        if let Some(field) = self.fields.get_mut(self.active_field) {
            if !field.edited {
                field.value.clear();
                field.edited = true;
            }
            field.value.push(ch);
        }
    }

    fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.active_field) {
            if field.edited {
                field.value.pop();
            } else {
                field.value.clear();
                field.edited = true;
            }
        }
    }

    fn clear_field(&mut self) {
        if let Some(field) = self.fields.get_mut(self.active_field) {
            field.value.clear();
            field.edited = true;
        }
    }
}

impl Screen for EditorState {
    type Output = String;

    fn draw(&mut self, frame: &mut Frame) {
        render_editor(frame, self);
    }

    fn on_key(&mut self, key: KeyEvent) -> Step<String> {
        if is_interrupt(&key) {
            return Step::Done(None);
        }
        match key.code {
            KeyCode::Esc => return Step::Done(None),
            KeyCode::Enter => return Step::Done(Some(self.rendered())),
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.prev_field(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.clear_field()
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.push_char(ch)
            }
            _ => {}
        }
        Step::Continue
    }
}

/// [Host] backed by a full-screen terminal. The screen is only taken over
/// once something has to be asked.
#[derive(Default)]
pub(crate) struct TerminalHost {
    terminal: Option<DefaultTerminal>,
    messages: Vec<(Severity, String)>,
}

impl TerminalHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn run_screen<S: Screen>(&mut self, screen: &mut S) -> Result<Option<S::Output>> {
        if self.terminal.is_none() {
            debug!("entering fullscreen");
            self.terminal = Some(ratatui::try_init()?);
        }
        let Some(terminal) = self.terminal.as_mut() else {
            return Ok(None);
        };
        loop {
            terminal.draw(|frame| screen.draw(frame))?;
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Step::Done(output) = screen.on_key(key) {
                    return Ok(output);
                }
            }
        }
    }

    fn restore(&mut self) {
        if self.terminal.take().is_some() {
            ratatui::restore();
        }
    }

    /// Leaves fullscreen and hands back the collected messages.
    pub(crate) fn finish(mut self) -> Vec<(Severity, String)> {
        self.restore();
        std::mem::take(&mut self.messages)
    }
}

impl Drop for TerminalHost {
    fn drop(&mut self) {
        self.restore();
    }
}

impl Prompt for TerminalHost {
    fn ask(
        &mut self,
        severity: Severity,
        message: &str,
        choices: &[&str],
    ) -> Result<Option<usize>> {
        self.run_screen(&mut PromptState::new(severity, message, choices))
    }
}

impl Host for TerminalHost {
    fn select_template(&mut self, templates: &[TemplateFile]) -> Result<Option<usize>> {
        self.run_screen(&mut SelectState::new(templates))
    }

    fn open_existing(&mut self, path: &Path) -> Result<()> {
        match editor_from_env() {
            Some(editor) => run_editor_command(&editor, path, self.terminal.is_some()),
            None => {
                self.notify(
                    Severity::Info,
                    &format!("Kept {} (set EDITOR to open it)", path.display()),
                );
                Ok(())
            }
        }
    }

    fn insert_interactive_template(
        &mut self,
        snippet: &str,
        stops: &[PlaceholderMarker],
    ) -> Result<Option<String>> {
        self.run_screen(&mut EditorState::new(snippet, stops))
    }

    fn notify(&mut self, severity: Severity, message: &str) {
        self.messages.push((severity, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::process_template;
    use std::path::PathBuf;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn templates(names: &[&str]) -> Vec<TemplateFile> {
        names
            .iter()
            .map(|relative| TemplateFile {
                path: PathBuf::from("/work").join(relative),
                name: ".env.example".to_string(),
                relative: relative.to_string(),
            })
            .collect()
    }

    fn editor(content: &str) -> EditorState {
        let processed = process_template(content);
        EditorState::new(&processed.snippet, &processed.markers)
    }

    #[test]
    fn select_moves_and_clamps() {
        let mut state = SelectState::new(&templates(&["a/.env.example", "b/.env.example"]));
        assert_eq!(state.items[1], ".env.example  (b/.env.example)");
        assert_eq!(state.on_key(press(KeyCode::Up)), Step::Continue);
        assert_eq!(state.list_state.selected(), Some(0));
        state.on_key(press(KeyCode::Char('j')));
        state.on_key(press(KeyCode::Down));
        assert_eq!(state.on_key(press(KeyCode::Enter)), Step::Done(Some(1)));
    }

    #[test]
    fn select_dismisses() {
        let mut state = SelectState::new(&templates(&["a/.env.example"]));
        assert_eq!(state.on_key(press(KeyCode::Esc)), Step::Done(None));
        assert_eq!(state.on_key(ctrl('c')), Step::Done(None));
    }

    #[test]
    fn prompt_cycles_and_uses_shortcuts() {
        let mut state =
            PromptState::new(Severity::Warning, "exists", &["Open", "Overwrite", "Cancel"]);
        state.on_key(press(KeyCode::Left));
        assert_eq!(state.selected, 2);
        state.on_key(press(KeyCode::Tab));
        assert_eq!(state.on_key(press(KeyCode::Enter)), Step::Done(Some(0)));
        assert_eq!(state.on_key(press(KeyCode::Char('C'))), Step::Done(Some(2)));
        assert_eq!(state.on_key(press(KeyCode::Esc)), Step::Done(None));
    }

    #[test]
    fn typing_replaces_default_then_appends() {
        let mut state = editor("USER=admin\nPASSWORD=change-me\nTOKEN=xxx");
        assert_eq!(state.fields.len(), 2);
        for ch in "pw".chars() {
            state.on_key(press(KeyCode::Char(ch)));
        }
        state.on_key(press(KeyCode::Tab));
        state.on_key(press(KeyCode::Backspace));
        state.on_key(press(KeyCode::Char('t')));
        assert_eq!(
            state.on_key(press(KeyCode::Enter)),
            Step::Done(Some("USER=admin\nPASSWORD=pw\nTOKEN=t".to_string()))
        );
    }

    #[test]
    fn navigation_wraps_both_ways() {
        let mut state = editor("A=\nB=\nC=");
        state.on_key(press(KeyCode::BackTab));
        assert_eq!(state.active_field, 2);
        state.on_key(press(KeyCode::Tab));
        assert_eq!(state.active_field, 0);
        state.on_key(press(KeyCode::Down));
        state.on_key(press(KeyCode::Up));
        assert_eq!(state.active_field, 0);
    }

    #[test]
    fn untouched_stops_keep_defaults_and_ctrl_u_clears() {
        let mut state = editor("A=your-a\nB=your-b");
        state.on_key(press(KeyCode::Tab));
        state.on_key(ctrl('u'));
        assert_eq!(state.rendered(), "A=your-a\nB=");
        assert_eq!(state.on_key(press(KeyCode::Esc)), Step::Done(None));
    }
}
