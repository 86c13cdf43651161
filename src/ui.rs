use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, List, ListItem, ListState, Paragraph, Wrap};

use crate::app::{EditorState, PromptState, SelectState};
use crate::models::Severity;

const SELECTED_MARKER: &str = "> ";
const UNSELECTED_MARKER: &str = "  ";
const PROMPT_WIDTH: u16 = 60;

pub(crate) fn render_select(frame: &mut Frame, state: &mut SelectState) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(1)])
        .split(area);

    let list_area = layout[0];
    let help_area = layout[1];

    let block = Block::bordered().title(state.title.as_str());
    let inner = inner_rect(list_area);

    let view_height = inner.height as usize;
    state.list_scroll = ensure_visible(
        state.list_scroll,
        state.list_state.selected().unwrap_or(0),
        state.items.len(),
        view_height,
    );

    let start = state.list_scroll;
    let end = (start + view_height).min(state.items.len());
    let selected = state.list_state.selected().unwrap_or(0);

    let items: Vec<ListItem> = state.items[start..end]
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let marker = if start + idx == selected {
                SELECTED_MARKER
            } else {
                UNSELECTED_MARKER
            };
            ListItem::new(format!("{marker}{item}"))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::new().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("");

    let mut visible_state = ListState::default();
    if selected >= start && selected < end {
        visible_state.select(Some(selected - start));
    }
    frame.render_stateful_widget(list, list_area, &mut visible_state);

    let help = Paragraph::new("Up/Down j/k move  Enter select  Esc/q cancel")
        .style(Style::new().fg(Color::DarkGray));
    frame.render_widget(help, help_area);
}

pub(crate) fn render_prompt(frame: &mut Frame, state: &PromptState) {
    let area = frame.area();
    let (title, color) = match state.severity {
        Severity::Info => ("Info", Color::Blue),
        Severity::Warning => ("Warning", Color::Yellow),
        Severity::Error => ("Error", Color::Red),
    };

    let width = PROMPT_WIDTH.min(area.width);
    let text_width = width.saturating_sub(2).max(1) as usize;
    let message_rows = state.message.chars().count().div_ceil(text_width).max(1) as u16;
    let height = (message_rows + 4).min(area.height);
    let popup = centered(area, width, height);

    let mut choices = Vec::new();
    for (index, choice) in state.choices.iter().enumerate() {
        if index > 0 {
            choices.push(Span::raw("   "));
        }
        let style = if index == state.selected {
            Style::new().bg(color).fg(Color::Black).add_modifier(Modifier::BOLD)
        } else {
            Style::new()
        };
        choices.push(Span::styled(format!(" {choice} "), style));
    }

    let lines = vec![
        Line::from(state.message.as_str()),
        Line::from(""),
        Line::from(choices),
    ];
    let block = Block::bordered()
        .title(title)
        .border_style(Style::new().fg(color));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

pub(crate) fn render_editor(frame: &mut Frame, editor: &mut EditorState) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(1)])
        .split(area);

    let content_area = layout[0];
    let status_area = layout[1];

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(content_area);

    render_fields(frame, editor, horizontal[0]);
    render_preview(frame, "Preview: .env", &editor.rendered(), horizontal[1]);

    let hint = "Tab/Shift-Tab move  Ctrl-U clear  Enter save  Esc keep template values";
    let status = Paragraph::new(hint).style(Style::new().fg(Color::DarkGray));
    frame.render_widget(status, status_area);
}

fn render_fields(frame: &mut Frame, editor: &mut EditorState, area: Rect) {
    let block = Block::bordered().title("Placeholders");
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let field_height: u16 = 3;
    let view_capacity = (inner.height / field_height) as usize;
    editor.field_scroll = ensure_visible(
        editor.field_scroll,
        editor.active_field,
        editor.fields.len(),
        view_capacity,
    );

    let start = editor.field_scroll;
    let end = (start + view_capacity).min(editor.fields.len());

    for (idx, field) in editor.fields[start..end].iter().enumerate() {
        let is_active = start + idx == editor.active_field;
        let border_style = if is_active {
            Style::new().fg(Color::Blue)
        } else {
            Style::new().fg(Color::DarkGray)
        };
        let value_style = if field.edited {
            Style::new()
        } else {
            Style::new().fg(Color::DarkGray)
        };
        let mut value = field.value.clone();
        if is_active {
            value.push('|');
        }
        let field_area = Rect {
            x: inner.x,
            y: inner.y + (idx as u16) * field_height,
            width: inner.width,
            height: field_height,
        };
        let field_block = Block::bordered()
            .title(format!("{} {}", field.index, field.label))
            .border_style(border_style);
        let paragraph = Paragraph::new(value)
            .style(value_style)
            .block(field_block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, field_area);
    }
}

fn render_preview(frame: &mut Frame, title: &str, rendered: &str, area: Rect) {
    let paragraph = Paragraph::new(rendered)
        .block(Block::bordered().title(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

fn inner_rect(area: Rect) -> Rect {
    let mut inner = area;
    if inner.width >= 2 {
        inner.x += 1;
        inner.width -= 2;
    }
    if inner.height >= 2 {
        inner.y += 1;
        inner.height -= 2;
    }
    inner
}

fn ensure_visible(
    current_scroll: usize,
    selected: usize,
    total: usize,
    view_height: usize,
) -> usize {
    if total == 0 || view_height == 0 {
        return 0;
    }
    let mut scroll = current_scroll.min(total.saturating_sub(1));
    if selected < scroll {
        scroll = selected;
    } else if selected >= scroll + view_height {
        scroll = selected + 1 - view_height;
    }
    scroll
}
