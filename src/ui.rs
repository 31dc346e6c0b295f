//! The UI renders the application state into something visible and vim-able.
//!
//! The draw function dispatches based on the current view. Browsing shows the category, area
//! and ID columns beside the section list; the notes view swaps the columns for an editor.

use crate::app_state::{AppState, Focus, View};
use crate::hierarchy::format_reference;
use crate::store::ActiveTab;
use edtui::{EditorTheme, EditorView, SyntaxHighlighter};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Renders the active view based on current application state.
pub fn draw(f: &mut Frame, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    if app.current_view == View::Notes {
        draw_notes(f, app, chunks[0]);
    } else {
        draw_browse(f, app, chunks[0]);
    }
    draw_status(f, app, chunks[1]);
}

fn column_block(title: &str, active: bool) -> Block<'_> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if active {
        block.border_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        block
    }
}

fn row_style(selected: bool) -> Style {
    if selected {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    }
}

fn draw_browse(f: &mut Frame, app: &AppState, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(halves[0]);

    let store = &app.store;
    let selection = store.selection();
    let tab = store.active_tab();
    let hierarchy_focused = app.focus == Focus::Hierarchy;

    let categories: Vec<ListItem> = store
        .categories()
        .iter()
        .enumerate()
        .map(|(c, category)| {
            ListItem::new(format!("{} {}", category.range, category.name))
                .style(row_style(selection.category == Some(c)))
        })
        .collect();
    f.render_widget(
        List::new(categories).block(column_block(
            "Category",
            hierarchy_focused && tab == ActiveTab::Category,
        )),
        columns[0],
    );

    let selected_category = selection.category.map(|c| &store.categories()[c]);
    let areas: Vec<ListItem> = selected_category
        .map(|category| {
            category
                .areas
                .iter()
                .enumerate()
                .map(|(a, area)| {
                    ListItem::new(format!("{} {}", area.number, area.name))
                        .style(row_style(selection.area == Some(a)))
                })
                .collect()
        })
        .unwrap_or_default();
    f.render_widget(
        List::new(areas).block(column_block(
            "Area",
            hierarchy_focused && tab == ActiveTab::Area,
        )),
        columns[1],
    );

    let selected_area = selected_category
        .zip(selection.area)
        .map(|(category, a)| &category.areas[a]);
    let items: Vec<ListItem> = selected_area
        .map(|area| {
            area.items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let mut spans = vec![Span::styled(
                        format_reference(area.number, item.number),
                        Style::default().fg(Color::Yellow),
                    )];
                    spans.push(Span::raw(format!(" {}", item.name)));
                    if !item.notes.is_empty() {
                        spans.push(Span::styled(" ✎", Style::default().fg(Color::DarkGray)));
                    }
                    ListItem::new(Line::from(spans)).style(row_style(selection.item == Some(i)))
                })
                .collect()
        })
        .unwrap_or_default();
    f.render_widget(
        List::new(items).block(column_block("ID", hierarchy_focused && tab == ActiveTab::Id)),
        columns[2],
    );

    draw_sections(f, app, halves[1]);
}

fn draw_sections(f: &mut Frame, app: &AppState, area: Rect) {
    let focused = app.focus == Focus::Sections;

    let items: Vec<ListItem> = app
        .sections
        .sections
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let check = if section.is_checked { "[x]" } else { "[ ]" };
            let mut spans = vec![Span::raw(format!("{check} {}", section.name))];
            for reference in &section.selected_ids {
                let color = if app.store.resolve(reference).is_some() {
                    Color::Yellow
                } else {
                    Color::Red
                };
                spans.push(Span::styled(
                    format!(" {reference}"),
                    Style::default().fg(color),
                ));
            }
            ListItem::new(Line::from(spans))
                .style(row_style(focused && i == app.current_section_index))
        })
        .collect();

    f.render_widget(
        List::new(items).block(column_block("Sections", focused)),
        area,
    );
}

/// Narrows `area` so the editor inside its borders wraps at `wrap_width` columns.
fn notes_area(area: Rect, wrap_width: usize) -> Rect {
    let bordered = u16::try_from(wrap_width.saturating_add(2)).unwrap_or(u16::MAX);
    Rect {
        width: area.width.min(bordered),
        ..area
    }
}

fn draw_notes(f: &mut Frame, app: &mut AppState, area: Rect) {
    let title = app
        .store
        .selected_path()
        .and_then(|(c, a, i)| {
            let reference = app.store.reference(c, a, i)?;
            let item = app.store.item(c, a, i)?;
            Some(format!(
                "Notes: {reference} {} (max line: {} chars)",
                item.name, app.wrap_width
            ))
        })
        .unwrap_or_else(|| "Notes".to_string());

    let area = notes_area(area, app.wrap_width);
    if let Some(ref mut editor_state) = app.editor_state {
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let syntax_highlighter = SyntaxHighlighter::new("dracula", "md");
        let editor = EditorView::new(editor_state)
            .theme(EditorTheme::default())
            .syntax_highlighter(Some(syntax_highlighter))
            .wrap(true);

        f.render_widget(editor, inner);
    }
}

fn draw_status(f: &mut Frame, app: &AppState, area: Rect) {
    let text = match app.current_view {
        View::Command => format!(":{}", app.command_buffer),
        View::Rename => format!("Name: {}", app.input_buffer),
        View::Notes => "Esc (normal mode): Save & Close | edit with vim keys".to_string(),
        View::Browse => app.message.clone().unwrap_or_else(|| match app.focus {
            Focus::Hierarchy => {
                "↑/↓: Select | ←/→: Column | a: Add | d: Remove | r: Rename | n: Notes | Tab: Sections | :w Save | :q Quit"
                    .to_string()
            }
            Focus::Sections => {
                "↑/↓: Select | Space: Check | t: Tag checked | x: Untag | g: Go to tag | a/d/r: Add/Remove/Rename | Tab: Index"
                    .to_string()
            }
        }),
    };

    let status = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
    f.render_widget(status, area);
}

#[cfg(test)]
#[path = "tests/ui.rs"]
mod tests;
