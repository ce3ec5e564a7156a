//! Session dashboard sidebar.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::domain::Session;
use crate::tui::styles::MedicalTheme;

pub const POSITIVE_LIST_TITLE: &str = "Patients with stroke";
pub const NEGATIVE_LIST_TITLE: &str = "Patients without stroke";
pub const POSITIVE_EMPTY: &str = "No patients with stroke";
pub const NEGATIVE_EMPTY: &str = "No patients without stroke";

/// Lines shown for one registry list, or `None` while it is hidden.
#[must_use]
pub fn list_lines(shown: bool, ids: &[String], empty: &'static str) -> Option<Vec<String>> {
    if !shown {
        return None;
    }
    if ids.is_empty() {
        return Some(vec![empty.to_string()]);
    }
    Some(ids.iter().map(|id| format!("• {id}")).collect())
}

/// Render the "Dashboard" sidebar for `session`.
pub fn render_sidebar(f: &mut Frame, area: Rect, session: &Session) {
    let outer = Block::default()
        .title(Span::styled(" Dashboard ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let visibility = session.visibility();
    let registry = session.registry();

    render_list(
        f,
        chunks[0],
        POSITIVE_LIST_TITLE,
        "Ctrl+P",
        list_lines(visibility.show_positive_list(), registry.positive_ids(), POSITIVE_EMPTY),
    );
    render_list(
        f,
        chunks[1],
        NEGATIVE_LIST_TITLE,
        "Ctrl+N",
        list_lines(visibility.show_negative_list(), registry.negative_ids(), NEGATIVE_EMPTY),
    );
}

fn render_list(
    f: &mut Frame,
    area: Rect,
    title: &str,
    key: &str,
    lines: Option<Vec<String>>,
) {
    let block = Block::default()
        .title(Span::styled(format!(" {title} "), MedicalTheme::title()))
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    match lines {
        None => {
            let hint = Paragraph::new(Line::from(vec![
                Span::styled(format!("[{key}] "), MedicalTheme::key_hint()),
                Span::styled("Show list", MedicalTheme::key_desc()),
            ]))
            .block(block);
            f.render_widget(hint, area);
        }
        Some(lines) => {
            let items: Vec<ListItem> = lines
                .into_iter()
                .map(|l| ListItem::new(Span::styled(l, MedicalTheme::text())))
                .collect();
            f.render_widget(List::new(items).block(block), area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_list_renders_nothing() {
        assert!(list_lines(false, &["P1".to_string()], POSITIVE_EMPTY).is_none());
    }

    #[test]
    fn test_empty_list_shows_placeholder() {
        let lines = list_lines(true, &[], NEGATIVE_EMPTY).expect("shown");
        assert_eq!(lines, vec!["No patients without stroke".to_string()]);
    }

    #[test]
    fn test_list_keeps_order() {
        let ids = vec!["B".to_string(), "A".to_string(), "B".to_string()];
        let lines = list_lines(true, &ids, POSITIVE_EMPTY).expect("shown");
        assert_eq!(lines, vec!["• B", "• A", "• B"]);
    }
}
