//! UI module: View components for the TUI.

pub mod form;
pub mod result;
pub mod sidebar;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::MedicalTheme;

pub fn render_header(f: &mut Frame, area: Rect, session_started: &str) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" Stroke Prediction ", MedicalTheme::header()),
        Span::styled(" │ ", MedicalTheme::text_muted()),
        Span::styled(
            "Support tool for stroke risk screening",
            MedicalTheme::text_secondary(),
        ),
        Span::styled(
            format!(" │ session since {session_started}"),
            MedicalTheme::text_muted(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: Predictions are indicative estimates and do not replace a professional medical evaluation.",
            MedicalTheme::text_muted(),
        )]),
        Line::from(vec![
            Span::styled("[Ctrl+P] ", MedicalTheme::key_hint()),
            Span::styled("With stroke ", MedicalTheme::key_desc()),
            Span::styled("[Ctrl+N] ", MedicalTheme::key_hint()),
            Span::styled("Without stroke ", MedicalTheme::key_desc()),
            Span::styled("[Ctrl+Q] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
