//! Prediction result panel.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::ClassificationResult;
use crate::tui::styles::MedicalTheme;

/// Result panel state
#[derive(Debug, Clone, Default)]
pub enum ResultState {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// Last submission classified
    Complete { result: ClassificationResult },
    /// Last submission rejected or failed
    Error { message: String },
}

/// Render the result panel.
pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    match state {
        ResultState::Idle => render_idle(f, area),
        ResultState::Complete { result } => render_complete(f, area, result),
        ResultState::Error { message } => render_error(f, area, message),
    }
}

fn panel(border: ratatui::style::Style) -> Block<'static> {
    Block::default()
        .title(Span::styled(" Prediction Results ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(border)
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Fill in the form and press Enter to predict",
            MedicalTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(panel(MedicalTheme::border()));

    f.render_widget(content, area);
}

fn render_complete(f: &mut Frame, area: Rect, result: &ClassificationResult) {
    let style = MedicalTheme::outcome(result.outcome);
    let block = panel(style);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Outcome message
            Constraint::Length(3), // Probability gauge
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    let message = Paragraph::new(Line::from(Span::styled(
        result.outcome.message(),
        style.add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(message, chunks[0]);

    let percent = (result.probability_positive * 100.0).round().clamp(0.0, 100.0) as u16;
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Stroke probability ", MedicalTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(style)
        .percent(percent)
        .label(format!(
            "{} i.e. {} %",
            result.probability_fraction(),
            result.probability_percent()
        ));
    f.render_widget(gauge, chunks[1]);

    if !result.label_agrees() {
        let note = Paragraph::new(Line::from(Span::styled(
            format!(
                "Model label {} differs from the {:.2} threshold decision",
                result.predicted_label, result.threshold
            ),
            MedicalTheme::warning(),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        f.render_widget(note, chunks[2]);
    }
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::danger())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(panel(MedicalTheme::danger()));

    f.render_widget(content, area);
}
