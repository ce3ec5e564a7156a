//! Patient data input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{PatientInput, Sex, YesNo};
use crate::tui::styles::MedicalTheme;

const YES_NO: &[&str] = &["No", "Yes"];
const SEXES: &[&str] = &["Female", "Male"];

/// How a field accepts input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text
    Text,
    /// Non-negative decimal number
    Number,
    /// One of a fixed set of options, unset until chosen
    Choice(&'static [&'static str]),
}

/// Form field definition
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub hint: &'static str,
    pub kind: FieldKind,
    pub value: String,
    pub choice: Option<usize>,
}

impl FormField {
    fn new(label: &'static str, hint: &'static str, kind: FieldKind) -> Self {
        Self {
            label,
            hint,
            kind,
            value: String::new(),
            choice: None,
        }
    }

    /// Currently chosen option label, if any.
    #[must_use]
    pub fn selected_option(&self) -> Option<&'static str> {
        match self.kind {
            FieldKind::Choice(options) => self.choice.and_then(|i| options.get(i).copied()),
            _ => None,
        }
    }

    fn number(&self) -> f64 {
        self.value.trim().parse::<f64>().unwrap_or(0.0)
    }
}

pub const FIELD_PATIENT_ID: usize = 0;
pub const FIELD_AGE: usize = 1;
pub const FIELD_HYPERTENSION_OR_DIABETES: usize = 2;
pub const FIELD_CARDIOPATHY: usize = 3;
pub const FIELD_BMI: usize = 4;
pub const FIELD_SEX: usize = 5;
pub const FIELD_TOBACCO_OR_ALCOHOL: usize = 6;

/// Patient form state
///
/// Values persist after a submission; only [`PatientFormState::clear_sensitive`]
/// wipes them.
pub struct PatientFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
}

impl Default for PatientFormState {
    fn default() -> Self {
        Self {
            fields: vec![
                FormField::new("Patient ID", "e.g. IDM1", FieldKind::Text),
                FormField::new("Age", "years", FieldKind::Number),
                FormField::new(
                    "Hypertension / diabetes",
                    "←/→ to choose",
                    FieldKind::Choice(YES_NO),
                ),
                FormField::new("Cardiopathy", "←/→ to choose", FieldKind::Choice(YES_NO)),
                FormField::new("BMI", "kg/m², e.g. 24.50", FieldKind::Number),
                FormField::new("Sex", "←/→ to choose", FieldKind::Choice(SEXES)),
                FormField::new(
                    "Tobacco / alcohol use",
                    "←/→ to choose",
                    FieldKind::Choice(YES_NO),
                ),
            ],
            selected_field: 0,
        }
    }
}

impl PatientFormState {
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    fn current(&mut self) -> &mut FormField {
        &mut self.fields[self.selected_field]
    }

    /// Add a character to the current text or number field.
    pub fn input_char(&mut self, c: char) {
        let field = self.current();
        let accepted = match field.kind {
            FieldKind::Text => !c.is_control(),
            FieldKind::Number => c.is_ascii_digit() || (c == '.' && !field.value.contains('.')),
            FieldKind::Choice(_) => false,
        };
        if accepted {
            field.value.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        let field = self.current();
        match field.kind {
            FieldKind::Choice(_) => field.choice = None,
            _ => {
                field.value.pop();
            }
        }
    }

    /// Advance the current selection field to its next option.
    pub fn cycle_next(&mut self) {
        let field = self.current();
        if let FieldKind::Choice(options) = field.kind {
            field.choice = Some(field.choice.map_or(0, |i| (i + 1) % options.len()));
        }
    }

    /// Move the current selection field to its previous option.
    pub fn cycle_prev(&mut self) {
        let field = self.current();
        if let FieldKind::Choice(options) = field.kind {
            field.choice = Some(match field.choice {
                None | Some(0) => options.len() - 1,
                Some(i) => i - 1,
            });
        }
    }

    /// Whether the focused field is a selection.
    #[must_use]
    pub fn on_choice_field(&self) -> bool {
        matches!(self.fields[self.selected_field].kind, FieldKind::Choice(_))
    }

    /// Wipe all field buffers from memory and reset selections.
    pub fn clear_sensitive(&mut self) {
        for field in &mut self.fields {
            field.value.zeroize();
            field.choice = None;
        }
        self.selected_field = 0;
    }

    /// Convert the form into a raw submission.
    ///
    /// The identifier is passed through as typed. Empty or unparsable
    /// numbers become `0.0` and unset selections stay `None`, so validation
    /// reports them as missing.
    #[must_use]
    pub fn to_patient_input(&self) -> PatientInput {
        let yes_no = |idx: usize| {
            self.fields[idx]
                .selected_option()
                .and_then(|s| s.parse::<YesNo>().ok())
        };
        let bmi = self.fields[FIELD_BMI].number();

        PatientInput {
            patient_id: self.fields[FIELD_PATIENT_ID].value.clone(),
            age: self.fields[FIELD_AGE].number(),
            hypertension_or_diabetes: yes_no(FIELD_HYPERTENSION_OR_DIABETES),
            cardiopathy: yes_no(FIELD_CARDIOPATHY),
            bmi: (bmi * 100.0).round() / 100.0,
            sex: self.fields[FIELD_SEX]
                .selected_option()
                .and_then(|s| s.parse::<Sex>().ok()),
            tobacco_or_alcohol_use: yes_no(FIELD_TOBACCO_OR_ALCOHOL),
        }
    }

    /// Fill the form with a sample high-risk patient.
    pub fn load_sample_data(&mut self) {
        self.clear_sensitive();
        self.fields[FIELD_PATIENT_ID].value = "IDM1".to_string();
        self.fields[FIELD_AGE].value = "70".to_string();
        self.fields[FIELD_HYPERTENSION_OR_DIABETES].choice = Some(1);
        self.fields[FIELD_CARDIOPATHY].choice = Some(0);
        self.fields[FIELD_BMI].value = "28.50".to_string();
        self.fields[FIELD_SEX].choice = Some(1);
        self.fields[FIELD_TOBACCO_OR_ALCOHOL].choice = Some(1);
    }
}

/// Render the patient data input form
pub fn render_patient_form(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Form title
            Constraint::Min(0),    // Fields
            Constraint::Length(2), // Key hints
        ])
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(" Patient information", MedicalTheme::subtitle()),
        Span::styled(
            " │ all fields are required",
            MedicalTheme::text_secondary(),
        ),
    ]));
    f.render_widget(title, chunks[0]);

    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2]);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let mid = (state.fields.len() + 1) / 2;

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (MedicalTheme::border_focused(), MedicalTheme::focused())
        } else {
            (MedicalTheme::border(), MedicalTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let mut spans = vec![Span::raw(" ")];
        match field.kind {
            FieldKind::Choice(options) => {
                if field.choice.is_none() {
                    spans.push(Span::styled(field.hint, MedicalTheme::text_muted()));
                    spans.push(Span::raw("  "));
                }
                for (idx, option) in options.iter().enumerate() {
                    let style = if field.choice == Some(idx) {
                        MedicalTheme::selected()
                    } else {
                        MedicalTheme::text_muted()
                    };
                    spans.push(Span::styled(format!(" {option} "), style));
                    spans.push(Span::raw(" "));
                }
            }
            _ if field.value.is_empty() => {
                spans.push(Span::styled(field.hint, MedicalTheme::text_muted()));
            }
            _ => spans.push(Span::styled(field.value.as_str(), MedicalTheme::text())),
        }
        if is_selected && !matches!(field.kind, FieldKind::Choice(_)) {
            spans.push(Span::styled("▌", MedicalTheme::cursor()));
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect) {
    let content = Line::from(vec![
        Span::styled("[↑↓] ", MedicalTheme::key_hint()),
        Span::styled("Navigate ", MedicalTheme::key_desc()),
        Span::styled("[←→] ", MedicalTheme::key_hint()),
        Span::styled("Choose ", MedicalTheme::key_desc()),
        Span::styled("[Enter] ", MedicalTheme::key_hint()),
        Span::styled("Predict ", MedicalTheme::key_desc()),
        Span::styled("[Ctrl+S] ", MedicalTheme::key_hint()),
        Span::styled("Sample Data ", MedicalTheme::key_desc()),
        Span::styled("[Esc] ", MedicalTheme::key_hint()),
        Span::styled("Clear", MedicalTheme::key_desc()),
    ]);

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
