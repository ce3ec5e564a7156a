//! TUI module: Terminal User Interface using Ratatui.
//!
//! One screen with:
//! - Patient data form
//! - Prediction result panel
//! - Session dashboard sidebar

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::MedicalTheme;
