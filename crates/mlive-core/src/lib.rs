pub mod document;
pub mod error;
pub mod export;
pub mod label;
pub mod theme;

pub use document::{DEFAULT_SOURCE, Document};
pub use error::{ExportError, ThemeError};
pub use export::{
    ExportPlan, SUPERSAMPLE, ViewBox, export_filename, locate_diagram, resolve_dimensions,
};
pub use label::{LabelCandidate, find_label, is_label_element};
pub use theme::{
    BaseTheme, ColorMode, DEFAULT_THEME, RendererConfig, StyleSink, THEME_VARIABLES, Theme,
    ThemeVariables, apply_theme, apply_theme_key, default_theme, theme, theme_options, themes,
};
