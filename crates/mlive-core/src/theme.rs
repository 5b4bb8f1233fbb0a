//! Theme registry and theme application.
//!
//! A theme bundles the page-level CSS variables with the mermaid renderer
//! settings for that look. Themes are static data, selected by key; the
//! only side effect lives behind [`StyleSink`].

use crate::error::ThemeError;
use serde::Serialize;

/// Key of the theme active on startup.
pub const DEFAULT_THEME: &str = "dark";

/// The CSS variables every theme defines, in application order.
pub const THEME_VARIABLES: [&str; 7] = [
    "--bg-color",
    "--text-color",
    "--primary-color",
    "--secondary-color",
    "--panel-bg",
    "--border-color",
    "--glass-border",
];

// ─── Types ───────────────────────────────────────────────────────────────

/// Light/dark classification, mirrored onto the `data-theme` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Light,
    Dark,
}

impl ColorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }
}

/// Built-in mermaid theme that overrides are layered onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseTheme {
    Default,
    Dark,
    Base,
}

/// Mermaid `themeVariables` overrides. Unset fields are left to the base theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeVariables {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_text_color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_border_color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tertiary_color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_bkg_color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_border_color: Option<&'static str>,
}

impl ThemeVariables {
    const NONE: Self = Self {
        primary_color: None,
        primary_text_color: None,
        primary_border_color: None,
        line_color: None,
        secondary_color: None,
        tertiary_color: None,
        note_bkg_color: None,
        note_border_color: None,
    };
}

/// Renderer-side half of a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererTheme {
    pub base: BaseTheme,
    pub overrides: Option<ThemeVariables>,
}

/// An immutable theme record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub key: &'static str,
    pub name: &'static str,
    pub mode: ColorMode,
    /// `(css-variable, value)` pairs, one per entry of [`THEME_VARIABLES`].
    pub variables: &'static [(&'static str, &'static str)],
    pub renderer: RendererTheme,
}

impl Theme {
    /// Look up one CSS variable value.
    pub fn variable(&self, name: &str) -> Option<&'static str> {
        self.variables
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    /// Page background color; also used as the PNG export fill.
    pub fn background(&self) -> &'static str {
        self.variable("--bg-color").unwrap_or("#ffffff")
    }

    /// Build the `mermaid.initialize` payload for this theme.
    pub fn renderer_config(&self) -> RendererConfig {
        RendererConfig {
            start_on_load: false,
            theme: self.renderer.base,
            security_level: "loose",
            font_family: "Inter, sans-serif",
            theme_variables: self.renderer.overrides,
        }
    }
}

/// Global renderer settings, serialized as the `mermaid.initialize` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererConfig {
    pub start_on_load: bool,
    pub theme: BaseTheme,
    pub security_level: &'static str,
    pub font_family: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_variables: Option<ThemeVariables>,
}

impl RendererConfig {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// ─── Registry ────────────────────────────────────────────────────────────

static THEMES: [Theme; 7] = [
    Theme {
        key: "dark",
        name: "Default Dark",
        mode: ColorMode::Dark,
        variables: &[
            ("--bg-color", "#0f172a"),
            ("--text-color", "#e2e8f0"),
            ("--primary-color", "#38bdf8"),
            ("--secondary-color", "#64748b"),
            ("--panel-bg", "rgba(30, 41, 59, 0.7)"),
            ("--border-color", "rgba(148, 163, 184, 0.1)"),
            ("--glass-border", "1px solid rgba(255, 255, 255, 0.1)"),
        ],
        renderer: RendererTheme {
            base: BaseTheme::Dark,
            overrides: None,
        },
    },
    Theme {
        key: "light",
        name: "Default Light",
        mode: ColorMode::Light,
        variables: &[
            ("--bg-color", "#f8fafc"),
            ("--text-color", "#1e293b"),
            ("--primary-color", "#0ea5e9"),
            ("--secondary-color", "#64748b"),
            ("--panel-bg", "rgba(255, 255, 255, 0.7)"),
            ("--border-color", "rgba(203, 213, 225, 0.4)"),
            ("--glass-border", "1px solid rgba(255, 255, 255, 0.5)"),
        ],
        renderer: RendererTheme {
            base: BaseTheme::Default,
            overrides: None,
        },
    },
    Theme {
        key: "cyberpunk",
        name: "Cyberpunk",
        mode: ColorMode::Dark,
        variables: &[
            ("--bg-color", "#09090b"),
            ("--text-color", "#e2e8f0"),
            ("--primary-color", "#d946ef"),
            ("--secondary-color", "#22d3ee"),
            ("--panel-bg", "rgba(24, 24, 27, 0.8)"),
            ("--border-color", "rgba(217, 70, 239, 0.2)"),
            ("--glass-border", "1px solid rgba(217, 70, 239, 0.3)"),
        ],
        renderer: RendererTheme {
            base: BaseTheme::Dark,
            overrides: Some(ThemeVariables {
                primary_color: Some("#d946ef"),
                primary_text_color: Some("#fff"),
                primary_border_color: Some("#d946ef"),
                line_color: Some("#22d3ee"),
                secondary_color: Some("#000000"),
                tertiary_color: Some("#111111"),
                ..ThemeVariables::NONE
            }),
        },
    },
    Theme {
        key: "forest",
        name: "Forest",
        mode: ColorMode::Dark,
        variables: &[
            ("--bg-color", "#1a2e1a"),
            ("--text-color", "#e2e8f0"),
            ("--primary-color", "#4ade80"),
            ("--secondary-color", "#166534"),
            ("--panel-bg", "rgba(20, 50, 20, 0.7)"),
            ("--border-color", "rgba(74, 222, 128, 0.1)"),
            ("--glass-border", "1px solid rgba(74, 222, 128, 0.2)"),
        ],
        renderer: RendererTheme {
            base: BaseTheme::Base,
            overrides: Some(ThemeVariables {
                primary_color: Some("#22c55e"),
                primary_text_color: Some("#fff"),
                primary_border_color: Some("#4ade80"),
                line_color: Some("#86efac"),
                secondary_color: Some("#14532d"),
                tertiary_color: Some("#1a2e1a"),
                ..ThemeVariables::NONE
            }),
        },
    },
    Theme {
        key: "ocean",
        name: "Ocean",
        mode: ColorMode::Dark,
        variables: &[
            ("--bg-color", "#0c4a6e"),
            ("--text-color", "#f0f9ff"),
            ("--primary-color", "#38bdf8"),
            ("--secondary-color", "#0369a1"),
            ("--panel-bg", "rgba(12, 74, 110, 0.6)"),
            ("--border-color", "rgba(56, 189, 248, 0.2)"),
            ("--glass-border", "1px solid rgba(56, 189, 248, 0.3)"),
        ],
        renderer: RendererTheme {
            base: BaseTheme::Base,
            overrides: Some(ThemeVariables {
                primary_color: Some("#0ea5e9"),
                primary_text_color: Some("#fff"),
                primary_border_color: Some("#7dd3fc"),
                line_color: Some("#bae6fd"),
                secondary_color: Some("#075985"),
                tertiary_color: Some("#0c4a6e"),
                ..ThemeVariables::NONE
            }),
        },
    },
    Theme {
        key: "sunset",
        name: "Sunset",
        mode: ColorMode::Dark,
        variables: &[
            ("--bg-color", "#4a044e"),
            ("--text-color", "#fdf4ff"),
            ("--primary-color", "#f472b6"),
            ("--secondary-color", "#c026d3"),
            ("--panel-bg", "rgba(74, 4, 78, 0.6)"),
            ("--border-color", "rgba(244, 114, 182, 0.2)"),
            ("--glass-border", "1px solid rgba(244, 114, 182, 0.3)"),
        ],
        renderer: RendererTheme {
            base: BaseTheme::Base,
            overrides: Some(ThemeVariables {
                primary_color: Some("#e879f9"),
                primary_text_color: Some("#fff"),
                primary_border_color: Some("#f0abfc"),
                line_color: Some("#f5d0fe"),
                secondary_color: Some("#a21caf"),
                tertiary_color: Some("#4a044e"),
                ..ThemeVariables::NONE
            }),
        },
    },
    Theme {
        key: "pastel",
        name: "Business Pastel",
        mode: ColorMode::Light,
        variables: &[
            ("--bg-color", "#ffffff"),
            ("--text-color", "#334155"),
            ("--primary-color", "#6366f1"),
            ("--secondary-color", "#94a3b8"),
            ("--panel-bg", "rgba(255, 255, 255, 0.8)"),
            ("--border-color", "rgba(203, 213, 225, 0.6)"),
            ("--glass-border", "1px solid rgba(0, 0, 0, 0.05)"),
        ],
        renderer: RendererTheme {
            base: BaseTheme::Base,
            overrides: Some(ThemeVariables {
                primary_color: Some("#e0f2fe"),
                primary_text_color: Some("#1e293b"),
                primary_border_color: Some("#bae6fd"),
                line_color: Some("#64748b"),
                secondary_color: Some("#fef9c3"),
                tertiary_color: Some("#ffffff"),
                note_bkg_color: Some("#fef9c3"),
                note_border_color: Some("#fde047"),
            }),
        },
    },
];

/// All built-in themes, in toolbar order.
pub fn themes() -> &'static [Theme] {
    &THEMES
}

/// Resolve a theme by key. Unknown keys are rejected.
pub fn theme(key: &str) -> Result<&'static Theme, ThemeError> {
    THEMES
        .iter()
        .find(|t| t.key == key)
        .ok_or_else(|| ThemeError::Unknown(key.to_string()))
}

/// The theme a fresh session starts with.
pub fn default_theme() -> &'static Theme {
    theme(DEFAULT_THEME).unwrap_or(&THEMES[0])
}

/// `(key, display name)` pairs for the theme selector.
pub fn theme_options() -> Vec<(&'static str, &'static str)> {
    THEMES.iter().map(|t| (t.key, t.name)).collect()
}

// ─── Application ─────────────────────────────────────────────────────────

/// Destination for page-wide presentation state.
///
/// The browser implementation writes to `document.documentElement`; tests
/// record the writes.
pub trait StyleSink {
    fn set_property(&mut self, name: &str, value: &str) -> Result<(), ThemeError>;

    /// Set the `data-theme` attribute used by attribute-selector overrides.
    fn set_mode(&mut self, mode: ColorMode) -> Result<(), ThemeError>;
}

/// Write every variable of `theme`, then its color mode, onto `sink`.
pub fn apply_theme<S: StyleSink + ?Sized>(theme: &Theme, sink: &mut S) -> Result<(), ThemeError> {
    for (name, value) in theme.variables {
        sink.set_property(name, value)?;
    }
    sink.set_mode(theme.mode)?;
    log::info!("applied theme `{}`", theme.key);
    Ok(())
}

/// Resolve `key` and apply it. Nothing is written for an unknown key.
pub fn apply_theme_key<S: StyleSink + ?Sized>(
    key: &str,
    sink: &mut S,
) -> Result<&'static Theme, ThemeError> {
    let theme = theme(key)?;
    apply_theme(theme, sink)?;
    Ok(theme)
}
