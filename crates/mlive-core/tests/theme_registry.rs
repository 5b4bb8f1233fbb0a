//! Integration tests: theme registry ↔ style sink.

use mlive_core::theme::*;
use mlive_core::ThemeError;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

/// Records every write, like `document.documentElement.style` would.
#[derive(Default)]
struct RecordingSink {
    properties: BTreeMap<String, String>,
    writes: usize,
    mode: Option<ColorMode>,
}

impl StyleSink for RecordingSink {
    fn set_property(&mut self, name: &str, value: &str) -> Result<(), ThemeError> {
        self.properties.insert(name.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn set_mode(&mut self, mode: ColorMode) -> Result<(), ThemeError> {
        self.mode = Some(mode);
        Ok(())
    }
}

#[test]
fn every_theme_defines_the_same_variables() {
    for theme in themes() {
        let names: Vec<&str> = theme.variables.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, THEME_VARIABLES.to_vec(), "theme `{}`", theme.key);
    }
}

#[test]
fn applying_sets_every_variable() {
    for theme in themes() {
        let mut sink = RecordingSink::default();
        apply_theme(theme, &mut sink).unwrap();

        let keys: Vec<&str> = sink.properties.keys().map(String::as_str).collect();
        let mut expected = THEME_VARIABLES.to_vec();
        expected.sort_unstable();
        assert_eq!(keys, expected, "theme `{}`", theme.key);
        assert_eq!(sink.writes, THEME_VARIABLES.len());
        assert_eq!(sink.mode, Some(theme.mode));
        for (name, value) in theme.variables {
            assert_eq!(sink.properties[*name], *value);
        }
    }
}

#[test]
fn switching_themes_overwrites_all_values() {
    let mut sink = RecordingSink::default();
    apply_theme_key("dark", &mut sink).unwrap();
    apply_theme_key("pastel", &mut sink).unwrap();

    let pastel = theme("pastel").unwrap();
    for (name, value) in pastel.variables {
        assert_eq!(sink.properties[*name], *value);
    }
    assert_eq!(sink.mode, Some(ColorMode::Light));
}

#[test]
fn unknown_key_writes_nothing() {
    let mut sink = RecordingSink::default();
    let err = apply_theme_key("solarized", &mut sink).unwrap_err();
    assert_eq!(err, ThemeError::Unknown("solarized".into()));
    assert_eq!(sink.writes, 0);
    assert_eq!(sink.mode, None);
}

#[test]
fn sink_failure_propagates() {
    struct Detached;
    impl StyleSink for Detached {
        fn set_property(&mut self, _: &str, _: &str) -> Result<(), ThemeError> {
            Err(ThemeError::Sink("no document element".into()))
        }
        fn set_mode(&mut self, _: ColorMode) -> Result<(), ThemeError> {
            Ok(())
        }
    }
    assert!(matches!(
        apply_theme_key("light", &mut Detached),
        Err(ThemeError::Sink(_))
    ));
}
