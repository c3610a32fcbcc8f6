//! Header processing (spec.md §4.4.1): the options header is a sequence
//! of `key value` lines, reset to defaults before every pass.

use ifscript_core::Color;

#[derive(Clone, Debug, PartialEq)]
pub struct Preferences {
    pub link_style_text: bool,
    pub option_default_text: String,
    pub option_default_disable: bool,
    pub option_color: Option<Color>,
    pub option_hover_color: Option<Color>,
    pub background_color: Option<Color>,
    pub output_font_size: Option<f64>,
    pub option_font_size: Option<f64>,
    pub window_width: Option<u32>,
    pub window_height: Option<u32>,
    pub output_font: Option<String>,
    pub option_font: Option<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            link_style_text: false,
            option_default_text: "restart".to_string(),
            option_default_disable: false,
            option_color: None,
            option_hover_color: None,
            background_color: None,
            output_font_size: None,
            option_font_size: None,
            window_width: None,
            window_height: None,
            output_font: None,
            option_font: None,
        }
    }
}

/// Parse the header blob into preferences. Unknown keys are ignored;
/// malformed values for a recognized key leave that preference at its
/// default (a header fault is never strict — the header has no
/// `InterpretError` variant of its own in spec.md §7).
pub fn process_header_options(header: &str) -> Preferences {
    let mut prefs = Preferences::default();
    for line in header.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (key, rest) = match line.split_once(' ') {
            Some((k, v)) => (k, v.trim()),
            None => (line, ""),
        };
        match key {
            "link-style-text" => prefs.link_style_text = true,
            "option-default-text" => prefs.option_default_text = rest.to_string(),
            "option-default-disable" => prefs.option_default_disable = true,
            "option-color" => prefs.option_color = Color::parse_hex(rest).ok(),
            "option-hover-color" => prefs.option_hover_color = Color::parse_hex(rest).ok(),
            "background-color" => prefs.background_color = Color::parse_hex(rest).ok(),
            "output-font-size" => prefs.output_font_size = parse_positive_finite(rest),
            "option-font-size" => prefs.option_font_size = parse_positive_finite(rest),
            "window-width" => prefs.window_width = rest.parse().ok().filter(|&n: &u32| n > 0),
            "window-height" => prefs.window_height = rest.parse().ok().filter(|&n: &u32| n > 0),
            "output-font" => prefs.output_font = Some(rest.to_string()),
            "option-font" => prefs.option_font = Some(rest.to_string()),
            _ => {}
        }
    }
    prefs
}

fn parse_positive_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|n| n.is_finite() && *n > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_restart_option_text() {
        let prefs = process_header_options("");
        assert_eq!(prefs.option_default_text, "restart");
        assert!(!prefs.option_default_disable);
    }

    #[test]
    fn parses_recognized_keys_and_ignores_unknown() {
        let header = "option-default-text Continue\nbackground-color fAb\nmystery-key 7\nwindow-width 800";
        let prefs = process_header_options(header);
        assert_eq!(prefs.option_default_text, "Continue");
        assert_eq!(prefs.background_color.unwrap().to_string(), "#ffaabb");
        assert_eq!(prefs.window_width, Some(800));
    }

    #[test]
    fn rejects_non_positive_font_size() {
        let prefs = process_header_options("output-font-size -1\noption-font-size 0");
        assert_eq!(prefs.output_font_size, None);
        assert_eq!(prefs.option_font_size, None);
    }

    #[test]
    fn option_default_disable_is_a_bare_flag() {
        let prefs = process_header_options("option-default-disable");
        assert!(prefs.option_default_disable);
    }
}
