use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use eframe::egui::Color32;
use tracing::warn;

use crate::util::parse_hex_color;

/// Style tokens resolved once at initialization.
#[derive(Clone, Debug)]
pub(crate) struct Theme {
    /// Focus node.
    pub accent: Color32,
    /// Visited and tag nodes, highlighted links.
    pub secondary: Color32,
    /// Everything else.
    pub gray: Color32,
    /// Tag node fill.
    pub light: Color32,
    /// Label text.
    pub dark: Color32,
    pub background: Color32,
    pub font_scale: f32,
}

const DEFAULT_TOKENS: &[(&str, &str)] = &[
    ("accent", "#f5ce5d"),
    ("secondary", "#67c4ff"),
    ("gray", "#8a8f98"),
    ("light", "#2a3342"),
    ("dark", "#ebebeb"),
    ("background", "#13171d"),
    ("bodyFontScale", "1.0"),
];

/// Merges override tokens into the default table; unknown names are ignored
/// with a warning.
pub(crate) fn resolve_tokens(overrides: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut tokens: BTreeMap<String, String> = DEFAULT_TOKENS
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    for (name, value) in overrides {
        if tokens.contains_key(name) {
            tokens.insert(name.clone(), value.clone());
        } else {
            warn!(token = name.as_str(), "ignoring unknown theme token");
        }
    }
    tokens
}

fn color_token(tokens: &BTreeMap<String, String>, name: &str) -> Color32 {
    if let Some(value) = tokens.get(name)
        && let Some(color) = parse_hex_color(value)
    {
        return color;
    }

    warn!(token = name, "invalid or missing color token, using default");
    DEFAULT_TOKENS
        .iter()
        .find(|(token, _)| *token == name)
        .and_then(|(_, value)| parse_hex_color(value))
        .unwrap_or(Color32::GRAY)
}

impl Theme {
    pub fn from_tokens(tokens: &BTreeMap<String, String>) -> Self {
        Self {
            accent: color_token(tokens, "accent"),
            secondary: color_token(tokens, "secondary"),
            gray: color_token(tokens, "gray"),
            light: color_token(tokens, "light"),
            dark: color_token(tokens, "dark"),
            background: color_token(tokens, "background"),
            font_scale: tokens
                .get("bodyFontScale")
                .and_then(|value| value.parse().ok())
                .unwrap_or(1.0),
        }
    }
}

/// Theme load failures degrade to the built-in palette; they never abort
/// initialization.
pub(crate) fn load_theme(path: Option<&Path>) -> Theme {
    let overrides = match path {
        None => BTreeMap::new(),
        Some(path) => match read_overrides(path) {
            Ok(overrides) => overrides,
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "failed to load theme file, using default tokens"
                );
                BTreeMap::new()
            }
        },
    };
    Theme::from_tokens(&resolve_tokens(&overrides))
}

fn read_overrides(path: &Path) -> anyhow::Result<BTreeMap<String, String>> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tokens_resolve() {
        let theme = Theme::from_tokens(&resolve_tokens(&BTreeMap::new()));
        assert_eq!(theme.accent, Color32::from_rgb(0xf5, 0xce, 0x5d));
        assert_eq!(theme.background, Color32::from_rgb(0x13, 0x17, 0x1d));
        assert_eq!(theme.font_scale, 1.0);
    }

    #[test]
    fn overrides_replace_known_tokens_only() {
        let overrides = BTreeMap::from([
            ("accent".to_string(), "#ff0000".to_string()),
            ("bogus".to_string(), "#00ff00".to_string()),
        ]);
        let tokens = resolve_tokens(&overrides);
        assert_eq!(tokens["accent"], "#ff0000");
        assert!(!tokens.contains_key("bogus"));

        let theme = Theme::from_tokens(&tokens);
        assert_eq!(theme.accent, Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn invalid_color_falls_back_to_default() {
        let overrides = BTreeMap::from([("gray".to_string(), "not-a-color".to_string())]);
        let theme = Theme::from_tokens(&resolve_tokens(&overrides));
        assert_eq!(theme.gray, Color32::from_rgb(0x8a, 0x8f, 0x98));
    }

    #[test]
    fn missing_theme_file_degrades_to_defaults() {
        let theme = load_theme(Some(Path::new("/nonexistent/theme.json")));
        assert_eq!(theme.secondary, Color32::from_rgb(0x67, 0xc4, 0xff));
    }
}
