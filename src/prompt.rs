use crate::models::{AspectRatio, ColorScheme, Style};

/// Raw, user-supplied inputs to the prompt. Keys are resolved against the
/// fixed option tables while composing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptInput<'a> {
    pub title: Option<&'a str>,
    pub prompt: Option<&'a str>,
    pub style: Option<&'a str>,
    pub aspect_ratio: Option<&'a str>,
    pub color_scheme: Option<&'a str>,
}

/// Builds the natural-language prompt sent to image providers.
///
/// The clauses always appear in the same order: style description, quoted
/// title, color scheme, the user's free text, then the aspect ratio and
/// click-through suffix. An unset color scheme means the default one; a key
/// that is set but unknown drops the color clause.
pub fn compose(input: &PromptInput<'_>) -> String {
    let style = Style::resolve(input.style);
    let ratio = AspectRatio::resolve(input.aspect_ratio);
    let color = match input.color_scheme {
        None => Some(ColorScheme::default()),
        Some(key) => ColorScheme::parse(key),
    };

    let mut prompt = format!(
        "{} for: \"{}\". ",
        style.phrase(),
        input.title.unwrap_or_default()
    );

    if let Some(color) = color {
        prompt.push_str(&format!("Use a {} color scheme. ", color.phrase()));
    }

    if let Some(extra) = input.prompt.filter(|p| !p.trim().is_empty()) {
        prompt.push_str(&format!("Additional details: {}. ", extra));
    }

    prompt.push_str(&format!(
        "The thumbnail should be {}, visually stunning, and designed to maximize click-through rate. Make it bold, professional, and impossible to ignore.",
        ratio
    ));

    prompt
}
