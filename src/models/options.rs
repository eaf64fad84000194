use serde::{Deserialize, Serialize};
use std::fmt;

/// Visual style of the rendered thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Style {
    #[default]
    #[serde(rename = "Bold & Graphic")]
    BoldGraphic,
    #[serde(rename = "Tech/Futuristic")]
    TechFuturistic,
    #[serde(rename = "Minimalist")]
    Minimalist,
    #[serde(rename = "Photorealistic")]
    Photorealistic,
    #[serde(rename = "Illustrated")]
    Illustrated,
}

impl Style {
    pub const ALL: [Style; 5] = [
        Style::BoldGraphic,
        Style::TechFuturistic,
        Style::Minimalist,
        Style::Photorealistic,
        Style::Illustrated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Style::BoldGraphic => "Bold & Graphic",
            Style::TechFuturistic => "Tech/Futuristic",
            Style::Minimalist => "Minimalist",
            Style::Photorealistic => "Photorealistic",
            Style::Illustrated => "Illustrated",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == key.trim())
    }

    /// Unset and unknown keys both land on the default style.
    pub fn resolve(key: Option<&str>) -> Self {
        key.and_then(Self::parse).unwrap_or_default()
    }

    pub fn phrase(&self) -> &'static str {
        match self {
            Style::BoldGraphic => {
                "eye-catching thumbnail, bold typography, vibrant colors, expressive facial reaction, dramatic lighting, high contrast, click-worthy composition, professional style"
            }
            Style::TechFuturistic => {
                "futuristic thumbnail, sleek modern design, digital UI elements, glowing accents, holographic effects, cyber-tech aesthetic, sharp lighting, high-tech atmosphere"
            }
            Style::Minimalist => {
                "minimalist thumbnail, clean layout, simple shapes, limited color palette, plenty of negative space, modern flat design, clear focal point"
            }
            Style::Photorealistic => {
                "photorealistic thumbnail, ultra-realistic lighting, natural skin tones, candid moment, DSLR-style photography, lifestyle realism, shallow depth of field"
            }
            Style::Illustrated => {
                "illustrated thumbnail, custom digital illustration, stylized characters, bold outlines, vibrant colors, creative cartoon or vector art style"
            }
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Vibrant,
    Sunset,
    Forest,
    Neon,
    Purple,
    Monochrome,
    Ocean,
    Pastel,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 8] = [
        ColorScheme::Vibrant,
        ColorScheme::Sunset,
        ColorScheme::Forest,
        ColorScheme::Neon,
        ColorScheme::Purple,
        ColorScheme::Monochrome,
        ColorScheme::Ocean,
        ColorScheme::Pastel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Vibrant => "vibrant",
            ColorScheme::Sunset => "sunset",
            ColorScheme::Forest => "forest",
            ColorScheme::Neon => "neon",
            ColorScheme::Purple => "purple",
            ColorScheme::Monochrome => "monochrome",
            ColorScheme::Ocean => "ocean",
            ColorScheme::Pastel => "pastel",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == key.trim())
    }

    pub fn resolve(key: Option<&str>) -> Self {
        key.and_then(Self::parse).unwrap_or_default()
    }

    pub fn phrase(&self) -> &'static str {
        match self {
            ColorScheme::Vibrant => {
                "vibrant and energetic colors, high saturation, bold contrasts, eye-catching palette"
            }
            ColorScheme::Sunset => {
                "warm sunset tones, orange pink and purple hues, soft gradients, cinematic glow"
            }
            ColorScheme::Forest => {
                "natural green tones, earthy colors, calm and organic palette, fresh atmosphere"
            }
            ColorScheme::Neon => {
                "neon glow effects, electric blues and pinks, cyberpunk lighting, high contrast glow"
            }
            ColorScheme::Purple => {
                "purple-dominant color palette, magenta and violet tones, modern and stylish mood"
            }
            ColorScheme::Monochrome => {
                "black and white color scheme, high contrast, dramatic lighting, timeless aesthetic"
            }
            ColorScheme::Ocean => {
                "cool blue and teal tones, aquatic color palette, fresh and clean atmosphere"
            }
            ColorScheme::Pastel => {
                "soft pastel colors, low saturation, gentle tones, calm and friendly aesthetic"
            }
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "4:3")]
    Classic,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 4] = [
        AspectRatio::Landscape,
        AspectRatio::Square,
        AspectRatio::Portrait,
        AspectRatio::Classic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Classic => "4:3",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == key.trim())
    }

    pub fn resolve(key: Option<&str>) -> Self {
        key.and_then(Self::parse).unwrap_or_default()
    }

    /// Pixel size requested from image providers, as (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            AspectRatio::Landscape => (1024, 576),
            AspectRatio::Square => (1024, 1024),
            AspectRatio::Portrait => (576, 1024),
            AspectRatio::Classic => (1024, 768),
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
