use crate::error::{AnimatorError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// An sRGB display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Single-letter shorthand codes accepted alongside CSS names
const SHORTHAND_COLORS: [(&str, &str); 8] = [
    ("b", "#0000ff"),
    ("g", "#008000"),
    ("r", "#ff0000"),
    ("c", "#00bfbf"),
    ("m", "#bf00bf"),
    ("y", "#bfbf00"),
    ("k", "#000000"),
    ("w", "#ffffff"),
];

const NAMED_COLORS: [(&str, &str); 24] = [
    ("black", "#000000"),
    ("white", "#ffffff"),
    ("red", "#ff0000"),
    ("green", "#008000"),
    ("blue", "#0000ff"),
    ("cyan", "#00ffff"),
    ("magenta", "#ff00ff"),
    ("yellow", "#ffff00"),
    ("orange", "#ffa500"),
    ("purple", "#800080"),
    ("brown", "#a52a2a"),
    ("pink", "#ffc0cb"),
    ("gray", "#808080"),
    ("grey", "#808080"),
    ("olive", "#808000"),
    ("navy", "#000080"),
    ("teal", "#008080"),
    ("maroon", "#800000"),
    ("gold", "#ffd700"),
    ("crimson", "#dc143c"),
    ("darkblue", "#00008b"),
    ("darkgreen", "#006400"),
    ("lightgray", "#d3d3d3"),
    ("steelblue", "#4682b4"),
];

fn hex_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid hex color regex")
    })
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex string (`#rgb`, `#rrggbb`), a shorthand letter or a named color
    pub fn parse(spec: &str) -> Result<Self> {
        let value = spec.trim();

        if hex_pattern().is_match(value) {
            return Ok(Self::from_hex_digits(&value[1..]));
        }

        let lower = value.to_ascii_lowercase();
        SHORTHAND_COLORS
            .iter()
            .chain(NAMED_COLORS.iter())
            .find(|(name, _)| *name == lower)
            .map(|(_, hex)| Self::from_hex_digits(&hex[1..]))
            .ok_or_else(|| AnimatorError::config(format!("unknown color '{}'", spec)))
    }

    fn from_hex_digits(digits: &str) -> Self {
        let channel = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0);
        if digits.len() == 3 {
            let expand = |i: usize| channel(&digits[i..i + 1].repeat(2));
            Self::rgb(expand(0), expand(1), expand(2))
        } else {
            Self::rgb(channel(&digits[0..2]), channel(&digits[2..4]), channel(&digits[4..6]))
        }
    }

    /// CSS hex representation, always `#rrggbb`
    pub fn to_css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Ordered mapping from series identifier to display color
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorMap {
    entries: Vec<(String, Color)>,
}

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colors used for the Indonesian state-owned bank chart
    pub fn state_owned_banks() -> Self {
        Self::from_specs([("bbri", "#640303"), ("bbni", "c"), ("bmri", "orange")])
            .expect("built-in bank colors are valid")
    }

    /// Build a map from `(series, color spec)` pairs
    pub fn from_specs<'a, I>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut map = Self::new();
        for (series, spec) in specs {
            map.insert(series, Color::parse(spec)?);
        }
        Ok(map)
    }

    /// Insert or replace the color of a series
    pub fn insert(&mut self, series: &str, color: Color) {
        match self.entries.iter_mut().find(|(s, _)| s == series) {
            Some(entry) => entry.1 = color,
            None => self.entries.push((series.to_string(), color)),
        }
    }

    pub fn get(&self, series: &str) -> Option<Color> {
        self.entries
            .iter()
            .find(|(s, _)| s == series)
            .map(|(_, c)| *c)
    }

    pub fn series(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(s, _)| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check that the map and the table's series columns match exactly
    pub fn check_covers(&self, series: &[String]) -> Result<()> {
        let missing: Vec<&str> = series
            .iter()
            .filter(|s| self.get(s).is_none())
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(AnimatorError::config(format!(
                "no color configured for series: {}",
                missing.join(", ")
            )));
        }

        let unknown: Vec<&str> = self
            .series()
            .filter(|s| !series.iter().any(|column| column == s))
            .collect();
        if !unknown.is_empty() {
            return Err(AnimatorError::config(format!(
                "color configured for series absent from the data: {}",
                unknown.join(", ")
            )));
        }

        Ok(())
    }
}
