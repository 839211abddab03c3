use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Pure red, the default pen color
    pub const RED: Rgb = Rgb::new(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Color from arbitrary channel values, clamped to 0..=255 and truncated
    pub fn from_channels(r: f64, g: f64, b: f64) -> Self {
        // NaN casts to 0
        let channel = |v: f64| v.clamp(0.0, 255.0) as u8;
        Rgb::new(channel(r), channel(g), channel(b))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::RED
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Case-insensitive table of named colors
#[derive(Debug, Clone)]
pub struct ColorTable {
    colors: HashMap<String, Rgb>,
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorTable {
    /// Table with the built-in colors
    pub fn new() -> Self {
        let mut table = ColorTable {
            colors: HashMap::new(),
        };
        for (name, rgb) in [
            ("RED", Rgb::new(255, 0, 0)),
            ("GREEN", Rgb::new(0, 255, 0)),
            ("BLUE", Rgb::new(0, 0, 255)),
            ("BLACK", Rgb::new(0, 0, 0)),
            ("WHITE", Rgb::new(255, 255, 255)),
            ("YELLOW", Rgb::new(255, 255, 0)),
            ("CYAN", Rgb::new(0, 255, 255)),
            ("MAGENTA", Rgb::new(255, 0, 255)),
            ("GRAY", Rgb::new(128, 128, 128)),
            ("GREY", Rgb::new(128, 128, 128)),
            ("ORANGE", Rgb::new(255, 165, 0)),
            ("PINK", Rgb::new(255, 192, 203)),
            ("PURPLE", Rgb::new(128, 0, 128)),
            ("BROWN", Rgb::new(139, 69, 19)),
        ] {
            table.insert(name, rgb);
        }
        table
    }

    /// Add or replace a named color
    pub fn insert(&mut self, name: &str, rgb: Rgb) {
        self.colors.insert(name.to_ascii_uppercase(), rgb);
    }

    /// Color named `name`, ignoring case
    pub fn lookup(&self, name: &str) -> Option<Rgb> {
        self.colors.get(&name.to_ascii_uppercase()).copied()
    }

    /// Color named `name`, red if there is none
    pub fn resolve(&self, name: &str) -> Rgb {
        self.lookup(name).unwrap_or_else(|| {
            tracing::warn!("Unknown color '{}', using red", name);
            Rgb::RED
        })
    }
}
