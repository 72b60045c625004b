use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Ten-color categorical palette.
pub const CATEGORY10: [Color; 10] = [
    Color::from_hex(0x1f77b4),
    Color::from_hex(0xff7f0e),
    Color::from_hex(0x2ca02c),
    Color::from_hex(0xd62728),
    Color::from_hex(0x9467bd),
    Color::from_hex(0x8c564b),
    Color::from_hex(0xe377c2),
    Color::from_hex(0x7f7f7f),
    Color::from_hex(0xbcbd22),
    Color::from_hex(0x17becf),
];

/// Assigns palette colors to categories in first-seen order, cycling when
/// the palette runs out.
#[derive(Clone, Debug)]
pub struct ColorScale {
    palette: Vec<Color>,
    index: HashMap<String, usize>,
    domain: Vec<String>,
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::new(CATEGORY10.to_vec())
    }
}

impl ColorScale {
    /// An empty `palette` falls back to [`CATEGORY10`].
    pub fn new(palette: Vec<Color>) -> Self {
        let palette = if palette.is_empty() {
            CATEGORY10.to_vec()
        } else {
            palette
        };
        Self {
            palette,
            index: HashMap::new(),
            domain: Vec::new(),
        }
    }

    pub fn from_categories<'a>(categories: impl IntoIterator<Item = &'a str>) -> Self {
        let mut scale = Self::default();
        for c in categories {
            scale.color(c);
        }
        scale
    }

    pub fn color(&mut self, category: &str) -> Color {
        let next = self.domain.len();
        let i = *self.index.entry(category.to_string()).or_insert_with(|| next);
        if i == next {
            self.domain.push(category.to_string());
        }
        self.palette[i % self.palette.len()]
    }

    /// Color of a category already in the domain.
    pub fn get(&self, category: &str) -> Option<Color> {
        self.index.get(category).map(|i| self.palette[i % self.palette.len()])
    }

    /// Categories in first-seen order.
    pub fn domain(&self) -> &[String] {
        &self.domain
    }
}
