use std::fmt;

use serde::{Deserialize, Serialize};

/// Colors the vocabulary understands. The set is closed: tokens outside it
/// are ignored during extraction rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    White,
    Black,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::White => "white",
            Color::Black => "black",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "red" => Some(Color::Red),
            "green" => Some(Color::Green),
            "blue" => Some(Color::Blue),
            "yellow" => Some(Color::Yellow),
            "white" => Some(Color::White),
            "black" => Some(Color::Black),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical form of an object. Pyramids are special: nothing can rest on one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Block,
    Pyramid,
    Box,
}

impl Shape {
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Block => "block",
            Shape::Pyramid => "pyramid",
            Shape::Box => "box",
        }
    }

    /// "cube" is an accepted synonym for block.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "block" | "cube" => Some(Shape::Block),
            "pyramid" => Some(Shape::Pyramid),
            "box" => Some(Shape::Box),
            _ => None,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    Medium,
    Large,
}

impl Size {
    pub fn as_str(self) -> &'static str {
        match self {
            Size::Small => "small",
            Size::Medium => "medium",
            Size::Large => "large",
        }
    }

    /// "big" and "little" map onto large and small.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "small" | "little" => Some(Size::Small),
            "medium" => Some(Size::Medium),
            "large" | "big" => Some(Size::Large),
            _ => None,
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter triple extracted from free text. Absent fields act as wildcards
/// when matching objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeQuery {
    pub color: Option<Color>,
    pub shape: Option<Shape>,
    pub size: Option<Size>,
}

impl AttributeQuery {
    /// Scan whitespace tokens for vocabulary words. Later tokens overwrite
    /// earlier matches of the same category (last match wins).
    pub fn from_text(text: &str) -> Self {
        let mut query = AttributeQuery::default();
        for token in text.split_whitespace() {
            if let Some(color) = Color::from_token(token) {
                query.color = Some(color);
            } else if let Some(shape) = Shape::from_token(token) {
                query.shape = Some(shape);
            } else if let Some(size) = Size::from_token(token) {
                query.size = Some(size);
            }
        }
        query
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.shape.is_none() && self.size.is_none()
    }
}
