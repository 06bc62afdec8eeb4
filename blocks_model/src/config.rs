use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::attributes::{Color, Shape, Size};

/// Scene description parsed from JSON. Parsing accepts any well-formed
/// document; layout rules are enforced by `TableWorld::from_config` so error
/// messages can name the offending object.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    pub table: TableConfig,
    pub objects: Vec<SceneObjectConfig>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TableConfig {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneObjectConfig {
    pub id: String,
    pub color: Color,
    pub shape: Shape,
    pub size: Size,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub z: u32,
}

impl SceneConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read scene file: {}", path.display()))?;
        let config: SceneConfig = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse scene json: {}", path.display()))?;
        Ok(config)
    }
}

/// Layout problems that make a scene unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("table dimensions must be positive, got {width}x{height}")]
    EmptyTable { width: i32, height: i32 },
    #[error("object id may not be empty")]
    EmptyId,
    #[error("duplicate object id: {0}")]
    DuplicateId(String),
    #[error("object {id} sits outside the {width}x{height} table at ({x},{y})")]
    OutOfBounds {
        id: String,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    #[error("cell ({x},{y}) has a gapped or duplicated stack")]
    BadStack { x: i32, y: i32 },
}
