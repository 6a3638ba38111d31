use bevy::prelude::*;
use serde::Deserialize;

/// Row sizing shared by every grid in the app.
#[derive(Resource, Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub row_height: f32,
    /// Used for asset cells whose extension filter names an image type.
    pub image_row_height: f32,
    pub image_extensions: Vec<String>,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            row_height: 20.0,
            image_row_height: 64.0,
            image_extensions: [".png", ".jpg", ".jpeg", ".tga", ".bmp"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl GridSettings {
    /// Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// True when `text`, a path or a `|` separated extension filter, ends in
    /// one of the image extensions.
    pub fn is_image_path(&self, text: &str) -> bool {
        text.split('|').any(|part| {
            let part = part.trim().to_lowercase();
            self.image_extensions
                .iter()
                .any(|ext| !ext.is_empty() && part.ends_with(ext.to_lowercase().as_str()))
        })
    }
}
