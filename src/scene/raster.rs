use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// Dimensions of the canvas drawing buffer.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct Raster {
    #[default(800)]
    pub width: u32,
    #[default(600)]
    pub height: u32,
}

impl Raster {
    pub fn aspect_ratio(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}
