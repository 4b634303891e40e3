use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// How user input rotates the sphere.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize, SmartDefault)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RotationMode {
    /// Left-drag rotates by the pointer delta, scaled to degrees.
    #[default]
    Drag {
        #[default(0.1)]
        sensitivity: f32,
    },
    /// Arrow keys spin the sphere, speeding up while held.
    Keys {
        #[default(0.01)]
        step: f32,
    },
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct Controls {
    pub rotation: RotationMode,

    #[default(0.001)]
    pub roughness_step: f32,
    #[default(Some(0.9999))]
    pub roughness_limit: Option<f32>,

    #[default(0.001)]
    pub exposure_step: f32,
    #[default(Some(1.9999))]
    pub exposure_limit: Option<f32>,
}
