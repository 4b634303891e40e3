use crate::{Asset, Camera, Controls, Dirty, Environment, Raster, SphereParameters};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// # Dirty Flags
///
/// For pragmatic reasons, the scene structure maintains dirty flags relative to
/// a particular device instance's internal state. As a consequence care must be
/// taken when using the same scene instance on multiple devices simultaneously.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Scene {
    pub environment: Dirty<Environment>,
    pub sphere: Dirty<SphereParameters>,
    pub camera: Camera,
    pub raster: Raster,
    pub controls: Controls,

    #[serde(skip)]
    pub assets: HashMap<Asset, Vec<u8>>,
}

impl Scene {
    /// Marks the entire contents of this scene as dirty.
    ///
    /// This method will force a complete device update the next time the
    /// device is updated using this scene, and should be used sparingly.
    pub fn dirty_all_fields(&mut self) {
        Dirty::dirty(&mut self.environment);
        Dirty::dirty(&mut self.sphere);
    }

    /// Patches this scene to be equal to another scene.
    ///
    /// Scene contents which are identical between the two scenes will not be
    /// modified, so the method will avoid dirtying as many fields as it can.
    /// Assets are kept as they are.
    pub fn patch_from_other(&mut self, other: Self) {
        if self.environment != other.environment {
            self.environment = other.environment;
        }

        if self.sphere != other.sphere {
            self.sphere = other.sphere;
        }

        self.camera = other.camera;
        self.raster = other.raster;
        self.controls = other.controls;
    }

    /// Stores an asset, dirtying the environment if it uses that asset.
    pub fn insert_asset(&mut self, name: &str, data: Vec<u8>) {
        if self.environment.map == name {
            Dirty::dirty(&mut self.environment);
        }

        self.assets.insert(name.to_owned(), data);
    }

    pub fn remove_asset(&mut self, name: &str) {
        if self.assets.remove(name).is_some() && self.environment.map == name {
            Dirty::dirty(&mut self.environment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_scene() -> Scene {
        let mut scene = Scene::default();

        let _: Result<bool, ()> = Dirty::clean(&mut scene.environment, |_| Ok(()));
        let _: Result<bool, ()> = Dirty::clean(&mut scene.sphere, |_| Ok(()));

        scene
    }

    #[test]
    fn patching_identical_scene_keeps_fields_clean() {
        let mut scene = clean_scene();

        scene.patch_from_other(Scene::default());

        assert!(!Dirty::is_dirty(&scene.environment));
        assert!(!Dirty::is_dirty(&scene.sphere));
    }

    #[test]
    fn patching_changed_environment_dirties_it() {
        let mut scene = clean_scene();

        let other: Scene =
            serde_json::from_str(r#"{ "environment": { "mip_levels": 4 } }"#).unwrap();
        scene.patch_from_other(other);

        assert!(Dirty::is_dirty(&scene.environment));
        assert!(!Dirty::is_dirty(&scene.sphere));
        assert_eq!(scene.environment.mip_levels, 4);
        assert_eq!(scene.environment.base_resolution, 512);
    }

    #[test]
    fn inserting_used_asset_dirties_environment() {
        let mut scene = clean_scene();

        scene.insert_asset("unrelated.hdr", vec![1, 2, 3]);
        assert!(!Dirty::is_dirty(&scene.environment));

        scene.insert_asset("cedar_bridge_1k1.hdr", vec![1, 2, 3]);
        assert!(Dirty::is_dirty(&scene.environment));
    }

    #[test]
    fn removing_used_asset_dirties_environment() {
        let mut scene = Scene::default();
        scene.insert_asset("cedar_bridge_1k1.hdr", vec![]);

        let _: Result<bool, ()> = Dirty::clean(&mut scene.environment, |_| Ok(()));

        scene.remove_asset("cedar_bridge_1k1.hdr");

        assert!(Dirty::is_dirty(&scene.environment));
        assert!(scene.assets.is_empty());
    }

    #[test]
    fn assets_are_not_serialized() {
        let mut scene = Scene::default();
        scene.insert_asset("cedar_bridge_1k1.hdr", vec![0; 16]);

        let json = serde_json::to_string(&scene).unwrap();

        assert!(!json.contains("assets"));
        assert!(json.contains("cedar_bridge_1k1.hdr"));
    }
}
