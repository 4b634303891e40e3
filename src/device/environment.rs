#[allow(unused_imports)]
use log::{debug, error, info, warn};

use crate::Device;
use crate::{Asset, Environment, EnvironmentImage};
use js_sys::Error;
use std::collections::HashMap;

impl Device {
    pub(crate) fn update_environment(
        &mut self,
        assets: &HashMap<Asset, Vec<u8>>,
        environment: &Environment,
    ) -> Result<(), Error> {
        let image = match assets.get(&environment.map) {
            Some(bytes) => EnvironmentImage::from_hdr_bytes(bytes).unwrap_or_else(|err| {
                error!("failed to decode `{}': {}", environment.map, err);
                EnvironmentImage::placeholder()
            }),
            None => {
                warn!("environment map `{}' was never loaded", environment.map);
                EnvironmentImage::placeholder()
            }
        };

        debug!(
            "uploading {}x{} environment map",
            image.width, image.height
        );

        self.envmap_texture
            .upload(image.width, image.height, &image.pixels)?;

        self.bake_cubemap(environment)
    }
}
