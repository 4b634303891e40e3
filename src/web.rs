use crate::{build_info, Device, Key, Scene, ViewerState};
use js_sys::Error;
use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::prelude::*;
use web_sys::WebGl2RenderingContext;

/// WASM binding for the environment map viewer.
///
/// The host page forwards input events to this object and calls `update`
/// followed by `frame` once per animation frame.
#[wasm_bindgen]
#[derive(Debug)]
pub struct WebViewer {
    device: Device,
    scene: Scene,
    state: ViewerState,
}

#[wasm_bindgen]
impl WebViewer {
    #[wasm_bindgen(constructor)]
    pub fn new(context: &WebGl2RenderingContext) -> Result<WebViewer, JsValue> {
        Ok(Self {
            device: Device::new(context)?,
            scene: Scene::default(),
            state: ViewerState::default(),
        })
    }

    pub fn json(&self) -> Result<JsValue, JsValue> {
        as_json(&self.scene)
    }

    /// Reconfigures the viewer using the provided scene JSON data.
    ///
    /// Only settings which actually changed are dirtied, so resubmitting the
    /// same configuration will not trigger another bake.
    pub fn set_json(&mut self, json: &JsValue) -> Result<(), JsValue> {
        let new_scene: Scene = from_json(json)?;

        self.scene.patch_from_other(new_scene);

        Ok(())
    }

    pub fn insert_asset(&mut self, name: &str, data: &[u8]) {
        self.scene.insert_asset(name, data.to_vec());
    }

    pub fn remove_asset(&mut self, name: &str) {
        self.scene.remove_asset(name);
    }

    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.scene.raster.width = width;
        self.scene.raster.height = height;
    }

    /// Reconciles the device with the scene, returning true if a bake occurred.
    pub fn update(&mut self) -> Result<bool, JsValue> {
        Ok(self.device.update(&mut self.scene)?)
    }

    /// Applies held input and draws one frame.
    ///
    /// Returns false once the viewer is closing, in which case nothing is drawn.
    pub fn frame(&mut self) -> Result<bool, JsValue> {
        if !self.state.step(&self.scene.controls) {
            return Ok(false);
        }

        self.device.render(&self.state, &self.scene)?;

        Ok(true)
    }

    /// Records a key press, returning whether the key is used by the viewer.
    pub fn key_down(&mut self, code: &str) -> bool {
        if let Some(key) = Key::from_code(code) {
            self.state.key_down(key);
            true
        } else {
            false
        }
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        if let Some(key) = Key::from_code(code) {
            self.state.key_up(key);
            true
        } else {
            false
        }
    }

    pub fn mouse_down(&mut self, button: i16) {
        self.state.mouse_button(button, true);
    }

    pub fn mouse_up(&mut self, button: i16) {
        self.state.mouse_button(button, false);
    }

    pub fn mouse_move(&mut self, x: f32, y: f32) {
        self.state.cursor_moved(x, y, &self.scene.controls);
    }

    pub fn request_close(&mut self) {
        self.state.request_close();
    }

    pub fn is_closing(&self) -> bool {
        self.state.is_closing()
    }

    pub fn roughness(&self) -> f32 {
        self.state.roughness()
    }

    pub fn exposure(&self) -> f32 {
        self.state.exposure()
    }

    /// Returns the number of mip levels in the baked cube map.
    pub fn baked_levels(&self) -> usize {
        self.device.baked_levels()
    }

    pub fn cubemap_resolution(&self) -> usize {
        self.device.cubemap_resolution()
    }

    /// Indicates to the viewer that its WebGL context has been lost.
    pub fn context_lost(&mut self) {
        self.device.context_lost();
    }
}

fn as_json<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    Ok(JsValue::from_serde(value).map_err(|e| Error::new(&e.to_string()))?)
}

fn from_json<T: DeserializeOwned>(json: &JsValue) -> Result<T, JsValue> {
    Ok(json.into_serde().map_err(|e| Error::new(&e.to_string()))?)
}

/// Returns a version string for the WASM module.
#[wasm_bindgen]
pub fn version() -> String {
    match build_info::GIT_VERSION {
        Some(git) => format!("IBL Viewer v{} ({}, WebGL2)", build_info::PKG_VERSION, git),
        None => format!("IBL Viewer v{} (WebGL2)", build_info::PKG_VERSION),
    }
}

/// Configures browser logging functionality.
///
/// This function is safe to call more than once and will do nothing should it
/// be called more than once; this lets it co-exist nicely with hot reloaders.
#[wasm_bindgen]
pub fn initialize_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init();
}
