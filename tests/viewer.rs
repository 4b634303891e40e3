#![cfg(target_arch = "wasm32")]

use ibl_viewer::WebViewer;
use image::codecs::hdr::HdrEncoder;
use image::Rgb;
use js_sys::Promise;
use serde_json::json;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Event, HtmlCanvasElement, WebGl2RenderingContext, WebglLoseContext};

wasm_bindgen_test_configure!(run_in_browser);

const ASSET: &str = "cedar_bridge_1k1.hdr";

const WIDTH: u32 = 64;
const HEIGHT: u32 = 48;

/// Radiance with distinct channels so misordered texels change the result.
const CONSTANT_RADIANCE: [f32; 3] = [0.5, 0.25, 2.0];

const CLEAR_PIXEL: [u8; 4] = [51, 77, 153, 255];

fn setup_canvas() -> HtmlCanvasElement {
    let canvas: HtmlCanvasElement = web_sys::window()
        .expect("window not found")
        .document()
        .expect("document not found")
        .create_element("canvas")
        .expect("failed to create canvas")
        .dyn_into()
        .expect("failed to create canvas");

    canvas.set_width(WIDTH);
    canvas.set_height(HEIGHT);

    canvas
}

fn setup_context(canvas: HtmlCanvasElement) -> WebGl2RenderingContext {
    let options: JsValue = JsValue::from_serde(&json!({
        "alpha": false,
        "depth": true,
        "stencil": false,
        "antialias": false,
    }))
    .unwrap();

    canvas
        .get_context_with_context_options("webgl2", &options)
        .expect("failed to create context")
        .expect("context is not supported")
        .dyn_into()
        .expect("failed to create context")
}

/// Configures a viewer for a cheap bake: 16x16 faces down to 1x1.
fn configure(mut viewer: WebViewer) -> WebViewer {
    let config = JsValue::from_serde(&json!({
        "environment": {
            "map": ASSET,
            "base_resolution": 16,
            "mip_levels": 9,
            "sample_count": 16,
        },
        "sphere": { "sectors": 16, "stacks": 8 },
        "raster": { "width": WIDTH, "height": HEIGHT },
        "controls": { "roughness_step": 0.25 },
    }))
    .unwrap();

    viewer.set_json(&config).expect("failed to configure viewer");
    viewer
}

fn setup_viewer() -> WebViewer {
    let context = setup_context(setup_canvas());

    configure(WebViewer::new(&context).expect("failed to create viewer"))
}

fn encode_environment(width: usize, height: usize, pixels: &[Rgb<f32>]) -> Vec<u8> {
    let mut bytes = vec![];

    HdrEncoder::new(&mut bytes)
        .encode(pixels, width, height)
        .expect("failed to encode environment");

    bytes
}

fn synthetic_environment() -> Vec<u8> {
    let (width, height) = (16, 8);

    let pixels: Vec<Rgb<f32>> = (0..width * height)
        .map(|i| {
            let row = (i / width) as f32 / height as f32;
            Rgb([2.0 * row, 0.5, 1.0 - row])
        })
        .collect();

    encode_environment(width, height, &pixels)
}

fn constant_environment() -> Vec<u8> {
    encode_environment(16, 8, &[Rgb(CONSTANT_RADIANCE); 16 * 8])
}

/// Color the display pass should produce for the constant environment.
fn expected_pixel(exposure: f32) -> [u8; 4] {
    let mut pixel = [255; 4];

    for (channel, &radiance) in pixel.iter_mut().zip(&CONSTANT_RADIANCE) {
        let mapped = 1.0 - (-radiance * exposure).exp();
        *channel = (mapped.powf(1.0 / 2.2) * 255.0).round() as u8;
    }

    pixel
}

fn read_canvas_pixel(context: &WebGl2RenderingContext, x: i32, y: i32) -> [u8; 4] {
    let mut pixel = [0; 4];

    context
        .read_pixels_with_opt_u8_array(
            x,
            y,
            1,
            1,
            WebGl2RenderingContext::RGBA,
            WebGl2RenderingContext::UNSIGNED_BYTE,
            Some(&mut pixel),
        )
        .expect("failed to read canvas");

    pixel
}

fn assert_pixel_close(actual: [u8; 4], expected: [u8; 4]) {
    let close = actual
        .iter()
        .zip(&expected)
        .all(|(&a, &e)| (a as i32 - e as i32).abs() <= 3);

    assert!(close, "{:?} != {:?}", actual, expected);
}

fn assert_sphere_centre(context: &WebGl2RenderingContext, expected: [u8; 4]) {
    let (x, y) = (WIDTH as i32 / 2, HEIGHT as i32 / 2);

    assert_pixel_close(read_canvas_pixel(context, x, y), expected);
}

async fn sleep(millis: i32) {
    let promise = Promise::new(&mut |resolve, _| {
        web_sys::window()
            .expect("window not found")
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
            .expect("failed to set timeout");
    });

    JsFuture::from(promise).await.expect("timeout failed");
}

#[wasm_bindgen_test]
fn bakes_environment_into_truncated_mip_chain() {
    let mut viewer = setup_viewer();

    viewer.insert_asset(ASSET, &synthetic_environment());

    assert!(viewer.update().expect("update failed"));
    assert_eq!(viewer.cubemap_resolution(), 16);
    assert_eq!(viewer.baked_levels(), 5);

    assert!(viewer.frame().expect("frame failed"));
    assert!(!viewer.update().expect("update failed"));
}

#[wasm_bindgen_test]
fn constant_environment_survives_bake_at_any_roughness() {
    let context = setup_context(setup_canvas());
    let mut viewer = configure(WebViewer::new(&context).expect("failed to create viewer"));

    viewer.insert_asset(ASSET, &constant_environment());
    assert!(viewer.update().expect("update failed"));

    assert!(viewer.frame().expect("frame failed"));
    assert_sphere_centre(&context, expected_pixel(1.0));
    assert_pixel_close(read_canvas_pixel(&context, 0, 0), CLEAR_PIXEL);

    viewer.key_down("KeyR");

    for _ in 0..4 {
        assert!(viewer.frame().expect("frame failed"));
    }

    assert!(viewer.roughness() > 0.99);
    assert_sphere_centre(&context, expected_pixel(1.0));
}

#[wasm_bindgen_test]
fn failed_bake_leaves_nothing_to_sample() {
    let context = setup_context(setup_canvas());
    let mut viewer = configure(WebViewer::new(&context).expect("failed to create viewer"));

    viewer.insert_asset(ASSET, &constant_environment());
    assert!(viewer.update().expect("update failed"));

    let config = JsValue::from_serde(&json!({
        "environment": { "map": ASSET, "sample_count": 0 },
    }))
    .unwrap();

    viewer.set_json(&config).expect("failed to configure viewer");

    assert!(viewer.update().is_err());
    assert_eq!(viewer.baked_levels(), 0);

    assert!(viewer.frame().expect("frame failed"));
    assert_sphere_centre(&context, CLEAR_PIXEL);
}

#[wasm_bindgen_test]
fn degenerate_sphere_is_rejected() {
    let mut viewer = setup_viewer();

    let config = JsValue::from_serde(&json!({
        "sphere": { "radius": 0.0 },
    }))
    .unwrap();

    viewer.set_json(&config).expect("failed to configure viewer");

    assert!(viewer.update().is_err());
}

#[wasm_bindgen_test]
async fn rebakes_after_context_restore() {
    let canvas = setup_canvas();
    let context = setup_context(canvas.clone());

    // the browser only restores contexts whose loss was prevented
    let prevent_default = Closure::wrap(Box::new(|event: Event| {
        event.prevent_default();
    }) as Box<dyn FnMut(Event)>);

    canvas
        .add_event_listener_with_callback(
            "webglcontextlost",
            prevent_default.as_ref().unchecked_ref(),
        )
        .expect("failed to add listener");

    prevent_default.forget();

    let mut viewer = configure(WebViewer::new(&context).expect("failed to create viewer"));

    viewer.insert_asset(ASSET, &constant_environment());
    assert!(viewer.update().expect("update failed"));

    let extension: WebglLoseContext = context
        .get_extension("WEBGL_lose_context")
        .expect("failed to query extension")
        .expect("extension `WEBGL_lose_context' missing")
        .unchecked_into();

    extension.lose_context();
    viewer.context_lost();

    assert!(!viewer.update().expect("update failed"));
    assert!(viewer.frame().expect("frame failed"));

    sleep(10).await;
    extension.restore_context();

    let mut rebaked = false;

    for _ in 0..100 {
        sleep(10).await;

        if viewer.update().expect("update failed") {
            rebaked = true;
            break;
        }
    }

    assert!(rebaked, "context was never restored");
    assert_eq!(viewer.baked_levels(), 5);

    assert!(viewer.frame().expect("frame failed"));
    assert_sphere_centre(&context, expected_pixel(1.0));
}

#[wasm_bindgen_test]
fn missing_environment_still_bakes() {
    let mut viewer = setup_viewer();

    assert!(viewer.update().expect("update failed"));
    assert_eq!(viewer.baked_levels(), 5);
    assert!(viewer.frame().expect("frame failed"));
}

#[wasm_bindgen_test]
fn undecodable_environment_still_bakes() {
    let mut viewer = setup_viewer();

    viewer.insert_asset(ASSET, b"definitely not radiance hdr");

    assert!(viewer.update().expect("update failed"));
    assert_eq!(viewer.cubemap_resolution(), 16);
}

#[wasm_bindgen_test]
fn replacing_asset_rebakes() {
    let mut viewer = setup_viewer();

    viewer.insert_asset(ASSET, &synthetic_environment());
    assert!(viewer.update().expect("update failed"));

    viewer.insert_asset("unused.hdr", &synthetic_environment());
    assert!(!viewer.update().expect("update failed"));

    viewer.insert_asset(ASSET, &synthetic_environment());
    assert!(viewer.update().expect("update failed"));
}

#[wasm_bindgen_test]
fn resubmitting_same_config_does_not_rebake() {
    let mut viewer = setup_viewer();

    assert!(viewer.update().expect("update failed"));

    let config = viewer.json().expect("failed to serialize config");
    viewer.set_json(&config).expect("failed to configure viewer");

    assert!(!viewer.update().expect("update failed"));
}

#[wasm_bindgen_test]
fn held_keys_drive_frames_until_escape() {
    let mut viewer = setup_viewer();

    viewer.insert_asset(ASSET, &synthetic_environment());
    viewer.update().expect("update failed");

    assert!(viewer.key_down("KeyE"));
    assert!(!viewer.key_down("KeyQ"));

    for _ in 0..10 {
        assert!(viewer.frame().expect("frame failed"));
    }

    assert!((viewer.exposure() - 1.01).abs() < 1e-4);
    assert_eq!(viewer.roughness(), 0.0);

    viewer.key_down("Digit1");
    assert!(viewer.frame().expect("frame failed"));

    viewer.set_dimensions(32, 32);
    assert!(viewer.frame().expect("frame failed"));

    viewer.key_down("Escape");

    assert!(!viewer.frame().expect("frame failed"));
    assert!(viewer.is_closing());
}

#[wasm_bindgen_test]
fn version_names_package() {
    assert!(ibl_viewer::version().contains(env!("CARGO_PKG_VERSION")));
}
