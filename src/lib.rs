#![deny(unsafe_code)]

macro_rules! export {
    [$( $module:ident ),* $(,)*] => {
        $(
            mod $module;
            pub use self::$module::*;
        )*
    };
}

export![device, engine, scene, web];

/// GLSL shaders embedded from the `shaders` directory.
pub mod shader {
    /// Source and interface of a single GLSL shader stage.
    #[derive(Debug)]
    pub struct ShaderInfo {
        pub name: &'static str,
        pub code: &'static str,
        pub texture_units: &'static [&'static str],
        pub uniforms: &'static [&'static str],
    }

    include!(concat!(env!("OUT_DIR"), "/glsl_shaders.rs"));
}

/// Build-time metadata.
pub mod build_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
