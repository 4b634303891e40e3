use regex::Regex;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    built::write_built_file().expect("failed to acquire build-time information");

    let shader_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders");
    println!("cargo:rerun-if-changed={}", shader_dir.display());

    let mut paths: Vec<PathBuf> = fs::read_dir(&shader_dir)
        .expect("failed to read shader directory")
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| shader_prefix(path).is_some())
        .collect();

    paths.sort();

    let uniform = Regex::new(r#"^uniform ([a-zA-Z0-9]+) ([a-zA-Z_][a-zA-Z0-9_]*);"#).unwrap();

    let mut output = String::new();

    for path in &paths {
        println!("cargo:rerun-if-changed={}", path.display());

        let source = fs::read_to_string(path).expect("failed to read shader source");

        let mut texture_units = vec![];
        let mut uniforms = vec![];

        for line in source.lines() {
            if let Some(captures) = uniform.captures(line.trim()) {
                let name = captures[2].to_owned();

                if captures[1].starts_with("sampler") {
                    texture_units.push(name);
                } else {
                    uniforms.push(name);
                }
            }
        }

        let stem = path.file_stem().unwrap().to_str().unwrap();
        let file = path.file_name().unwrap().to_str().unwrap();

        writeln!(
            output,
            "pub static {}_{}: ShaderInfo = ShaderInfo {{\n    \
             name: {:?},\n    \
             code: include_str!({:?}),\n    \
             texture_units: &{:?},\n    \
             uniforms: &{:?},\n}};\n",
            shader_prefix(path).unwrap(),
            stem.to_uppercase(),
            file,
            path.display().to_string(),
            texture_units,
            uniforms,
        )
        .unwrap();
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("glsl_shaders.rs"), output).expect("failed to write shader table");
}

fn shader_prefix(path: &Path) -> Option<&'static str> {
    match path.extension()?.to_str()? {
        "vert" => Some("VS"),
        "frag" => Some("FS"),
        _ => None,
    }
}
