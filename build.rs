use std::{env, error::Error, fs};

// Number of simultaneous splat slots the simulation shader accepts. This is
// the single source for both the WGSL arrays and the Rust constant.
const MAX_SPLATS: usize = 16;

// All shaders reside in the 'src/shaders' directory
fn generate_shaders(output_path: &str) -> std::result::Result<(), Box<dyn Error>> {
    let tera = tera::Tera::new("src/shaders/*")?;
    println!("cargo:rerun-if-changed=src/shaders/");
    let mut context = tera::Context::new();
    context.insert("max_splats", &MAX_SPLATS);
    context.insert("max_positions", &(2 * MAX_SPLATS));
    fs::create_dir_all(format!("{}/shaders/", output_path))?;
    for file in fs::read_dir("src/shaders")? {
        let file = file?;
        let is_wgsl = file
            .path()
            .extension()
            .map_or(false, |extension| extension == "wgsl");
        if is_wgsl {
            let file = file.file_name();
            let file_name = file.to_str().ok_or("non utf-8 shader file name")?;
            let result = tera.render(file_name, &context)?;
            fs::write(format!("{}/shaders/{}", output_path, file_name), result)?;
            println!("cargo:rerun-if-changed=src/shaders/{}", file_name);
        }
    }
    Ok(())
}

fn generate_constants(output_path: &str) -> std::io::Result<()> {
    fs::write(
        format!("{}/splat_slots.rs", output_path),
        format!("pub const MAX_SPLATS: usize = {};\n", MAX_SPLATS),
    )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    let output_path = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    if let Err(err) = generate_constants(&output_path) {
        panic!("Unable to generate constants\n{}", err);
    }
    if let Err(err) = generate_shaders(&output_path) {
        // panic here for a nicer error message, otherwise it will
        // be flattened to one line for some reason
        panic!("Unable to generate shaders\n{}", err);
    }
}
