use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=tessdata/");
    println!("cargo:rerun-if-env-changed=TESSDATA_PREFIX");

    let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") else {
        return;
    };

    let tessdata_src = PathBuf::from(manifest_dir).join("tessdata");
    if tessdata_src.exists() {
        println!("cargo:warning=Found tessdata directory, export TESSDATA_PREFIX to use it");
    } else if env::var_os("TESSDATA_PREFIX").is_none() {
        println!("cargo:warning=No tessdata directory found. Tesseract will use system data.");
    }
}
