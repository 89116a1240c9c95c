use std::{env, fs, path::PathBuf};

fn main() {
    // Only the RP2040 (thumbv6m) firmware links against memory.x; host builds skip it.
    let target = env::var("TARGET").unwrap_or_default();
    if target.starts_with("thumbv6m") {
        let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
        let memory_x = fs::read_to_string("memory.x").expect("Failed to read memory.x");
        let dest = out_dir.join("memory.x");
        fs::write(&dest, memory_x).expect("Failed to write memory.x");
        println!("cargo:rustc-link-search={}", out_dir.display());
    }
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}
