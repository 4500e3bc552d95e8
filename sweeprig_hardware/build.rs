//! This build script copies the `memory.x` file from the workspace root into
//! a directory where the linker can always find it at build time.
//! The linker only searches the directory holding the top-level `Cargo.toml`
//! by default, so in a workspace this script is required. Requesting a re-run
//! whenever `memory.x` changes also ensures the application is rebuilt with
//! new memory settings.

use std::{env, fs::File, io::Write, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=../memory.x");

    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("../memory.x"))
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());
}
