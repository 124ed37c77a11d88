//! Build script for the storefront crate.
//!
//! Fingerprints `static/css/main.css` so the stylesheet can be served with
//! a long cache lifetime. The hashed copy lands in `static/css/derived/`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Hex characters of the digest kept in the file name.
const HASH_LEN: usize = 8;

fn main() {
    let manifest_dir =
        PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo"));
    let hash = fingerprint_stylesheet(&manifest_dir);
    println!("cargo:rustc-env=CSS_HASH={hash}");
}

/// Copy main.css to `derived/main.<hash>.css` and return the hash.
///
/// Returns an empty hash when the stylesheet is missing so the crate still
/// builds from a partial checkout.
fn fingerprint_stylesheet(manifest_dir: &Path) -> String {
    let css_dir = manifest_dir.join("static/css");
    let source = css_dir.join("main.css");
    println!("cargo:rerun-if-changed={}", source.display());

    let content = match fs::read(&source) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=main.css not readable: {e}");
            return String::new();
        }
    };

    let digest = format!("{:x}", Sha256::digest(&content));
    let hash = digest[..HASH_LEN].to_owned();

    let derived = css_dir.join("derived");
    fs::create_dir_all(&derived).expect("Failed to create derived CSS directory");
    fs::write(derived.join(format!("main.{hash}.css")), &content)
        .expect("Failed to write fingerprinted stylesheet");

    hash
}
