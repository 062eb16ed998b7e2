//! Build script for spotyt.
//!
//! Copies the `.env.example` template from the crate root into the user's
//! local data directory (`<data_local_dir>/spotyt/.env.example`) so that a
//! freshly installed binary has a configuration template right next to the
//! `.env` file it reads at startup.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` into the local data directory.
///
/// A missing template only produces a cargo warning. Failing to create the
/// target directory or to write the copy fails the build.
///
/// # Target Location
///
/// - Linux: `~/.local/share/spotyt/.env.example`
/// - macOS: `~/Library/Application Support/spotyt/.env.example`
/// - Windows: `%LOCALAPPDATA%/spotyt/.env.example`
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("spotyt");
    fs::create_dir_all(&out_dir)?;

    if env_example_path.is_file() {
        let contents = fs::read_to_string(&env_example_path)?;
        fs::write(out_dir.join(".env.example"), contents)?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
    }

    Ok(())
}
