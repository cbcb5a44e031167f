//! Run the engine on one drawing and print the JSON result.
//!
//! Usage: `takeoff_extract <drawing> [config.json]`
//!
//! Set `RUST_LOG=debug` for pipeline diagnostics.

use anyhow::{bail, Context};
use std::path::Path;
use takeoff_engine::{Engine, EngineConfig, ExtractionHints};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: takeoff_extract <drawing> [config.json]");
    };

    let config = match args.next() {
        Some(config_path) => {
            let json = std::fs::read_to_string(&config_path)
                .with_context(|| format!("reading {}", config_path))?;
            EngineConfig::from_json(&json).with_context(|| format!("parsing {}", config_path))?
        }
        None => EngineConfig::default(),
    };

    let filename = Path::new(&path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    let hints = ExtractionHints {
        filename,
        ..Default::default()
    };

    let extraction = Engine::new(config)
        .extract_file(&path, &hints)
        .with_context(|| format!("extracting {}", path))?;
    println!("{}", extraction.to_json()?);
    Ok(())
}
