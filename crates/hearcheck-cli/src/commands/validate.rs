//! The `hearcheck validate` command.

use std::path::PathBuf;

use anyhow::Result;

use hearcheck_core::catalog::load_catalog;

pub fn execute(catalog_path: PathBuf) -> Result<()> {
    let catalog = load_catalog(&catalog_path)?;

    let tones = catalog.tones();
    if let (Some(lowest), Some(highest)) = (tones.first(), tones.last()) {
        println!(
            "Catalog: {} ({} tones, {} to {} Hz)",
            catalog_path.display(),
            catalog.len(),
            lowest.frequency_hz,
            highest.frequency_hz
        );
    }

    let audible_limit = 20_000;
    let ultrasonic = tones
        .iter()
        .filter(|t| t.frequency_hz > audible_limit)
        .count();
    if ultrasonic > 0 {
        println!("  WARNING: {ultrasonic} tone(s) above {audible_limit} Hz are inaudible to most listeners");
    }

    println!("Catalog valid.");
    Ok(())
}
