//! The `hearcheck init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("hearcheck.toml"), SAMPLE_CONFIG)?;
    write_if_missing(Path::new("catalog.toml"), SAMPLE_CATALOG)?;

    println!("\nNext steps:");
    println!("  1. Edit catalog.toml to add or remove tones");
    println!("  2. Run: hearcheck validate --catalog catalog.toml");
    println!("  3. Run: hearcheck run");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# hearcheck configuration

# ascending, descending, or random
default_mode = "ascending"
# default_count = 7
# seed = 42
catalog = "catalog.toml"

[timing]
min_delay_ms = 1000
max_delay_ms = 10000
tone_ms = 3000
fade_ms = 15
release_grace_ms = 50

[player]
# console, silent, or audio (audio needs the `audio` build feature)
type = "console"
"#;

const SAMPLE_CATALOG: &str = r#"# Tones in ascending frequency order.
# age_label: the ages that can typically still hear the tone.

[[tones]]
frequency_hz = 440
age_label = "0+"

[[tones]]
frequency_hz = 8000
age_label = "0+"

[[tones]]
frequency_hz = 12000
age_label = "< 50"

[[tones]]
frequency_hz = 15000
age_label = "< 40"

[[tones]]
frequency_hz = 16000
age_label = "< 30"

[[tones]]
frequency_hz = 17000
age_label = "< 24"

[[tones]]
frequency_hz = 17400
age_label = "< 18"
"#;
