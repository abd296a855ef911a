//! The `hearcheck run` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use uuid::Uuid;

use hearcheck_core::{
    spawn_session, Catalog, KeyDebouncer, RoundMode, RoundObserver, RoundReport, RoundScheduler,
    RoundStats, Tone, TonePlayer, Verdict,
};
use hearcheck_players::config::load_config_from;
use hearcheck_players::{create_player, PlayerConfig};

use crate::PlayerKind;

/// Command-line overrides for one round.
pub struct RunOptions {
    pub mode: Option<RoundMode>,
    pub count: Option<usize>,
    pub seed: Option<u64>,
    pub player: Option<PlayerKind>,
    pub config: Option<PathBuf>,
    pub json: bool,
}

/// Prints round progress to stderr and reports completion.
struct ConsoleObserver {
    done: mpsc::UnboundedSender<RoundStats>,
}

impl RoundObserver for ConsoleObserver {
    fn on_round_started(&self, round_id: Uuid, mode: RoundMode, planned: usize) {
        eprintln!("Round {round_id}: {planned} tone(s), {mode}.");
        eprintln!("Press Enter whenever you hear a tone; q then Enter stops the round.");
    }

    fn on_tone_started(&self, tone: &Tone, remaining: usize) {
        tracing::debug!(frequency_hz = tone.frequency_hz, remaining, "tone started");
    }

    fn on_verdict(&self, verdict: &Verdict) {
        match verdict {
            Verdict::Right { tone } => eprintln!("  heard {tone}"),
            Verdict::Retrigger => eprintln!("  already counted"),
            Verdict::Bad => eprintln!("  nothing was playing"),
            Verdict::Duplicate | Verdict::Ignored => {}
        }
    }

    fn on_round_complete(&self, stats: &RoundStats) {
        let _ = self.done.send(stats.clone());
    }
}

pub async fn execute(options: RunOptions) -> Result<()> {
    let mut config = load_config_from(options.config.as_deref())?;

    if let Some(kind) = options.player {
        config.player = match (kind, &config.player) {
            (PlayerKind::Console, _) => PlayerConfig::Console,
            (PlayerKind::Silent, _) => PlayerConfig::Silent,
            (PlayerKind::Audio, PlayerConfig::Audio { volume }) => {
                PlayerConfig::Audio { volume: *volume }
            }
            (PlayerKind::Audio, _) => PlayerConfig::Audio { volume: 1.0 },
        };
    }
    let mode = options.mode.unwrap_or(config.default_mode);
    let count = options.count.or(config.default_count);
    let seed = options.seed.or(config.seed);

    let catalog = config.load_catalog()?;
    let player = create_player(&config.player, config.envelope())?;
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    tracing::debug!(player = player.name(), ?seed, "starting session");

    let scheduler = RoundScheduler::new(catalog.clone(), config.timing(), player, rng);
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    let (session, task) = spawn_session(scheduler, Arc::new(ConsoleObserver { done: done_tx }));

    session
        .start(mode, count)
        .await
        .context("failed to start round")?;

    let mut debouncer = KeyDebouncer::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = done_rx.recv() => break,
            _ = &mut ctrl_c => {
                eprintln!();
                break;
            }
            line = lines.next_line(), if stdin_open => {
                match line.context("failed to read stdin")? {
                    Some(l) if l.trim().eq_ignore_ascii_case("q") => break,
                    Some(_) => {
                        session.signal(debouncer.tap()).await?;
                    }
                    None => {
                        tracing::debug!("stdin closed; waiting for the round to finish");
                        stdin_open = false;
                    }
                }
            }
        }
    }

    let report = session
        .stop()
        .await?
        .context("round ended without a report")?;
    drop(session);
    task.await.context("session task failed")?;

    print_summary(&report, &catalog);
    if options.json {
        println!("{}", report.to_json()?);
    }
    Ok(())
}

fn print_summary(report: &RoundReport, catalog: &Catalog) {
    use comfy_table::{Cell, Table};

    let stats = &report.stats;
    let mut table = Table::new();
    table.set_header(vec!["Frequency", "Age", "Played", "Heard"]);
    for (hz, played) in &stats.played_frequencies {
        let age = catalog
            .tones()
            .iter()
            .find(|t| t.frequency_hz == *hz)
            .map(|t| t.age_label.as_str())
            .unwrap_or("?");
        let heard = stats.right_guesses_by_frequency.get(hz).copied().unwrap_or(0);
        table.add_row(vec![
            Cell::new(format!("{hz} Hz")),
            Cell::new(age),
            Cell::new(played),
            Cell::new(heard),
        ]);
    }

    eprintln!("\n{table}");
    eprintln!(
        "Tones played: {}  Right: {}  Retriggers: {}  Bad: {}  Hit rate: {:.0}%",
        stats.total_played(),
        stats.right_guesses,
        stats.retriggered,
        stats.bad_guesses,
        stats.hit_rate() * 100.0
    );
    match &stats.highest_guessed_tone {
        Some(tone) => eprintln!("Highest tone heard: {tone}"),
        None => eprintln!("Highest tone heard: none"),
    }
    if !report.completed {
        eprintln!("Round stopped early; {} tone(s) unplayed.", report.unplayed());
    }
}
