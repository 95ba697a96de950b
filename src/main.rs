use anyhow::{Context, Result};
use cartolog::audio;
use cartolog::journey::Chapter;
use cartolog::loader::{self, JourneySource, LoadedClip};
use cartolog::map::{self, Profile};
use cartolog::store::JourneyStore;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cartolog", version, about = "Emotional cartography journey toolkit")]
struct Cli {
    /// Local data directory holding journey.json and clips/
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Base URL of a deployed site to fetch from instead of a local dir
    #[arg(long, global = true, conflicts_with = "data_dir")]
    url: Option<String>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the journey: metadata, chapters, scroll coverage
    Inspect,

    /// Validate journey data at the ingestion boundary
    Validate {
        /// Treat warnings (overlaps, gaps, odd clip ids) as failures too
        #[arg(long)]
        strict: bool,
    },

    /// Load per-clip records and show their features
    Clips {
        /// Number of parallel workers (0 = auto-detect from config)
        #[arg(short = 'j', long, default_value = "0")]
        jobs: usize,
    },

    /// Sweep scroll progress through the journey and print what the page would do
    Simulate {
        /// Number of progress steps across [0, 1]
        #[arg(short = 'n', long, default_value = "100")]
        steps: usize,

        /// Use the mobile viewport profile
        #[arg(long)]
        mobile: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = cartolog::config::AppConfig::load();

    // Resolve the data source: CLI > config, URL beats directory
    let source = if let Some(url) = cli.url {
        JourneySource::Url(url)
    } else if let Some(dir) = cli.data_dir {
        JourneySource::Dir(dir)
    } else if let Some(url) = config.base_url.clone() {
        JourneySource::Url(url)
    } else if let Some(dir) = config.data_dir.clone() {
        JourneySource::Dir(dir)
    } else {
        JourneySource::Dir(PathBuf::from("public/data"))
    };
    log::info!("Data source: {source}");

    match cli.command {
        Commands::Inspect => {
            let ingested = loader::ingest_journey(&source);
            let meta = &ingested.data.metadata;

            println!(
                "Journey: {} clips, {} countries, {} ({} - {})",
                meta.total_clips,
                meta.countries,
                meta.total_duration,
                meta.date_range[0],
                meta.date_range[1]
            );
            match map::resolve_view(config.mapbox_token.as_deref()) {
                map::MapView::Live { .. } => println!("Map: live tiles (token configured)"),
                map::MapView::Placeholder => println!("Map: placeholder (no token)"),
            }
            println!();
            print_chapter_table(&ingested.report.accepted);

            if !ingested.report.rejected.is_empty() || !ingested.report.warnings.is_empty() {
                println!();
                println!(
                    "{} chapter(s) rejected, {} warning(s) — run `cartolog validate` for details",
                    ingested.report.rejected.len(),
                    ingested.report.warnings.len()
                );
            }
        }

        Commands::Validate { strict } => {
            // No placeholder fallback here: validating built-in data would
            // only hide a broken deployment.
            let data = loader::try_load_journey(&source)
                .with_context(|| format!("Failed to load journey from {source}"))?;

            let mut report = cartolog::journey::validate_chapters(data.chapters);
            report
                .warnings
                .extend(cartolog::journey::validate_metadata(&data.metadata));

            for (id, reason) in &report.rejected {
                println!("REJECT  chapter '{id}': {reason}");
            }
            for w in &report.warnings {
                println!("WARN    {w}");
            }

            println!();
            println!(
                "{} accepted, {} rejected, {} warnings",
                report.accepted.len(),
                report.rejected.len(),
                report.warnings.len()
            );

            if !report.rejected.is_empty() {
                anyhow::bail!("validation failed: {} chapter(s) rejected", report.rejected.len());
            }
            if strict && !report.warnings.is_empty() {
                anyhow::bail!("validation failed (--strict): {} warning(s)", report.warnings.len());
            }
            println!("OK");
        }

        Commands::Clips { jobs } => {
            let ingested = loader::ingest_journey(&source);
            let ids = loader::collect_clip_ids(&ingested.data);
            if ids.is_empty() {
                println!("No clips referenced by this journey.");
                return Ok(());
            }

            let workers = if jobs > 0 { jobs } else { config.resolve_workers() };
            let clips = loader::load_clips(&source, &ids, workers);
            print_clip_table(&clips);

            let missing = clips.iter().filter(|c| c.fallback).count();
            println!();
            println!(
                "{} clips, {} loaded, {} missing (shown with default features)",
                clips.len(),
                clips.len() - missing,
                missing
            );
        }

        Commands::Simulate { steps, mobile } => {
            let ingested = loader::ingest_journey(&source);
            let profile = if mobile { Profile::Mobile } else { Profile::Desktop };
            simulate(ingested.report.accepted, steps.max(1), profile);
        }
    }

    Ok(())
}

/// Drive a real store across [0, 1] and print every chapter transition
/// the way the page would react to it: camera flight, clip cue, fades.
fn simulate(chapters: Vec<Chapter>, steps: usize, profile: Profile) {
    let mut store = JourneyStore::new();
    store.set_chapters(chapters);
    store.toggle_audio();

    let mut last_chapter: Option<String> = None;
    let mut audible: Option<String> = None;

    for i in 0..=steps {
        let p = i as f64 / steps as f64;
        store.set_scroll_progress(p);

        let current = store.current_chapter().map(|ch| ch.id.clone());
        if current == last_chapter {
            continue;
        }

        let pose = map::camera_pose(&store, profile);
        match store.current_chapter() {
            Some(ch) => {
                println!(
                    "p={p:.3}  -> {} ({}, {})  chapter-progress {:.2}",
                    ch.id,
                    ch.city,
                    ch.country,
                    store.chapter_progress()
                );
                println!(
                    "         camera: center [{:.4}, {:.4}] zoom {:.1} pitch {:.0} bearing {:.1}",
                    pose.center[0], pose.center[1], pose.zoom, pose.pitch, pose.bearing
                );
            }
            None => {
                println!("p={p:.3}  -> (no chapter)");
                println!(
                    "         camera: idle [{:.4}, {:.4}] zoom {:.1}",
                    pose.center[0], pose.center[1], pose.zoom
                );
            }
        }

        let cue = audio::chapter_cue(&store).map(str::to_string);
        store.set_current_clip(cue.clone());
        let playing: Vec<&str> = audible.as_deref().into_iter().collect();
        for action in audio::plan_transition(store.is_audio_enabled(), cue.as_deref(), &playing) {
            match action {
                audio::FadeAction::In { clip_id, volume, duration_ms } => {
                    println!("         audio: fade in {clip_id} to {volume} over {duration_ms}ms");
                }
                audio::FadeAction::Out { clip_id, duration_ms } => {
                    println!("         audio: fade out {clip_id} over {duration_ms}ms");
                }
            }
        }
        audible = cue;
        last_chapter = current;
    }
}

/// Print a table of chapters with scroll coverage and cluster labels.
fn print_chapter_table(chapters: &[Chapter]) {
    println!(
        "{:<16} {:<14} {:<18} {:>5} {:>5}  {:<15} {:>5} {:>6}",
        "Chapter", "City", "Dates", "Start", "End", "Cluster", "Conf", "Clips"
    );
    println!("{}", "-".repeat(92));

    for ch in chapters {
        println!(
            "{:<16} {:<14} {:<18} {:>5.2} {:>5.2}  {:<15} {:>4.0}% {:>6}",
            ch.id,
            ch.city,
            ch.date_range,
            ch.scroll_start,
            ch.scroll_end,
            ch.emotion_cluster.label,
            ch.emotion_cluster.confidence * 100.0,
            ch.audio_clips.len(),
        );
    }
}

/// Print a table of clip features. Missing records are marked.
fn print_clip_table(clips: &[LoadedClip]) {
    println!(
        "{:<14} {:>6} {:>9} {:>7} {:>7} {:>6}  {:<18}",
        "Clip", "Dur", "Centroid", "ZCR", "RMS", "Tempo", "Cluster"
    );
    println!("{}", "-".repeat(75));

    for clip in clips {
        let f = &clip.data.features;
        let cluster = clip
            .data
            .predictions
            .agglomerative
            .map(|p| format!("#{} ({:.0}%)", p.cluster, p.confidence * 100.0))
            .unwrap_or_else(|| "-".to_string());
        let marker = if clip.fallback { " (defaults)" } else { "" };

        println!(
            "{:<14} {:>6.1} {:>9.0} {:>7.3} {:>7.3} {:>6.0}  {:<18}{}",
            clip.data.id,
            clip.data.duration,
            f.spectral_centroid,
            f.zero_crossing_rate,
            f.rms_energy,
            f.tempo,
            cluster,
            marker,
        );
    }
}
