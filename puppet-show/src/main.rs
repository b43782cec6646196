//! Puppet Show - Hand Pose Capture and Replay
//!
//! Records detection dumps into sparse keyframe recordings and replays them
//! on a wall-clock timeline.

use puppet_show::app::cli::{Cli, Commands, ConfigAction};
use puppet_show::app::config::Config;
use puppet_show::capture::dump::parse_cycle;
use puppet_show::capture::ring_buffer::PoseRingBuffer;
use puppet_show::playback::{PlaybackMode, PlaybackTick};
use puppet_show::recorder::PoseRecorder;
use puppet_show::rig::PuppetRig;
use puppet_show::time::clock::{Clock, ManualClock, SessionClock};
use puppet_show::workflow::{PuppetShow, Recording};
use puppet_show::HandSide;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Poses drained from the ring buffer per pass
const DRAIN_BATCH: usize = 256;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so we can use --verbose to set log level
    let cli = Cli::parse_args();

    // Initialize tracing (--verbose enables debug-level output)
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Pin the session clock origin
    SessionClock::init();

    // Load config
    let config = if let Some(path) = &cli.config {
        Config::load(path)?
    } else {
        Config::load_default()?
    };

    // Execute command
    match cli.command {
        Commands::Capture {
            input,
            output,
            end_ms,
        } => {
            run_capture(&input, output, end_ms, &config)?;
        }
        Commands::Play {
            input,
            mode,
            tick_rate,
            realtime,
            rig,
        } => {
            let mode = mode.map(PlaybackMode::from).unwrap_or(config.playback.mode);
            let tick_rate = tick_rate.unwrap_or(config.playback.tick_rate_hz);
            run_play(&input, mode, tick_rate, realtime, rig, &config)?;
        }
        Commands::Inspect { file } => {
            run_inspect(&file)?;
        }
        Commands::List { detailed } => {
            run_list(detailed)?;
        }
        Commands::Init { force } => {
            run_init(force, &config)?;
        }
        Commands::Config { action } => {
            run_config(action, &config)?;
        }
    }

    Ok(())
}

fn run_capture(
    input: &Path,
    output: Option<String>,
    end_ms: Option<f64>,
    config: &Config,
) -> anyhow::Result<()> {
    let file = std::fs::File::open(input)
        .map_err(|e| anyhow::anyhow!("Cannot open detection dump {:?}: {}", input, e))?;
    info!("Capturing from {:?}", input);

    // Create ring buffer between the reader thread and the recorder
    let buffer = PoseRingBuffer::with_capacity(config.capture.ring_buffer_size);
    let buffer_stats = buffer.stats();
    let (mut producer, mut consumer) = buffer.split();

    // The reader plays the detection callback: it never waits on the recorder,
    // only on free slots
    let reader = std::thread::spawn(move || -> puppet_show::Result<u64> {
        let mut pushed = 0;
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            let Some(poses) = parse_cycle(&line, i + 1)? else {
                continue;
            };
            for pose in poses {
                let mut pending = pose;
                while let Err(back) = producer.try_push(pending) {
                    pending = back;
                    std::thread::yield_now();
                }
                pushed += 1;
            }
        }
        Ok(pushed)
    });

    let mut recorder = PoseRecorder::new(config.recorder.thresholds());
    let mut last_timestamp: Option<f64> = None;

    loop {
        let reader_done = reader.is_finished();

        let batch = consumer.pop_batch(DRAIN_BATCH);
        let drained = batch.len();
        for slot in batch {
            let pose = slot.pose;
            if !recorder.is_recording() {
                recorder.start(pose.timestamp);
            }
            last_timestamp = Some(last_timestamp.map_or(pose.timestamp, |t| t.max(pose.timestamp)));
            recorder.record(pose);
        }

        if reader_done && consumer.is_empty() {
            break;
        }
        if drained == 0 {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
    }

    let read = reader
        .join()
        .map_err(|_| anyhow::anyhow!("Detection reader thread panicked"))??;

    let Some(last_timestamp) = last_timestamp else {
        anyhow::bail!("Detection dump {:?} contains no poses", input);
    };

    let end = end_ms.unwrap_or(last_timestamp);
    if end < recorder.start_time() {
        anyhow::bail!(
            "--end-ms {} is before the first pose at {}",
            end,
            recorder.start_time()
        );
    }
    recorder.stop(end);

    let output_name = output.unwrap_or_else(|| {
        chrono::Local::now()
            .format("recording_%Y%m%d_%H%M%S")
            .to_string()
    });
    let mut recording = recorder.take_recording();
    recording.metadata.name = output_name.clone();

    info!(
        read,
        consumed = buffer_stats.poses_consumed.load(Ordering::Relaxed),
        peak_occupancy = buffer_stats.peak_occupancy.load(Ordering::Relaxed),
        "Detection dump drained"
    );
    if !recording.has_recording() {
        warn!("Recording has nothing to play back (no keyframes or zero duration)");
    }

    // Save recording
    let recordings_dir = Cli::recordings_dir();
    std::fs::create_dir_all(&recordings_dir)?;

    let output_path = recordings_dir.join(format!("{}.json", output_name));
    recording.save(&output_path)?;
    info!("Saved recording to {:?}", output_path);
    println!("{}", output_path.display());

    Ok(())
}

fn run_play(
    input: &Path,
    mode: PlaybackMode,
    tick_rate: u32,
    realtime: bool,
    rig_output: bool,
    config: &Config,
) -> anyhow::Result<()> {
    if tick_rate == 0 || tick_rate > 1000 {
        anyhow::bail!("--tick-rate must be in (0, 1000], got {}", tick_rate);
    }
    let interval_ms = 1_000.0 / tick_rate as f64;

    let mut show = PuppetShow::new(config.recorder.thresholds(), mode);
    show.load_recording_file(input)?;
    if !show.has_recording() {
        anyhow::bail!("Recording {:?} has nothing to play back", input);
    }

    let stop_flag = Arc::new(AtomicBool::new(false));
    if realtime {
        let stop_flag_handler = stop_flag.clone();
        ctrlc::set_handler(move || {
            stop_flag_handler.store(true, Ordering::SeqCst);
        })?;
    }

    let manual = ManualClock::new(0.0);
    let session = SessionClock;
    let clock: &dyn Clock = if realtime { &session } else { &manual };

    let mut rig = PuppetRig::new();
    if !show.play(clock.now_ms()) {
        anyhow::bail!("Playback refused for {:?}", input);
    }
    let started = show.scheduler().start_wall_clock();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut ticks = 0u64;

    loop {
        if stop_flag.load(Ordering::SeqCst) {
            warn!("Playback interrupted after {} ticks", ticks);
            break;
        }

        let now = clock.now_ms();
        let elapsed = now - started;
        match show.on_tick(now, &mut rig) {
            PlaybackTick::Frame { left, right } => {
                let line = if rig_output {
                    serde_json::json!({
                        "elapsed": elapsed,
                        "left": rig.hand(HandSide::Left),
                        "right": rig.hand(HandSide::Right),
                    })
                } else {
                    serde_json::json!({
                        "elapsed": elapsed,
                        "left": left,
                        "right": right,
                    })
                };
                writeln!(out, "{}", line)?;
            }
            PlaybackTick::Finished => {
                writeln!(out, "{}", serde_json::json!({ "elapsed": elapsed, "finished": true }))?;
                break;
            }
            PlaybackTick::Idle => break,
        }
        ticks += 1;

        if realtime {
            std::thread::sleep(std::time::Duration::from_secs_f64(interval_ms / 1_000.0));
        } else {
            manual.advance(interval_ms);
        }
    }

    info!(ticks, mode = mode.as_str(), "Playback done");
    Ok(())
}

fn run_inspect(file: &Path) -> anyhow::Result<()> {
    let recording = Recording::load(file)?;
    let m = &recording.metadata;

    println!("Recording: {}", if m.name.is_empty() { "-" } else { m.name.as_str() });
    println!("  ID:             {}", m.id);
    match &m.recorded_at {
        Some(at) => println!("  Recorded at:    {}", at.to_rfc3339()),
        None => println!("  Recorded at:    -"),
    }
    println!("  Format version: {}", m.format_version);
    println!("  Duration:       {:.1} ms", recording.duration);
    for side in HandSide::ALL {
        let keyframes = recording.keyframes(side);
        match (keyframes.first(), keyframes.last()) {
            (Some(first), Some(last)) => println!(
                "  {:<5} hand:     {} keyframes ({:.1} .. {:.1} ms)",
                side,
                keyframes.len(),
                first.timestamp,
                last.timestamp
            ),
            _ => println!("  {:<5} hand:     no keyframes", side),
        }
    }
    println!("  Playable:       {}", recording.has_recording());

    Ok(())
}

fn run_list(detailed: bool) -> anyhow::Result<()> {
    let recordings_dir = Cli::recordings_dir();

    if !recordings_dir.exists() {
        println!("No recordings found in {}", recordings_dir.display());
        println!("Capture one with: puppet-show capture --input <dump.jsonl>");
        return Ok(());
    }

    println!("Recordings in {:?}:", recordings_dir);

    let mut entries: Vec<_> = std::fs::read_dir(&recordings_dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|ext| ext == "json").unwrap_or(false))
        .collect();

    entries.sort_by_key(|e| e.path());

    for entry in &entries {
        let path = entry.path();
        let file_name = path.file_name().unwrap_or_default().to_string_lossy();

        if detailed {
            match Recording::load(&path) {
                Ok(recording) => {
                    println!(
                        "  {}  ({} left / {} right keyframes, {:.1}s)",
                        file_name,
                        recording.left.len(),
                        recording.right.len(),
                        recording.duration / 1000.0
                    );
                }
                Err(_) => {
                    let fs_meta = entry.metadata()?;
                    println!("  {}  ({} bytes, failed to parse)", file_name, fs_meta.len());
                }
            }
        } else {
            println!("  {}", file_name);
        }
    }

    if entries.is_empty() {
        println!("  (none)");
        println!("Capture one with: puppet-show capture --input <dump.jsonl>");
    }

    Ok(())
}

fn run_init(force: bool, config: &Config) -> anyhow::Result<()> {
    let config_path = Config::default_path();

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {:?}. Use --force to overwrite.",
            config_path
        );
    }

    config.save_default()?;
    println!("Created config at {:?}", config_path);
    println!("\nConfig content:\n{}", config.to_toml()?);

    let recordings_dir: PathBuf = Cli::recordings_dir();
    std::fs::create_dir_all(&recordings_dir)?;
    println!("\nCreated recordings directory: {:?}", recordings_dir);

    Ok(())
}

fn run_config(action: ConfigAction, config: &Config) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = config.to_toml()?;
            println!("Configuration ({:?}):\n", Config::default_path());
            println!("{}", toml_str);
        }
        ConfigAction::Get { key } => {
            let toml_str = config.to_toml()?;
            match find_toml_value(&toml_str, &key) {
                Some(v) => println!("{} = {}", key, v),
                None => {
                    anyhow::bail!("Configuration key '{}' not found", key);
                }
            }
        }
        ConfigAction::Reset { force } => {
            let config_path = Config::default_path();

            if config_path.exists() && !force {
                println!("Config exists at {:?}", config_path);
                println!("Use --force to reset to defaults");
                return Ok(());
            }

            Config::default().save_default()?;
            println!("Configuration reset to defaults at {:?}", config_path);
        }
    }

    Ok(())
}

/// Look up a dotted key (`section.leaf`) in a TOML document
fn find_toml_value(toml_str: &str, key: &str) -> Option<toml::Value> {
    let root: toml::Value = toml::from_str(toml_str).ok()?;
    key.split('.')
        .try_fold(&root, |value, segment| value.get(segment))
        .cloned()
}
