mod player;

use anyhow::{Context, Result};
use clap::Parser;
use player::AutoPlayer;
use sim_core::FrameDelta;
use sim_host::MatchHost;
use sim_td::{TdConfig, TdEvent, TdGame};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use td_types::TdObservation;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "headless-runner")]
#[command(about = "Play a tower defense match without rendering")]
struct Args {
    /// JSON balance/config file; defaults are used for missing fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of frames to simulate
    #[arg(long, default_value = "36000")]
    frames: u64,

    /// Frame rate the driver pretends to run at
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Seed for the auto-player
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Number of waves the auto-player starts before stopping
    #[arg(long, default_value = "10")]
    waves: u32,

    /// Pace frames against the wall clock and print events as they happen
    #[arg(short, long)]
    realtime: bool,

    /// Print the observation JSON schema and exit
    #[arg(long)]
    schema: bool,

    /// Print the final observation as JSON
    #[arg(long)]
    dump_observation: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.schema {
        let schema = schemars::schema_for!(TdObservation);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => TdConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => TdConfig::default(),
    };
    config.validate().context("invalid config")?;

    let mut host = MatchHost::<TdGame>::new(config, args.seed);
    let mut player = AutoPlayer::new(args.seed, args.waves);
    info!(seed = args.seed, waves = args.waves, fps = args.fps, "match started");

    let events = if args.realtime {
        run_realtime(&mut host, &mut player, &args)
    } else {
        run_fast(&mut host, &mut player, &args)
    };

    println!("\n=== Tower Defense Simulation Complete ===");
    println!("Outcome: {:?}", host.is_terminal());
    println!("Final tick: {}", host.current_tick());
    print_status(&host);
    print_event_summary(&events);

    if args.dump_observation {
        println!("{}", serde_json::to_string_pretty(&host.observe())?);
    }
    Ok(())
}

fn frame_secs(host: &MatchHost<TdGame>, fps: u32) -> f32 {
    FrameDelta::per_frame(fps, host.game().state().config.max_frame_dt).secs()
}

/// One decision plus one frame. `None` once the match cannot advance.
fn advance(host: &mut MatchHost<TdGame>, player: &mut AutoPlayer, dt: f32) -> Option<Vec<TdEvent>> {
    if let Some(action) = player.decide(host.game().state()) {
        host.submit(action);
    }
    host.step_frame(dt)
}

fn run_fast(host: &mut MatchHost<TdGame>, player: &mut AutoPlayer, args: &Args) -> Vec<TdEvent> {
    let dt = frame_secs(host, args.fps);
    let mut all_events = Vec::new();

    for _ in 0..args.frames {
        let Some(events) = advance(host, player, dt) else {
            break;
        };
        all_events.extend(events);
        if host.is_terminal().is_some() || player.finished(host.game().state()) {
            break;
        }
    }
    all_events
}

fn run_realtime(host: &mut MatchHost<TdGame>, player: &mut AutoPlayer, args: &Args) -> Vec<TdEvent> {
    let frame = Duration::from_secs_f32(frame_secs(host, args.fps).max(f32::EPSILON));
    let max_dt = host.game().state().config.max_frame_dt;
    let mut last_frame = Instant::now();
    let mut last_status = Instant::now();
    let mut all_events = Vec::new();

    println!("=== Running in Real-Time Mode ({} fps) ===", args.fps);
    println!("Press Ctrl+C to stop\n");

    for _ in 0..args.frames {
        let frame_start = Instant::now();
        let dt = FrameDelta::from_duration(frame_start - last_frame, max_dt).secs();
        last_frame = frame_start;

        let Some(events) = advance(host, player, dt) else {
            break;
        };
        for event in &events {
            print_event(host.current_tick(), event);
        }
        all_events.extend(events);

        if last_status.elapsed() >= Duration::from_secs(1) {
            print_status(host);
            last_status = Instant::now();
        }
        if host.is_terminal().is_some() || player.finished(host.game().state()) {
            break;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            std::thread::sleep(frame - elapsed);
        }
    }
    all_events
}

fn print_event(tick: u64, event: &TdEvent) {
    match event {
        TdEvent::WaveStarted {
            wave,
            enemies,
            bosses,
        } => println!("[{tick:>6}] === Wave {wave} started: {enemies} enemies, {bosses} bosses ==="),
        TdEvent::WaveCompleted { wave, bonus } => {
            println!("[{tick:>6}] === Wave {wave} cleared (+{bonus}) ===")
        }
        TdEvent::EnemySpawned { kind, boss: true, .. } => {
            println!("[{tick:>6}] BOSS {kind} entered the path")
        }
        TdEvent::EnemyEscaped { lives, .. } => {
            println!("[{tick:>6}] Enemy escaped, {lives} lives left")
        }
        TdEvent::EnemyKilled { kind, reward, .. } => {
            println!("[{tick:>6}] {kind} killed (+{reward})")
        }
        TdEvent::TowerPlaced {
            kind,
            position,
            cost,
            ..
        } => println!(
            "[{tick:>6}] {kind} tower placed at ({:.0}, {:.0}) for {cost}",
            position.x, position.y
        ),
        TdEvent::TowerUpgraded { level, cost, .. } => {
            println!("[{tick:>6}] Tower upgraded to level {level} for {cost}")
        }
        TdEvent::TowerSold { refund, .. } => println!("[{tick:>6}] Tower sold for {refund}"),
        TdEvent::GameOver { wave } => println!("[{tick:>6}] GAME OVER on wave {wave}"),
        TdEvent::MatchReset => println!("[{tick:>6}] Match reset"),
        TdEvent::ActionRejected { error, .. } => println!("[{tick:>6}] Rejected: {error}"),
        TdEvent::EnemySpawned { .. } | TdEvent::SpawnWithheld { .. } | TdEvent::TowerFired { .. } => {}
    }
}

fn print_status(host: &MatchHost<TdGame>) {
    let state = host.game().state();
    println!(
        "  [tick {:>6}] Wave {} ({:?}), Enemies: {}, Towers: {}, Money: {}, Lives: {}",
        host.current_tick(),
        state.wave,
        state.phase(),
        state.enemy_count(),
        state.world.towers.len(),
        state.money,
        state.lives,
    );
}

fn print_event_summary(events: &[TdEvent]) {
    let mut waves_started = 0;
    let mut waves_completed = 0;
    let mut spawned = 0;
    let mut bosses = 0;
    let mut killed = 0;
    let mut escaped = 0;
    let mut bounty = 0u64;
    let mut towers_placed = 0;
    let mut upgrades = 0;
    let mut sold = 0;
    let mut shots = 0;
    let mut withheld = 0;
    let mut rejected = 0;

    for event in events {
        match event {
            TdEvent::WaveStarted { .. } => waves_started += 1,
            TdEvent::WaveCompleted { .. } => waves_completed += 1,
            TdEvent::EnemySpawned { boss, .. } => {
                spawned += 1;
                if *boss {
                    bosses += 1;
                }
            }
            TdEvent::SpawnWithheld { .. } => withheld += 1,
            TdEvent::EnemyEscaped { .. } => escaped += 1,
            TdEvent::EnemyKilled { reward, .. } => {
                killed += 1;
                bounty += u64::from(*reward);
            }
            TdEvent::TowerPlaced { .. } => towers_placed += 1,
            TdEvent::TowerUpgraded { .. } => upgrades += 1,
            TdEvent::TowerSold { .. } => sold += 1,
            TdEvent::TowerFired { .. } => shots += 1,
            TdEvent::ActionRejected { .. } => rejected += 1,
            TdEvent::GameOver { .. } | TdEvent::MatchReset => {}
        }
    }

    println!("\n=== Event Summary ===");
    println!("Waves started: {waves_started}");
    println!("Waves completed: {waves_completed}");
    println!("Enemies spawned: {spawned} ({bosses} bosses)");
    println!("Spawns withheld: {withheld}");
    println!("Enemies killed: {killed} (bounty {bounty})");
    println!("Enemies escaped: {escaped}");
    println!("Towers placed: {towers_placed}");
    println!("Upgrades bought: {upgrades}");
    println!("Towers sold: {sold}");
    println!("Shots fired: {shots}");
    println!("Actions rejected: {rejected}");
}
