//! Hint validation CLI for encounter definitions
//!
//! Replays a scripted scenario through an encounter definition and validates
//! the hints the engine produces:
//! - Accelerated mode: Fast CI validation with checkpoints (default)
//! - Realtime mode: Paced replay to watch hints appear and clear
//! - Render mode: PNG frame per checkpoint (requires --features visual)

mod output;
mod replay;
mod verification;

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use telegraph_core::{
    EncounterDefinition, EngineConfig, EngineConfigExt, PhaseChange, TickHints, WorldEvent,
    default_encounter_directory, load_encounter_file, load_encounters_from_dir,
};

use crate::output::{CliOutput, OutputLevel, Report};
use crate::replay::{Scenario, VirtualClock};
use crate::verification::{CheckpointResult, CheckpointVerifier};

/// Scripted events this close to a tick are delivered on it
const TIME_EPSILON: f32 = 1e-4;

// ═══════════════════════════════════════════════════════════════════════════════
// CLI Arguments
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ReplayMode {
    /// 1x speed with actual timing delays
    Realtime,
    /// Fast replay with virtual time (default)
    #[default]
    Accelerated,
}

#[derive(Parser, Debug)]
#[command(name = "telegraph-validate")]
#[command(about = "Validate encounter hint definitions against scripted scenarios")]
#[command(version)]
struct Args {
    /// Encounter definition file, or a directory searched for the encounter
    /// the scenario names (defaults to the user encounter directory)
    #[arg(short, long)]
    encounter: Option<PathBuf>,

    /// Scenario TOML file
    #[arg(short, long)]
    scenario: PathBuf,

    /// Engine configuration file (defaults to built-in settings)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Party slot whose hints are printed and drawn
    #[arg(long, default_value_t = 0)]
    slot: usize,

    // ─────────────────────────────────────────────────────────────────────────
    // Replay Mode
    // ─────────────────────────────────────────────────────────────────────────
    /// Replay mode
    #[arg(long, value_enum, default_value_t = ReplayMode::Accelerated)]
    mode: ReplayMode,

    /// Custom speed multiplier (overrides --mode)
    #[arg(long)]
    speed: Option<f32>,

    // ─────────────────────────────────────────────────────────────────────────
    // Output Mode
    // ─────────────────────────────────────────────────────────────────────────
    /// Print a JSON report instead of the event log
    #[arg(long)]
    json: bool,

    /// Quiet mode: summary only
    #[arg(short, long)]
    quiet: bool,

    /// Verbose mode: show every event and hazard count change
    #[arg(short, long)]
    verbose: bool,

    /// Write a PNG arena frame for every checkpoint into this directory
    #[arg(long)]
    render_dir: Option<PathBuf>,

    /// Edge length of rendered frames in pixels
    #[arg(long, default_value_t = 512)]
    render_size: u32,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════════════════

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging();

    let output_level = if args.quiet || args.json {
        OutputLevel::Quiet
    } else if args.verbose {
        OutputLevel::Verbose
    } else {
        OutputLevel::Normal
    };
    let mut cli = CliOutput::new(output_level);

    let speed = args.speed.unwrap_or(match args.mode {
        ReplayMode::Realtime => 1.0,
        ReplayMode::Accelerated => 0.0, // Instant
    });

    let config = match &args.config {
        Some(path) => EngineConfig::load_path(path)?,
        None => EngineConfig::default(),
    };

    let scenario = Scenario::load(&args.scenario)?;
    let encounter_path = args.encounter.clone().unwrap_or_else(default_encounter_directory);
    let definition = resolve_encounter(&encounter_path, scenario.meta.encounter.as_deref())?;

    if let Some(wanted) = &scenario.meta.encounter
        && !wanted.eq_ignore_ascii_case(&definition.info.id)
    {
        tracing::warn!(
            scenario = %wanted,
            encounter = %definition.info.id,
            "Scenario was written for a different encounter"
        );
    }
    tracing::info!(
        encounter = %definition.info.id,
        scenario = %scenario.meta.name,
        speed,
        "Validating"
    );

    let mut report = Report::new(&definition.info.id, &scenario.meta.name);
    let mut replay = Replay::new(&scenario, definition, &config, args.slot)?;
    let mut verifier = (!scenario.checkpoints.is_empty())
        .then(|| CheckpointVerifier::new(scenario.checkpoints.clone()));
    let mut frames = Frames::new(args.render_dir.clone(), args.render_size, &replay, &config);
    let mut clock = VirtualClock::new(scenario.meta.start, speed);

    cli.fight_start(scenario.meta.start);
    cli.phase_change(scenario.meta.start, None, &replay.encounter.phase().name);

    for secs in scenario.tick_times() {
        clock.advance_to(scenario.time_at(secs));
        let tick = replay.step(secs, &mut cli, &mut report)?;

        if let Some(verifier) = verifier.as_mut() {
            for result in verifier.check_time(secs, &tick, &replay.encounter.phase().name) {
                if !args.json {
                    cli.checkpoint(&result);
                }
                frames.write(&result, &tick, &replay);
            }
        }
    }

    cli.fight_end(clock.current_game_time(), clock.elapsed_secs());
    report.duration_secs = clock.elapsed_secs();
    report.verification = verifier.map(CheckpointVerifier::finalize);

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        let checkpoints = report
            .verification
            .as_ref()
            .map(|v| (v.checkpoints_passed, v.checkpoints_total));
        cli.print_summary(checkpoints);
    }
    cli.flush();

    if !report.passed() {
        std::process::exit(1);
    }
    Ok(())
}

/// Stdout stays reserved for the event log and JSON report
fn init_logging() {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();
    let filter_directive = if debug_logging {
        // DEBUG_LOGGING=1: debug for telegraph crates, info for dependencies
        "info,telegraph_core=debug,telegraph_overlay=debug,telegraph_validate=debug"
    } else {
        "info"
    };

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(EnvFilter::new(filter_directive))
        .init();
}

fn resolve_encounter(
    path: &Path,
    wanted: Option<&str>,
) -> Result<EncounterDefinition, Box<dyn std::error::Error>> {
    if !path.is_dir() {
        return Ok(load_encounter_file(path)?);
    }

    let loaded = load_encounters_from_dir(path)?;
    let wanted = wanted.ok_or_else(|| {
        format!(
            "{} is a directory but the scenario names no encounter",
            path.display()
        )
    })?;
    let available: Vec<String> = loaded.iter().map(|e| e.encounter.info.id.clone()).collect();
    loaded
        .into_iter()
        .find(|e| e.encounter.info.id.eq_ignore_ascii_case(wanted))
        .map(|e| e.encounter)
        .ok_or_else(|| {
            format!(
                "Encounter '{}' not found in {}. Available: {}",
                wanted,
                path.display(),
                available.join(", ")
            )
            .into()
        })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Replay State
// ═══════════════════════════════════════════════════════════════════════════════

struct Replay<'a> {
    scenario: &'a Scenario,
    config: &'a EngineConfig,
    world: telegraph_core::WorldState,
    encounter: telegraph_core::Encounter,
    timeline: Vec<replay::ScriptedEvent>,
    cursor: usize,
    viewer: usize,
    shown_hints: Vec<String>,
    shown_global: Vec<String>,
    hazard_count: usize,
}

impl<'a> Replay<'a> {
    fn new(
        scenario: &'a Scenario,
        definition: EncounterDefinition,
        config: &'a EngineConfig,
        viewer: usize,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let encounter = telegraph_core::Encounter::new(definition, scenario.meta.start)?;
        Ok(Self {
            scenario,
            config,
            world: scenario.build_world(),
            encounter,
            timeline: scenario.timeline(),
            cursor: 0,
            viewer,
            shown_hints: Vec::new(),
            shown_global: Vec::new(),
            hazard_count: 0,
        })
    }

    /// Deliver every scripted event due by `secs`, run the update pass and
    /// collect this tick's hints
    fn step(
        &mut self,
        secs: f32,
        cli: &mut CliOutput,
        report: &mut Report,
    ) -> Result<TickHints, Box<dyn std::error::Error>> {
        let start = self.scenario.meta.start;
        while let Some(scripted) = self.timeline.get(self.cursor) {
            if scripted.at_secs > secs + TIME_EPSILON {
                break;
            }
            self.cursor += 1;

            let Some(event) = scripted.realize(&mut self.world, start) else {
                continue;
            };
            self.world.apply_event(&event);
            cli.event(event.timestamp(), &describe(&event));
            if let Some(change) = self.encounter.handle_event(&event, &self.world, self.config)? {
                record_phase(&change, start, cli, report);
            }
        }

        let now = self.scenario.time_at(secs);
        self.world.current_time = now;
        if let Some(change) = self.encounter.update(&self.world, self.config)? {
            record_phase(&change, start, cli, report);
        }

        let tick = self
            .encounter
            .collect_hints(&self.world, self.config, Some(self.viewer));
        self.diff(&tick, secs, cli, report);
        Ok(tick)
    }

    /// Report hints that appeared or cleared since the previous tick
    fn diff(&mut self, tick: &TickHints, secs: f32, cli: &mut CliOutput, report: &mut Report) {
        let now = tick.time;

        let hints: Vec<(String, bool)> = tick
            .player(self.viewer)
            .map(|p| p.hints.iter().map(|h| (h.text.clone(), h.risk)).collect())
            .unwrap_or_default();
        for (text, risk) in &hints {
            if !self.shown_hints.contains(text) {
                cli.hint_shown(now, self.viewer, text, *risk);
                report.hint(secs, Some(self.viewer), text);
            }
        }
        for text in &self.shown_hints {
            if !hints.iter().any(|(t, _)| t == text) {
                cli.hint_cleared(now, self.viewer, text);
            }
        }
        self.shown_hints = hints.into_iter().map(|(t, _)| t).collect();

        for text in &tick.global {
            if !self.shown_global.contains(text) {
                cli.global_hint(now, text);
                report.hint(secs, None, text);
            }
        }
        self.shown_global = tick.global.clone();

        if tick.hazards.len() != self.hazard_count {
            cli.hazards(now, self.hazard_count, tick.hazards.len());
            self.hazard_count = tick.hazards.len();
        }
    }
}

fn record_phase(
    change: &PhaseChange,
    start: chrono::NaiveDateTime,
    cli: &mut CliOutput,
    report: &mut Report,
) {
    cli.phase_change(change.timestamp, Some(&change.old_phase), &change.new_phase);
    let at_secs = (change.timestamp - start).num_milliseconds() as f32 / 1000.0;
    report.phase(at_secs, &change.old_phase, &change.new_phase);
}

fn describe(event: &WorldEvent) -> String {
    match event {
        WorldEvent::CastStarted { caster, cast, .. } => format!(
            "cast started: actor {} action {} ({:.1}s)",
            caster.0, cast.action.0, cast.total_time_secs
        ),
        WorldEvent::CastFinished { caster, cast, .. } => {
            format!("cast finished: actor {} action {}", caster.0, cast.action.0)
        }
        WorldEvent::CastResolved { caster, event, .. } => format!(
            "cast resolved: actor {} action {} ({} hit)",
            caster.0,
            event.action.0,
            event.targets.len()
        ),
        WorldEvent::StatusGained { actor, status, .. } => {
            format!("status gained: actor {} status {}", actor.0, status.id.0)
        }
        WorldEvent::StatusLost { actor, status, .. } => {
            format!("status lost: actor {} status {}", actor.0, status.id.0)
        }
        WorldEvent::ActorCreated { actor, .. } => format!("actor created: {}", actor.0),
        WorldEvent::ActorRemoved { actor, .. } => format!("actor removed: {}", actor.0),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Frame Rendering
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "visual")]
struct Frames {
    dir: Option<PathBuf>,
    overlay: Option<telegraph_overlay::ArenaOverlay>,
}

#[cfg(feature = "visual")]
impl Frames {
    fn new(dir: Option<PathBuf>, size: u32, replay: &Replay, config: &EngineConfig) -> Self {
        use telegraph_overlay::{ArenaOverlay, ArenaView};

        let overlay = dir.as_ref().map(|_| {
            let center = replay.encounter.definition().info.arena_center;
            ArenaOverlay::new(ArenaView::new(center, config.arena_radius, size))
        });
        Self { dir, overlay }
    }

    fn write(&mut self, result: &CheckpointResult, tick: &TickHints, replay: &Replay) {
        let (Some(dir), Some(overlay)) = (&self.dir, self.overlay.as_mut()) else {
            return;
        };
        if let Err(e) = std::fs::create_dir_all(dir) {
            tracing::warn!(dir = %dir.display(), error = %e, "Cannot create render directory");
            return;
        }
        let path = dir.join(format!(
            "checkpoint_{:02}_{:.2}s.png",
            result.checkpoint_idx, result.at_secs
        ));
        if let Err(e) = overlay.render_to_png(tick, &replay.world, Some(replay.viewer), &path) {
            tracing::warn!(error = %e, "Failed to render checkpoint frame");
        }
    }
}

#[cfg(not(feature = "visual"))]
struct Frames;

#[cfg(not(feature = "visual"))]
impl Frames {
    fn new(dir: Option<PathBuf>, _size: u32, _replay: &Replay, _config: &EngineConfig) -> Self {
        if dir.is_some() {
            tracing::warn!("--render-dir requires building with --features visual; no frames will be written");
        }
        Self
    }

    fn write(&mut self, _result: &CheckpointResult, _tick: &TickHints, _replay: &Replay) {}
}
