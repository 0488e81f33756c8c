//! Colored CLI output for replayed hints
//!
//! Formats phase changes, hint transitions and checkpoint results with
//! colored output for easy visual parsing.

use chrono::NaiveDateTime;
use std::io::{self, Write};

use crate::verification::CheckpointResult;

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum OutputLevel {
    /// Only show summary at end
    Quiet,
    /// Show phases, hint changes and checkpoints (default)
    #[default]
    Normal,
    /// Also show every delivered event and hazard count change
    Verbose,
}

/// CLI output formatter with color support
#[derive(Debug)]
pub struct CliOutput {
    level: OutputLevel,
    fight_start: Option<NaiveDateTime>,
    use_colors: bool,
    events_delivered: u32,
    hints_shown: u32,
    global_hints_shown: u32,
    phase_changes: u32,
}

impl Default for CliOutput {
    fn default() -> Self {
        Self::new(OutputLevel::Normal)
    }
}

impl CliOutput {
    pub fn new(level: OutputLevel) -> Self {
        Self {
            level,
            fight_start: None,
            use_colors: atty::is(atty::Stream::Stdout),
            events_delivered: 0,
            hints_shown: 0,
            global_hints_shown: 0,
            phase_changes: 0,
        }
    }

    /// Set fight start time for relative timestamps
    pub fn set_fight_start(&mut self, time: NaiveDateTime) {
        self.fight_start = Some(time);
    }

    /// Format timestamp relative to fight start
    pub fn format_time(&self, time: NaiveDateTime) -> String {
        if let Some(start) = self.fight_start {
            let secs = (time - start).num_milliseconds() as f32 / 1000.0;
            let mins = (secs / 60.0).floor() as u32;
            format!("{:02}:{:05.2}", mins, secs % 60.0)
        } else {
            time.format("%H:%M:%S%.3f").to_string()
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ANSI Color Codes
    // ═══════════════════════════════════════════════════════════════════════════

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.paint("32", text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint("33", text)
    }

    fn red(&self, text: &str) -> String {
        self.paint("31", text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint("36", text)
    }

    fn magenta(&self, text: &str) -> String {
        self.paint("35", text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }

    fn bold(&self, text: &str) -> String {
        self.paint("1", text)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Event Output
    // ═══════════════════════════════════════════════════════════════════════════

    /// Log a delivered world event (verbose only)
    pub fn event(&mut self, time: NaiveDateTime, description: &str) {
        self.events_delivered += 1;
        if self.level < OutputLevel::Verbose {
            return;
        }

        let time_str = self.format_time(time);
        let label = self.dim("EVENT:");
        println!("[{}] {} {}", time_str, label, description);
    }

    /// Log a player hint appearing
    pub fn hint_shown(&mut self, time: NaiveDateTime, slot: usize, text: &str, risk: bool) {
        self.hints_shown += 1;
        if self.level < OutputLevel::Normal {
            return;
        }

        let time_str = self.format_time(time);
        let (arrow, label) = if risk {
            (self.red("-->"), self.red("HINT:"))
        } else {
            (self.green("-->"), self.green("HINT:"))
        };
        let slot = self.dim(&format!("[slot {}]", slot));
        println!("[{}] {} {} \"{}\" {}", time_str, arrow, label, text, slot);
    }

    pub fn hint_cleared(&mut self, time: NaiveDateTime, slot: usize, text: &str) {
        if self.level < OutputLevel::Normal {
            return;
        }

        let time_str = self.format_time(time);
        let arrow = self.dim("<--");
        let label = self.dim("CLEARED:");
        let slot = self.dim(&format!("[slot {}]", slot));
        println!("[{}] {} {} \"{}\" {}", time_str, arrow, label, text, slot);
    }

    /// Log a global hint appearing
    pub fn global_hint(&mut self, time: NaiveDateTime, text: &str) {
        self.global_hints_shown += 1;
        if self.level < OutputLevel::Normal {
            return;
        }

        let time_str = self.format_time(time);
        let marker = self.yellow("!!!");
        let label = self.yellow("GLOBAL:");
        println!("[{}] {} {} \"{}\"", time_str, marker, label, text);
    }

    /// Log tracked hazard count changes (verbose only)
    pub fn hazards(&mut self, time: NaiveDateTime, old: usize, new: usize) {
        if self.level < OutputLevel::Verbose {
            return;
        }

        let time_str = self.format_time(time);
        let label = self.magenta("HAZARDS:");
        println!("[{}] {} {} → {}", time_str, label, old, new);
    }

    /// Log phase change
    pub fn phase_change(&mut self, time: NaiveDateTime, old_phase: Option<&str>, new_phase: &str) {
        self.phase_changes += 1;
        if self.level < OutputLevel::Normal {
            return;
        }

        let time_str = self.format_time(time);
        let marker = self.cyan("~~~");
        let label = self.cyan("PHASE:");

        if let Some(old) = old_phase {
            println!(
                "[{}] {} {} {} → {}",
                time_str,
                marker,
                label,
                old,
                self.bold(new_phase)
            );
        } else {
            println!(
                "[{}] {} {} → {} (initial)",
                time_str,
                marker,
                label,
                self.bold(new_phase)
            );
        }
    }

    /// Log a checkpoint result; failures are shown at every level
    pub fn checkpoint(&mut self, result: &CheckpointResult) {
        if result.passed && self.level < OutputLevel::Normal {
            return;
        }

        let title = result
            .description
            .as_deref()
            .map(|d| format!(" ({})", d))
            .unwrap_or_default();
        if result.passed {
            let label = self.green("CHECKPOINT OK:");
            println!("    {} #{} @ {:.2}s{}", label, result.checkpoint_idx, result.at_secs, title);
        } else {
            let label = self.red("CHECKPOINT FAILED:");
            println!("    {} #{} @ {:.2}s{}", label, result.checkpoint_idx, result.at_secs, title);
            for failure in &result.failures {
                println!("        - {}", failure);
            }
        }
    }

    /// Log fight start
    pub fn fight_start(&mut self, time: NaiveDateTime) {
        self.set_fight_start(time);
        if self.level < OutputLevel::Normal {
            return;
        }

        let label = self.bold(&self.green("═══ PULL ═══"));
        println!("\n{}\n", label);
    }

    /// Log fight end
    pub fn fight_end(&mut self, time: NaiveDateTime, duration_secs: f32) {
        if self.level < OutputLevel::Normal {
            return;
        }

        let time_str = self.format_time(time);
        let label = self.bold(&self.yellow("═══ END ═══"));
        println!("\n{} (duration: {:.1}s at {})\n", label, duration_secs, time_str);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Summary Report
    // ═══════════════════════════════════════════════════════════════════════════

    /// Print final summary
    pub fn print_summary(&self, checkpoints_passed: Option<(u32, u32)>) {
        let line = "═".repeat(51);
        println!();
        println!("{}", line);
        println!("  HINT VALIDATION SUMMARY");
        println!("{}", line);
        println!("Events:          {}", self.events_delivered);
        println!("Hints Shown:     {}", self.hints_shown);
        println!("Global Hints:    {}", self.global_hints_shown);
        println!(
            "Phase Changes:   {}",
            if self.phase_changes > 0 {
                self.cyan(&self.phase_changes.to_string())
            } else {
                "0".to_string()
            }
        );

        if let Some((passed, total)) = checkpoints_passed {
            let status = if passed == total {
                self.green(&format!("PASSED ({}/{})", passed, total))
            } else {
                self.red(&format!("FAILED ({}/{})", passed, total))
            };
            println!("Verification:    {}", status);
        }
        println!("{}", line);
    }

    /// Flush stdout
    pub fn flush(&self) {
        let _ = io::stdout().flush();
    }
}
