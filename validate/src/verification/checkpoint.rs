//! Checkpoint-based hint verification
//!
//! A checkpoint pins down what the engine should report at one moment of the
//! scenario: the active phase, hint texts, hazard counts and which positions
//! are safe for a given party slot.

use serde::{Deserialize, Serialize};
use telegraph_core::{ActorId, TickHints, WPos};

/// Two scenario times closer than this are the same moment
const TIME_EPSILON: f32 = 1e-4;

/// Expected state of one party slot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpectedPlayer {
    pub slot: usize,

    /// Hint texts that must be present
    #[serde(default)]
    pub hints: Vec<String>,

    /// Hint texts that must not be present
    #[serde(default)]
    pub absent_hints: Vec<String>,

    /// Whether any hint must (or must not) flag risk
    #[serde(default)]
    pub at_risk: Option<bool>,

    /// Positions that must be safe right now
    #[serde(default)]
    pub safe: Vec<WPos>,

    /// Positions that must be forbidden
    #[serde(default, rename = "unsafe")]
    pub unsafe_at: Vec<WPos>,

    /// Actor ids the slot should be told to interrupt
    #[serde(default)]
    pub interrupt_targets: Vec<u64>,
}

/// Expected engine output at a specific scenario time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Seconds since the pull
    pub at_secs: f32,

    /// Active phase name
    #[serde(default)]
    pub phase: Option<String>,

    /// Global hints that must be present
    #[serde(default)]
    pub global_hints: Vec<String>,

    #[serde(default)]
    pub absent_global_hints: Vec<String>,

    /// Exact number of tracked hazards
    #[serde(default)]
    pub hazards: Option<usize>,

    /// Exact number of predicted damage records
    #[serde(default)]
    pub predicted_damage: Option<usize>,

    #[serde(default, rename = "player")]
    pub players: Vec<ExpectedPlayer>,

    /// Optional description for debugging
    #[serde(default)]
    pub description: Option<String>,
}

/// Result of verifying a single checkpoint
#[derive(Debug, Clone, Serialize)]
pub struct CheckpointResult {
    pub checkpoint_idx: usize,
    pub at_secs: f32,
    pub description: Option<String>,
    pub passed: bool,
    pub failures: Vec<String>,
}

/// Overall verification result
#[derive(Debug, Clone, Serialize)]
pub struct VerificationResult {
    pub checkpoints_passed: u32,
    pub checkpoints_total: u32,
    pub results: Vec<CheckpointResult>,
}

impl VerificationResult {
    pub fn passed(&self) -> bool {
        self.checkpoints_passed == self.checkpoints_total
    }
}

/// Verifies engine output against expected checkpoints
#[derive(Debug)]
pub struct CheckpointVerifier {
    checkpoints: Vec<Checkpoint>,
    next_idx: usize,
    results: Vec<CheckpointResult>,
}

impl CheckpointVerifier {
    pub fn new(mut checkpoints: Vec<Checkpoint>) -> Self {
        checkpoints.sort_by(|a, b| a.at_secs.total_cmp(&b.at_secs));
        Self {
            checkpoints,
            next_idx: 0,
            results: Vec::new(),
        }
    }

    /// Verify every pending checkpoint due at `elapsed_secs` against this
    /// tick's output
    pub fn check_time(
        &mut self,
        elapsed_secs: f32,
        tick: &TickHints,
        phase: &str,
    ) -> Vec<CheckpointResult> {
        let mut verified = Vec::new();
        while let Some(checkpoint) = self.checkpoints.get(self.next_idx) {
            if checkpoint.at_secs > elapsed_secs + TIME_EPSILON {
                break;
            }
            let failures = verify(checkpoint, tick, phase);
            let result = CheckpointResult {
                checkpoint_idx: self.next_idx,
                at_secs: checkpoint.at_secs,
                description: checkpoint.description.clone(),
                passed: failures.is_empty(),
                failures,
            };
            self.results.push(result.clone());
            verified.push(result);
            self.next_idx += 1;
        }
        verified
    }

    /// Get final verification result. Checkpoints the replay never reached
    /// count as failed.
    pub fn finalize(mut self) -> VerificationResult {
        for (idx, checkpoint) in self.checkpoints.iter().enumerate().skip(self.next_idx) {
            self.results.push(CheckpointResult {
                checkpoint_idx: idx,
                at_secs: checkpoint.at_secs,
                description: checkpoint.description.clone(),
                passed: false,
                failures: vec!["Checkpoint was never reached".to_string()],
            });
        }

        let passed = self.results.iter().filter(|r| r.passed).count() as u32;
        VerificationResult {
            checkpoints_passed: passed,
            checkpoints_total: self.results.len() as u32,
            results: self.results,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.next_idx >= self.checkpoints.len()
    }
}

fn verify(checkpoint: &Checkpoint, tick: &TickHints, phase: &str) -> Vec<String> {
    let mut failures = Vec::new();

    if let Some(expected) = &checkpoint.phase
        && expected != phase
    {
        failures.push(format!("Phase is '{}', expected '{}'", phase, expected));
    }

    for hint in &checkpoint.global_hints {
        if !tick.global.contains(hint) {
            failures.push(format!("Global hint '{}' missing (have {:?})", hint, tick.global));
        }
    }
    for hint in &checkpoint.absent_global_hints {
        if tick.global.contains(hint) {
            failures.push(format!("Global hint '{}' should not be shown", hint));
        }
    }

    if let Some(expected) = checkpoint.hazards
        && tick.hazards.len() != expected
    {
        failures.push(format!(
            "{} hazards tracked, expected {}",
            tick.hazards.len(),
            expected
        ));
    }
    if let Some(expected) = checkpoint.predicted_damage
        && tick.predicted_damage.len() != expected
    {
        failures.push(format!(
            "{} damage predictions, expected {}",
            tick.predicted_damage.len(),
            expected
        ));
    }

    for expected in &checkpoint.players {
        let Some(player) = tick.player(expected.slot) else {
            failures.push(format!("Slot {} is not in the party", expected.slot));
            continue;
        };
        let texts: Vec<&str> = player.texts().collect();
        for hint in &expected.hints {
            if !texts.contains(&hint.as_str()) {
                failures.push(format!(
                    "Slot {}: hint '{}' missing (have {:?})",
                    expected.slot, hint, texts
                ));
            }
        }
        for hint in &expected.absent_hints {
            if texts.contains(&hint.as_str()) {
                failures.push(format!("Slot {}: hint '{}' should not be shown", expected.slot, hint));
            }
        }
        if let Some(at_risk) = expected.at_risk
            && player.at_risk() != at_risk
        {
            failures.push(format!(
                "Slot {}: at risk is {}, expected {}",
                expected.slot,
                player.at_risk(),
                at_risk
            ));
        }
        for pos in &expected.safe {
            if !player.safety.is_safe(*pos) {
                failures.push(format!(
                    "Slot {}: ({:.1}, {:.1}) should be safe",
                    expected.slot, pos.x, pos.z
                ));
            }
        }
        for pos in &expected.unsafe_at {
            if player.safety.is_safe(*pos) {
                failures.push(format!(
                    "Slot {}: ({:.1}, {:.1}) should be unsafe",
                    expected.slot, pos.x, pos.z
                ));
            }
        }
        for id in &expected.interrupt_targets {
            if !player.interrupt_targets.contains(&ActorId(*id)) {
                failures.push(format!(
                    "Slot {}: actor {} should be an interrupt target",
                    expected.slot, id
                ));
            }
        }
    }

    failures
}
