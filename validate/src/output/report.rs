//! Machine-readable replay report (`--json`)

use serde::Serialize;

use crate::verification::VerificationResult;

#[derive(Debug, Clone, Serialize)]
pub struct PhaseEntry {
    pub at_secs: f32,
    pub old_phase: String,
    pub new_phase: String,
}

/// A hint becoming visible. `slot` is `None` for global hints.
#[derive(Debug, Clone, Serialize)]
pub struct HintEntry {
    pub at_secs: f32,
    pub slot: Option<usize>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub encounter: String,
    pub scenario: String,
    pub duration_secs: f32,
    pub phases: Vec<PhaseEntry>,
    pub hints: Vec<HintEntry>,
    pub verification: Option<VerificationResult>,
}

impl Report {
    pub fn new(encounter: &str, scenario: &str) -> Self {
        Self {
            encounter: encounter.to_string(),
            scenario: scenario.to_string(),
            duration_secs: 0.0,
            phases: Vec::new(),
            hints: Vec::new(),
            verification: None,
        }
    }

    pub fn phase(&mut self, at_secs: f32, old_phase: &str, new_phase: &str) {
        self.phases.push(PhaseEntry {
            at_secs,
            old_phase: old_phase.to_string(),
            new_phase: new_phase.to_string(),
        });
    }

    pub fn hint(&mut self, at_secs: f32, slot: Option<usize>, text: &str) {
        self.hints.push(HintEntry {
            at_secs,
            slot,
            text: text.to_string(),
        });
    }

    pub fn passed(&self) -> bool {
        self.verification.as_ref().is_none_or(|v| v.passed())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_hint_log() {
        let mut report = Report::new("test_boss", "basic");
        report.phase(12.0, "opening", "burn");
        report.hint(3.5, Some(0), "Stack!");
        report.hint(4.0, None, "Raidwide");

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["encounter"], "test_boss");
        assert_eq!(value["phases"][0]["new_phase"], "burn");
        assert_eq!(value["hints"][0]["slot"], 0);
        assert!(value["hints"][1]["slot"].is_null());
        assert!(value["verification"].is_null());
        assert!(report.passed());
    }
}
