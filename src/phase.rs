use serde::Serialize;

use crate::constants::phase_durations_for_level;
use crate::types::PhaseMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStep {
    Scatter1,
    Chase1,
    Scatter2,
    Chase2,
    Scatter3,
    Chase3,
    Scatter4,
    Chase4,
}

impl PhaseStep {
    /// Next step and the mode it applies; `None` once the cycle reaches Chase4.
    pub fn transition(self) -> Option<(PhaseStep, PhaseMode)> {
        let next = match self {
            Self::Scatter1 => (Self::Chase1, PhaseMode::Chase),
            Self::Chase1 => (Self::Scatter2, PhaseMode::Scatter),
            Self::Scatter2 => (Self::Chase2, PhaseMode::Chase),
            Self::Chase2 => (Self::Scatter3, PhaseMode::Scatter),
            Self::Scatter3 => (Self::Chase3, PhaseMode::Chase),
            Self::Chase3 => (Self::Scatter4, PhaseMode::Scatter),
            Self::Scatter4 => (Self::Chase4, PhaseMode::Chase),
            Self::Chase4 => return None,
        };
        Some(next)
    }

    pub fn mode(self) -> PhaseMode {
        match self {
            Self::Scatter1 | Self::Scatter2 | Self::Scatter3 | Self::Scatter4 => PhaseMode::Scatter,
            _ => PhaseMode::Chase,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Debug)]
pub struct PhaseCycle {
    step: PhaseStep,
    elapsed_ms: u32,
    durations: [u32; 7],
}

impl PhaseCycle {
    pub fn new(level: u32) -> Self {
        Self {
            step: PhaseStep::Scatter1,
            elapsed_ms: 0,
            durations: *phase_durations_for_level(level),
        }
    }

    pub fn reset(&mut self, level: u32) {
        *self = Self::new(level);
    }

    pub fn step(&self) -> PhaseStep {
        self.step
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    /// Consumes `ms` against the current step; fires at most one transition.
    pub fn advance(&mut self, ms: u32) -> Option<(PhaseStep, PhaseMode)> {
        let duration = self.durations.get(self.step.index()).copied()?;
        self.elapsed_ms = self.elapsed_ms.saturating_add(ms);
        if self.elapsed_ms < duration {
            return None;
        }
        let fired = self.step.transition()?;
        self.step = fired.0;
        self.elapsed_ms = 0;
        Some(fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(cycle: &mut PhaseCycle, frame_ms: u32) -> Vec<PhaseStep> {
        let mut seen = vec![cycle.step()];
        for _ in 0..2_000_000 {
            if let Some((step, _)) = cycle.advance(frame_ms) {
                seen.push(step);
            }
            if cycle.step() == PhaseStep::Chase4 {
                break;
            }
        }
        seen
    }

    #[test]
    fn steps_alternate_modes_and_end_on_chase4() {
        let mut step = PhaseStep::Scatter1;
        let mut count = 0;
        while let Some((next, mode)) = step.transition() {
            assert_ne!(mode, step.mode());
            assert_eq!(mode, next.mode());
            step = next;
            count += 1;
        }
        assert_eq!(count, 7);
        assert_eq!(step, PhaseStep::Chase4);
    }

    #[test]
    fn first_transition_fires_when_elapsed_reaches_duration() {
        let mut cycle = PhaseCycle::new(1);
        assert_eq!(cycle.advance(6_999), None);
        assert_eq!(
            cycle.advance(1),
            Some((PhaseStep::Chase1, PhaseMode::Chase))
        );
        assert_eq!(cycle.elapsed_ms(), 0);
    }

    #[test]
    fn cycle_visits_every_step_in_order_then_stays() {
        let mut cycle = PhaseCycle::new(5);
        let seen = run_to_end(&mut cycle, 16);
        assert_eq!(
            seen,
            vec![
                PhaseStep::Scatter1,
                PhaseStep::Chase1,
                PhaseStep::Scatter2,
                PhaseStep::Chase2,
                PhaseStep::Scatter3,
                PhaseStep::Chase3,
                PhaseStep::Scatter4,
                PhaseStep::Chase4,
            ]
        );
        assert_eq!(cycle.advance(u32::MAX), None);
        assert_eq!(cycle.step(), PhaseStep::Chase4);
    }

    #[test]
    fn later_levels_use_their_own_table() {
        let mut cycle = PhaseCycle::new(5);
        cycle.advance(7_000);
        cycle.advance(20_000);
        assert_eq!(cycle.step(), PhaseStep::Scatter2);
        assert_eq!(cycle.advance(5_000).map(|fired| fired.0), Some(PhaseStep::Chase2));

        let mut first = PhaseCycle::new(1);
        first.advance(7_000);
        first.advance(20_000);
        assert_eq!(first.advance(5_000), None);
    }
}
