//! Step bookkeeping for the guided sequence of screens.

use crate::error::FlowError;

/// Number of screens in the sequence.
pub const STEP_COUNT: u8 = 8;

/// One screen of the sequence, always within `1..=STEP_COUNT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Step(u8);

impl Step {
    pub const FIRST: Step = Step(1);
    /// Entering this step renders the summary.
    pub const TERMINAL: Step = Step(STEP_COUNT);

    pub fn new(n: u8) -> Result<Self, FlowError> {
        if (1..=STEP_COUNT).contains(&n) {
            Ok(Step(n))
        } else {
            Err(FlowError::InvalidStepRequested(n))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_terminal(self) -> bool {
        self == Self::TERMINAL
    }

    pub fn next(self) -> Option<Step> {
        Step::new(self.0 + 1).ok()
    }

    /// DOM id of the section element for this step.
    pub fn section_id(self) -> String {
        format!("section{}", self.0)
    }
}

/// Tracks the active step. Transitions only happen through `activate`.
#[derive(Debug)]
pub struct FlowController {
    current: Step,
}

impl Default for FlowController {
    fn default() -> Self {
        Self {
            current: Step::FIRST,
        }
    }
}

impl FlowController {
    pub fn current(&self) -> Step {
        self.current
    }

    /// Make `n` the active step. Out-of-range requests leave the current step alone.
    pub fn activate(&mut self, n: u8) -> Result<Step, FlowError> {
        let step = Step::new(n)?;
        if step != self.current {
            log::debug!("step {} -> {}", self.current.get(), step.get());
        }
        self.current = step;
        Ok(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_first_step() {
        assert_eq!(FlowController::default().current(), Step::FIRST);
    }

    #[test]
    fn out_of_range_requests_are_rejected() {
        let mut flow = FlowController::default();
        flow.activate(4).unwrap();
        for n in [0u8, 9, 42, u8::MAX] {
            assert!(matches!(
                flow.activate(n),
                Err(FlowError::InvalidStepRequested(m)) if m == n
            ));
            assert_eq!(flow.current().get(), 4);
        }
    }

    #[test]
    fn terminal_step_is_eight() {
        assert!(Step::new(8).unwrap().is_terminal());
        assert!(!Step::new(7).unwrap().is_terminal());
        assert_eq!(Step::FIRST.next(), Step::new(2).ok());
        assert_eq!(Step::TERMINAL.next(), None);
        assert_eq!(Step::new(3).unwrap().section_id(), "section3");
    }
}
