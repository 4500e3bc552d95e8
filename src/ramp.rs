//! Duty sweep sequencing: ramp up to max, hold, ramp back down, hold, then
//! start over in the opposite direction.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldPoint {
    Max,
    Min,
}

/// One command emitted per sequencer tick. The caller decides how long each
/// step actually takes (step delay vs hold delay).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStep {
    /// A new up/down cycle is beginning in the given direction.
    CycleStart { forward: bool },
    /// Command both motors to `duty`, then wait one step delay and sample.
    Drive { duty: u8, forward: bool },
    /// Sit at the current command for the hold duration.
    Hold(HoldPoint),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    RampUp,
    HoldMax,
    RampDown,
    HoldMin,
    Finished,
}

/// Iterator over one or more acceleration/deceleration cycles.
///
/// Each cycle emits `CycleStart`, the up-ramp `Drive` steps (`0, step, ...`
/// while at or below `max_duty`), `Hold(Max)`, the up-ramp reversed, and
/// `Hold(Min)`. Direction alternates between cycles, starting forward.
pub struct RampSequencer {
    max_duty: u8,
    step: u8,
    phase: Phase,
    cursor: i16,
    forward: bool,
    cycles_left: Option<u32>,
}

impl RampSequencer {
    /// Runs forever, alternating direction each full cycle.
    pub fn continuous(max_duty: u8, step: u8) -> Self {
        Self::with_cycles(max_duty, step, None)
    }

    /// Stops after `count` full up/down cycles.
    pub fn cycles(max_duty: u8, step: u8, count: u32) -> Self {
        Self::with_cycles(max_duty, step, Some(count))
    }

    fn with_cycles(max_duty: u8, step: u8, cycles_left: Option<u32>) -> Self {
        let phase = if cycles_left == Some(0) {
            Phase::Finished
        } else {
            Phase::Start
        };
        Self {
            max_duty,
            step: step.max(1),
            phase,
            cursor: 0,
            forward: true,
            cycles_left,
        }
    }
}

impl Iterator for RampSequencer {
    type Item = SweepStep;

    fn next(&mut self) -> Option<SweepStep> {
        match self.phase {
            Phase::Start => {
                self.cursor = 0;
                self.phase = Phase::RampUp;
                Some(SweepStep::CycleStart {
                    forward: self.forward,
                })
            }
            Phase::RampUp => {
                let duty = self.cursor as u8;
                self.cursor += self.step as i16;
                if self.cursor > self.max_duty as i16 {
                    // walk back down from the last duty actually emitted
                    self.cursor -= self.step as i16;
                    self.phase = Phase::HoldMax;
                }
                Some(SweepStep::Drive {
                    duty,
                    forward: self.forward,
                })
            }
            Phase::HoldMax => {
                self.phase = Phase::RampDown;
                Some(SweepStep::Hold(HoldPoint::Max))
            }
            Phase::RampDown => {
                let duty = self.cursor as u8;
                self.cursor -= self.step as i16;
                if self.cursor < 0 {
                    self.phase = Phase::HoldMin;
                }
                Some(SweepStep::Drive {
                    duty,
                    forward: self.forward,
                })
            }
            Phase::HoldMin => {
                self.forward = !self.forward;
                if let Some(count) = self.cycles_left.as_mut() {
                    *count -= 1;
                }
                self.phase = if self.cycles_left == Some(0) {
                    Phase::Finished
                } else {
                    Phase::Start
                };
                Some(SweepStep::Hold(HoldPoint::Min))
            }
            Phase::Finished => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloc::vec::Vec;

    fn drive_duties_until_hold(seq: &mut RampSequencer) -> Vec<u8> {
        let mut duties = Vec::new();
        loop {
            match seq.next() {
                Some(SweepStep::Drive { duty, .. }) => duties.push(duty),
                Some(SweepStep::CycleStart { .. }) => continue,
                Some(SweepStep::Hold(_)) | None => return duties,
            }
        }
    }

    #[test]
    fn up_ramp_covers_every_step_to_max() {
        let mut seq = RampSequencer::continuous(255, 5);
        let up = drive_duties_until_hold(&mut seq);

        let expected: Vec<u8> = (0..=255).step_by(5).map(|d| d as u8).collect();
        assert_eq!(up, expected);
        assert_eq!(up.len(), 255 / 5 + 1);
        assert_eq!(up.last(), Some(&255));
    }

    #[test]
    fn down_ramp_is_reverse_of_up_ramp() {
        let mut seq = RampSequencer::continuous(255, 5);
        let up = drive_duties_until_hold(&mut seq);
        let down = drive_duties_until_hold(&mut seq);

        let mut reversed = up.clone();
        reversed.reverse();
        assert_eq!(down, reversed);
    }

    #[test]
    fn non_dividing_step_tops_out_below_max() {
        let mut seq = RampSequencer::continuous(255, 50);
        let up = drive_duties_until_hold(&mut seq);

        assert_eq!(up, [0, 50, 100, 150, 200, 250]);
        assert_eq!(up.len(), 255 / 50 + 1);

        let down = drive_duties_until_hold(&mut seq);
        assert_eq!(down, [250, 200, 150, 100, 50, 0]);
    }

    #[test]
    fn direction_alternates_between_cycles() {
        let seq = RampSequencer::cycles(255, 5, 3);
        let mut cycle_directions = Vec::new();
        for step in seq {
            if let SweepStep::CycleStart { forward } = step {
                cycle_directions.push(forward);
            }
        }
        assert_eq!(cycle_directions, [true, false, true]);
    }

    #[test]
    fn drive_steps_carry_the_cycle_direction() {
        let seq = RampSequencer::cycles(255, 5, 2);
        let mut current = None;
        for step in seq {
            match step {
                SweepStep::CycleStart { forward } => current = Some(forward),
                SweepStep::Drive { forward, .. } => assert_eq!(Some(forward), current),
                SweepStep::Hold(_) => {}
            }
        }
    }

    #[test]
    fn finite_sequencer_terminates() {
        let mut seq = RampSequencer::cycles(255, 5, 2);

        // per cycle: start + 52 up + hold + 52 down + hold
        let per_cycle = 1 + 52 + 1 + 52 + 1;
        for _ in 0..2 * per_cycle {
            assert!(seq.next().is_some());
        }
        assert_eq!(seq.next(), None);
        assert_eq!(seq.next(), None);
    }

    #[test]
    fn zero_cycles_yields_nothing() {
        let mut seq = RampSequencer::cycles(255, 5, 0);
        assert_eq!(seq.next(), None);
    }

    #[test]
    fn holds_bracket_the_down_ramp() {
        let mut seq = RampSequencer::cycles(255, 5, 1);
        let mut steps = Vec::new();
        for step in &mut seq {
            steps.push(step);
        }
        assert_eq!(steps.first(), Some(&SweepStep::CycleStart { forward: true }));
        assert_eq!(steps[53], SweepStep::Hold(HoldPoint::Max));
        assert_eq!(steps.last(), Some(&SweepStep::Hold(HoldPoint::Min)));
    }
}
