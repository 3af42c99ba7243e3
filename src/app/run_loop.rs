use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use super::physics::PhysicsEngine;
use super::render::Surface;
use super::simulation::Simulation;

/// Shared stop flag, checked once per frame boundary.
#[derive(Clone, Debug, Default)]
pub(in crate::app) struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub(in crate::app) fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub(in crate::app) fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum LoopState {
    Running,
    Paused,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum FrameOutcome {
    /// Physics stepped and the frame was drawn.
    Advanced,
    /// Drawn without stepping.
    Held,
    Stopped,
}

/// Drives step → forces → render once per display refresh.
pub(in crate::app) struct RunLoop {
    state: LoopState,
    token: CancellationToken,
    frames: u64,
}

impl RunLoop {
    pub(in crate::app) fn new(start_paused: bool) -> Self {
        Self {
            state: if start_paused {
                LoopState::Paused
            } else {
                LoopState::Running
            },
            token: CancellationToken::default(),
            frames: 0,
        }
    }

    pub(in crate::app) fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub(in crate::app) fn state(&self) -> LoopState {
        self.state
    }

    /// Number of frames that advanced the simulation.
    pub(in crate::app) fn frames(&self) -> u64 {
        self.frames
    }

    pub(in crate::app) fn pause(&mut self) {
        if self.state == LoopState::Running {
            self.transition(LoopState::Paused);
        }
    }

    pub(in crate::app) fn resume(&mut self) {
        if self.state == LoopState::Paused {
            self.transition(LoopState::Running);
        }
    }

    pub(in crate::app) fn toggle_pause(&mut self) {
        match self.state {
            LoopState::Running => self.pause(),
            LoopState::Paused => self.resume(),
            LoopState::Stopped => {}
        }
    }

    pub(in crate::app) fn stop(&mut self) {
        self.transition(LoopState::Stopped);
    }

    fn transition(&mut self, next: LoopState) {
        if self.state != next {
            debug!("run loop {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    pub(in crate::app) fn frame<E: PhysicsEngine, S: Surface>(
        &mut self,
        simulation: &mut Simulation<E>,
        surface: &mut S,
        highlighted: &HashSet<usize>,
    ) -> FrameOutcome {
        if self.token.is_cancelled() {
            self.stop();
        }

        let outcome = match self.state {
            LoopState::Stopped => return FrameOutcome::Stopped,
            LoopState::Paused => FrameOutcome::Held,
            LoopState::Running => {
                simulation.advance();
                self.frames += 1;
                FrameOutcome::Advanced
            }
        };

        simulation.render(surface, highlighted);
        outcome
    }

    /// Runs at most `count` frames, returning how many actually executed.
    #[cfg(test)]
    pub(in crate::app) fn run_frames<E: PhysicsEngine, S: Surface>(
        &mut self,
        simulation: &mut Simulation<E>,
        surface: &mut S,
        count: usize,
    ) -> usize {
        let highlighted = HashSet::new();
        (0..count)
            .take_while(|_| {
                self.frame(simulation, surface, &highlighted) != FrameOutcome::Stopped
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::SimulationConfig;
    use crate::app::render::{DrawCall, RecordingSurface};
    use crate::graph::parse_graph;

    fn simulation() -> Simulation {
        Simulation::new(
            parse_graph(r#"[{"id":"a","children":["b"]},{"id":"b","children":["c"]},{"id":"c"}]"#)
                .unwrap(),
            &SimulationConfig::default(),
        )
    }

    fn clears(surface: &RecordingSurface) -> usize {
        surface
            .calls
            .iter()
            .filter(|call| **call == DrawCall::Clear)
            .count()
    }

    #[test]
    fn runs_a_bounded_number_of_frames() {
        let mut simulation = simulation();
        let mut run_loop = RunLoop::new(false);
        let mut surface = RecordingSurface::default();

        assert_eq!(run_loop.run_frames(&mut simulation, &mut surface, 25), 25);
        assert_eq!(run_loop.frames(), 25);
        assert_eq!(clears(&surface), 25);
        assert_eq!(run_loop.state(), LoopState::Running);
    }

    #[test]
    fn paused_frames_render_without_moving_bodies() {
        let mut simulation = simulation();
        let mut run_loop = RunLoop::new(true);
        let mut surface = RecordingSurface::default();
        let before = simulation.physics().position_of("b");

        let outcome = run_loop.frame(&mut simulation, &mut surface, &HashSet::new());
        assert_eq!(outcome, FrameOutcome::Held);
        assert_eq!(simulation.physics().position_of("b"), before);
        assert_eq!(clears(&surface), 1);

        run_loop.toggle_pause();
        let outcome = run_loop.frame(&mut simulation, &mut surface, &HashSet::new());
        assert_eq!(outcome, FrameOutcome::Advanced);
        assert_ne!(simulation.physics().position_of("b"), before);
    }

    #[test]
    fn cancellation_stops_at_the_next_frame_boundary() {
        let mut simulation = simulation();
        let mut run_loop = RunLoop::new(false);
        let mut surface = RecordingSurface::default();
        let token = run_loop.token();

        assert_eq!(run_loop.run_frames(&mut simulation, &mut surface, 3), 3);
        token.cancel();
        assert_eq!(run_loop.run_frames(&mut simulation, &mut surface, 10), 0);
        assert_eq!(run_loop.state(), LoopState::Stopped);
        assert_eq!(run_loop.frames(), 3);
        assert_eq!(clears(&surface), 3);

        run_loop.toggle_pause();
        run_loop.resume();
        assert_eq!(run_loop.state(), LoopState::Stopped);
    }

    #[test]
    fn pause_and_resume_only_move_between_live_states() {
        let mut run_loop = RunLoop::new(false);
        run_loop.resume();
        assert_eq!(run_loop.state(), LoopState::Running);

        run_loop.pause();
        run_loop.pause();
        assert_eq!(run_loop.state(), LoopState::Paused);

        run_loop.resume();
        assert_eq!(run_loop.state(), LoopState::Running);

        run_loop.stop();
        run_loop.pause();
        assert_eq!(run_loop.state(), LoopState::Stopped);
    }
}
