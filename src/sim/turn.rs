//! Turn state machine
//!
//! The alien phase is a queue of scripted steps. Callers pull one step at a
//! time with [`Mission::step_alien`] and pace playback however they like.

use serde::{Deserialize, Serialize};

use super::ai::{Intent, behavior_of};
use super::state::{GameEvent, Mission, TurnPhase};
use super::unit::UnitId;
use crate::error::ActionError;

/// One queued alien action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlienStep {
    pub actor: UnitId,
    pub intent: Intent,
}

/// Result of pulling one step from the alien queue
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Not the alien phase; nothing to do
    Idle,
    /// An alien did something; these events were produced
    Acted(Vec<GameEvent>),
    /// Queue exhausted or the mission ended
    TurnComplete,
}

impl Mission {
    /// Player order: hand control to the aliens
    pub fn end_turn(&mut self) -> Result<(), ActionError> {
        match self.phase {
            TurnPhase::Player => {}
            TurnPhase::Alien => return Err(ActionError::NotPlayerPhase),
            TurnPhase::Victory | TurnPhase::Defeat => return Err(ActionError::MissionOver),
        }
        self.push_event(GameEvent::TurnEnded {
            turn: self.turn_number,
        });
        self.phase = TurnPhase::Alien;

        for alien in self.units.iter_mut().filter(|u| u.alive && u.is_alien()) {
            alien.reset_tu();
        }

        let ids: Vec<UnitId> = self.aliens().map(|u| u.id).collect();
        self.alien_queue.clear();
        for actor in ids {
            for &intent in behavior_of(self, actor).script() {
                self.alien_queue.push_back(AlienStep { actor, intent });
            }
        }
        log::info!(
            "Alien turn {} ({} steps queued)",
            self.turn_number,
            self.alien_queue.len()
        );
        self.push_event(GameEvent::AlienTurnStarted {
            turn: self.turn_number,
        });
        Ok(())
    }

    /// Execute queued intents until one produces an action.
    ///
    /// Intents that turn out to be no-ops (no target, no TU) are skipped in
    /// the same call. When the queue empties the player turn begins.
    pub fn step_alien(&mut self) -> StepOutcome {
        if self.phase != TurnPhase::Alien {
            return StepOutcome::Idle;
        }
        while let Some(step) = self.alien_queue.pop_front() {
            let mark = self.pending_events().len();
            let acted = self.execute_intent(step.actor, step.intent);
            if self.is_over() {
                return StepOutcome::TurnComplete;
            }
            if acted {
                return StepOutcome::Acted(self.pending_events()[mark..].to_vec());
            }
        }
        self.begin_player_turn();
        StepOutcome::TurnComplete
    }

    /// Drain the whole alien phase at once
    pub fn run_alien_turn(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        loop {
            match self.step_alien() {
                StepOutcome::Acted(mut step) => events.append(&mut step),
                StepOutcome::Idle | StepOutcome::TurnComplete => break,
            }
        }
        events
    }

    /// Alien → Player transition
    fn begin_player_turn(&mut self) {
        self.alien_queue.clear();
        self.phase = TurnPhase::Player;
        self.turn_number += 1;
        for soldier in self.units.iter_mut().filter(|u| u.alive && u.is_soldier()) {
            soldier.reset_tu();
        }
        self.refresh_visibility();
        log::info!("Turn {}", self.turn_number);
        self.push_event(GameEvent::TurnStarted {
            turn: self.turn_number,
        });
    }

    /// Number of alien steps still queued
    pub fn pending_alien_steps(&self) -> usize {
        self.alien_queue.len()
    }
}
