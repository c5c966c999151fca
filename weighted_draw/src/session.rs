//! The state of a raffle between two file loads.
//!
//! A session owns the participants, the history of the draws and the reveal in progress.
//! It is the only writer of all of them: the draw itself is computed by `run_draw`
//! from a snapshot of the history, and the history is only extended when the winner
//! gets revealed.

use log::{debug, info};
use rand::Rng;

use std::collections::HashMap;

use chrono::Local;
use uuid::Uuid;

use crate::config::*;
use crate::reveal::{Reveal, RevealFrame, RevealState};
use crate::{compute_win_chance, eligible, record_win, run_draw};

#[derive(Debug, Clone)]
pub struct RaffleSession {
    participants: Vec<Participant>,
    // Most recent draw first.
    history: Vec<DrawRecord>,
    reveal: Reveal,
}

impl RaffleSession {
    pub fn new(timing: RevealTiming) -> RaffleSession {
        RaffleSession {
            participants: Vec::new(),
            history: Vec::new(),
            reveal: Reveal::new(timing),
        }
    }

    /// Replaces the participants. The previous history is discarded.
    pub fn load(&mut self, participants: Vec<Participant>) {
        info!(
            "session: loading {} participants, discarding {} previous draws",
            participants.len(),
            self.history.len()
        );
        self.reveal.cancel();
        self.history.clear();
        self.participants = participants;
    }

    /// Picks the next winner and starts revealing it.
    ///
    /// The winner is decided here, before any tick. It only enters the history
    /// once the reveal completes.
    pub fn request_draw<R: Rng>(&mut self, rng: &mut R) -> Result<DrawOutcome, DrawError> {
        if self.reveal.is_animating() {
            debug!("session: draw requested while a reveal is running, rejecting");
            return Err(DrawError::AlreadyInProgress);
        }
        let outcome = run_draw(&self.participants, &self.history, rng)?;
        self.reveal.start(outcome.winner.clone())?;
        Ok(outcome)
    }

    /// Advances the running reveal by one tick.
    ///
    /// Returns None when there is nothing to reveal, including after a reset.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> Option<RevealFrame> {
        let frame = self.reveal.tick(&self.participants, rng)?;
        if let RevealFrame::Reveal(winner) = &frame {
            self.history = record_win(&self.history, winner.clone(), Local::now());
            info!(
                "session: draw {} resolved: {:?} ({})",
                self.history.len(),
                winner.code,
                winner.name
            );
        }
        Some(frame)
    }

    /// Draws and reveals the winner without showing the intermediate frames.
    pub fn draw_immediately<R: Rng>(&mut self, rng: &mut R) -> Result<DrawOutcome, DrawError> {
        let outcome = self.request_draw(rng)?;
        while self.tick(rng).is_some() {}
        Ok(outcome)
    }

    /// Forgets the participants and the history.
    pub fn reset(&mut self) {
        info!("session: reset");
        self.reveal.cancel();
        self.history.clear();
        self.participants.clear();
    }

    /// Starts a new cycle: everyone can win again, the participants are kept.
    pub fn new_cycle(&mut self) {
        info!(
            "session: new cycle, forgetting {} previous winners",
            self.history.len()
        );
        self.reveal.cancel();
        self.history.clear();
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn history(&self) -> &[DrawRecord] {
        &self.history
    }

    pub fn state(&self) -> &RevealState {
        self.reveal.state()
    }

    pub fn timing(&self) -> RevealTiming {
        self.reveal.timing()
    }

    /// The participants that can still be drawn.
    pub fn eligible(&self) -> Vec<Participant> {
        eligible(&self.participants, &self.history)
    }

    /// The current chances of the participants that can still be drawn, in percent.
    pub fn eligible_win_chances(&self) -> HashMap<Uuid, f64> {
        compute_win_chance(&self.eligible())
    }
}

impl Default for RaffleSession {
    fn default() -> Self {
        RaffleSession::new(RevealTiming::DEFAULT_TIMING)
    }
}
