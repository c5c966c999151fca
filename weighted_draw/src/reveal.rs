//! The timed reveal of a winner.
//!
//! The winner is always decided before the reveal starts. The reveal only
//! shuffles names on the display for a fixed duration, then shows the winner.
//! The clock is logical: every call to `Reveal::tick` stands for one tick interval,
//! and the caller decides how to space them in real time.

use log::debug;
use rand::Rng;

use crate::config::*;

#[derive(PartialEq, Debug, Clone)]
pub enum RevealState {
    Idle,
    Animating(Animation),
    Revealed(Participant),
}

/// A reveal in progress.
#[derive(PartialEq, Debug, Clone)]
pub struct Animation {
    winner: Participant,
    ticks_done: u32,
}

/// What the display should show after a tick.
#[derive(PartialEq, Debug, Clone)]
pub enum RevealFrame {
    /// A participant picked at random, for effect only.
    Shuffle(Participant),
    /// The final frame, showing the actual winner.
    Reveal(Participant),
}

#[derive(Debug, Clone)]
pub struct Reveal {
    timing: RevealTiming,
    state: RevealState,
}

impl Reveal {
    pub fn new(timing: RevealTiming) -> Reveal {
        Reveal {
            timing,
            state: RevealState::Idle,
        }
    }

    pub fn timing(&self) -> RevealTiming {
        self.timing
    }

    pub fn state(&self) -> &RevealState {
        &self.state
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, RevealState::Animating(_))
    }

    /// The number of ticks of a complete reveal, the last one included.
    pub fn total_ticks(&self) -> u32 {
        let interval = self.timing.tick_interval.as_nanos();
        if interval == 0 {
            return 1;
        }
        let duration = self.timing.duration.as_nanos();
        let ticks = (duration + interval - 1) / interval;
        ticks.clamp(1, u32::MAX as u128) as u32
    }

    /// Starts revealing the given winner.
    ///
    /// Fails if a reveal is already running. The running reveal is left untouched.
    pub fn start(&mut self, winner: Participant) -> Result<(), DrawError> {
        if self.is_animating() {
            return Err(DrawError::AlreadyInProgress);
        }
        debug!(
            "reveal: start: winner {:?}, {} ticks",
            winner.code,
            self.total_ticks()
        );
        self.state = RevealState::Animating(Animation {
            winner,
            ticks_done: 0,
        });
        Ok(())
    }

    /// Advances the reveal by one tick interval.
    ///
    /// The shuffle frames are picked uniformly from `participants`, which should be the
    /// complete list, including the participants that already won.
    /// Returns None when no reveal is running.
    pub fn tick<R: Rng>(
        &mut self,
        participants: &[Participant],
        rng: &mut R,
    ) -> Option<RevealFrame> {
        let total_ticks = self.total_ticks();
        let anim = match &mut self.state {
            RevealState::Animating(anim) => anim,
            _ => return None,
        };
        anim.ticks_done += 1;
        if anim.ticks_done >= total_ticks || participants.is_empty() {
            let winner = anim.winner.clone();
            debug!("reveal: revealing {:?} after {} ticks", winner.code, anim.ticks_done);
            self.state = RevealState::Revealed(winner.clone());
            return Some(RevealFrame::Reveal(winner));
        }
        let idx = rng.gen_range(0..participants.len());
        Some(RevealFrame::Shuffle(participants[idx].clone()))
    }

    /// Stops any running reveal. The pending winner is dropped.
    pub fn cancel(&mut self) {
        if self.is_animating() {
            debug!("reveal: cancelled");
        }
        self.state = RevealState::Idle;
    }
}

impl Default for Reveal {
    fn default() -> Self {
        Reveal::new(RevealTiming::DEFAULT_TIMING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn participants() -> Vec<Participant> {
        let rows = vec![
            vec![Cell::from("Code"), Cell::from("Name"), Cell::from("Weight")],
            vec![Cell::from("C1"), Cell::from("Alice"), Cell::Float(1.0)],
            vec![Cell::from("C2"), Cell::from("Bob"), Cell::Float(2.0)],
            vec![Cell::from("C3"), Cell::from("Carol"), Cell::Float(3.0)],
        ];
        ingest(&rows).unwrap()
    }

    #[test]
    fn default_reveal_takes_60_ticks() {
        let ps = participants();
        let mut rng = StdRng::seed_from_u64(7);
        let mut reveal = Reveal::default();
        assert_eq!(reveal.total_ticks(), 60);
        reveal.start(ps[2].clone()).unwrap();

        let mut frames: Vec<RevealFrame> = Vec::new();
        while let Some(f) = reveal.tick(&ps, &mut rng) {
            frames.push(f);
        }
        assert_eq!(frames.len(), 60);
        for f in frames[..59].iter() {
            match f {
                RevealFrame::Shuffle(p) => assert!(ps.contains(p)),
                RevealFrame::Reveal(_) => panic!("revealed too early"),
            }
        }
        assert_eq!(frames[59], RevealFrame::Reveal(ps[2].clone()));
        assert_eq!(reveal.state(), &RevealState::Revealed(ps[2].clone()));
        // Nothing more once revealed.
        assert_eq!(reveal.tick(&ps, &mut rng), None);
    }

    #[test]
    fn shuffle_uses_the_full_list() {
        // The winner list may be reduced to one person, the shuffle still shows everyone.
        let ps = participants();
        let mut rng = StdRng::seed_from_u64(3);
        let mut reveal = Reveal::default();
        reveal.start(ps[0].clone()).unwrap();
        let mut seen: Vec<String> = Vec::new();
        while let Some(RevealFrame::Shuffle(p)) = reveal.tick(&ps, &mut rng) {
            if !seen.contains(&p.code) {
                seen.push(p.code.clone());
            }
        }
        seen.sort();
        assert_eq!(seen, vec!["C1", "C2", "C3"]);
    }

    #[test]
    fn cannot_start_twice() {
        let ps = participants();
        let mut rng = StdRng::seed_from_u64(1);
        let mut reveal = Reveal::default();
        reveal.start(ps[0].clone()).unwrap();
        reveal.tick(&ps, &mut rng);
        assert_eq!(
            reveal.start(ps[1].clone()),
            Err(DrawError::AlreadyInProgress)
        );
        // The first reveal carries on with its own winner.
        let mut last = None;
        while let Some(f) = reveal.tick(&ps, &mut rng) {
            last = Some(f);
        }
        assert_eq!(last, Some(RevealFrame::Reveal(ps[0].clone())));
        // Once revealed, a new reveal may start.
        assert!(reveal.start(ps[1].clone()).is_ok());
    }

    #[test]
    fn cancel_stops_ticking() {
        let ps = participants();
        let mut rng = StdRng::seed_from_u64(1);
        let mut reveal = Reveal::default();
        reveal.start(ps[0].clone()).unwrap();
        assert!(reveal.tick(&ps, &mut rng).is_some());
        reveal.cancel();
        assert_eq!(reveal.state(), &RevealState::Idle);
        assert_eq!(reveal.tick(&ps, &mut rng), None);
    }

    #[test]
    fn timing_edge_cases() {
        let ps = participants();
        let mut rng = StdRng::seed_from_u64(1);

        let uneven = Reveal::new(RevealTiming {
            duration: Duration::from_millis(120),
            tick_interval: Duration::from_millis(50),
        });
        assert_eq!(uneven.total_ticks(), 3);

        let mut instant = Reveal::new(RevealTiming {
            duration: Duration::from_millis(3000),
            tick_interval: Duration::ZERO,
        });
        assert_eq!(instant.total_ticks(), 1);
        instant.start(ps[1].clone()).unwrap();
        assert_eq!(
            instant.tick(&ps, &mut rng),
            Some(RevealFrame::Reveal(ps[1].clone()))
        );

        let no_duration = Reveal::new(RevealTiming {
            duration: Duration::ZERO,
            tick_interval: Duration::from_millis(50),
        });
        assert_eq!(no_duration.total_ticks(), 1);
    }

    #[test]
    fn sub_millisecond_interval() {
        let fast = Reveal::new(RevealTiming {
            duration: Duration::from_millis(3000),
            tick_interval: Duration::from_micros(500),
        });
        assert_eq!(fast.total_ticks(), 6000);

        let uneven = Reveal::new(RevealTiming {
            duration: Duration::from_micros(1001),
            tick_interval: Duration::from_micros(500),
        });
        assert_eq!(uneven.total_ticks(), 3);
    }
}
