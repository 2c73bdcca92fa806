use std::collections::VecDeque;

use log::debug;
use rand::Rng;

use crate::{CardCount, EnvError};

/// A card taken from the shoe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dealt {
    pub rank: u8,
    /// The shoe was rebuilt right before this card was drawn.
    pub reshuffled: bool,
}

/// Represents a shoe in the real world. Only the number of cards of each rank
/// is kept, the order of cards is decided at draw time.
#[derive(Debug, Clone)]
pub struct Shoe {
    number_of_decks: u8,
    reshuffle_threshold: u16,
    card_count: CardCount,
    discarded: Vec<u8>,
    firsts: VecDeque<u8>,
    number_of_reshuffles: u64,
}

impl Shoe {
    /// Creates a new full shoe. A threshold of 0 is raised to 1 so an empty
    /// shoe is always reshuffled before the next draw.
    pub fn new(number_of_decks: u8, reshuffle_threshold: u16) -> Shoe {
        Shoe {
            number_of_decks,
            reshuffle_threshold: reshuffle_threshold.max(1),
            card_count: CardCount::with_number_of_decks(number_of_decks),
            discarded: Vec::with_capacity(number_of_decks as usize * 52),
            firsts: VecDeque::new(),
            number_of_reshuffles: 0,
        }
    }

    /// Returns all the dealt cards back into the shoe. Stacked first cards
    /// that were not drawn yet are forgotten.
    pub fn reshuffle(&mut self) {
        self.card_count = CardCount::with_number_of_decks(self.number_of_decks);
        self.discarded.clear();
        self.firsts.clear();
        self.number_of_reshuffles += 1;
    }

    /// Makes the given ranks the next cards to be drawn, in order. Replaces
    /// whatever was stacked before. Fails if the shoe does not hold them.
    ///
    /// Note that the cards are given in blackjack values (i.e., 1 stands for
    /// A. 10 stands for 10 and J, Q, K).
    pub fn stack(&mut self, firsts: &[u8]) -> Result<(), EnvError> {
        let mut wanted = CardCount::default();
        for &rank in firsts {
            if rank == 0 || rank > 10 {
                return Err(EnvError::InvalidFirsts(firsts.to_vec()));
            }
            wanted.add_card(rank);
        }
        if !self.card_count.contains(&wanted) {
            return Err(EnvError::InvalidFirsts(firsts.to_vec()));
        }
        self.firsts = firsts.iter().copied().collect();
        Ok(())
    }

    /// Checks if the next draw will rebuild the shoe first.
    pub fn reached_cut_card(&self) -> bool {
        self.card_count.get_total() < self.reshuffle_threshold
    }

    /// Draws one card, weighted by the copies of each rank left. The
    /// reshuffle check runs before the draw, so the draw that takes the shoe
    /// below the threshold completes from the old shoe.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Dealt {
        let reshuffled = self.reached_cut_card();
        if reshuffled {
            debug!(
                "{} cards left, below {}: reshuffling",
                self.card_count.get_total(),
                self.reshuffle_threshold
            );
            self.reshuffle();
        }

        let rank = match self.firsts.pop_front() {
            Some(rank) => rank,
            None => {
                let k = rng.gen_range(0..self.card_count.get_total());
                self.card_count
                    .nth_card(k)
                    .expect("k is below the number of cards left")
            }
        };
        self.card_count.remove_card(rank);
        self.discarded.push(rank);

        Dealt { rank, reshuffled }
    }

    pub fn remaining(&self) -> u16 {
        self.card_count.get_total()
    }

    /// Cards drawn since the last reshuffle.
    pub fn discarded(&self) -> &[u8] {
        &self.discarded
    }

    pub fn get_card_count(&self) -> &CardCount {
        &self.card_count
    }

    pub fn get_number_of_reshuffles(&self) -> u64 {
        self.number_of_reshuffles
    }
}
