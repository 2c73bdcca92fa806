pub mod dealer;
pub mod hand;
pub mod shoe;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use blackjack_env_macros::allowed_phase;
use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    strategy::Strategy, Action, CountTracker, EnvError, Observation, Rule, Transition,
};

use self::{dealer::DealerPolicy, hand::Hand, shoe::Shoe};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingReset,
    InPlay,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::AwaitingReset => write!(f, "AwaitingReset"),
            Phase::InPlay => write!(f, "InPlay"),
        }
    }
}

/// A single-player Blackjack episode with a running count, driven through
/// `reset` and `step`.
///
/// The shoe and the running count live as long as the environment: a reset
/// deals from whatever is left, and only a reshuffle zeroes the count.
pub struct BlackjackEnv<R: Rng = ChaCha8Rng> {
    rule: Rule,
    rng: R,
    phase: Phase,
    shoe: Shoe,
    count: CountTracker,
    dealer_policy: DealerPolicy,
    player_hand: Hand,
    dealer_hand: Hand,
}

impl BlackjackEnv<ChaCha8Rng> {
    /// Creates an environment whose episodes are reproducible from `seed`.
    pub fn seeded(rule: &Rule, seed: u64) -> Result<Self, EnvError> {
        Self::new(rule, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> BlackjackEnv<R> {
    pub fn new(rule: &Rule, rng: R) -> Result<Self, EnvError> {
        rule.validate()?;
        Ok(Self {
            rule: *rule,
            rng,
            phase: Phase::AwaitingReset,
            shoe: Shoe::new(rule.number_of_decks, rule.reshuffle_threshold),
            count: CountTracker::new(),
            dealer_policy: DealerPolicy,
            player_hand: Hand::new(),
            dealer_hand: Hand::new(),
        })
    }

    /// Deals two cards to the dealer, then two to the player, and starts a
    /// new episode. Can be called in any phase; an unfinished hand is
    /// abandoned.
    ///
    /// Every card moves the count, the dealer's face-down card included.
    pub fn reset(&mut self) -> Observation {
        self.player_hand.clear();
        self.dealer_hand.clear();
        for _ in 0..2 {
            let rank = self.deal_card();
            self.dealer_hand.receive_card(rank);
        }
        for _ in 0..2 {
            let rank = self.deal_card();
            self.player_hand.receive_card(rank);
        }
        self.phase = Phase::InPlay;

        debug!(
            "Dealt player {:?}, dealer {:?}, count {}, {} cards left",
            self.player_hand.get_cards(),
            self.dealer_hand.get_cards(),
            self.count.value(),
            self.shoe.remaining()
        );
        self.observation_unchecked()
    }

    /// Applies an action. Can be called at InPlay phase.
    ///
    /// Hit draws one card and only ends the episode on a bust, at -1. Stick
    /// lets the dealer play out and settles. Double draws exactly one card,
    /// bust or not, then the dealer plays out and the settlement is doubled.
    #[allowed_phase(InPlay)]
    pub fn step(&mut self, action: Action) -> Result<Transition, EnvError> {
        let (reward, done) = match action {
            Action::Hit => {
                let rank = self.deal_card();
                self.player_hand.receive_card(rank);
                if self.player_hand.is_bust() {
                    (-1.0, true)
                } else {
                    (0.0, false)
                }
            }
            Action::Stick => {
                self.dealer_plays();
                (self.apply_rule(self.compare_scores()), true)
            }
            Action::Double => {
                let rank = self.deal_card();
                self.player_hand.receive_card(rank);
                self.dealer_plays();
                (self.apply_rule(2.0 * self.compare_scores()), true)
            }
        };

        if done {
            self.phase = Phase::AwaitingReset;
        }
        trace!(
            "{:?}: player {:?}, dealer {:?}, reward {}",
            action,
            self.player_hand.get_cards(),
            self.dealer_hand.get_cards(),
            reward
        );

        Ok(Transition {
            observation: self.observation_unchecked(),
            reward,
            done,
            info: HashMap::new(),
        })
    }

    /// Same as `step` with the integer encoding of the action space.
    pub fn step_index(&mut self, action: u8) -> Result<Transition, EnvError> {
        self.step(Action::try_from(action)?)
    }

    /// Resets, then lets `strategy` play until the episode is done. Returns
    /// the final reward.
    pub fn play_episode<S: Strategy + ?Sized, H: EpisodeEventHandler + ?Sized>(
        &mut self,
        strategy: &mut S,
        handler: &mut H,
    ) -> Result<f64, EnvError> {
        strategy.new_episode();
        let mut observation = self.reset();
        handler.on_reset(&observation);

        loop {
            let action = strategy.decide(&observation);
            handler.on_decision(&observation, action);
            let transition = self.step(action)?;
            if transition.done {
                if self.player_hand.is_bust() {
                    handler.on_player_bust(&self.player_hand);
                }
                handler.on_episode_end(&self.player_hand, &self.dealer_hand, transition.reward);
                return Ok(transition.reward);
            }
            observation = transition.observation;
        }
    }

    /// The observation of the current episode, or None before the first
    /// reset.
    pub fn observation(&self) -> Option<Observation> {
        self.dealer_hand.up_card()?;
        Some(self.observation_unchecked())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn player_hand(&self) -> &Hand {
        &self.player_hand
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer_hand
    }

    pub fn running_count(&self) -> i32 {
        self.count.value()
    }

    pub fn count_tracker(&self) -> &CountTracker {
        &self.count
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    /// Mutable access to the shoe, e.g. to stack the next cards.
    pub fn shoe_mut(&mut self) -> &mut Shoe {
        &mut self.shoe
    }

    fn deal_card(&mut self) -> u8 {
        deal_card(&mut self.shoe, &mut self.count, &mut self.rng)
    }

    fn dealer_plays(&mut self) {
        let (shoe, count, rng) = (&mut self.shoe, &mut self.count, &mut self.rng);
        self.dealer_policy
            .play(&mut self.dealer_hand, || deal_card(shoe, count, rng));
    }

    fn compare_scores(&self) -> f64 {
        match self.player_hand.score().cmp(&self.dealer_hand.score()) {
            Ordering::Greater => 1.0,
            Ordering::Less => -1.0,
            Ordering::Equal => 0.0,
        }
    }

    /// Rule adjustments after the dealer played out. The natural bonus only
    /// matches a reward of exactly 1.0, so a doubled win (2.0) never gets it.
    fn apply_rule(&self, reward: f64) -> f64 {
        let player_natural = self.player_hand.is_natural();
        if self.rule.sab && player_natural && !self.dealer_hand.is_natural() {
            1.0
        } else if !self.rule.sab && self.rule.natural && player_natural && reward == 1.0 {
            1.5
        } else {
            reward
        }
    }

    /// Only valid once the initial cards are dealt.
    fn observation_unchecked(&self) -> Observation {
        Observation {
            player_total: self.player_hand.total() as u8,
            dealer_up_card: self.dealer_hand.get_cards()[0],
            usable_ace: self.player_hand.has_usable_ace(),
            running_count: self.count.value(),
        }
    }
}

/// Draws from the shoe and moves the count. A reshuffle zeroes the count
/// before the new card is applied.
fn deal_card<R: Rng + ?Sized>(shoe: &mut Shoe, count: &mut CountTracker, rng: &mut R) -> u8 {
    let dealt = shoe.draw(rng);
    if dealt.reshuffled {
        count.reset();
    }
    count.apply(dealt.rank);
    dealt.rank
}

pub trait EpisodeEventHandler {
    fn on_reset(&mut self, _observation: &Observation) {}
    fn on_decision(&mut self, _observation: &Observation, _action: Action) {}
    fn on_player_bust(&mut self, _player_hand: &Hand) {}
    fn on_episode_end(&mut self, player_hand: &Hand, dealer_hand: &Hand, reward: f64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::count::plus_minus_weight;
    use crate::strategy::ThresholdStrategy;

    fn env_with(natural: bool, sab: bool) -> BlackjackEnv {
        let rule = Rule {
            natural,
            sab,
            ..Default::default()
        };
        BlackjackEnv::seeded(&rule, 7).unwrap()
    }

    /// Stacks the shoe so the next reset deals `dealer` then `player`,
    /// followed by `rest`.
    fn deal(env: &mut BlackjackEnv, dealer: [u8; 2], player: [u8; 2], rest: &[u8]) -> Observation {
        let mut firsts = vec![dealer[0], dealer[1], player[0], player[1]];
        firsts.extend_from_slice(rest);
        env.shoe_mut().stack(&firsts).unwrap();
        env.reset()
    }

    fn weights(ranks: &[u8]) -> i32 {
        ranks.iter().map(|rank| plus_minus_weight(*rank)).sum()
    }

    #[derive(Default)]
    struct Recorder {
        resets: usize,
        decisions: Vec<Action>,
        busts: usize,
        rewards: Vec<f64>,
    }

    impl EpisodeEventHandler for Recorder {
        fn on_reset(&mut self, _: &Observation) {
            self.resets += 1;
        }

        fn on_decision(&mut self, _: &Observation, action: Action) {
            self.decisions.push(action);
        }

        fn on_player_bust(&mut self, _: &Hand) {
            self.busts += 1;
        }

        fn on_episode_end(&mut self, _: &Hand, _: &Hand, reward: f64) {
            self.rewards.push(reward);
        }
    }

    #[test]
    fn step_before_reset_fails() {
        let mut env = env_with(false, false);
        assert_eq!(env.phase(), Phase::AwaitingReset);
        assert_eq!(env.observation(), None);
        assert_eq!(
            env.step(Action::Hit),
            Err(EnvError::WrongPhase {
                operation: "step",
                expected: Phase::InPlay,
                actual: Phase::AwaitingReset,
            })
        );
        assert!(env.player_hand().get_cards().is_empty());
    }

    #[test]
    fn step_after_episode_end_fails() {
        let mut env = env_with(false, false);
        deal(&mut env, [10, 7], [10, 9], &[]);
        let transition = env.step(Action::Stick).unwrap();
        assert!(transition.done);
        assert_eq!(env.phase(), Phase::AwaitingReset);
        assert!(env.step(Action::Stick).is_err());
    }

    #[test]
    fn invalid_action_is_rejected() {
        let mut env = env_with(false, false);
        env.reset();
        let cards_before = env.player_hand().get_cards().to_vec();
        assert_eq!(env.step_index(3), Err(EnvError::InvalidAction(3)));
        assert_eq!(env.player_hand().get_cards(), cards_before.as_slice());
        assert_eq!(env.phase(), Phase::InPlay);
    }

    #[test]
    fn reset_deals_two_cards_each_and_counts_all_four() {
        let mut env = env_with(false, false);
        let observation = deal(&mut env, [5, 10], [9, 7], &[]);
        assert_eq!(env.dealer_hand().get_cards(), &[5, 10]);
        assert_eq!(env.player_hand().get_cards(), &[9, 7]);
        assert_eq!(observation.as_tuple(), (16, 5, 0, 1 - 1));
        assert_eq!(env.count_tracker().applied(), 4);
        assert_eq!(env.shoe().remaining(), 48);
        assert_eq!(env.phase(), Phase::InPlay);
    }

    #[test]
    fn hole_card_moves_the_count() {
        let mut env = env_with(false, false);
        let observation = deal(&mut env, [8, 2], [8, 9], &[]);
        assert_eq!(observation.running_count, 1);
    }

    #[test]
    fn reset_twice_deals_fresh_hands() {
        let mut env = env_with(false, false);
        env.reset();
        let count_after_first = env.running_count();
        let observation = env.reset();
        assert_eq!(env.player_hand().get_cards().len(), 2);
        assert_eq!(env.dealer_hand().get_cards().len(), 2);
        assert_eq!(env.count_tracker().applied(), 8);
        assert_eq!(env.shoe().remaining(), 44);
        let new_cards: Vec<u8> = env
            .dealer_hand()
            .get_cards()
            .iter()
            .chain(env.player_hand().get_cards())
            .copied()
            .collect();
        assert_eq!(
            observation.running_count,
            count_after_first + weights(&new_cards)
        );
        assert_eq!(observation.player_total as u16, env.player_hand().total());
    }

    #[test]
    fn natural_stick_pays_bonus() {
        let mut env = env_with(true, false);
        let observation = deal(&mut env, [5, 10], [1, 10], &[10]);
        assert_eq!(observation.as_tuple(), (21, 5, 1, 1 - 1 - 1 - 1));
        let transition = env.step(Action::Stick).unwrap();
        assert!(transition.done);
        assert_eq!(env.dealer_hand().get_cards(), &[5, 10, 10]);
        assert_eq!(transition.reward, 1.5);
        assert!(transition.info.is_empty());
    }

    #[test]
    fn natural_without_bonus_pays_one() {
        let mut env = env_with(false, false);
        deal(&mut env, [5, 10], [1, 10], &[4]);
        let transition = env.step(Action::Stick).unwrap();
        assert_eq!(env.dealer_hand().total(), 19);
        assert_eq!(transition.reward, 1.0);
    }

    #[test]
    fn sab_natural_wins_outright() {
        let mut env = env_with(true, true);
        deal(&mut env, [5, 6], [10, 1], &[10]);
        let transition = env.step(Action::Stick).unwrap();
        assert_eq!(env.dealer_hand().total(), 21);
        assert_eq!(transition.reward, 1.0);
    }

    #[test]
    fn sab_natural_against_dealer_natural_is_a_push() {
        let mut env = env_with(false, true);
        deal(&mut env, [1, 10], [10, 1], &[]);
        let transition = env.step(Action::Stick).unwrap();
        assert_eq!(env.dealer_hand().get_cards(), &[1, 10]);
        assert_eq!(transition.reward, 0.0);
    }

    #[test]
    fn natural_bonus_needs_a_win() {
        let mut env = env_with(true, false);
        deal(&mut env, [10, 1], [1, 10], &[]);
        let transition = env.step(Action::Stick).unwrap();
        assert_eq!(transition.reward, 0.0);
    }

    #[test]
    fn hit_into_bust_is_minus_one_for_every_rule() {
        for (natural, sab) in [(false, false), (true, false), (false, true), (true, true)] {
            let mut env = env_with(natural, sab);
            let observation = deal(&mut env, [6, 10], [10, 10], &[3]);
            assert_eq!(observation.player_total, 20);
            assert_eq!(observation.dealer_up_card, 6);
            let transition = env.step_index(1).unwrap();
            assert_eq!(transition.observation.player_total, 23);
            assert!(transition.done);
            assert_eq!(transition.reward, -1.0);
            assert_eq!(env.dealer_hand().get_cards().len(), 2);
        }
    }

    #[test]
    fn hit_without_bust_continues() {
        let mut env = env_with(false, false);
        deal(&mut env, [6, 10], [2, 3], &[4]);
        let transition = env.step(Action::Hit).unwrap();
        assert!(!transition.done);
        assert_eq!(transition.reward, 0.0);
        assert_eq!(transition.observation.player_total, 9);
        assert_eq!(env.phase(), Phase::InPlay);
    }

    #[test]
    fn double_loss_pays_minus_two() {
        let mut env = env_with(false, false);
        deal(&mut env, [10, 8], [5, 6], &[5]);
        assert_eq!(env.player_hand().total(), 11);
        let transition = env.step(Action::Double).unwrap();
        assert_eq!(env.player_hand().get_cards(), &[5, 6, 5]);
        assert_eq!(transition.reward, -2.0);
        assert!(transition.done);
    }

    #[test]
    fn double_bust_falls_through_to_doubled_comparison() {
        let mut env = env_with(true, true);
        deal(&mut env, [10, 2], [6, 10], &[10, 3, 4]);
        let transition = env.step(Action::Double).unwrap();
        assert!(env.player_hand().is_bust());
        assert_eq!(env.player_hand().score(), 0);
        assert_eq!(env.dealer_hand().get_cards(), &[10, 2, 3, 4]);
        assert_eq!(transition.observation.player_total, 26);
        assert_eq!(transition.reward, -2.0);
        assert_eq!(env.phase(), Phase::AwaitingReset);
    }

    #[test]
    fn double_bust_against_dealer_bust_is_a_push() {
        let mut env = env_with(false, false);
        deal(&mut env, [10, 6], [6, 10], &[10, 10]);
        let transition = env.step(Action::Double).unwrap();
        assert!(env.player_hand().is_bust());
        assert!(env.dealer_hand().is_bust());
        assert_eq!(transition.reward, 0.0);
    }

    #[test]
    fn double_win_pays_two_and_never_the_bonus() {
        let mut env = env_with(true, false);
        deal(&mut env, [10, 7], [5, 6], &[10]);
        let transition = env.step(Action::Double).unwrap();
        assert_eq!(env.player_hand().total(), 21);
        assert_eq!(transition.reward, 2.0);
    }

    #[test]
    fn stick_settles_against_dealer() {
        let mut env = env_with(false, false);
        deal(&mut env, [10, 6], [10, 8], &[10]);
        let transition = env.step(Action::Stick).unwrap();
        assert!(env.dealer_hand().is_bust());
        assert_eq!(transition.reward, 1.0);

        deal(&mut env, [10, 9], [10, 8], &[]);
        let transition = env.step(Action::Stick).unwrap();
        assert_eq!(transition.reward, -1.0);

        deal(&mut env, [10, 8], [10, 8], &[]);
        let transition = env.step(Action::Stick).unwrap();
        assert_eq!(transition.reward, 0.0);
    }

    #[test]
    fn reshuffle_zeroes_the_count_before_the_next_card() {
        let rule = Rule {
            reshuffle_threshold: 52,
            ..Default::default()
        };
        let mut env = BlackjackEnv::seeded(&rule, 3).unwrap();
        env.reset();
        assert_eq!(env.shoe().get_number_of_reshuffles(), 3);
        let dealt = env.shoe().discarded().to_vec();
        assert_eq!(dealt.len(), 1);
        assert_eq!(env.count_tracker().applied(), 1);
        assert_eq!(env.running_count(), weights(&dealt));
    }

    #[test]
    fn count_matches_discards_across_episodes() {
        let mut env = env_with(false, false);
        let mut strategy = ThresholdStrategy::default();
        let mut recorder = Recorder::default();
        for _ in 0..200 {
            env.play_episode(&mut strategy, &mut recorder).unwrap();
            assert_eq!(env.running_count(), weights(env.shoe().discarded()));
            assert_eq!(
                env.count_tracker().applied() as usize,
                env.shoe().discarded().len()
            );
        }
        assert!(env.shoe().get_number_of_reshuffles() > 0);
    }

    #[test]
    fn play_episode_reports_events() {
        let mut env = env_with(false, false);
        let mut strategy = ThresholdStrategy::default();
        let mut recorder = Recorder::default();
        env.shoe_mut().stack(&[10, 7, 10, 2, 10]).unwrap();
        let reward = env.play_episode(&mut strategy, &mut recorder).unwrap();
        assert_eq!(recorder.resets, 1);
        assert_eq!(recorder.decisions, vec![Action::Hit]);
        assert_eq!(recorder.busts, 1);
        assert_eq!(recorder.rewards, vec![-1.0]);
        assert_eq!(reward, -1.0);
        assert_eq!(env.phase(), Phase::AwaitingReset);
    }
}
