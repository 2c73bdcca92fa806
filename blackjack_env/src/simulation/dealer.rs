use super::hand::Hand;

/// The dealer stands on any total of this or more, soft or hard.
pub const DEALER_STANDS_ON: u16 = 17;

/// The fixed rule the dealer follows once the player is done.
#[derive(Debug, Clone, Copy, Default)]
pub struct DealerPolicy;

impl DealerPolicy {
    pub fn must_hit(&self, dealer_hand: &Hand) -> bool {
        dealer_hand.total() < DEALER_STANDS_ON
    }

    /// Draws into the dealer's hand until the policy stands. Every card goes
    /// through `draw`, so the caller keeps the shoe and the count in sync.
    pub fn play<F: FnMut() -> u8>(&self, dealer_hand: &mut Hand, mut draw: F) {
        while self.must_hit(dealer_hand) {
            dealer_hand.receive_card(draw());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stands_on_soft_17() {
        let dealer_hand = Hand::from_cards(&[1, 6]);
        assert_eq!(dealer_hand.total(), 17);
        assert!(!DealerPolicy.must_hit(&dealer_hand));
    }

    #[test]
    fn hits_until_17_or_more() {
        let mut dealer_hand = Hand::from_cards(&[2, 3]);
        let mut next = vec![4, 2, 7, 9].into_iter();
        DealerPolicy.play(&mut dealer_hand, || next.next().unwrap());
        assert_eq!(dealer_hand.get_cards(), &[2, 3, 4, 2, 7]);
        assert_eq!(dealer_hand.total(), 18);
        assert_eq!(next.next(), Some(9));
    }

    #[test]
    fn keeps_drawing_into_a_bust() {
        let mut dealer_hand = Hand::from_cards(&[10, 6]);
        DealerPolicy.play(&mut dealer_hand, || 10);
        assert_eq!(dealer_hand.get_cards(), &[10, 6, 10]);
        assert!(dealer_hand.is_bust());
    }
}
