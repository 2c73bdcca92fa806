use crate::CardCount;

/// The cards held by one party, in the order they were dealt.
#[derive(Debug, Clone, Default)]
pub struct Hand {
    cards: Vec<u8>,
    card_count: CardCount,
}

impl Hand {
    pub fn new() -> Hand {
        Hand {
            cards: Vec::with_capacity(3),
            card_count: CardCount::default(),
        }
    }

    /// Builds a hand from the given ranks, in order.
    pub fn from_cards(ranks: &[u8]) -> Hand {
        let mut hand = Hand::new();
        for &rank in ranks {
            hand.receive_card(rank);
        }
        hand
    }

    pub fn receive_card(&mut self, rank: u8) {
        self.cards.push(rank);
        self.card_count.add_card(rank);
    }

    pub fn get_cards(&self) -> &[u8] {
        &self.cards
    }

    /// The first card received. For the dealer this is the face-up card.
    pub fn up_card(&self) -> Option<u8> {
        self.cards.first().copied()
    }

    /// Soft total: an Ace counts as 11 when that keeps the hand at 21 or less.
    pub fn total(&self) -> u16 {
        self.card_count.get_actual_sum()
    }

    pub fn is_bust(&self) -> bool {
        self.card_count.bust()
    }

    pub fn is_natural(&self) -> bool {
        self.card_count.is_natural()
    }

    pub fn has_usable_ace(&self) -> bool {
        self.card_count.has_usable_ace()
    }

    /// Total used for settling; a bust hand scores 0.
    pub fn score(&self) -> u16 {
        if self.is_bust() {
            0
        } else {
            self.total()
        }
    }

    pub fn clear(&mut self) {
        self.cards.clear();
        self.card_count = CardCount::default();
    }
}
