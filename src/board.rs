use rand::Rng;
use std::collections::HashSet;

use crate::content::{Artwork, ContentId, CreatureRef};

/// A single card on the board. Whether it shows its face is decided by the
/// session, not stored here.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub index: usize,
    pub content: ContentId,
    pub detail_url: String,
    pub matched: bool,
    pub artwork: Option<Artwork>,
}

impl Card {
    pub fn label(&self) -> String {
        match &self.artwork {
            Some(artwork) => artwork.name.clone(),
            None => self.content.to_string(),
        }
    }
}

/// Unbiased in-place Fisher-Yates shuffle
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    /// Deal `pairs` distinct creatures from `pool`, each twice, in random order.
    /// A short pool is padded with placeholder creatures so the pair count holds.
    pub fn deal<R: Rng>(
        mut pool: Vec<CreatureRef>,
        pairs: usize,
        api_base: &str,
        rng: &mut R,
    ) -> Self {
        shuffle(&mut pool, rng);

        let mut seen = HashSet::new();
        let mut picks: Vec<CreatureRef> = pool
            .into_iter()
            .filter(|c| seen.insert(c.id))
            .take(pairs)
            .collect();

        let mut next_id = 1;
        while picks.len() < pairs {
            if seen.insert(ContentId(next_id)) {
                picks.push(CreatureRef::placeholder(next_id, api_base));
            }
            next_id += 1;
        }

        let mut deck: Vec<CreatureRef> = picks.iter().chain(picks.iter()).cloned().collect();
        shuffle(&mut deck, rng);

        let cards = deck
            .into_iter()
            .enumerate()
            .map(|(index, creature)| Card {
                index,
                content: creature.id,
                detail_url: creature.detail_url,
                matched: false,
                artwork: None,
            })
            .collect();

        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Card> {
        self.cards.get_mut(index)
    }

    /// Grid width used by the UI
    pub fn columns(&self) -> usize {
        match self.cards.len() {
            0..=6 => 3,
            7..=12 => 4,
            _ => 6,
        }
    }
}
