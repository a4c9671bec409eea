//! A rule-based decision backend for self-play.
//!
//! No model in the loop: fixed valuations and greedy choices. Useful as
//! a deterministic opponent in tests and benches, and as the reference
//! for what a "reasonable" backend looks like.

use crate::duel::Card;
use crate::ledger::Bundle;

use super::{
    fallback_card, BuyoutDecision, BuyoutView, CardView, DecisionProvider, NegotiationDecision,
    NegotiationView, ProviderError,
};

/// Greedy rule-based backend.
///
/// Policy:
/// - Negotiation: never proposes; accepts a standing offer only when it
///   comes out strictly ahead on the fixed valuation, otherwise passes.
/// - Card: plays its most plentiful kind (ties broken in Rock, Paper,
///   Scissors order).
/// - Buyout: buys the full remaining need from the first seller that
///   has the stock, as long as the coins cover it; declines otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicProvider;

impl HeuristicProvider {
    /// Create the backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Fixed valuation: a star is worth ten coins, a card two.
    fn value(bundle: &Bundle) -> u32 {
        bundle.stars * 10 + bundle.coins + bundle.total_cards() * 2
    }
}

impl DecisionProvider for HeuristicProvider {
    fn negotiation_turn(
        &mut self,
        view: &NegotiationView,
    ) -> Result<NegotiationDecision, ProviderError> {
        if let Some(offer) = &view.standing_offer {
            let incoming = offer
                .receives(view.you)
                .copied()
                .unwrap_or_default();
            let outgoing = offer.gives(view.you).copied().unwrap_or_default();
            if Self::value(&incoming) > Self::value(&outgoing) {
                return Ok(NegotiationDecision::Accept);
            }
        }
        Ok(NegotiationDecision::Pass)
    }

    fn choose_card(&mut self, view: &CardView) -> Result<Card, ProviderError> {
        let mut best: Option<Card> = None;
        for card in Card::ALL {
            let count = view.inventory.card_count(card);
            if count > 0 && best.map_or(true, |b| count > view.inventory.card_count(b)) {
                best = Some(card);
            }
        }
        best.or_else(|| fallback_card(&view.inventory))
            .ok_or_else(|| ProviderError::Backend("no cards to choose from".into()))
    }

    fn buyout(&mut self, view: &BuyoutView) -> Result<BuyoutDecision, ProviderError> {
        let price = view.stars_needed * view.coins_per_star;
        if view.stars_needed == 0 || view.inventory.coins() < price {
            return Ok(BuyoutDecision::Decline);
        }
        let seller = view
            .sellers
            .iter()
            .find(|seller| seller.stars >= view.stars_needed);
        match seller {
            Some(seller) => Ok(BuyoutDecision::Buy {
                seller: seller.id,
                stars: view.stars_needed,
            }),
            None => Ok(BuyoutDecision::Decline),
        }
    }
}
