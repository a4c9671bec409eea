//! A queue-fed decision backend for tests and replays.

use std::collections::VecDeque;

use crate::duel::Card;

use super::{
    fallback_card, BuyoutDecision, BuyoutView, CardView, DecisionProvider, NegotiationDecision,
    NegotiationView, ProviderError,
};

/// Plays back pre-recorded decisions in order.
///
/// Each decision point has its own queue. An exhausted queue yields the
/// default action for that point (pass, first held card, decline), so a
/// short script tails off gracefully instead of erroring.
///
/// ```
/// use star_gambit::provider::{NegotiationDecision, ScriptedProvider};
///
/// let provider = ScriptedProvider::new()
///     .with_negotiation([NegotiationDecision::Pass, NegotiationDecision::Accept]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedProvider {
    negotiation: VecDeque<NegotiationDecision>,
    cards: VecDeque<Card>,
    buyouts: VecDeque<BuyoutDecision>,
}

impl ScriptedProvider {
    /// An empty script: always the default action.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue negotiation-turn decisions.
    #[must_use]
    pub fn with_negotiation(
        mut self,
        decisions: impl IntoIterator<Item = NegotiationDecision>,
    ) -> Self {
        self.negotiation.extend(decisions);
        self
    }

    /// Queue card declarations.
    #[must_use]
    pub fn with_cards(mut self, cards: impl IntoIterator<Item = Card>) -> Self {
        self.cards.extend(cards);
        self
    }

    /// Queue buyout decisions.
    #[must_use]
    pub fn with_buyouts(mut self, decisions: impl IntoIterator<Item = BuyoutDecision>) -> Self {
        self.buyouts.extend(decisions);
        self
    }
}

impl DecisionProvider for ScriptedProvider {
    fn negotiation_turn(
        &mut self,
        _view: &NegotiationView,
    ) -> Result<NegotiationDecision, ProviderError> {
        Ok(self
            .negotiation
            .pop_front()
            .unwrap_or(NegotiationDecision::Pass))
    }

    fn choose_card(&mut self, view: &CardView) -> Result<Card, ProviderError> {
        match self.cards.pop_front() {
            Some(card) => Ok(card),
            None => fallback_card(&view.inventory)
                .ok_or_else(|| ProviderError::Backend("no cards to choose from".into())),
        }
    }

    fn buyout(&mut self, _view: &BuyoutView) -> Result<BuyoutDecision, ProviderError> {
        Ok(self.buyouts.pop_front().unwrap_or(BuyoutDecision::Decline))
    }
}
