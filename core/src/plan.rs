use memorama_protocol::{CardView, GameState, Position, RevealResult};

use crate::CardFace;

/// What a single card element should look like after a render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardRender {
    pub position: Position,
    pub face: CardFace,
    /// Empty for a face-down card.
    pub text: String,
}

impl CardRender {
    fn from_view(index: usize, card: &CardView) -> Option<Self> {
        let position = card.position_or(index)?;
        let face = CardFace::of(card);
        let text = if face.is_face_up() {
            card.face().to_owned()
        } else {
            String::new()
        };
        Some(Self {
            position,
            face,
            text,
        })
    }

    fn turn_down(&mut self) {
        self.face = CardFace::empty();
        self.text.clear();
    }
}

/// A full description of the board derived from one server response.
///
/// Applying the same plan twice leaves the page unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderPlan {
    pub cards: Vec<CardRender>,
    pub moves: Option<u32>,
    pub matches: Option<u32>,
    pub won: bool,
    pub message: Option<String>,
}

impl RenderPlan {
    pub fn from_state(state: &GameState) -> Self {
        let cards = state
            .cards
            .iter()
            .enumerate()
            .filter_map(|(index, card)| CardRender::from_view(index, card))
            .collect();
        Self {
            cards,
            moves: state.moves,
            matches: state.matches,
            won: state.won,
            message: None,
        }
    }

    /// Plan for the immediate render of a response.
    ///
    /// On a mismatch the compared pair is forced face-up even if the server
    /// already reported it hidden again, so the player gets to see it before the
    /// flip-back.
    pub fn from_result(result: &RevealResult, state: &GameState) -> Self {
        let mut plan = Self::from_state(state);
        plan.message = result.message.clone();
        if result.is_mismatch() {
            plan.show_compared(result);
        }
        plan
    }

    fn card_mut(&mut self, position: Position) -> Option<&mut CardRender> {
        self.cards.iter_mut().find(|card| card.position == position)
    }

    fn show_compared(&mut self, result: &RevealResult) {
        for (index, &position) in result.positions.iter().enumerate() {
            let Some(card) = self.card_mut(position) else {
                continue;
            };
            if card.face.is_face_up() {
                continue;
            }
            card.face |= CardFace::FLIPPED;
            if let Some(text) = result.compared_face(index) {
                card.text = text.to_owned();
            }
        }
    }

    /// The same board with every face-up card that is not matched turned back down.
    pub fn reverted(&self) -> Self {
        let mut plan = self.clone();
        plan.cards
            .iter_mut()
            .filter(|card| !card.face.contains(CardFace::MATCHED))
            .for_each(CardRender::turn_down);
        plan
    }

    pub fn card(&self, position: Position) -> Option<&CardRender> {
        self.cards.iter().find(|card| card.position == position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memorama_protocol::RevealStatus;

    fn card(position: Position, value: &str, revealed: bool, matched: bool) -> CardView {
        CardView {
            position: Some(position),
            value: Some(value.to_owned()),
            revealed,
            matched,
            ..Default::default()
        }
    }

    fn state(cards: Vec<CardView>) -> GameState {
        GameState {
            cards,
            moves: Some(2),
            matches: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn face_down_cards_render_blank_even_with_value() {
        let plan = RenderPlan::from_state(&state(vec![card(0, "🐸", false, false)]));

        assert_eq!(plan.cards[0].face, CardFace::empty());
        assert_eq!(plan.cards[0].text, "");
    }

    #[test]
    fn matched_and_revealed_cards_show_value() {
        let plan = RenderPlan::from_state(&state(vec![
            card(0, "🐸", true, false),
            card(1, "🦊", false, true),
        ]));

        assert_eq!(plan.cards[0].text, "🐸");
        assert_eq!(plan.cards[0].face, CardFace::FLIPPED);
        assert_eq!(plan.cards[1].text, "🦊");
        assert_eq!(plan.cards[1].face, CardFace::FLIPPED | CardFace::MATCHED);
        assert_eq!(plan.moves, Some(2));
        assert_eq!(plan.matches, Some(1));
    }

    #[test]
    fn reverted_keeps_matched_cards_only() {
        let plan = RenderPlan::from_state(&state(vec![
            card(0, "🐸", true, false),
            card(1, "🦊", true, true),
            card(2, "🐸", false, false),
        ]));

        let reverted = plan.reverted();

        assert!(!reverted.cards[0].face.is_face_up());
        assert_eq!(reverted.cards[0].text, "");
        assert_eq!(reverted.cards[1], plan.cards[1]);
        assert_eq!(reverted.cards[2], plan.cards[2]);
        assert_eq!(reverted.moves, plan.moves);
    }

    #[test]
    fn mismatch_shows_compared_pair_hidden_by_server() {
        let game_state = state(vec![card(0, "", false, false), card(5, "", false, false)]);
        let result = RevealResult {
            status: RevealStatus::Checked,
            positions: vec![0, 5],
            symbols: vec![Some("🐸".to_owned()), Some("🦊".to_owned())],
            ..Default::default()
        };

        let plan = RenderPlan::from_result(&result, &game_state);

        assert_eq!(plan.card(0).unwrap().text, "🐸");
        assert!(plan.card(5).unwrap().face.is_face_up());
        assert_eq!(plan.card(5).unwrap().text, "🦊");
        assert!(!plan.reverted().card(5).unwrap().face.is_face_up());
    }

    #[test]
    fn match_does_not_touch_compared_pair() {
        let game_state = state(vec![card(0, "", false, false)]);
        let result = RevealResult {
            status: RevealStatus::Checked,
            match_found: true,
            positions: vec![0],
            symbols: vec![Some("🐸".to_owned())],
            ..Default::default()
        };

        let plan = RenderPlan::from_result(&result, &game_state);

        assert!(!plan.card(0).unwrap().face.is_face_up());
    }

    #[test]
    fn cards_without_position_use_their_index() {
        let mut anonymous = card(0, "🐸", true, false);
        anonymous.position = None;

        let plan = RenderPlan::from_state(&state(vec![card(0, "", false, false), anonymous]));

        assert_eq!(plan.card(1).unwrap().text, "🐸");
    }
}
