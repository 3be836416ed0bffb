//! Wire types for the `GET /game/reveal/{position}/` endpoint.
//!
//! Field names follow the camelCase JSON the board expects; the keys emitted by
//! the original Spanish-language server are accepted as aliases.

use serde::{Deserialize, Serialize};

pub use error::*;

mod error;

/// 0-based card index, unique and stable within a board.
pub type Position = u32;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealStatus {
    /// First card of a pair turned over.
    FirstReveal,
    /// Second card of a pair turned over and compared.
    Checked,
    /// The card was already revealed or matched.
    Ignored,
    Error,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    /// Older payloads omit this; the card's index in the sequence stands in.
    #[serde(default, alias = "posicion", skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, alias = "valor")]
    pub value: Option<String>,
    #[serde(default, alias = "simbolo", skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, alias = "revelada")]
    pub revealed: bool,
    #[serde(default, alias = "emparejada")]
    pub matched: bool,
}

impl CardView {
    pub const fn is_face_up(&self) -> bool {
        self.matched || self.revealed
    }

    /// What goes on the face: the symbol when the server sent one, the value otherwise.
    pub fn face(&self) -> &str {
        self.symbol
            .as_deref()
            .or(self.value.as_deref())
            .unwrap_or_default()
    }

    pub fn position_or(&self, index: usize) -> Option<Position> {
        self.position.or_else(|| index.try_into().ok())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(default, alias = "cartas")]
    pub cards: Vec<CardView>,
    #[serde(default, alias = "movimientos")]
    pub moves: Option<u32>,
    #[serde(default, alias = "aciertos")]
    pub matches: Option<u32>,
    #[serde(default, alias = "ganada")]
    pub won: bool,
    #[serde(default, alias = "activa", skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealResult {
    #[serde(default)]
    pub status: RevealStatus,
    #[serde(default, alias = "acierto")]
    pub match_found: bool,
    #[serde(default, alias = "estado_partida")]
    pub game_state: Option<GameState>,
    /// The two positions compared on a `checked` response.
    #[serde(default, alias = "posiciones", skip_serializing_if = "Vec::is_empty")]
    pub positions: Vec<Position>,
    #[serde(default, alias = "valores", skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Option<String>>,
    #[serde(default, alias = "simbolos", skip_serializing_if = "Vec::is_empty")]
    pub symbols: Vec<Option<String>>,
    #[serde(default, alias = "mensaje", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RevealResult {
    pub fn decode(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    pub const fn is_mismatch(&self) -> bool {
        matches!(self.status, RevealStatus::Checked) && !self.match_found
    }

    /// Face of the `index`-th compared card, as sent alongside `positions`.
    pub fn compared_face(&self, index: usize) -> Option<&str> {
        let symbol = self.symbols.get(index).and_then(Option::as_deref);
        let value = self.values.get(index).and_then(Option::as_deref);
        symbol.or(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_camel_case_payload() {
        let body = r#"{
            "status": "checked",
            "matchFound": false,
            "gameState": {
                "cards": [
                    {"position": 0, "value": "", "revealed": false, "matched": false},
                    {"position": 3, "value": "🐸", "revealed": true, "matched": false}
                ],
                "moves": 2,
                "matches": 0
            }
        }"#;

        let result = RevealResult::decode(body).unwrap();

        assert_eq!(result.status, RevealStatus::Checked);
        assert!(result.is_mismatch());
        let state = result.game_state.unwrap();
        assert_eq!(state.moves, Some(2));
        assert_eq!(state.matches, Some(0));
        assert_eq!(state.cards[1].position, Some(3));
        assert_eq!(state.cards[1].face(), "🐸");
        assert!(state.cards[1].is_face_up());
        assert!(!state.cards[0].is_face_up());
    }

    #[test]
    fn decodes_original_server_keys() {
        let body = r#"{
            "status": "checked",
            "acierto": true,
            "posiciones": [1, 4],
            "valores": ["a", "a"],
            "simbolos": ["🍎", null],
            "estado_partida": {
                "partida_id": "7",
                "movimientos": 5,
                "aciertos": 3,
                "activa": false,
                "ganada": true,
                "cartas": [
                    {"posicion": 1, "revelada": true, "emparejada": true, "valor": "a", "simbolo": "🍎"},
                    {"posicion": 2, "revelada": false, "emparejada": false, "valor": null, "simbolo": null}
                ]
            }
        }"#;

        let result = RevealResult::decode(body).unwrap();

        assert!(result.match_found);
        assert!(!result.is_mismatch());
        assert_eq!(result.positions, vec![1, 4]);
        assert_eq!(result.compared_face(0), Some("🍎"));
        assert_eq!(result.compared_face(1), Some("a"));
        assert_eq!(result.compared_face(2), None);
        let state = result.game_state.unwrap();
        assert!(state.won);
        assert_eq!(state.active, Some(false));
        assert_eq!(state.cards[0].face(), "🍎");
        assert_eq!(state.cards[1].value, None);
        assert_eq!(state.cards[1].face(), "");
    }

    #[test]
    fn legacy_cards_without_position_fall_back_to_index() {
        let body = r#"{"estado_partida": {"cartas": [{"simbolo": "", "revelada": false, "emparejada": false}]}}"#;

        let result = RevealResult::decode(body).unwrap();
        let card = &result.game_state.unwrap().cards[0];

        assert_eq!(card.position, None);
        assert_eq!(card.position_or(6), Some(6));
    }

    #[test]
    fn unknown_status_is_other() {
        let result = RevealResult::decode(r#"{"status": "hidden"}"#).unwrap();
        assert_eq!(result.status, RevealStatus::Other);

        let result = RevealResult::decode(r#"{"status": "first_reveal"}"#).unwrap();
        assert_eq!(result.status, RevealStatus::FirstReveal);
    }

    #[test]
    fn error_payload_has_no_game_state() {
        let result = RevealResult::decode(r#"{"error": "Posición inválida"}"#).unwrap();

        assert_eq!(result.game_state, None);
        assert_eq!(result.error.as_deref(), Some("Posición inválida"));
    }

    #[test]
    fn non_json_body_is_rejected() {
        let err = RevealResult::decode("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ProtocolError::Json(_)));
    }

    #[test]
    fn missing_counters_stay_unset() {
        let result = RevealResult::decode(r#"{"gameState": {"cards": []}}"#).unwrap();
        let state = result.game_state.unwrap();

        assert_eq!(state.moves, None);
        assert_eq!(state.matches, None);
    }
}
