use std::collections::BTreeMap;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

use memorama_core::protocol::Position;
use memorama_core::{CardFace, CardRender, RenderPlan};

/// Card elements of one board, keyed by the position they stand for.
#[derive(Clone, Debug, Default)]
pub struct CardElements {
    by_position: BTreeMap<Position, Element>,
}

impl CardElements {
    pub const POSITION_ATTR: &'static str = "data-pos";

    /// Reads each element's position from `data-pos`. Only when no element
    /// carries one does the index in `elements` stand in, so an index never
    /// collides with an explicit position.
    pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> Self {
        let numbered: Vec<_> = elements
            .into_iter()
            .map(|element| {
                let position = element
                    .get_attribute(Self::POSITION_ATTR)
                    .and_then(|attr| attr.trim().parse::<Position>().ok());
                (position, element)
            })
            .collect();
        let use_index = numbered.iter().all(|(position, _)| position.is_none());

        let mut by_position: BTreeMap<Position, Element> = BTreeMap::new();
        for (index, (position, element)) in numbered.into_iter().enumerate() {
            let position = if use_index {
                index.try_into().ok()
            } else {
                position
            };
            let Some(position) = position else {
                log::warn!(
                    "card #{} has no usable {} and gets no click handler: {}",
                    index,
                    Self::POSITION_ATTR,
                    element.outer_html()
                );
                continue;
            };
            if let Some(kept) = by_position.get(&position) {
                log::warn!(
                    "card #{} repeats position {} of {}, ignoring {}",
                    index,
                    position,
                    kept.outer_html(),
                    element.outer_html()
                );
                continue;
            }
            by_position.insert(position, element);
        }
        Self { by_position }
    }

    pub fn query(root: &Element, selector: &str) -> Result<Self, JsValue> {
        let nodes = root.query_selector_all(selector)?;
        let elements = (0..nodes.length())
            .filter_map(|index| nodes.get(index))
            .filter_map(|node| node.dyn_into::<Element>().ok());
        Ok(Self::from_elements(elements))
    }

    pub fn get(&self, position: Position) -> Option<&Element> {
        self.by_position.get(&position)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &Element)> {
        self.by_position
            .iter()
            .map(|(&position, element)| (position, element))
    }

    pub fn len(&self) -> usize {
        self.by_position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }
}

/// The page elements a board renders into.
#[derive(Clone, Debug)]
pub struct DomBoard {
    root: Element,
    cards: CardElements,
}

impl DomBoard {
    pub const DEFAULT_CARD_SELECTOR: &'static str = ".card";
    pub const MOVES_ID: &'static str = "moves";
    pub const MATCHES_ID: &'static str = "matches";
    pub const MESSAGE_ID: &'static str = "message";
    pub const BOARD_ID: &'static str = "board";
    pub const WON_CLASS: &'static str = "won";
    pub const FACE_CLASS: &'static str = "emoji";

    pub fn new(root: Element, cards: CardElements) -> Self {
        Self { root, cards }
    }

    /// Collects every element under `root` matching `selector`.
    pub fn query(root: Element, selector: &str) -> Result<Self, JsValue> {
        let cards = CardElements::query(&root, selector)?;
        Ok(Self::new(root, cards))
    }

    pub fn cards(&self) -> &CardElements {
        &self.cards
    }

    fn find_by_id(&self, id: &str) -> Option<Element> {
        self.root
            .query_selector(&format!("#{}", id))
            .ok()
            .flatten()
    }

    pub fn apply(&self, plan: &RenderPlan) {
        for card in &plan.cards {
            // positions the page doesn't have are skipped
            let Some(element) = self.cards.get(card.position) else {
                continue;
            };
            if let Err(err) = render_card(element, card) {
                log::error!("failed to render card {}: {:?}", card.position, err);
            }
        }

        if let Some(moves) = plan.moves {
            self.set_text(Self::MOVES_ID, &moves.to_string());
        }
        if let Some(matches) = plan.matches {
            self.set_text(Self::MATCHES_ID, &matches.to_string());
        }
        if let Some(message) = &plan.message {
            self.set_text(Self::MESSAGE_ID, message);
        }
        if let Some(board) = self.find_by_id(Self::BOARD_ID) {
            if let Err(err) = board.class_list().toggle_with_force(Self::WON_CLASS, plan.won) {
                log::error!("failed to mark board: {:?}", err);
            }
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(element) = self.find_by_id(id) {
            element.set_text_content(Some(text));
        }
    }
}

fn render_card(element: &Element, card: &CardRender) -> Result<(), JsValue> {
    let class_list = element.class_list();
    for &(mark, class) in CardFace::CLASSES {
        if card.face.contains(mark) {
            class_list.add_1(class)?;
        } else {
            class_list.remove_1(class)?;
        }
    }

    element.set_inner_html("");
    if card.face.is_face_up() {
        let document = gloo::utils::document();
        let face = document.create_element("div")?;
        face.set_class_name(DomBoard::FACE_CLASS);
        face.set_text_content(Some(&card.text));
        element.append_child(&face)?;
    }
    Ok(())
}
