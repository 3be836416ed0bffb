use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use memorama_protocol::CardView;

bitflags! {
    /// Presentation marks applied to a card element.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CardFace: u8 {
        const FLIPPED = 1;
        const MATCHED = 1 << 1;
    }
}

impl CardFace {
    /// CSS class for every mark, in the order they are toggled.
    pub const CLASSES: &'static [(CardFace, &'static str)] =
        &[(CardFace::FLIPPED, "flipped"), (CardFace::MATCHED, "matched")];

    pub fn of(card: &CardView) -> Self {
        let mut face = Self::empty();
        face.set(Self::FLIPPED, card.is_face_up());
        face.set(Self::MATCHED, card.matched);
        face
    }

    pub const fn is_face_up(self) -> bool {
        self.contains(Self::FLIPPED)
    }
}
