use memorama_protocol::{Position, RevealResult, RevealStatus};

use crate::*;

/// Monotonic request counter, one per board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RevealTicket {
    generation: Generation,
    position: Position,
}

impl RevealTicket {
    pub const fn generation(self) -> Generation {
        self.generation
    }

    pub const fn position(self) -> Position {
        self.position
    }
}

/// Identifies the flip-back scheduled by one applied response.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FlipBackToken(Generation);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FlipBack {
    pub token: FlipBackToken,
    pub delay_ms: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiscardReason {
    /// A response from a newer request was already applied.
    Stale,
    Disposed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RevealUpdate {
    Render {
        plan: RenderPlan,
        flip_back: Option<FlipBack>,
    },
    Discarded(DiscardReason),
    /// The server declined the reveal without an error, e.g. the card was
    /// already face-up.
    Ignored { message: Option<String> },
}

impl RevealUpdate {
    pub const fn has_update(&self) -> bool {
        matches!(self, Self::Render { .. })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoardConfig {
    pub flip_back_ms: u32,
}

impl BoardConfig {
    pub const DEFAULT_FLIP_BACK_MS: u32 = 1000;
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            flip_back_ms: Self::DEFAULT_FLIP_BACK_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct PendingFlipBack {
    token: FlipBackToken,
    plan: RenderPlan,
}

/// DOM-free state of one board: which reveal requests are current, and which
/// flip-back (if any) is still allowed to fire.
#[derive(Clone, Debug, Default)]
pub struct BoardController {
    config: BoardConfig,
    issued: u64,
    applied: Option<Generation>,
    pending_flip_back: Option<PendingFlipBack>,
    disposed: bool,
}

impl BoardController {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn has_pending_flip_back(&self) -> bool {
        self.pending_flip_back.is_some()
    }

    /// Starts a new request generation and cancels any pending flip-back.
    pub fn begin_reveal(&mut self, position: Position) -> RevealTicket {
        self.issued += 1;
        let generation = Generation(self.issued);
        if self.cancel_flip_back() {
            log::debug!("flip-back cancelled by reveal of {}", position);
        }
        RevealTicket {
            generation,
            position,
        }
    }

    /// Decides what, if anything, a finished reveal request should render.
    pub fn complete_reveal(
        &mut self,
        ticket: RevealTicket,
        response: Result<RevealResult>,
    ) -> Result<RevealUpdate> {
        if self.disposed {
            return Ok(RevealUpdate::Discarded(DiscardReason::Disposed));
        }
        if self.applied.is_some_and(|applied| applied > ticket.generation) {
            log::debug!(
                "discarding stale response for {} ({:?} < {:?})",
                ticket.position,
                ticket.generation,
                self.applied
            );
            return Ok(RevealUpdate::Discarded(DiscardReason::Stale));
        }

        let result = response?;
        let Some(state) = result.game_state.as_ref() else {
            return match result.status {
                RevealStatus::Ignored => Ok(RevealUpdate::Ignored {
                    message: result.message,
                }),
                RevealStatus::Error => Err(RevealError::Server(
                    result
                        .message
                        .or(result.error)
                        .unwrap_or_else(|| "no reason given".to_owned()),
                )),
                _ => Err(match result.error {
                    Some(message) => RevealError::Server(message),
                    None => RevealError::MissingGameState,
                }),
            };
        };

        let plan = RenderPlan::from_result(&result, state);
        self.applied = Some(ticket.generation);
        self.pending_flip_back = None;

        let flip_back = result.is_mismatch().then(|| {
            let token = FlipBackToken(ticket.generation);
            self.pending_flip_back = Some(PendingFlipBack {
                token,
                plan: plan.reverted(),
            });
            FlipBack {
                token,
                delay_ms: self.config.flip_back_ms,
            }
        });

        Ok(RevealUpdate::Render { plan, flip_back })
    }

    /// Returns the reverted plan if `token` is still the pending flip-back.
    pub fn take_flip_back(&mut self, token: FlipBackToken) -> Option<RenderPlan> {
        if self.disposed {
            return None;
        }
        match self.pending_flip_back.take() {
            Some(pending) if pending.token == token => Some(pending.plan),
            other => {
                self.pending_flip_back = other;
                None
            }
        }
    }

    pub fn cancel_flip_back(&mut self) -> bool {
        self.pending_flip_back.take().is_some()
    }

    pub fn dispose(&mut self) {
        self.cancel_flip_back();
        self.disposed = true;
    }
}
