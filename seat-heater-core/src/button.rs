//! Debounced button edge detection shared between interrupt and tick context.
//!
//! Each raw interrupt pushes the sampled pin level into a small shift
//! register. Only a change from a unanimously released history to a
//! unanimously pressed one counts as a press, and a press sets a one-slot
//! mailbox that the periodic tick drains with [`ButtonEdgeDetector::take_advance`].
//! Presses that land before the tick drains the slot coalesce into one.
//!
//! All state is atomic so a detector can live in a `static` and be handed to
//! the interrupt side as `&'static dyn EdgeHandler`. On cores without native
//! read-modify-write atomics `portable-atomic` lowers the mailbox exchange to
//! a critical section.

use portable_atomic::{AtomicBool, AtomicU8, Ordering};

use crate::hal::{EdgeHandler, PinLevel};

/// Samples that must agree before a level is considered stable.
pub const DEFAULT_DEBOUNCE_DEPTH: usize = 3;

/// Debouncer plus advance mailbox for one seat button.
///
/// `DEPTH` must be between 1 and 8 samples.
pub struct ButtonEdgeDetector<const DEPTH: usize = DEFAULT_DEBOUNCE_DEPTH> {
    pressed_level: PinLevel,
    /// Newest sample in bit 0; a set bit means "pressed". Written only from
    /// the owning seat's interrupt context.
    raw_level_history: AtomicU8,
    stable_pressed: AtomicBool,
    pending_advance: AtomicBool,
}

impl<const DEPTH: usize> ButtonEdgeDetector<DEPTH> {
    const MASK: u8 = {
        assert!(DEPTH >= 1 && DEPTH <= 8, "debounce depth must be 1..=8");
        if DEPTH == 8 {
            u8::MAX
        } else {
            (1u8 << DEPTH) - 1
        }
    };

    /// Creates a detector whose button reads `pressed_level` while held.
    /// History starts out unanimously released.
    #[must_use]
    pub const fn new(pressed_level: PinLevel) -> Self {
        Self {
            pressed_level,
            raw_level_history: AtomicU8::new(0),
            stable_pressed: AtomicBool::new(false),
            pending_advance: AtomicBool::new(false),
        }
    }

    /// Level the button reads while held.
    #[must_use]
    pub const fn pressed_level(&self) -> PinLevel {
        self.pressed_level
    }

    /// Fills the history with `level` without raising an advance.
    ///
    /// Used at boot, before the edge interrupt is armed, so a button that is
    /// already held does not count as a press.
    pub fn seed(&self, level: PinLevel) {
        let pressed = level == self.pressed_level;
        self.raw_level_history
            .store(if pressed { Self::MASK } else { 0 }, Ordering::Relaxed);
        self.stable_pressed.store(pressed, Ordering::Relaxed);
    }

    /// Interrupt-context entry point: records the level sampled after an edge.
    pub fn on_raw_edge(&self, level: PinLevel) {
        let pressed = level == self.pressed_level;
        // Single writer per seat, so a plain load/store pair is enough here.
        let history = ((self.raw_level_history.load(Ordering::Relaxed) << 1)
            | u8::from(pressed))
            & Self::MASK;
        self.raw_level_history.store(history, Ordering::Relaxed);

        if history == Self::MASK {
            if !self.stable_pressed.load(Ordering::Relaxed) {
                self.stable_pressed.store(true, Ordering::Relaxed);
                self.pending_advance.store(true, Ordering::Release);
            }
        } else if history == 0 {
            self.stable_pressed.store(false, Ordering::Relaxed);
        }
    }

    /// Periodic-context entry point: reads and clears the mailbox in one
    /// atomic exchange.
    pub fn take_advance(&self) -> bool {
        self.pending_advance.swap(false, Ordering::AcqRel)
    }

    /// Peeks at the mailbox without consuming it.
    #[must_use]
    pub fn has_pending_advance(&self) -> bool {
        self.pending_advance.load(Ordering::Acquire)
    }

    /// Last debounced level, as seen by the button.
    #[must_use]
    pub fn stable_level(&self) -> PinLevel {
        if self.stable_pressed.load(Ordering::Relaxed) {
            self.pressed_level
        } else {
            opposite(self.pressed_level)
        }
    }

    /// Returns `true` when every sample in the history agrees.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        let history = self.raw_level_history.load(Ordering::Relaxed);
        history == 0 || history == Self::MASK
    }
}

impl<const DEPTH: usize> EdgeHandler for ButtonEdgeDetector<DEPTH> {
    fn on_edge(&self, level: PinLevel) {
        self.on_raw_edge(level);
    }

    fn is_settled(&self) -> bool {
        ButtonEdgeDetector::<DEPTH>::is_settled(self)
    }
}

const fn opposite(level: PinLevel) -> PinLevel {
    match level {
        PinLevel::Low => PinLevel::High,
        PinLevel::High => PinLevel::Low,
    }
}
