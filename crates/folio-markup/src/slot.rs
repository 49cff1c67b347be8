//! Render-once state for a mounted component.
//!
//! A [`RenderSlot`] owns the rendered markup of one component instance. The
//! state only moves on two triggers: the mount effect ([`RenderSlot::begin`]
//! followed by [`RenderSlot::finish`]) and an explicit
//! [`RenderSlot::invalidate`]. Prop changes never touch it, so a component
//! whose inputs change after mount keeps showing what it rendered first.
//!
//! ```text
//!             begin            finish(Ok)
//! Uncomputed ───────► Computing ─────────► Ready
//!     ▲                   │
//!     │ invalidate        │ finish(Err)
//!     └───────────────────┴──────────────► Failed
//! ```
//!
//! Every started render holds a [`RenderTicket`] stamped with the slot
//! generation. `invalidate` and `retire` bump the generation, so a render that
//! resolves after its instance was invalidated or unmounted is dropped on
//! `finish` instead of overwriting newer state.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::TrustedMarkup;

/// Current state of a component's rendered markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderState<E> {
    /// Nothing rendered yet.
    Uncomputed,
    /// A render is in flight.
    Computing,
    /// Rendered markup is available.
    Ready(TrustedMarkup),
    /// The engine rejected the render. Not retried until invalidated.
    Failed(E),
}

/// Proof that the caller owns the in-flight render.
#[derive(Debug)]
#[must_use = "a started render must be finished"]
pub struct RenderTicket {
    generation: u64,
}

/// Outcome of [`RenderSlot::begin`].
#[derive(Debug)]
pub enum Begin<E> {
    /// The caller must render and then call [`RenderSlot::finish`].
    Start(RenderTicket),
    /// Another caller is already rendering.
    InFlight,
    /// Markup was rendered earlier.
    Ready(TrustedMarkup),
    /// A previous render failed.
    Failed(E),
}

#[derive(Debug)]
struct Inner<E> {
    state: RenderState<E>,
    generation: u64,
    retired: bool,
}

/// Per-instance markup slot with an atomic in-flight guard.
#[derive(Debug)]
pub struct RenderSlot<E> {
    inner: Mutex<Inner<E>>,
}

impl<E: Clone> RenderSlot<E> {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: RenderState::Uncomputed,
                generation: 0,
                retired: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<E>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check the slot and claim the render if nothing was rendered yet.
    ///
    /// The check and the `Uncomputed -> Computing` transition happen under
    /// one lock, so of several concurrent callers exactly one gets
    /// [`Begin::Start`].
    pub fn begin(&self) -> Begin<E> {
        let mut inner = self.lock();
        if inner.retired {
            // Unmounted instances never start new work.
            return Begin::InFlight;
        }
        match &inner.state {
            RenderState::Uncomputed => {
                inner.state = RenderState::Computing;
                Begin::Start(RenderTicket {
                    generation: inner.generation,
                })
            }
            RenderState::Computing => Begin::InFlight,
            RenderState::Ready(markup) => Begin::Ready(markup.clone()),
            RenderState::Failed(err) => Begin::Failed(err.clone()),
        }
    }

    /// Store the result of a render started with [`begin`](Self::begin).
    ///
    /// Returns `false` if the ticket is stale (the slot was invalidated or
    /// retired while the render was in flight); the result is dropped.
    pub fn finish(&self, ticket: RenderTicket, result: Result<TrustedMarkup, E>) -> bool {
        let mut inner = self.lock();
        if inner.retired || inner.generation != ticket.generation {
            return false;
        }
        inner.state = match result {
            Ok(markup) => RenderState::Ready(markup),
            Err(err) => RenderState::Failed(err),
        };
        true
    }

    /// Drop the stored markup so the next mount effect renders again.
    pub fn invalidate(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = RenderState::Uncomputed;
    }

    /// Mark the slot as belonging to an unmounted instance.
    ///
    /// Pending renders will not be stored and no new render can start.
    pub fn retire(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.retired = true;
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> RenderState<E> {
        self.lock().state.clone()
    }

    /// Rendered markup, if ready.
    #[must_use]
    pub fn markup(&self) -> Option<TrustedMarkup> {
        match &self.lock().state {
            RenderState::Ready(markup) => Some(markup.clone()),
            _ => None,
        }
    }

    /// Whether the owning instance was unmounted.
    #[must_use]
    pub fn is_retired(&self) -> bool {
        self.lock().retired
    }
}

impl<E: Clone> Default for RenderSlot<E> {
    fn default() -> Self {
        Self::new()
    }
}
