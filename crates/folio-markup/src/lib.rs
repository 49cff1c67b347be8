//! Shared plumbing for folio's presentational components.
//!
//! Both components in folio (highlighted code blocks and diagrams) follow the
//! same lifecycle: they are mounted with props, compute their markup once in a
//! deferred effect, and expose the result as raw markup for the page. This
//! crate holds the pieces they share:
//!
//! - [`TrustedMarkup`]: engine-generated HTML/SVG that is injected without
//!   re-escaping
//! - [`RenderSlot`]: the per-instance render-once state machine
//! - [`ErrorBoundary`]: turns a component failure into a visible error block
//!
//! # Example
//!
//! ```
//! use folio_markup::{Begin, RenderSlot, TrustedMarkup};
//!
//! let slot: RenderSlot<String> = RenderSlot::new();
//! let Begin::Start(ticket) = slot.begin() else {
//!     unreachable!("fresh slot starts a render");
//! };
//! slot.finish(ticket, Ok(TrustedMarkup::trusted("<b>done</b>")));
//!
//! // Second evaluation returns the stored markup
//! assert!(matches!(slot.begin(), Begin::Ready(m) if m.as_str() == "<b>done</b>"));
//! ```

mod boundary;
mod markup;
mod slot;

pub use boundary::ErrorBoundary;
pub use markup::{TrustedMarkup, escape_html};
pub use slot::{Begin, RenderSlot, RenderState, RenderTicket};
