/*!
 * # Editing Core
 *
 * The block model and the navigation machinery that make an ordered list of
 * independently editable blocks behave like one continuous document.
 *
 * ## Architecture
 *
 * ### 1. Explicitly owned block store
 * - A [`Document`] owns the ordered sequence of block ids plus the block
 *   records themselves; there is no ambient global store. Consumers receive
 *   the document through the session they construct.
 * - Block ids are opaque v4 UUIDs, assigned at creation and never reused, so
 *   hosts can key their rendered regions on them across edits.
 * - Invariant: a document never has fewer than one block. Removing the sole
 *   remaining block is a no-op by construction.
 *
 * ### 2. Key events compile to actions
 * - [`EditorSession::on_key_down`] interprets Enter / Backspace / arrows
 *   against the focused block's live geometry and resolves them into model
 *   actions (insert sibling, remove, retype, move focus) — see
 *   [`navigation`].
 * - The resolution is a pure function of the key event, the block record and
 *   the layout, which keeps the decision table testable without a session.
 *
 * ### 3. Two-phase mutations
 * - Phase 1 applies the logical mutation synchronously (content stored, block
 *   inserted, focus moved).
 * - Phase 2 — anything that needs the *new* layout, i.e. caret placement and
 *   trigger-prefix retypes — is parked on a pending-effect queue and runs
 *   when the host calls [`EditorSession::flush_effects`] after its next
 *   render. Restorations are last-write-wins: they target whatever block is
 *   focused at flush time, and a stale target is never an error.
 *
 * ### 4. Focus is a signal, not a block property
 * - Exactly one block id is focused at a time (or none, mid-transition),
 *   held by the session next to the saved caret column that vertical
 *   navigation carries between blocks.
 *
 * ### 5. Persistence is fire-and-forget
 * - Every local mutation is forwarded to the [`BlockRepository`] /
 *   [`ImageRepository`] collaborators. Failures are recorded for the host to
 *   drain and report; the local state stays optimistic and nothing is
 *   retried or rolled back here.
 *
 * [`BlockRepository`]: crate::persist::BlockRepository
 * [`ImageRepository`]: crate::persist::ImageRepository
 */

pub mod block;
pub mod document;
pub mod navigation;
pub mod session;

pub use block::{Block, BlockId, BlockKind, ImageId, ImageRef};
pub use document::{Document, DocumentId, RetypeTrigger};
pub use navigation::{Key, KeyDispatch, KeyEvent};
pub use session::{EditorSession, PendingCaret, SyncFailure, SyncOperation};
