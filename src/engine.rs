//! Keypad state machine.
//!
//! The engine turns a stream of [`Key`](crate::Key) presses into an arithmetic
//! expression, hands the finished expression to an [`Evaluator`] and formats
//! the result for display.
//!
//! ## How the parts work together
//!
//! ```text
//! Key ──▶ Session::step (session.rs)
//!           │  implicit AC after an error
//!           ├─ digit / operator / . / +/- / %   (input.rs)
//!           │     edit the trailing token of `Session::tokens`
//!           ├─ ⌫ : render ─ pop one char ─ tokenize   (render.rs, tokenize.rs)
//!           ├─ AC: identity session
//!           └─ = : equals (evaluate.rs)
//!                   - synthesize `last_result op last_operand` on repeat
//!                   - complete a dangling operator
//!                   - capture the trailing op/operand pair
//!                   - normalize tokens to a float-only infix string
//!                   - Evaluator::evaluate (evaluator.rs, evalexpr)
//!                   - round + stringify
//! ```
//!
//! The session stores a token list, never a string. Both the raw expression
//! (`*`, `/`) and the display expression (`×`, `÷`) are rendered from it by
//! `render.rs`, so the two can never drift apart. Locating the "trailing
//! operand" is a lookup on the last token.
//!
//! ## Responsibilities by module
//!
//! - `session.rs`: [`Session`], [`Mode`] and the `step` dispatcher.
//! - `input.rs`: every key except `=`, `AC` and `⌫`.
//! - `evaluate.rs`: `=` handling, percent resolution and rounding.
//! - `evaluator.rs`: the [`Evaluator`] seam and its `evalexpr` implementation.
//! - `tokenize.rs`: raw text to tokens (total over every prefix the engine
//!   can produce).
//! - `render.rs`: tokens to text, plus [`format_with_commas`].
//!
//! ## Debugging
//!
//! Every transition emits a `tracing` debug event under the `keycalc` target.
//! The CLI reads its filter from `KEYCALC_LOG`, e.g. `KEYCALC_LOG=keycalc=debug`.

#[path = "engine/evaluate.rs"]
mod evaluate;
#[path = "engine/evaluator.rs"]
mod evaluator;
#[path = "engine/input.rs"]
mod input;
#[path = "engine/render.rs"]
mod render;
#[path = "engine/session.rs"]
mod session;
#[path = "engine/tokenize.rs"]
mod tokenize;


pub use evaluator::{EvalexprEvaluator, Evaluator};
pub use render::format_with_commas;
pub(crate) use session::Env;
pub use session::{Mode, Session};
