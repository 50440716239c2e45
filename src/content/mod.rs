//! Domain types for social-media content generation.
//!
//! * [`Platform`] — target network parsed from the request's free-text field.
//! * [`GenerationRequest`] / [`RefineRequest`] / [`HumanizeRequest`] — inbound
//!   requests.
//! * [`Content`] — one post, shaped by its platform (plain text, Instagram
//!   caption + script, or an X thread).
//! * [`Version`] / [`MultiVersionResponse`] — accepted generation results.

pub mod model;
pub mod platform;
pub mod request;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use model::{
    AnalysisScores, Content, InstagramContent, MultiVersionResponse, ShapeError, Version, XThread,
};
pub use platform::Platform;
pub use request::{GenerationRequest, HumanizeRequest, HumanizeResponse, RefineRequest};
