//! postcraft — multi-provider social-media post generation service.
//!
//! Modules, bottom-up:
//! * [`config`] — TOML settings, platform paths, environment overrides.
//! * [`content`] — platforms, post content shapes, request/response bodies.
//! * [`llm`] — providers, failover, prompts and response repair.
//! * [`pipeline`] — fan-out generation, refinement, humanize, scoring.
//! * [`server`] — axum routes over the pipeline.

pub mod config;
pub mod content;
pub mod llm;
pub mod pipeline;
pub mod server;
