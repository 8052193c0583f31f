//! Local shell-script step runner.
//!
//! Executes a configured sequence of shell scripts — literal paths or a
//! single script generated from inline statements — with a template-rendered
//! environment block and execute command, streaming child output live to a
//! UI sink and validating exit codes against an acceptance policy.
//!
//! The orchestration entry point is [`run::run`]. Everything it consumes
//! (UI sink, shared-state store, secret redactor) is injected, so hosting
//! systems and tests substitute their own implementations.

pub mod config;
pub mod discovery;
pub mod env_vars;
pub mod exec;
pub mod exit_codes;
pub mod logging;
pub mod render;
pub mod run;
pub mod script;
pub mod shared_state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod ui;
