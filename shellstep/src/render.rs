//! Template rendering for inline statements, env declarations, and commands.
//!
//! A thin wrapper over minijinja with strict undefined behavior: referencing
//! a variable the context does not expose fails the render instead of
//! silently producing empty output. Each call constructs its own immutable
//! context value; nothing is shared or mutated between renders.

use std::path::Path;

use anyhow::{Context, Result};
use minijinja::{Environment, UndefinedBehavior, context};

pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env }
    }

    /// Render an inline statement or `KEY=VALUE` declaration.
    ///
    /// The context exposes only `secret`.
    pub fn render_with_secret(&self, source: &str, secret: &str) -> Result<String> {
        self.env
            .render_str(source, context! { secret => secret })
            .with_context(|| format!("render {source:?}"))
    }

    /// Render one execute-command template for a script invocation.
    ///
    /// The context exposes the flattened env block as `vars`, the script path
    /// as both `script` and `command`, and `secret`.
    pub fn render_command(
        &self,
        source: &str,
        vars: &str,
        script: &Path,
        secret: &str,
    ) -> Result<String> {
        let script = script.display().to_string();
        self.env
            .render_str(
                source,
                context! {
                    vars => vars,
                    script => &script,
                    command => &script,
                    secret => secret,
                },
            )
            .with_context(|| format!("process command template {source:?}"))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
