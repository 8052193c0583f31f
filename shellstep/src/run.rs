//! Orchestration for a single local script run.

use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::discovery::{Discovery, current_os};
use crate::env_vars::flatten_env_vars;
use crate::exec::run_command;
use crate::logging::Redactor;
use crate::render::Renderer;
use crate::script::{MaterializedScript, materialize_inline};
use crate::shared_state::SharedStateStore;
use crate::ui::Ui;

/// Shared-state key under which a hosting system may publish a secret for
/// template use, scoped by build name.
const SECRET_KEY: &str = "build_secret";

/// Terminal outcome of a run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The OS gate excluded this runtime; nothing was executed.
    Skipped,
    /// Every configured script ran and passed exit-code validation.
    Completed,
}

/// Execute the configured scripts sequentially.
///
/// Gates on OS applicability first, resolves the script list (materializing
/// inline statements into a single generated script if configured), assembles
/// the flattened environment once, then renders and runs each script in
/// order, validating its exit code against the acceptance policy. The first
/// failure aborts the remaining sequence. A generated script is removed on
/// every exit path, success or failure.
pub fn run<U: Ui, S: SharedStateStore>(
    config: &RunConfig,
    ui: &U,
    store: &S,
    redactor: &Redactor,
) -> Result<RunOutcome> {
    config.validate()?;

    if !config.only_on.is_empty() && !config.only_on.iter().any(|os| os == current_os()) {
        ui.say(&format!(
            "Skipping local script run due to runtime OS {}",
            current_os()
        ));
        info!(os = current_os(), "skipping run, OS not in allow-list");
        return Ok(RunOutcome::Skipped);
    }

    let renderer = Renderer::new();
    let secret = retrieve_secret(store, &config.build_name, redactor);

    // The vec owns any generated script, so it is removed when this function
    // returns, whichever path it takes.
    let scripts: Vec<MaterializedScript> = if !config.scripts.is_empty() {
        config
            .scripts
            .iter()
            .cloned()
            .map(MaterializedScript::external)
            .collect()
    } else {
        let statements = config.inline.as_deref().unwrap_or_default();
        vec![materialize_inline(
            statements,
            &config.inline_shebang,
            config.tempfile_extension.as_deref(),
            &renderer,
            &secret,
        )?]
    };

    let discovery = Discovery::from_store(store);
    let vars = flatten_env_vars(config, &discovery, &renderer, &secret)?;
    let timeout = config.timeout_secs.map(Duration::from_secs);

    for script in &scripts {
        let path = script.path();
        let argv: Vec<String> = config
            .execute_command
            .iter()
            .map(|template| renderer.render_command(template, &vars, path, &secret))
            .collect::<Result<_>>()?;

        ui.say(&format!("Running local script: {}", path.display()));
        let status = run_command(&argv, timeout, ui).with_context(|| {
            format!(
                "executing script {} failed; see output above",
                path.display()
            )
        })?;

        let code = status.code().ok_or_else(|| {
            anyhow!(
                "script {} terminated without an exit code",
                path.display()
            )
        })?;
        if !config.accepts_exit_code(code) {
            bail!(
                "script {} exited with unacceptable code {code} (allowed: {:?})",
                path.display(),
                config.valid_exit_codes
            );
        }
        debug!(script = %path.display(), exit_code = code, "script accepted");
    }

    Ok(RunOutcome::Completed)
}

/// Fetch the run secret, treating retrieval failure as "no secret available".
///
/// A non-empty value is registered with the redactor before any use, so it
/// never appears verbatim in run output.
fn retrieve_secret<S: SharedStateStore>(
    store: &S,
    build_name: &str,
    redactor: &Redactor,
) -> String {
    let secret = store.retrieve(SECRET_KEY, build_name).unwrap_or_default();
    redactor.register(&secret);
    secret
}
