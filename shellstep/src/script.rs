//! Inline-script materialization and owned temp-file lifetime.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::Builder;
use tracing::{debug, warn};

use crate::render::Renderer;

/// A script path plus ownership of its on-disk file.
///
/// Generated scripts are removed exactly once when the value is dropped;
/// caller-supplied paths are left untouched.
#[derive(Debug)]
pub struct MaterializedScript {
    path: PathBuf,
    owned: bool,
}

impl MaterializedScript {
    /// Wrap a caller-supplied script path. The file is not removed on drop.
    pub fn external(path: PathBuf) -> Self {
        Self { path, owned: false }
    }

    fn owned(path: PathBuf) -> Self {
        Self { path, owned: true }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for MaterializedScript {
    fn drop(&mut self) {
        if !self.owned {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed generated script"),
            Err(err) => {
                warn!(path = %self.path.display(), err = %err, "failed to remove generated script");
            }
        }
    }
}

/// Materialize inline statements into an executable temp file.
///
/// Writes the shebang line (when non-empty), then each statement rendered
/// against the secret-only context, newline-terminated and in input order.
/// Buffered writes are flushed and synced before the file is handed over.
/// Permissions are set to 0700 best-effort; a failure is logged, not fatal.
/// When `extension` is configured the file is renamed to `<name>.<extension>`.
///
/// On a statement render or write failure the partially written temp file is
/// removed by its guard before the error propagates.
pub fn materialize_inline(
    statements: &[String],
    shebang: &str,
    extension: Option<&str>,
    renderer: &Renderer,
    secret: &str,
) -> Result<MaterializedScript> {
    let mut file = Builder::new()
        .prefix("shellstep-inline-")
        .tempfile()
        .context("create inline script file")?;

    {
        let mut writer = BufWriter::new(file.as_file_mut());
        if !shebang.is_empty() {
            debug!(shebang, "prepending inline script shebang");
            writeln!(writer, "#!{shebang}").context("write inline script")?;
        }
        for statement in statements {
            let rendered = renderer.render_with_secret(statement, secret)?;
            writeln!(writer, "{rendered}").context("write inline script")?;
        }
        writer.flush().context("flush inline script")?;
    }
    file.as_file().sync_all().context("sync inline script")?;

    set_executable(file.path());

    let path = file
        .into_temp_path()
        .keep()
        .context("persist inline script")?;
    let mut script = MaterializedScript::owned(path);

    if let Some(extension) = extension {
        let renamed = append_extension(&script.path, extension);
        fs::rename(&script.path, &renamed)
            .with_context(|| format!("rename inline script to {}", renamed.display()))?;
        script.path = renamed;
    }

    Ok(script)
}

#[cfg(unix)]
fn set_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(err) = fs::set_permissions(path, fs::Permissions::from_mode(0o700)) {
        warn!(path = %path.display(), err = %err, "failed to set inline script permissions");
    }
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) {}

fn append_extension(path: &Path, extension: &str) -> PathBuf {
    let mut appended = path.as_os_str().to_os_string();
    appended.push(".");
    appended.push(extension);
    PathBuf::from(appended)
}
