//! Child-process execution with live output relay.

use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, warn};
use wait_timeout::ChildExt;

use crate::ui::Ui;

/// Spawn the rendered command and relay its output to the UI sink until exit.
///
/// `argv[0]` is the program, the remaining entries its arguments. stdout and
/// stderr are forwarded to the sink line by line as the child runs; nothing
/// is buffered beyond the current line. Blocks until the child terminates,
/// or kills it when `timeout` expires.
pub fn run_command<U: Ui>(
    argv: &[String],
    timeout: Option<Duration>,
    ui: &U,
) -> Result<ExitStatus> {
    let (program, args) = argv.split_first().ok_or_else(|| anyhow!("empty command"))?;

    debug!(command = %argv.join(" "), "starting local command");
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawn {program}"))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;

    let status = thread::scope(|scope| -> Result<ExitStatus> {
        let stdout_handle = scope.spawn(move || relay_lines(stdout, ui));
        let stderr_handle = scope.spawn(move || relay_lines(stderr, ui));

        let status = wait_child(&mut child, timeout)?;

        join_relay(stdout_handle).context("relay stdout")?;
        join_relay(stderr_handle).context("relay stderr")?;
        Ok(status)
    })?;

    debug!(exit_code = ?status.code(), "command finished");
    Ok(status)
}

fn wait_child(child: &mut Child, timeout: Option<Duration>) -> Result<ExitStatus> {
    let Some(timeout) = timeout else {
        return child.wait().context("wait for command");
    };
    match child.wait_timeout(timeout).context("wait for command")? {
        Some(status) => Ok(status),
        None => {
            warn!(
                timeout_secs = timeout.as_secs(),
                "command timed out, killing"
            );
            child.kill().context("kill command")?;
            child.wait().context("wait command after kill")?;
            bail!("command timed out after {}s", timeout.as_secs());
        }
    }
}

fn relay_lines<R: Read, U: Ui>(reader: R, ui: &U) -> Result<()> {
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    loop {
        line.clear();
        let read = reader.read_until(b'\n', &mut line).context("read output")?;
        if read == 0 {
            return Ok(());
        }
        let text = String::from_utf8_lossy(&line);
        ui.output(text.trim_end_matches(['\r', '\n']));
    }
}

fn join_relay(handle: thread::ScopedJoinHandle<'_, Result<()>>) -> Result<()> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output relay thread panicked")),
    }
}
