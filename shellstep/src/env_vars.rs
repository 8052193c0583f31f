//! Deterministic flattened environment-variable block assembly.

use std::collections::BTreeMap;

use anyhow::{Result, anyhow};

use crate::config::RunConfig;
use crate::discovery::Discovery;
use crate::render::Renderer;

/// Build the flattened environment block prepended to script invocations.
///
/// Seeds the map with the fixed identity variables and any discovered HTTP
/// endpoint values, then renders each user declaration in order, splitting on
/// the first `=`. Later declarations override earlier keys. Iteration over
/// the sorted map makes the output byte-identical for identical inputs.
pub fn flatten_env_vars(
    config: &RunConfig,
    discovery: &Discovery,
    renderer: &Renderer,
    secret: &str,
) -> Result<String> {
    let mut vars: BTreeMap<String, String> = BTreeMap::new();
    vars.insert("SHELLSTEP_BUILD_NAME".to_string(), config.build_name.clone());
    vars.insert(
        "SHELLSTEP_BUILDER_TYPE".to_string(),
        config.builder_type.clone(),
    );

    if let Some(addr) = &discovery.http_addr {
        vars.insert("SHELLSTEP_HTTP_ADDR".to_string(), addr.clone());
    }
    if let Some(ip) = &discovery.http_ip {
        vars.insert("SHELLSTEP_HTTP_IP".to_string(), ip.clone());
    }
    if let Some(port) = &discovery.http_port {
        vars.insert("SHELLSTEP_HTTP_PORT".to_string(), port.clone());
    }

    for declaration in &config.env {
        let rendered = renderer.render_with_secret(declaration, secret)?;
        let (key, value) = rendered
            .split_once('=')
            .ok_or_else(|| anyhow!("environment variable {rendered:?} must be KEY=VALUE"))?;
        vars.insert(key.to_string(), shell_single_quote(value));
    }

    let mut flattened = String::new();
    for (key, value) in &vars {
        flattened.push_str(&format_pair(&config.env_var_format, key, value));
    }
    Ok(flattened)
}

/// Escape single quotes so the value survives single-quoted shell embedding.
fn shell_single_quote(value: &str) -> String {
    value.replace('\'', r#"'"'"'"#)
}

/// Substitute `key` and `value` for the first two `%s` in `format`.
fn format_pair(format: &str, key: &str, value: &str) -> String {
    let mut formatted = String::with_capacity(format.len() + key.len() + value.len());
    let mut remaining = format;
    for substitution in [key, value] {
        match remaining.split_once("%s") {
            Some((head, tail)) => {
                formatted.push_str(head);
                formatted.push_str(substitution);
                remaining = tail;
            }
            None => break,
        }
    }
    formatted.push_str(remaining);
    formatted
}
