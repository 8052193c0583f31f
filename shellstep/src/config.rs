//! Run configuration loaded from TOML.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Per-invocation run configuration (TOML).
///
/// Constructed once before [`crate::run::run`] is invoked and read-only
/// during execution. Missing fields default to OS-appropriate values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Name of the enclosing build, exported as `SHELLSTEP_BUILD_NAME`.
    pub build_name: String,

    /// Type of the invoking builder, exported as `SHELLSTEP_BUILDER_TYPE`.
    pub builder_type: String,

    /// Script files to execute in order. Mutually exclusive with `inline`.
    pub scripts: Vec<PathBuf>,

    /// Inline statements materialized into a single generated script.
    pub inline: Option<Vec<String>>,

    /// OS identifiers (`std::env::consts::OS`) the run is limited to.
    /// Empty means run everywhere.
    pub only_on: Vec<String>,

    /// Command templates producing the argv used to run each script.
    /// Rendered per script with `vars`, `script`, `command`, and `secret`.
    pub execute_command: Vec<String>,

    /// `KEY=VALUE` environment declarations, rendered in order. Later keys
    /// override earlier ones and the fixed identity variables.
    pub env: Vec<String>,

    /// Pair format applied to each resolved variable; the first `%s` is the
    /// key, the second the value.
    pub env_var_format: String,

    /// Extension appended to the generated inline script file (no dot).
    pub tempfile_extension: Option<String>,

    /// Shebang for generated inline scripts. Empty omits the shebang line.
    pub inline_shebang: String,

    /// Exit codes accepted as script success.
    pub valid_exit_codes: Vec<i32>,

    /// Per-script wall-clock budget in seconds. Absent = wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            build_name: String::new(),
            builder_type: String::new(),
            scripts: Vec::new(),
            inline: None,
            only_on: Vec::new(),
            execute_command: default_execute_command(),
            env: Vec::new(),
            env_var_format: default_env_var_format(),
            tempfile_extension: None,
            inline_shebang: default_inline_shebang(),
            valid_exit_codes: vec![0],
            timeout_secs: None,
        }
    }
}

fn default_execute_command() -> Vec<String> {
    if cfg!(windows) {
        vec![
            "cmd".to_string(),
            "/C".to_string(),
            "{{ vars }}{{ script }}".to_string(),
        ]
    } else {
        vec![
            "/bin/sh".to_string(),
            "-c".to_string(),
            "{{ vars }}{{ script }}".to_string(),
        ]
    }
}

fn default_env_var_format() -> String {
    if cfg!(windows) {
        r#"set "%s=%s" && "#.to_string()
    } else {
        "%s='%s' ".to_string()
    }
}

fn default_inline_shebang() -> String {
    if cfg!(windows) {
        String::new()
    } else {
        "/bin/sh -e".to_string()
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.scripts.is_empty() && self.inline.is_some() {
            return Err(anyhow!("scripts and inline are mutually exclusive"));
        }
        if self.scripts.is_empty() && self.inline.is_none() {
            return Err(anyhow!("one of scripts or inline must be configured"));
        }
        if let Some(statements) = &self.inline
            && statements.is_empty()
        {
            return Err(anyhow!("inline must contain at least one statement"));
        }
        if self.execute_command.is_empty() {
            return Err(anyhow!("execute_command must not be empty"));
        }
        if self.valid_exit_codes.is_empty() {
            return Err(anyhow!("valid_exit_codes must not be empty"));
        }
        if self.timeout_secs == Some(0) {
            return Err(anyhow!("timeout_secs must be > 0"));
        }
        Ok(())
    }

    /// Exit-code acceptance policy: is `code` a successful script exit?
    pub fn accepts_exit_code(&self, code: i32) -> bool {
        self.valid_exit_codes.contains(&code)
    }
}

/// Load and validate a run config from a TOML file.
pub fn load_config(path: &Path) -> Result<RunConfig> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: RunConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline_config() -> RunConfig {
        RunConfig {
            inline: Some(vec!["echo hi".to_string()]),
            ..RunConfig::default()
        }
    }

    #[test]
    fn default_config_has_no_script_source() {
        let err = RunConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("scripts or inline"));
    }

    #[test]
    fn scripts_and_inline_are_mutually_exclusive() {
        let cfg = RunConfig {
            scripts: vec![PathBuf::from("a.sh")],
            ..inline_config()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn empty_inline_list_is_rejected() {
        let cfg = RunConfig {
            inline: Some(Vec::new()),
            ..RunConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("at least one statement"));
    }

    #[test]
    fn empty_execute_command_is_rejected() {
        let cfg = RunConfig {
            execute_command: Vec::new(),
            ..inline_config()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("execute_command"));
    }

    #[test]
    fn empty_valid_exit_codes_is_rejected() {
        let cfg = RunConfig {
            valid_exit_codes: Vec::new(),
            ..inline_config()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn default_policy_accepts_only_zero() {
        let cfg = inline_config();
        assert!(cfg.accepts_exit_code(0));
        assert!(!cfg.accepts_exit_code(1));
    }

    #[test]
    fn load_parses_toml() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("run.toml");
        fs::write(
            &path,
            r#"
inline = ["echo one", "echo two"]
only_on = ["linux", "macos"]
env = ["FOO=bar"]
valid_exit_codes = [0, 2]
"#,
        )
        .expect("write config");

        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.inline.as_deref().map(<[String]>::len), Some(2));
        assert_eq!(cfg.only_on, vec!["linux", "macos"]);
        assert!(cfg.accepts_exit_code(2));
        // defaults fill the rest
        assert!(!cfg.execute_command.is_empty());
        assert!(cfg.env_var_format.contains("%s"));
    }

    #[test]
    fn load_missing_file_errors() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = load_config(&temp.path().join("missing.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("read"));
    }

    #[test]
    fn load_rejects_invalid_config() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("run.toml");
        fs::write(&path, "scripts = [\"a.sh\"]\ninline = [\"echo\"]\n").expect("write config");

        assert!(load_config(&path).is_err());
    }
}
