use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The `[remote]` block from config.toml: where the brain analysis service
/// lives and how to authenticate against it.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_key_command: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Top-level cti config file structure. Everything is optional: with no
/// config file at all, every analysis runs on the local ruleset.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct CtiConfig {
    pub remote: Option<RemoteConfig>,
}

impl CtiConfig {
    /// Load config from `override_path` if given (CLI `--config` /
    /// `CTI_CONFIG`), else from ~/.cti/config.toml. A missing default file
    /// yields the defaults; a missing explicit file is an error.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let path = effective_config_path(override_path)?;
        if !path.exists() {
            if override_path.is_some() {
                bail!("Config file not found: {}", path.display());
            }
            return Ok(CtiConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: CtiConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Clone with the api_key replaced by its redacted form, for JSON
    /// output paths that would otherwise leak the secret.
    pub fn redacted(&self) -> CtiConfig {
        let mut shown = self.clone();
        if let Some(ref mut remote) = shown.remote {
            if let Some(ref mut key) = remote.api_key {
                *key = redact(key);
            }
        }
        shown
    }

    /// Display config with secrets redacted.
    pub fn display_redacted(&self) -> String {
        let mut lines = Vec::new();
        if let Some(ref remote) = self.remote {
            lines.push("[remote]".to_string());
            lines.push(format!("  base_url = \"{}\"", remote.base_url));
            if let Some(ref key) = remote.api_key {
                lines.push(format!("  api_key = \"{}\"", redact(key)));
            }
            if let Some(ref cmd) = remote.api_key_command {
                lines.push(format!("  api_key_command = \"{}\"", cmd));
            }
            if let Some(secs) = remote.timeout_secs {
                lines.push(format!("  timeout_secs = {}", secs));
            }
        }
        if lines.is_empty() {
            lines.push("(no remote configured; analysis runs locally)".to_string());
        }
        lines.join("\n")
    }
}

fn redact(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}

/// Resolve the brain-service credential through the chain:
/// CLI flag > env var > config key > config command.
pub fn resolve_credential(
    cli_flag: Option<&str>,
    env_var_name: &str,
    config: Option<&RemoteConfig>,
) -> Result<String> {
    // 1. CLI flag
    if let Some(key) = cli_flag {
        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }

    // 2. Environment variable
    if let Ok(val) = std::env::var(env_var_name) {
        if !val.is_empty() {
            return Ok(val);
        }
    }

    if let Some(rc) = config {
        // 3. Config file api_key
        if let Some(ref key) = rc.api_key {
            if !key.is_empty() {
                return Ok(key.clone());
            }
        }

        // 4. External command
        if let Some(ref cmd) = rc.api_key_command {
            if !cmd.is_empty() {
                let output = std::process::Command::new("sh")
                    .arg("-c")
                    .arg(cmd)
                    .output()
                    .with_context(|| format!("Failed to run api_key_command: {cmd}"))?;

                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    bail!(
                        "api_key_command failed (exit {}): {}",
                        output.status.code().unwrap_or(-1),
                        stderr.trim()
                    );
                }

                let secret = String::from_utf8(output.stdout)
                    .context("api_key_command output is not valid UTF-8")?
                    .trim()
                    .to_string();

                if !secret.is_empty() {
                    return Ok(secret);
                }
            }
        }
    }

    bail!(
        "No API key found. Provide via --api-key, {} env var, or ~/.cti/config.toml",
        env_var_name
    );
}

/// Path to the config file: ~/.cti/config.toml
pub fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".cti").join("config.toml"))
}

/// The config file in effect: the explicit override when given, else the
/// default location. `config path` and `info` report this, so their
/// output matches what `load` actually read.
pub fn effective_config_path(override_path: Option<&Path>) -> Result<PathBuf> {
    match override_path {
        Some(p) => Ok(p.to_path_buf()),
        None => config_path(),
    }
}

/// Default config template content.
pub fn default_config_template() -> &'static str {
    r#"# ~/.cti/config.toml
# Credential resolution order: CLI flag > env var > api_key > api_key_command
# Without a [remote] section, every analysis runs on the local ruleset.

# [remote]
# base_url = "http://localhost:5005"
# api_key = "your-brain-service-api-key"
# api_key_command = "your-secrets-manager-command-here"
# timeout_secs = 10
"#
}

/// Create the default config file if it doesn't already exist.
pub fn init_config() -> Result<bool> {
    let path = config_path()?;
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, default_config_template())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn full_remote_section_parses() {
        let cfg: CtiConfig = toml::from_str(
            r#"
            [remote]
            base_url = "http://brain.internal:5005"
            api_key = "secret-key-1234"
            timeout_secs = 5
            "#,
        )
        .unwrap();
        let remote = cfg.remote.unwrap();
        assert_eq!(remote.base_url, "http://brain.internal:5005");
        assert_eq!(remote.api_key.as_deref(), Some("secret-key-1234"));
        assert_eq!(remote.timeout_secs, Some(5));
        assert!(remote.api_key_command.is_none());
    }

    #[test]
    fn empty_config_means_local_only() {
        let cfg: CtiConfig = toml::from_str("").unwrap();
        assert!(cfg.remote.is_none());
    }

    #[test]
    fn default_template_parses_to_defaults() {
        let cfg: CtiConfig = toml::from_str(default_config_template()).unwrap();
        assert!(cfg.remote.is_none());
    }

    #[test]
    fn load_reads_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[remote]\nbase_url = \"http://localhost:5005\"").unwrap();
        let cfg = CtiConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.remote.unwrap().base_url, "http://localhost:5005");
    }

    #[test]
    fn load_rejects_missing_explicit_path() {
        let err = CtiConfig::load(Some(Path::new("/nonexistent/cti-config.toml"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn cli_flag_wins_over_config_key() {
        let rc = RemoteConfig {
            base_url: "http://localhost:5005".to_string(),
            api_key: Some("from-config".to_string()),
            api_key_command: None,
            timeout_secs: None,
        };
        let key = resolve_credential(Some("from-flag"), "CTI_TEST_KEY_UNSET", Some(&rc)).unwrap();
        assert_eq!(key, "from-flag");
    }

    #[test]
    fn config_key_used_when_flag_absent() {
        let rc = RemoteConfig {
            base_url: "http://localhost:5005".to_string(),
            api_key: Some("from-config".to_string()),
            api_key_command: None,
            timeout_secs: None,
        };
        let key = resolve_credential(None, "CTI_TEST_KEY_UNSET", Some(&rc)).unwrap();
        assert_eq!(key, "from-config");
    }

    #[test]
    fn command_output_is_trimmed() {
        let rc = RemoteConfig {
            base_url: "http://localhost:5005".to_string(),
            api_key: None,
            api_key_command: Some("printf '  cmd-secret \\n'".to_string()),
            timeout_secs: None,
        };
        let key = resolve_credential(None, "CTI_TEST_KEY_UNSET", Some(&rc)).unwrap();
        assert_eq!(key, "cmd-secret");
    }

    #[test]
    fn missing_credential_everywhere_is_an_error() {
        let rc = RemoteConfig {
            base_url: "http://localhost:5005".to_string(),
            api_key: None,
            api_key_command: None,
            timeout_secs: None,
        };
        let err = resolve_credential(None, "CTI_TEST_KEY_UNSET", Some(&rc)).unwrap_err();
        assert!(err.to_string().contains("No API key"));
    }

    #[test]
    fn redaction_keeps_edges_of_long_keys() {
        assert_eq!(redact("abcd1234efgh"), "abcd...efgh");
        assert_eq!(redact("short"), "****");
    }

    #[test]
    fn redaction_counts_chars_not_bytes() {
        assert_eq!(redact("aééé-clé-x"), "aééé...lé-x");
        assert_eq!(redact("clé-éé"), "****");
    }

    #[test]
    fn explicit_path_is_the_effective_config_path() {
        let effective = effective_config_path(Some(Path::new("/tmp/cti-alt.toml"))).unwrap();
        assert_eq!(effective, Path::new("/tmp/cti-alt.toml"));

        let default = effective_config_path(None).unwrap();
        assert!(default.ends_with(".cti/config.toml"));
    }

    #[test]
    fn redacted_clone_masks_the_key() {
        let cfg = CtiConfig {
            remote: Some(RemoteConfig {
                base_url: "http://localhost:5005".to_string(),
                api_key: Some("abcd1234efgh".to_string()),
                api_key_command: None,
                timeout_secs: None,
            }),
        };
        let shown = cfg.redacted();
        assert_eq!(shown.remote.unwrap().api_key.as_deref(), Some("abcd...efgh"));
        // original untouched
        assert_eq!(cfg.remote.unwrap().api_key.as_deref(), Some("abcd1234efgh"));
    }
}
