use crate::error::{Result, ScaError};
use once_cell::sync::Lazy;
use semver::{Version, VersionReq};
use serde_json::Value;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Upstream solc releases bundled at build time, used to decide what to install. Mirrors the
/// teacher's `RELEASES: Lazy<(svm::Releases, Vec<Version>, bool)>`.
static RELEASES: Lazy<(svm::Releases, Vec<Version>)> =
    Lazy::new(|| match serde_json::from_str::<svm::Releases>(svm_builds::RELEASE_LIST_JSON) {
        Ok(releases) => {
            let sorted_versions = releases.clone().into_versions();
            (releases, sorted_versions)
        }
        Err(err) => {
            tracing::error!(%err, "failed to parse bundled solc release list");
            Default::default()
        }
    });

/// A resolved, installed solc binary.
#[derive(Debug, Clone)]
pub struct Solc {
    pub path: PathBuf,
    pub version: Version,
}

impl Solc {
    /// Directory svm installs solc versions under: `~/.svm` if it exists, else the platform
    /// data directory's `svm` subfolder.
    pub fn svm_home() -> Option<PathBuf> {
        if let Some(home_dir) = home::home_dir() {
            let home_dot_svm = home_dir.join(".svm");
            if home_dot_svm.exists() {
                return Some(home_dot_svm);
            }
        }
        dirs::data_dir().map(|dir| dir.join("svm"))
    }

    pub fn installed_versions() -> Vec<Version> {
        let Some(home) = Self::svm_home() else { return Vec::new() };
        let Ok(entries) = std::fs::read_dir(&home) else { return Vec::new() };
        entries
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter_map(|name| Version::parse(&name).ok())
            .collect()
    }

    /// Assuming `versions` need not be sorted, returns the highest version satisfying `required`.
    pub fn find_matching_installation(versions: &[Version], required: &VersionReq) -> Option<Version> {
        let mut sorted: Vec<_> = versions.to_vec();
        sorted.sort();
        sorted.into_iter().rev().find(|v| required.matches(v))
    }

    /// Resolves `required` to an installed version, installing it if a better remote version
    /// exists or nothing local matches. Mirrors `Solc::ensure_installed`.
    pub fn ensure_installed(required: &VersionReq, offline: bool) -> Result<Version> {
        let local = Self::find_matching_installation(&Self::installed_versions(), required);
        let remote = Self::find_matching_installation(&RELEASES.1, required);

        match (local, remote) {
            (Some(local), None) => Ok(local),
            (Some(local), Some(remote)) if remote <= local => Ok(local),
            (_, Some(remote)) => {
                if offline {
                    return Err(ScaError::CompilerUnavailable {
                        requirement: required.to_string(),
                        reason: "offline mode: matching version not installed".into(),
                    });
                }
                Self::blocking_install(&remote)?;
                Ok(remote)
            }
            (None, None) => Err(ScaError::CompilerUnavailable {
                requirement: required.to_string(),
                reason: "no local or remote solc release satisfies this requirement".into(),
            }),
        }
    }

    pub fn locate(version: &Version) -> Result<Self> {
        let home = Self::svm_home().ok_or_else(|| ScaError::CompilerUnavailable {
            requirement: version.to_string(),
            reason: "no svm home directory".into(),
        })?;
        let version_str = version.to_string();
        let path = home.join(&version_str).join(format!("solc-{version_str}"));
        if !path.is_file() {
            return Err(ScaError::CompilerUnavailable {
                requirement: version_str,
                reason: "solc binary not found after installation".into(),
            });
        }
        Ok(Self { path, version: version.clone() })
    }

    fn blocking_install(version: &Version) -> Result<()> {
        tracing::debug!(%version, "installing solc version");
        match block_on(svm::install(version)) {
            Ok(_) => Ok(()),
            Err(err) => Err(ScaError::CompilerUnavailable {
                requirement: version.to_string(),
                reason: err.to_string(),
            }),
        }
    }

    /// Invokes `solc --standard-json`, bounded by `timeout`, and returns the AST for the single
    /// in-memory source unit. Any failure (non-zero exit, malformed JSON, solc-reported errors,
    /// or timeout) is surfaced as a [`ScaError`]; the caller degrades to text-only analysis.
    pub fn compile(&self, content: &str, timeout: Duration) -> Result<Value> {
        let input = serde_json::json!({
            "language": "Solidity",
            "sources": { "input.sol": { "content": content } },
            "settings": { "outputSelection": { "*": { "": ["ast"] } } }
        });

        let stdout = self.run_standard_json(&input, timeout)?;
        let parsed: Value = serde_json::from_slice(&stdout)
            .map_err(|e| ScaError::ParseError(format!("solc produced invalid JSON: {e}")))?;

        if let Some(errors) = parsed.get("errors").and_then(Value::as_array) {
            let blocking: Vec<&str> = errors
                .iter()
                .filter(|e| e.get("severity").and_then(Value::as_str) == Some("error"))
                .filter_map(|e| e.get("formattedMessage").and_then(Value::as_str))
                .collect();
            if !blocking.is_empty() {
                return Err(ScaError::ParseError(blocking.join("\n")));
            }
        }

        parsed
            .get("sources")
            .and_then(|s| s.get("input.sol"))
            .and_then(|s| s.get("ast"))
            .cloned()
            .ok_or_else(|| ScaError::ParseError("solc output is missing an ast node".into()))
    }

    fn run_standard_json(&self, input: &Value, timeout: Duration) -> Result<Vec<u8>> {
        let mut cmd = Command::new(&self.path);
        cmd.arg("--standard-json")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| ScaError::ParseError(format!("failed to spawn solc: {e}")))?;

        let payload = serde_json::to_vec(input)?;
        child
            .stdin
            .take()
            .expect("piped stdin")
            .write_all(&payload)
            .map_err(|e| ScaError::ParseError(format!("failed to write solc stdin: {e}")))?;

        let mut stdout_pipe = child.stdout.take().expect("piped stdout");
        let mut stderr_pipe = child.stderr.take().expect("piped stderr");
        let stdout_handle = std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stdout_pipe.read_to_end(&mut buf);
            buf
        });
        let stderr_handle = std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stderr_pipe.read_to_end(&mut buf);
            buf
        });

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break Some(status),
                Ok(None) => {
                    if start.elapsed() > timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        break None;
                    }
                    std::thread::sleep(Duration::from_millis(25));
                }
                Err(e) => return Err(ScaError::ParseError(format!("failed to poll solc: {e}"))),
            }
        };

        let stdout = stdout_handle.join().unwrap_or_default();
        let stderr = stderr_handle.join().unwrap_or_default();

        match status {
            Some(status) if status.success() => Ok(stdout),
            Some(status) => Err(ScaError::ParseError(format!(
                "solc exited with {status}: {}",
                String::from_utf8_lossy(&stderr)
            ))),
            None => Err(ScaError::CompilerUnavailable {
                requirement: self.version.to_string(),
                reason: "solc invocation timed out".into(),
            }),
        }
    }
}

/// Runs an async future to completion on a throwaway current-thread runtime. This crate is
/// otherwise fully synchronous; a fresh runtime per install keeps `svm::install`'s async HTTP
/// client off of any runtime the embedding application might be running.
fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build a current-thread runtime for solc installation")
        .block_on(fut)
}
