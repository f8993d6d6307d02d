use anyhow::Result;
use tokio::sync::mpsc::UnboundedSender;

/// Version check and install handoff. The core only promises that all
/// timers are cancelled and the terminal is restored before `install`
/// runs; everything past that point belongs here.

/// Probes the registry in the background and reports a newer version over
/// the channel. Fire-and-forget: failures and up-to-date results are
/// silent.
pub fn spawn_check(tx: UnboundedSender<String>) {
    tokio::spawn(async move {
        if let Some(latest) = latest_version().await {
            if is_newer(&latest, env!("CARGO_PKG_VERSION")) {
                let _ = tx.send(latest);
            }
        }
    });
}

async fn latest_version() -> Option<String> {
    let output = tokio::process::Command::new("cargo")
        .args(["search", env!("CARGO_PKG_NAME"), "--limit", "1"])
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }
    parse_search_output(&String::from_utf8_lossy(&output.stdout))
}

/// Pulls the version out of a `cargo search` line such as
/// `scry = "0.2.0"    # some description`.
fn parse_search_output(output: &str) -> Option<String> {
    let needle = concat!(env!("CARGO_PKG_NAME"), " = \"");
    let line = output.lines().find(|line| line.starts_with(needle))?;
    let rest = &line[needle.len()..];
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

fn parse_triple(version: &str) -> Option<(u64, u64, u64)> {
    let mut parts = version.split('.').map(|part| part.parse::<u64>());
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(major)), Some(Ok(minor)), Some(Ok(patch))) => Some((major, minor, patch)),
        _ => None,
    }
}

fn is_newer(candidate: &str, current: &str) -> bool {
    match (parse_triple(candidate), parse_triple(current)) {
        (Some(candidate), Some(current)) => candidate > current,
        _ => false,
    }
}

/// Installs the newer build and relaunches it with the active theme. The
/// caller has already torn the UI down; this owns the terminal until the
/// relaunched process exits.
pub fn install(theme: &str) -> Result<()> {
    let status = std::process::Command::new("cargo")
        .args(["install", "--force", env!("CARGO_PKG_NAME")])
        .status()?;
    if !status.success() {
        anyhow::bail!("cargo install exited with {}", status);
    }
    std::process::Command::new(env!("CARGO_PKG_NAME"))
        .args(["--theme", theme])
        .status()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_output() {
        let output = "scry = \"0.2.0\"    # A terminal-resident activity monitor\n";
        assert_eq!(parse_search_output(output), Some("0.2.0".to_string()));
        assert_eq!(parse_search_output("nothing here"), None);
    }

    #[test]
    fn test_is_newer() {
        assert!(is_newer("0.2.0", "0.1.0"));
        assert!(is_newer("1.0.0", "0.9.9"));
        assert!(!is_newer("0.1.0", "0.1.0"));
        assert!(!is_newer("0.1.0", "0.2.0"));
        assert!(!is_newer("not-a-version", "0.1.0"));
    }
}
