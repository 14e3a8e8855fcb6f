//! Command construction for the injection sequence
//!
//! The shapes built here are part of the external contract with the
//! in-machine agent and with test harnesses that assert on them; change them
//! only together with the agent.

use atelier_config::BootstrapConfig;
use atelier_types::RuntimeIdentity;

fn owned(parts: &[&str]) -> Vec<String> {
    parts.iter().map(ToString::to_string).collect()
}

/// `mkdir -p <bootstrap-dir>` - idempotent staging of the working directory.
#[must_use]
pub fn stage(dir: &str) -> Vec<String> {
    owned(&["mkdir", "-p", dir])
}

/// `curl -o <bootstrap-dir>/bootstrapper <binary-url>`
#[must_use]
pub fn fetch(dir: &str, binary_url: &str) -> Vec<String> {
    owned(&["curl", "-o", &format!("{dir}/bootstrapper"), binary_url])
}

/// `chmod +x <bootstrap-dir>/bootstrapper`
#[must_use]
pub fn mark_executable(dir: &str) -> Vec<String> {
    owned(&["chmod", "+x", &format!("{dir}/bootstrapper")])
}

/// Write the installer manifest via a here-doc, so no extra file-transfer
/// channel is needed: the manifest rides inside the command line itself.
#[must_use]
pub fn configure(dir: &str, installer_manifest_json: &str) -> Vec<String> {
    owned(&[
        "sh",
        "-c",
        &format!("cat > {dir}/config.json << 'EOF'\n{installer_manifest_json}\nEOF"),
    ])
}

/// Launch the bootstrap binary detached: output redirected into the machine,
/// process backgrounded, exec channel released immediately. The agent
/// reports back over the event channel, authenticated with the same runtime
/// identity used to subscribe.
#[must_use]
pub fn launch(
    dir: &str,
    machine_name: &str,
    identity: &RuntimeIdentity,
    config: &BootstrapConfig,
) -> Vec<String> {
    let line = format!(
        "{dir}/bootstrapper -machine-name {machine_name} -runtime-id {identity} \
-push-endpoint {push} -push-logs-endpoint {push_logs} -server-check-period {period} \
-enable-auth -installer-timeout {timeout} -file {dir}/config.json \
> {dir}/bootstrapper.log 2>&1 &",
        push = config.push_endpoint,
        push_logs = config.push_logs_endpoint,
        period = config.server_check_period_sec,
        timeout = config.installer_timeout_sec,
    );
    owned(&["sh", "-c", &line])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BootstrapConfig {
        BootstrapConfig {
            binary_url: "https://assets/bootstrapper".into(),
            bootstrap_dir: "/tmp/bootstrapper".into(),
            bootstrapping_timeout_min: 10,
            installer_timeout_sec: 120,
            server_check_period_sec: 3,
            push_endpoint: "wss://api/connect".into(),
            push_logs_endpoint: "wss://api/connect/logs".into(),
        }
    }

    #[test]
    fn stage_and_fetch_shapes() {
        assert_eq!(stage("/tmp/bootstrapper"), ["mkdir", "-p", "/tmp/bootstrapper"]);
        assert_eq!(
            fetch("/tmp/bootstrapper", "https://assets/bootstrapper"),
            [
                "curl",
                "-o",
                "/tmp/bootstrapper/bootstrapper",
                "https://assets/bootstrapper"
            ]
        );
        assert_eq!(
            mark_executable("/tmp/bootstrapper"),
            ["chmod", "+x", "/tmp/bootstrapper/bootstrapper"]
        );
    }

    #[test]
    fn configure_embeds_manifest_in_heredoc() {
        let cmd = configure("/tmp/bootstrapper", r#"[{"id":"a"}]"#);
        assert_eq!(cmd[0], "sh");
        assert_eq!(cmd[1], "-c");
        assert_eq!(
            cmd[2],
            "cat > /tmp/bootstrapper/config.json << 'EOF'\n[{\"id\":\"a\"}]\nEOF"
        );
    }

    #[test]
    fn launch_line_is_byte_exact() {
        let identity = RuntimeIdentity::new("ws1", "default", "owner1");
        let cmd = launch("/tmp/bootstrapper", "dev", &identity, &config());
        assert_eq!(cmd[0], "sh");
        assert_eq!(cmd[1], "-c");
        assert_eq!(
            cmd[2],
            "/tmp/bootstrapper/bootstrapper -machine-name dev -runtime-id ws1:default:owner1 \
-push-endpoint wss://api/connect -push-logs-endpoint wss://api/connect/logs \
-server-check-period 3 -enable-auth -installer-timeout 120 \
-file /tmp/bootstrapper/config.json > /tmp/bootstrapper/bootstrapper.log 2>&1 &"
        );
    }
}
