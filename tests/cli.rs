use assert_cmd::Command;
use predicates::prelude::*;

fn watchdog() -> Command {
    let mut cmd = Command::cargo_bin("ark-watchdog").unwrap();
    cmd.env_remove("ARK_WATCHDOG_CONTAINER")
        .env_remove("ARK_WATCHDOG_INTERVAL")
        .env_remove("ARK_WATCHDOG_DOCKER")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_exits_zero() {
    watchdog()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("[TARGET]"));
}

#[test]
fn non_numeric_interval_is_rejected() {
    watchdog()
        .args(["asa-server-1", "often"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn zero_interval_is_rejected_before_polling() {
    watchdog()
        .args(["asa-server-1", "0", "--docker-bin", "/nonexistent/docker"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Poll interval must be at least 1 second"));
}

#[test]
fn unreachable_docker_binary_fails() {
    watchdog()
        .args(["asa-server-1", "--docker-bin", "/nonexistent/docker"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[ERROR]"));
}

#[cfg(unix)]
mod fake_docker {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use std::process::Stdio;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    const HEALTHY_DOCKER: &str = r#"case "$1" in
  inspect)
    case "$*" in
      *--format*) echo "abc123" ;;
      *) echo '[{"State":{"Status":"running","ExitCode":0,"Health":{"Status":"healthy","Log":[]}}}]' ;;
    esac ;;
  *) exit 1 ;;
esac"#;

    fn write_script(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("docker");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn missing_container_exits_before_loop() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("calls.log");
        let docker = write_script(
            &dir,
            &format!(
                "echo \"$@\" >> {}\necho \"Error: No such container: $2\" >&2\nexit 1",
                log.display()
            ),
        );

        watchdog()
            .args(["asa-missing", "30", "--docker-bin"])
            .arg(&docker)
            .assert()
            .failure()
            .stdout(predicate::str::contains("Container 'asa-missing' does not exist"));

        let calls = fs::read_to_string(&log).unwrap();
        assert!(!calls.contains("restart"));
    }

    #[test]
    fn once_reports_healthy_container() {
        let dir = TempDir::new().unwrap();
        let docker = write_script(&dir, HEALTHY_DOCKER);

        watchdog()
            .args(["asa-server-1", "30", "--once", "--docker-bin"])
            .arg(&docker)
            .assert()
            .success()
            .stdout(predicate::str::contains("[INFO] Server is running"))
            .stdout(predicate::str::contains("state=running_healthy"));
    }

    #[test]
    fn once_restarts_crashed_container() {
        let dir = TempDir::new().unwrap();
        let state = dir.path().join("state");
        fs::write(&state, "exited").unwrap();
        let docker = write_script(
            &dir,
            &format!(
                r#"case "$1" in
  inspect)
    case "$*" in
      *--format*) echo "abc123" ;;
      *) echo "[{{\"State\":{{\"Status\":\"$(cat {state})\",\"ExitCode\":1}}}}]" ;;
    esac ;;
  exec) exit 0 ;;
  restart) echo running > {state} ;;
esac"#,
                state = state.display()
            ),
        );

        watchdog()
            .args(["asa-server-1", "30", "--once", "--settle-delay", "0", "--docker-bin"])
            .arg(&docker)
            .assert()
            .success()
            .stdout(predicate::str::contains("Server crash detected"))
            .stdout(predicate::str::contains("Server is running again"));

        assert_eq!(fs::read_to_string(&state).unwrap().trim(), "running");
    }

    #[test]
    fn sigterm_stops_loop_with_status_zero() {
        let dir = TempDir::new().unwrap();
        let docker = write_script(&dir, HEALTHY_DOCKER);

        let child = std::process::Command::new(env!("CARGO_BIN_EXE_ark-watchdog"))
            .args(["asa-server-1", "30", "--docker-bin"])
            .arg(&docker)
            .env_remove("ARK_WATCHDOG_CONTAINER")
            .env_remove("ARK_WATCHDOG_INTERVAL")
            .env_remove("ARK_WATCHDOG_DOCKER")
            .env_remove("RUST_LOG")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();

        std::thread::sleep(Duration::from_millis(1500));
        let status = std::process::Command::new("kill")
            .args(["-TERM", &child.id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let signalled = Instant::now();
        let output = child.wait_with_output().unwrap();
        assert!(signalled.elapsed() < Duration::from_secs(10));
        assert!(output.status.success());

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Server is running"));
        assert!(stdout.contains("Shutdown requested, watchdog stopped"));
    }

    #[test]
    fn crash_loop_exits_non_zero_and_reports_once() {
        let dir = TempDir::new().unwrap();
        let docker = write_script(
            &dir,
            r#"case "$1" in
  inspect)
    case "$*" in
      *--format*) echo "abc123" ;;
      *) echo '[{"State":{"Status":"exited","ExitCode":1}}]' ;;
    esac ;;
  *) exit 0 ;;
esac"#,
        );

        let output = watchdog()
            .args([
                "asa-server-1",
                "1",
                "--startup-timeout",
                "1",
                "--settle-delay",
                "0",
                "--docker-bin",
            ])
            .arg(&docker)
            .timeout(Duration::from_secs(60))
            .output()
            .unwrap();

        assert!(!output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert_eq!(stdout.matches("Attempting restart").count(), 3);
        assert_eq!(stdout.matches("Restart limit reached").count(), 1);
    }
}
