//! End-to-end orchestrator tests.
//!
//! These run setup/status/bypass/start against a temporary base directory,
//! a stub sandbox runner and either a stub or the real `tar`.

mod helpers;

use helpers::{
    activation_blocks, assert_file_contains, assert_file_exists, assert_missing, StubRunner,
    TestEnv,
};
use openclawd::bootstrap::{Bootstrap, SetupOptions};
use openclawd::errors::{BootstrapError, PreconditionError, ProvisionError};
use openclawd::gateway::LaunchMode;
use openclawd::patch::shim;
use openclawd::runner::HostRunner;
use openclawd::status::Stage;
use std::fs;

#[test]
fn test_setup_from_empty_base_reaches_complete() {
    let env = TestEnv::new();
    let archive = env.rootfs_archive();
    let bootstrap = Bootstrap::new(env.layout(), StubRunner::with_everything());

    let outcome = bootstrap
        .setup(&SetupOptions {
            archive: Some(archive.clone()),
            install_gateway: false,
        })
        .unwrap();

    assert_eq!(outcome.initial.stage(), Stage::Unprovisioned);
    assert!(outcome.extracted);
    assert_missing(&archive);
    assert_eq!(outcome.activated.len(), 2);

    let status = bootstrap.status();
    let report = &status.readiness;
    assert!(report.complete());
    assert!(report.rootfs_present());
    assert!(report.compatibility_shim_present());
    assert!(report.runtime_present());
    assert!(report.gateway_binary_present());
    assert_eq!(status.stage, Stage::Complete);

    let layout = env.layout();
    for profile in layout.profile_candidates() {
        assert_eq!(activation_blocks(&profile), 1, "{}", profile.display());
        assert_file_contains(
            &profile,
            "export NODE_OPTIONS=\"--require /root/.openclawd/bionic-bypass.js\"",
        );
    }
    assert_eq!(
        fs::read_to_string(layout.shim_path()).unwrap(),
        shim::render()
    );
    assert_eq!(
        fs::read_to_string(layout.resolv_conf()).unwrap(),
        "nameserver 8.8.8.8\nnameserver 8.8.4.4\n"
    );
    for dir in layout.directories() {
        assert!(dir.is_dir(), "{} missing", dir.display());
    }
    assert_file_exists(&layout.wakelock_script());
}

#[test]
fn test_setup_is_idempotent() {
    let env = TestEnv::new();
    let archive = env.rootfs_archive();
    let bootstrap = Bootstrap::new(env.layout(), StubRunner::with_everything());
    let options = SetupOptions {
        archive: Some(archive),
        install_gateway: false,
    };

    bootstrap.setup(&options).unwrap();
    let layout = env.layout();
    let bashrc = layout.guest_home().join(".bashrc");
    let after_first = fs::read(&bashrc).unwrap();

    let second = bootstrap.setup(&options).unwrap();
    assert!(!second.extracted);
    assert!(second.activated.is_empty());
    assert!(second.report.complete());
    assert_eq!(fs::read(&bashrc).unwrap(), after_first);
    assert_eq!(activation_blocks(&bashrc), 1);
}

#[test]
fn test_setup_without_archive_on_empty_base() {
    let env = TestEnv::new();
    let bootstrap = Bootstrap::new(env.layout(), StubRunner::new());

    let err = bootstrap.setup(&SetupOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        BootstrapError::Precondition(PreconditionError::ArchiveRequired { .. })
    ));
    assert_missing(&env.layout().shim_path());
}

#[test]
fn test_setup_aborts_on_extraction_failure() {
    let env = TestEnv::new();
    let tool = env.stub_archive_tool(
        "tar-disk-full.sh",
        "case \"$1\" in -tzf) exit 0 ;; esac\necho \"disk full\" >&2\nexit 2\n",
    );
    let archive = env.dummy_archive();
    let bootstrap = Bootstrap::new(env.layout(), StubRunner::new()).with_archive_tool(tool);

    let err = bootstrap
        .setup(&SetupOptions {
            archive: Some(archive.clone()),
            install_gateway: false,
        })
        .unwrap_err();

    assert!(matches!(
        err,
        BootstrapError::Provision(ProvisionError::ExtractionFailed { exit_code: 2, .. })
    ));
    assert!(err.to_string().contains("disk full"));
    assert_file_exists(&archive);
    assert_missing(&env.layout().shim_path());
}

#[test]
fn test_setup_resumes_after_partial_run() {
    let env = TestEnv::new();
    let layout = env.layout();
    helpers::create_mock_rootfs(&layout.rootfs_dir());

    // Killed after the shim was written but before profiles were patched.
    let bootstrap = Bootstrap::new(layout.clone(), StubRunner::new());
    openclawd::patch::PatchInstaller::new(&layout)
        .install_compatibility_shim()
        .unwrap();
    assert_eq!(bootstrap.readiness().stage(), Stage::RootfsPatched);

    let outcome = bootstrap.setup(&SetupOptions::default()).unwrap();
    assert!(!outcome.extracted);
    assert_eq!(outcome.activated.len(), 2);
    assert_eq!(outcome.report.stage(), Stage::Complete);
}

#[test]
fn test_status_degrades_failed_probes_to_false() {
    let env = TestEnv::new();
    let layout = env.layout();
    helpers::create_mock_rootfs(&layout.rootfs_dir());

    let runner = StubRunner::new()
        .fail("node --version", 1)
        .ok("command -v openclaw", "   \n");
    let bootstrap = Bootstrap::new(layout, runner);

    let report = bootstrap.readiness();
    assert!(report.rootfs_present());
    assert!(report.shell_binary_present());
    assert!(!report.runtime_present());
    assert!(!report.gateway_binary_present());
    assert!(!report.complete());
    assert_eq!(report.stage(), Stage::RootfsOnly);
}

#[test]
fn test_status_does_not_mutate() {
    let env = TestEnv::new();
    let bootstrap = Bootstrap::new(env.layout(), StubRunner::with_everything());

    let status = bootstrap.status();
    assert!(!status.readiness.complete());
    assert!(status.readiness.runtime_present());
    assert_missing(&env.base_dir);
}

#[test]
fn test_bypass_installs_and_activates() {
    let env = TestEnv::new();
    let layout = env.layout();
    fs::create_dir_all(layout.guest_home()).unwrap();
    fs::write(layout.guest_home().join(".bashrc"), "").unwrap();

    let bootstrap = Bootstrap::new(layout.clone(), StubRunner::new());
    let outcome = bootstrap.bypass().unwrap();

    assert_eq!(outcome.shim_path, layout.shim_path());
    assert_eq!(outcome.activated.len(), 1);
    assert_missing(&layout.guest_home().join(".zshrc"));

    let again = bootstrap.bypass().unwrap();
    assert!(again.activated.is_empty());
}

#[test]
fn test_start_fails_fast_without_gateway_but_heals_shim() {
    let env = TestEnv::new();
    let layout = env.layout();
    let runner = StubRunner::new().ok("command -v openclaw", "");
    let bootstrap = Bootstrap::new(layout.clone(), runner);

    let err = bootstrap
        .start_gateway(LaunchMode::Foreground, None)
        .unwrap_err();

    assert!(matches!(
        err,
        BootstrapError::Precondition(PreconditionError::GatewayNotFound { ref name })
            if name == "openclaw"
    ));
    assert_file_exists(&layout.shim_path());
}

#[test]
fn test_start_propagates_gateway_exit_code() {
    use openclawd::gateway::{GatewayOutcome, GatewaySpec};

    let env = TestEnv::new();
    let runner = StubRunner::new().ok("command -v sh", "/bin/sh\n");
    let gateway = GatewaySpec {
        name: "sh".to_string(),
        args: vec!["-c".to_string(), "'exit 3'".to_string()],
    };
    let bootstrap = Bootstrap::new(env.layout(), runner).with_gateway(gateway);

    let outcome = bootstrap
        .start_gateway(LaunchMode::Foreground, None)
        .unwrap();
    assert_eq!(outcome, GatewayOutcome::Exited(3));
}

#[test]
fn test_host_runner_start_preloads_existing_shim() {
    use openclawd::gateway::{GatewayOutcome, GatewaySpec};

    let env = TestEnv::new();
    let layout = env.layout();
    // Succeeds only if NODE_OPTIONS names a file that exists on the host.
    let gateway = GatewaySpec {
        name: "sh".to_string(),
        args: vec![
            "-c".to_string(),
            "'test -f \"${NODE_OPTIONS#--require }\"'".to_string(),
        ],
    };
    let bootstrap = Bootstrap::new(layout.clone(), HostRunner).with_gateway(gateway);

    let outcome = bootstrap
        .start_gateway(LaunchMode::Foreground, None)
        .unwrap();
    assert_eq!(outcome, GatewayOutcome::Exited(0));
    assert_file_exists(&layout.shim_path());
}

#[test]
fn test_host_runner_bypass_writes_host_shim_path() {
    let env = TestEnv::new();
    let layout = env.layout();
    fs::create_dir_all(layout.guest_home()).unwrap();
    let bashrc = layout.guest_home().join(".bashrc");
    fs::write(&bashrc, "").unwrap();

    Bootstrap::new(layout.clone(), HostRunner).bypass().unwrap();

    assert_file_contains(
        &bashrc,
        &format!(
            "export NODE_OPTIONS=\"--require {}\"",
            layout.shim_path().display()
        ),
    );
}

/// Loads the generated shim into a real Node process with the interface
/// query replaced by `stub`, and returns what the shim answers.
fn node_interfaces_with(stub: &str) -> serde_json::Value {
    let env = TestEnv::new();
    let layout = env.layout();
    let shim_path = openclawd::patch::PatchInstaller::new(&layout)
        .install_compatibility_shim()
        .unwrap();

    let script = format!(
        "const os = require('os');\n\
         os.networkInterfaces = {};\n\
         require({:?});\n\
         console.log(JSON.stringify(os.networkInterfaces()));\n",
        stub,
        shim_path.display().to_string()
    );
    let output = std::process::Command::new("node")
        .args(["-e", &script])
        .output()
        .expect("failed to run node");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

fn assert_loopback_only(value: &serde_json::Value) {
    let obj = value.as_object().unwrap();
    assert_eq!(obj.len(), 1);
    assert_eq!(obj["lo"][0]["address"], "127.0.0.1");
    assert_eq!(obj["lo"][0]["internal"], true);
    assert_eq!(obj["lo"][0]["mac"], "00:00:00:00:00:00");
}

#[test]
#[ignore = "requires node on PATH"]
fn test_shim_falls_back_when_query_throws() {
    let value = node_interfaces_with("() => { throw new Error('EACCES'); }");
    assert_loopback_only(&value);
}

#[test]
#[ignore = "requires node on PATH"]
fn test_shim_falls_back_when_query_is_empty() {
    let value = node_interfaces_with("() => ({})");
    assert_loopback_only(&value);
}

#[test]
#[ignore = "requires node on PATH"]
fn test_shim_passes_real_interfaces_through() {
    let value = node_interfaces_with("() => ({ eth0: [{ address: '10.0.0.2' }] })");
    assert_eq!(value["eth0"][0]["address"], "10.0.0.2");
    assert!(value.get("lo").is_none());
}
