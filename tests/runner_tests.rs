//! Tests for the Provisioning Runner against the compiled plan
//!
//! These tests verify:
//! - Steps execute in declaration order
//! - The first failing command aborts the Run
//! - File writes land byte-exact
//! - Runs are deterministic

mod common;

use common::{commands, journal, Event, MemoryFs, RecordingShell};
use std::path::Path;
use vps_provision::artifacts::{
    ALL_PATHS, HTTPD_GZIP_CONF, HTTPD_VHOST_CONF, HTTPD_VHOST_PATH, NGINX_SITE_CONF, NGINX_SITE_PATH,
    SWAPPINESS_CONF, SWAPPINESS_PATH, ZRAM_GENERATOR_CONF, ZRAM_GENERATOR_PATH,
};
use vps_provision::{
    vps_plan, ConsoleProgress, LocalFileSystem, ProvisionError, Runner, Step, StepAction,
    COMPLETION_MESSAGE,
};

/// The host effect a step should produce.
fn expected_event(step: &Step) -> Event {
    match step.action() {
        StepAction::Command { command } => Event::Command(command.clone()),
        StepAction::InteractiveCommand { command } => Event::Interactive(command.clone()),
        StepAction::FileWrite { path, .. } => Event::Write(path.clone()),
    }
}

fn index_of(plan: &[Step], command: &str) -> usize {
    plan.iter()
        .position(|s| s.action().command() == Some(command))
        .unwrap_or_else(|| panic!("'{}' not in plan", command))
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn test_execution_order_equals_declaration_order() {
    let plan = vps_plan();
    let journal = journal();
    let mut shell = RecordingShell::new(journal.clone());
    let mut fs = MemoryFs::new(journal.clone());

    let summary = Runner::new(&mut shell, &mut fs).run(&plan).expect("run");

    let expected: Vec<Event> = plan.iter().map(expected_event).collect();
    assert_eq!(*journal.borrow(), expected);
    assert_eq!(summary.steps_completed, plan.len());
}

#[test]
fn test_proxy_config_written_after_proxy_install() {
    let plan = vps_plan();
    let journal = journal();
    let mut shell = RecordingShell::new(journal.clone());
    let mut fs = MemoryFs::new(journal.clone());
    Runner::new(&mut shell, &mut fs).run(&plan).expect("run");

    let events = journal.borrow();
    let install = events
        .iter()
        .position(|e| *e == Event::Command("dnf install -y nginx".to_string()))
        .expect("nginx install");
    let write = events
        .iter()
        .position(|e| *e == Event::Write(NGINX_SITE_PATH.into()))
        .expect("nginx config");
    let start = events
        .iter()
        .position(|e| *e == Event::Command("systemctl enable --now nginx".to_string()))
        .expect("nginx start");
    assert!(install < write && write < start);
}

#[test]
fn test_interactive_wizard_is_short_circuited() {
    let journal = journal();
    let mut shell = RecordingShell::new(journal.clone());
    let mut fs = MemoryFs::new(journal.clone());
    Runner::new(&mut shell, &mut fs).run(&vps_plan()).expect("run");

    let interactive: Vec<_> = journal
        .borrow()
        .iter()
        .filter(|e| matches!(e, Event::Interactive(_)))
        .cloned()
        .collect();
    assert_eq!(
        interactive,
        vec![Event::Interactive("mysql_secure_installation".to_string())]
    );
}

// =============================================================================
// Failure policy
// =============================================================================

#[test]
fn test_mariadb_install_failure_aborts_run() {
    let plan = vps_plan();
    let failing = index_of(&plan, "dnf install -y mariadb-server");

    let journal = journal();
    let mut shell =
        RecordingShell::new(journal.clone()).fail_on("dnf install -y mariadb-server", 1);
    let mut fs = MemoryFs::new(journal.clone());

    let err = Runner::new(&mut shell, &mut fs)
        .run(&plan)
        .expect_err("MariaDB install fails");

    // Every preceding step ran, then the failing one, then nothing
    let expected: Vec<Event> = plan[..=failing].iter().map(expected_event).collect();
    assert_eq!(*journal.borrow(), expected);
    assert_eq!(
        commands(&journal).last().map(String::as_str),
        Some("dnf install -y mariadb-server")
    );
    assert!(!commands(&journal).contains(&"systemctl enable --now mariadb".to_string()));
    assert!(fs.files.is_empty());

    assert_eq!(err.step(), Some(failing));
    assert_ne!(err.exit_code(), 0);
    let message = err.to_string();
    assert!(message.contains("dnf install -y mariadb-server"));
    assert!(message.contains("returned non-zero exit status 1"));
}

#[test]
fn test_failure_exit_code_is_propagated() {
    let journal = journal();
    let mut shell = RecordingShell::new(journal.clone()).fail_on("firewall-cmd --reload", 252);
    let mut fs = MemoryFs::new(journal.clone());

    let err = Runner::new(&mut shell, &mut fs)
        .run(&vps_plan())
        .expect_err("firewall reload fails");

    assert!(matches!(err, ProvisionError::CommandFailed { .. }));
    assert_eq!(err.exit_code(), 252);
    assert_eq!(
        commands(&journal).last().map(String::as_str),
        Some("firewall-cmd --reload")
    );
}

#[test]
fn test_failure_on_last_step_keeps_every_write() {
    let journal = journal();
    let mut shell =
        RecordingShell::new(journal.clone()).fail_on("systemctl enable --now fail2ban", 1);
    let mut fs = MemoryFs::new(journal.clone());

    let err = Runner::new(&mut shell, &mut fs)
        .run(&vps_plan())
        .expect_err("fail2ban fails");

    // No rollback of steps that already ran
    assert_eq!(err.step(), Some(vps_plan().len() - 1));
    assert_eq!(fs.files.len(), 5);
}

#[test]
fn test_failed_write_on_real_fs_stops_before_next_command() {
    let dir = tempfile::tempdir().expect("tempdir");
    let journal = journal();
    let mut shell = RecordingShell::new(journal.clone());
    // No etc/nginx/conf.d under the scratch root
    let mut fs = LocalFileSystem::with_root(dir.path());

    let err = Runner::new(&mut shell, &mut fs)
        .run(&vps_plan())
        .expect_err("parent directory missing");

    match err {
        ProvisionError::FileWrite { ref path, .. } => {
            assert_eq!(path, Path::new(NGINX_SITE_PATH));
        }
        ref other => panic!("unexpected error: {}", other),
    }
    assert_eq!(err.exit_code(), 1);
    assert_eq!(
        commands(&journal).last().map(String::as_str),
        Some("dnf install -y nginx")
    );
}

// =============================================================================
// File contents
// =============================================================================

#[test]
fn test_file_writes_are_byte_exact() {
    let journal = journal();
    let mut shell = RecordingShell::new(journal.clone());
    let mut fs = MemoryFs::new(journal.clone());
    Runner::new(&mut shell, &mut fs).run(&vps_plan()).expect("run");

    let written: Vec<String> = journal
        .borrow()
        .iter()
        .filter_map(|e| match e {
            Event::Write(path) => Some(path.display().to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(written, ALL_PATHS);

    assert_eq!(fs.read(NGINX_SITE_PATH), Some(NGINX_SITE_CONF));
    assert_eq!(fs.read(HTTPD_VHOST_PATH), Some(HTTPD_VHOST_CONF));
    assert_eq!(fs.read(SWAPPINESS_PATH), Some("vm.swappiness=10\n"));
    assert_eq!(fs.read(ZRAM_GENERATOR_PATH), Some(ZRAM_GENERATOR_CONF));
    assert_eq!(fs.read("/etc/httpd/conf.d/gzip.conf"), Some(HTTPD_GZIP_CONF));

    let nginx = fs.read(NGINX_SITE_PATH).expect("nginx config");
    assert!(nginx.contains("proxy_pass http://127.0.0.1:8080;"));
    assert!(nginx.contains("location ~ \\.php$ {"));
}

#[test]
fn test_successful_run_on_real_fs() {
    let dir = tempfile::tempdir().expect("tempdir");
    for parent in ["etc/nginx/conf.d", "etc/httpd/conf.d", "etc/sysctl.d", "etc/systemd"] {
        std::fs::create_dir_all(dir.path().join(parent)).expect("mkdir");
    }
    // Stale content must be replaced, not appended to
    std::fs::write(
        dir.path().join("etc/httpd/conf.d/laravel.conf"),
        "# previous vhost that is much longer than the new one ".repeat(20),
    )
    .expect("seed");

    let journal = journal();
    let mut shell = RecordingShell::new(journal.clone());
    let mut fs = LocalFileSystem::with_root(dir.path());
    let mut out = Vec::new();

    Runner::new(&mut shell, &mut fs)
        .with_progress(ConsoleProgress::new(&mut out, false))
        .run(&vps_plan())
        .expect("run");

    let read = |p: &str| std::fs::read_to_string(fs.resolve(Path::new(p))).expect("read");
    let nginx = read("/etc/nginx/conf.d/laravel.conf");
    let vhost = read("/etc/httpd/conf.d/laravel.conf");
    assert_eq!(nginx, NGINX_SITE_CONF);
    assert_eq!(vhost, HTTPD_VHOST_CONF);
    assert!(nginx.contains("proxy_pass http://127.0.0.1:8080;"));
    assert!(vhost.contains("DocumentRoot \"/srv/laravel/public\""));
    assert_eq!(read(SWAPPINESS_PATH), SWAPPINESS_CONF);

    let printed = String::from_utf8(out).expect("utf8");
    assert!(printed.contains(COMPLETION_MESSAGE));
    assert!(printed.contains("Installing MariaDB server..."));
    assert!(printed.contains("32/32 ✓"));
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_repeated_runs_are_identical() {
    let run_once = || {
        let journal = journal();
        let mut shell = RecordingShell::new(journal.clone());
        let mut fs = MemoryFs::new(journal.clone());
        Runner::new(&mut shell, &mut fs).run(&vps_plan()).expect("run");
        let events = journal.borrow().clone();
        (events, fs.files)
    };

    let (first_events, first_files) = run_once();
    let (second_events, second_files) = run_once();
    assert_eq!(first_events, second_events);
    assert_eq!(first_files, second_files);
}

#[test]
fn test_failed_run_prints_no_completion_message() {
    let journal = journal();
    let mut shell = RecordingShell::new(journal.clone()).fail_on("dnf update -y", 1);
    let mut fs = MemoryFs::new(journal.clone());
    let mut out = Vec::new();

    Runner::new(&mut shell, &mut fs)
        .with_progress(ConsoleProgress::new(&mut out, false))
        .run(&vps_plan())
        .expect_err("first step fails");

    let printed = String::from_utf8(out).expect("utf8");
    assert!(printed.contains("Updating system packages..."));
    assert!(printed.contains("0/32 ✗"));
    assert!(!printed.contains(COMPLETION_MESSAGE));
}
