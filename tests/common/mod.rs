#![allow(dead_code)]

pub mod fake_api;

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Environment variables that would leak the developer's own setup into a test
const ISOLATED_ENV: &[&str] = &[
    "HELPDESK_API_URL",
    "HELPDESK_TOKEN",
    "HELPDESK_ROLE",
    "HELPDESK_ROOT",
    "HELPDESK_LOG",
    "RUST_LOG",
];

/// Helper struct to run helpdesk commands in an isolated temp directory
pub struct HelpdeskTest {
    pub temp_dir: TempDir,
    binary_path: String,
    env: Vec<(String, String)>,
}

impl HelpdeskTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        HelpdeskTest {
            temp_dir,
            binary_path: env!("CARGO_BIN_EXE_helpdesk").to_string(),
            env: Vec::new(),
        }
    }

    /// Set an environment variable for every command this helper runs
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    pub fn run(&self, args: &[&str]) -> Output {
        let mut command = Command::new(&self.binary_path);
        command.args(args).current_dir(self.temp_dir.path());
        for key in ISOLATED_ENV {
            command.env_remove(key);
        }
        command.env("NO_COLOR", "1");
        for (key, value) in &self.env {
            command.env(key, value);
        }
        command.output().expect("Failed to execute helpdesk command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn write_config(&self, content: &str) {
        let dir = self.temp_dir.path().join(".helpdesk");
        fs::create_dir_all(&dir).expect("Failed to create .helpdesk directory");
        let path = dir.join("config.yaml");
        fs::write(path, content).expect("Failed to write config file");
    }

    pub fn read_config(&self) -> Option<String> {
        let path = self.temp_dir.path().join(".helpdesk").join("config.yaml");
        fs::read_to_string(path).ok()
    }
}
