//! Helpers for CLI tests. Every test gets its own HOME so the data
//! directory starts empty.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub struct Sandbox {
    home: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            home: TempDir::new().expect("create temp home"),
        }
    }

    /// `~/.config/wordmail` inside the sandbox.
    pub fn data_dir(&self) -> PathBuf {
        self.home.path().join(".config").join("wordmail")
    }

    pub fn write_word_list(&self, content: &str) -> PathBuf {
        let path = self.data_dir().join("words.txt");
        std::fs::create_dir_all(self.data_dir()).expect("create data dir");
        std::fs::write(&path, content).expect("write word list");
        path
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir().join("word_history.json")
    }

    pub fn home(&self) -> &Path {
        self.home.path()
    }

    /// Invoke the CLI and return (stdout, stderr, exit code).
    pub fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_wordmail"))
            .args(args)
            .env("HOME", self.home.path())
            .env_remove("WORDMAIL_ENV")
            .env_remove("WORDMAIL_SMTP_PASSWORD")
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);

        (stdout, stderr, code)
    }

    /// Invoke the CLI and expect success.
    pub fn run_success(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "CLI command failed: {args:?}\n{stderr}");
        stdout
    }

    /// Invoke the CLI and expect failure.
    pub fn run_failure(&self, args: &[&str]) -> String {
        let (_, stderr, code) = self.run(args);
        assert_ne!(code, 0, "CLI command unexpectedly succeeded: {args:?}");
        stderr
    }
}

/// Parse JSON output from CLI.
pub fn parse_json(json: &str) -> serde_json::Value {
    serde_json::from_str(json).expect("Failed to parse JSON output")
}

pub const WORD_LIST: &str = "\
大学英语四级词汇
A
abandon [əˈbændən] vt.丢弃；放弃，抛弃
ability [əˈbɪlətɪ] n.能力；能耐，本领
able [ˈeɪbl] a.有能力的；出色的
aboard [əˈbɔːd] ad.在船(车)上；上船
about [əˈbaʊt] prep.关于；在…周围
above [əˈbʌv] prep.在…上面；高于
";
