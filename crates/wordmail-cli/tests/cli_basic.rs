//! Basic CLI tests.
//!
//! Tests invoke the built binary against a throwaway HOME and verify outputs.

mod common;

use common::{parse_json, Sandbox, WORD_LIST};

#[test]
fn test_config_path_is_in_data_dir() {
    let sandbox = Sandbox::new();
    let out = sandbox.run_success(&["config", "path"]);
    assert!(out.trim().ends_with(".config/wordmail/config.toml"));
    assert!(!sandbox.data_dir().join("config.toml").exists());
}

#[test]
fn test_config_get_default() {
    let sandbox = Sandbox::new();
    assert_eq!(sandbox.run_success(&["config", "get", "daily.new_count"]).trim(), "3");
    assert_eq!(sandbox.run_success(&["config", "get", "smtp.server"]).trim(), "smtp.qq.com");
}

#[test]
fn test_config_set_then_get() {
    let sandbox = Sandbox::new();
    assert_eq!(sandbox.run_success(&["config", "set", "daily.review_count", "4"]).trim(), "ok");
    assert_eq!(sandbox.run_success(&["config", "get", "daily.review_count"]).trim(), "4");
}

#[test]
fn test_config_set_unknown_key_fails() {
    let sandbox = Sandbox::new();
    let stderr = sandbox.run_failure(&["config", "set", "smtp.bogus", "x"]);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_list_masks_password() {
    let sandbox = Sandbox::new();
    sandbox.run_success(&["config", "set", "smtp.password", "hunter2"]);
    let list = parse_json(&sandbox.run_success(&["config", "list"]));
    assert_eq!(list["smtp"]["password"], "********");
    assert_eq!(list["review"]["intervals"], serde_json::json!([1, 2, 4, 7, 15, 30]));
}

#[test]
fn test_config_reset_restores_defaults() {
    let sandbox = Sandbox::new();
    sandbox.run_success(&["config", "set", "daily.new_count", "9"]);
    sandbox.run_success(&["config", "reset"]);
    assert_eq!(sandbox.run_success(&["config", "get", "daily.new_count"]).trim(), "3");
}

#[test]
fn test_stats_summary_on_empty_history() {
    let sandbox = Sandbox::new();
    sandbox.write_word_list(WORD_LIST);
    let stats = parse_json(&sandbox.run_success(&["stats", "summary"]));
    assert_eq!(stats["total_learned"], 0);
    assert_eq!(stats["total_words"], 6);
    assert_eq!(stats["daily_stats"].as_array().unwrap().len(), 30);
}

#[test]
fn test_send_dry_run_prints_mail_and_saves_nothing() {
    let sandbox = Sandbox::new();
    sandbox.write_word_list(WORD_LIST);

    let out = sandbox.run_success(&["send", "--dry-run", "--no-enrich"]);

    assert!(out.contains("📚 每日单词"));
    assert!(out.contains("学习进度: 5/6"));
    assert!(!sandbox.history_path().exists());
}

#[test]
fn test_send_without_addresses_fails_before_selecting() {
    let sandbox = Sandbox::new();
    sandbox.write_word_list(WORD_LIST);

    let stderr = sandbox.run_failure(&["send", "--no-enrich"]);

    assert!(stderr.contains("smtp.from"));
    assert!(!sandbox.history_path().exists());
}

#[test]
fn test_send_with_missing_word_list_fails() {
    let sandbox = Sandbox::new();
    let stderr = sandbox.run_failure(&["send", "--dry-run", "--no-enrich"]);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_review_mark_unknown_word_fails() {
    let sandbox = Sandbox::new();
    let stderr = sandbox.run_failure(&["review", "mark", "3"]);
    assert!(stderr.contains("not been introduced"));
}

#[test]
fn test_review_mark_and_stats_words() {
    let sandbox = Sandbox::new();
    sandbox.write_word_list(WORD_LIST);
    std::fs::write(
        sandbox.history_path(),
        r#"{"words":{"2":{"word":"able","first_learned":"2026-01-01","review_count":0,
            "last_review":"2026-01-01","next_review":"2026-01-02","mastery_level":0}},
            "used_indices":[2]}"#,
    )
    .unwrap();

    let state = parse_json(&sandbox.run_success(&["review", "mark", "2"]));
    assert_eq!(state["review_count"], 1);
    assert_eq!(state["mastery_level"], 1);

    let words = parse_json(&sandbox.run_success(&["stats", "words"]));
    assert_eq!(words["total"], 1);
    assert_eq!(words["words"][0]["index"], 2);
    assert_eq!(words["words"][0]["word"], "able");

    let progress = parse_json(&sandbox.run_success(&["stats", "progress"]));
    assert_eq!(progress["learned"], 1);
    assert_eq!(progress["total"], 6);
}

#[test]
fn test_preview_lists_due_words_without_saving() {
    let sandbox = Sandbox::new();
    sandbox.write_word_list(WORD_LIST);
    let history = r#"{"words":{"0":{"word":"abandon","first_learned":"2026-01-01","review_count":0,
        "last_review":"2026-01-01","next_review":"2026-01-02","mastery_level":0}},
        "used_indices":[0]}"#;
    std::fs::write(sandbox.history_path(), history).unwrap();

    let preview = parse_json(&sandbox.run_success(&["preview"]));

    assert_eq!(preview["due_count"], 1);
    assert_eq!(preview["due"][0]["word"], "abandon");
    assert_eq!(preview["due"][0]["is_review"], true);
    assert_eq!(std::fs::read_to_string(sandbox.history_path()).unwrap(), history);
}

#[test]
fn test_review_reset_requires_confirmation() {
    let sandbox = Sandbox::new();
    std::fs::create_dir_all(sandbox.data_dir()).unwrap();
    std::fs::write(
        sandbox.history_path(),
        r#"{"words":{"0":{"word":"abandon","first_learned":"2026-01-01","review_count":0,
            "last_review":"2026-01-01","next_review":"2026-01-02","mastery_level":0}},
            "used_indices":[0]}"#,
    )
    .unwrap();

    sandbox.run_failure(&["review", "reset"]);
    sandbox.run_success(&["review", "reset", "--yes"]);

    let words = parse_json(&sandbox.run_success(&["stats", "words"]));
    assert_eq!(words["total"], 0);
}
