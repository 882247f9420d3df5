//! Integration tests for CLI argument handling
//!
//! Runs the binary for commands that need no network, and against a mock
//! endpoint for listing.

use std::process::Command;

use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_tmplfind"))
        .args(args)
        .env_remove("TMPLFIND_CACHE_DIR")
        .env_remove("TMPLFIND_COLLECTION_URL")
        .env_remove("TMPLFIND_SEARCH_URL")
        .output()
        .expect("Failed to execute tmplfind")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tmplfind"), "Help should mention tmplfind");
    assert!(stdout.contains("search"), "Help should mention the search command");
    assert!(stdout.contains("--no-cache"), "Help should mention --no-cache");
}

#[test]
fn test_missing_subcommand_fails() {
    let output = run_cli(&[]);
    assert!(!output.status.success());
}

#[test]
fn test_categories_prints_catalog() {
    let output = run_cli(&["--no-cache", "categories"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("6001"));
    assert!(stdout.contains("For You"));
    assert!(stdout.contains("Editor's Picks"));
}

#[test]
fn test_invalid_sort_prints_error_and_exits() {
    let output = run_cli(&["--no-cache", "list", "--sort", "sideways"]);
    assert!(!output.status.success(), "Expected invalid sort to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("sideways") && stderr.contains("Invalid"),
        "Should print error message about invalid sort: {}",
        stderr
    );
}

#[test]
fn test_unknown_category_exits_with_error() {
    let output = run_cli(&["--no-cache", "list", "--category", "12"]);
    assert!(!output.status.success());
}

#[test]
fn test_cache_clear_with_custom_dir() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("stale.json"), "{}").unwrap();

    let dir = temp_dir.path().to_str().unwrap();
    let output = run_cli(&["--cache-dir", dir, "cache", "clear"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Cache cleared"));
    assert!(!temp_dir.path().join("stale.json").exists());
}

#[test]
fn test_list_caches_between_runs() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/collection")
            .query_param("id", "6003")
            .query_param("count", "20");
        then.status(200).json_body(json!({
            "ret": "0",
            "errmsg": "",
            "data": {
                "total": 2,
                "item_list": [
                    { "web_id": "111", "title": "First template", "usage_amount": 1500 },
                    { "web_id": "222", "title": "Second template", "usage_amount": 20 }
                ],
                "has_more": false
            }
        }));
    });

    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().to_str().unwrap();
    let collection_url = server.url("/collection");
    let args = [
        "--cache-dir",
        dir,
        "--collection-url",
        collection_url.as_str(),
        "list",
        "--category",
        "6003",
        "--count",
        "20",
    ];

    let first = run_cli(&args);
    let second = run_cli(&args);

    assert!(first.status.success(), "{}", String::from_utf8_lossy(&first.stderr));
    assert_eq!(first.stdout, second.stdout);
    let stdout = String::from_utf8_lossy(&first.stdout);
    assert!(stdout.contains("TikTok"));
    assert!(stdout.contains("First template"));
    assert!(stdout.contains("1.5K"));
    mock.assert_hits(1);
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use tmplfind::catalog::SortOrder;
    use tmplfind::cli::{parse_sort_arg, CacheLocation, Cli, Command, StartupConfig};

    #[test]
    fn test_cli_categories_defaults_to_xdg_cache() {
        let cli = Cli::parse_from(["tmplfind", "categories"]);
        assert!(matches!(cli.command, Command::Categories));
        if std::env::var_os("TMPLFIND_CACHE_DIR").is_none() {
            assert_eq!(StartupConfig::from_cli(&cli).cache, CacheLocation::Default);
        }
    }

    #[test]
    fn test_cli_show_takes_web_id() {
        let cli = Cli::parse_from(["tmplfind", "show", "7301234567890123456"]);
        match cli.command {
            Command::Show { web_id } => assert_eq!(web_id, "7301234567890123456"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_search_requires_query() {
        assert!(Cli::try_parse_from(["tmplfind", "search"]).is_err());
    }

    #[test]
    fn test_cli_prefetch_count() {
        let cli = Cli::parse_from(["tmplfind", "prefetch", "--count", "50"]);
        assert!(matches!(cli.command, Command::Prefetch { count: 50 }));
    }

    #[test]
    fn test_parse_sort_arg_liked_returns_most_liked() {
        assert_eq!(parse_sort_arg("liked").unwrap(), SortOrder::MostLiked);
    }

    #[test]
    fn test_parse_sort_arg_invalid_returns_error() {
        assert!(parse_sort_arg("invalid").is_err());
    }
}
