//! Integration tests for CLI argument parsing.
//!
//! These tests exercise the `Cli` surface end to end: the trailing command
//! after `--`, option parsing, and the usage errors clap raises before any
//! cluster interaction can happen.

use clap::Parser;
use kubrun::config::Cli;

#[test]
fn trailing_command_is_captured_after_separator() {
    let cli = Cli::try_parse_from([
        "kubrun", "--image", "alpine", "--", "echo", "hi",
    ])
    .expect("valid invocation should parse");

    assert_eq!(cli.image.as_deref(), Some("alpine"));
    assert_eq!(cli.command, vec![String::from("echo"), String::from("hi")]);
}

#[test]
fn options_that_look_like_flags_stay_in_the_command() {
    let cli = Cli::try_parse_from([
        "kubrun", "--image", "perl", "--", "perl", "-Mbignum=bpi", "-wle", "print bpi(100)",
    ])
    .expect("valid invocation should parse");

    assert_eq!(
        cli.command,
        vec![
            String::from("perl"),
            String::from("-Mbignum=bpi"),
            String::from("-wle"),
            String::from("print bpi(100)"),
        ]
    );
}

#[test]
fn missing_command_is_a_usage_error() {
    let result = Cli::try_parse_from(["kubrun", "--image", "alpine"]);
    assert!(result.is_err(), "a run without a command must not parse");
}

#[test]
fn all_options_parse_together() {
    let cli = Cli::try_parse_from([
        "kubrun",
        "--namespace",
        "myproject",
        "--image",
        "alpine",
        "--timeout",
        "30",
        "--cleanup",
        "false",
        "--insecure",
        "true",
        "--kubeconfig",
        "/tmp/kubeconfig",
        "--api-server",
        "https://k8s.example.net:6443",
        "--",
        "true",
    ])
    .expect("valid invocation should parse");

    assert_eq!(cli.namespace.as_deref(), Some("myproject"));
    assert_eq!(cli.timeout, Some(30));
    assert_eq!(cli.cleanup, Some(false));
    assert_eq!(cli.insecure, Some(true));
    assert_eq!(
        cli.kubeconfig.as_deref().map(camino::Utf8Path::as_str),
        Some("/tmp/kubeconfig")
    );
    assert_eq!(
        cli.api_server.as_deref(),
        Some("https://k8s.example.net:6443")
    );
    assert_eq!(cli.command, vec![String::from("true")]);
}

#[test]
fn options_default_to_unset() {
    let cli = Cli::try_parse_from(["kubrun", "--image", "alpine", "--", "true"])
        .expect("valid invocation should parse");

    assert!(cli.namespace.is_none());
    assert!(cli.timeout.is_none());
    assert!(cli.cleanup.is_none());
    assert!(cli.insecure.is_none());
    assert!(cli.kubeconfig.is_none());
    assert!(cli.api_server.is_none());
    assert!(cli.config.is_none());
}
