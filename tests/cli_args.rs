//! CLI argument parsing tests.

use clap::Parser;
use vibrato_sync::cli::{Cli, Command, Entity};
use vibrato_sync::ResourceType;

#[test]
fn test_cli_parses_get_subcommand() {
    let cli = Cli::parse_from(["vibrato", "get", "note", "abc-123"]);

    assert!(!cli.json);
    match cli.command {
        Command::Get { entity, sync_hash } => {
            assert_eq!(entity, Entity::Note);
            assert_eq!(sync_hash, "abc-123");
        }
        _ => panic!("Expected Get command"),
    }
}

#[test]
fn test_cli_parses_list_with_plural_alias() {
    let cli = Cli::parse_from(["vibrato", "list", "notebooks"]);

    match cli.command {
        Command::List { entity } => {
            assert_eq!(ResourceType::from(entity), ResourceType::Notebooks);
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_cli_parses_update_subcommand() {
    let cli = Cli::parse_from([
        "vibrato",
        "update",
        "tag",
        "t1",
        r#"{"name":"work"}"#,
        "--replace",
    ]);

    match cli.command {
        Command::Update {
            entity,
            sync_hash,
            data,
            replace,
        } => {
            assert_eq!(entity, Entity::Tag);
            assert_eq!(sync_hash, "t1");
            assert_eq!(data, r#"{"name":"work"}"#);
            assert!(replace);
        }
        _ => panic!("Expected Update command"),
    }
}

#[test]
fn test_cli_parses_login_password_flag() {
    let cli = Cli::parse_from(["vibrato", "login", "test-user", "--password", "vibratonotes"]);

    match cli.command {
        Command::Login {
            identifier,
            password,
        } => {
            assert_eq!(identifier, "test-user");
            assert_eq!(password, "vibratonotes");
        }
        _ => panic!("Expected Login command"),
    }
}

#[test]
fn test_global_flags() {
    // --json and --url before subcommand
    let cli = Cli::parse_from([
        "vibrato",
        "--json",
        "--url",
        "http://localhost:8000",
        "delete",
        "notes",
        "n1",
    ]);
    assert!(cli.json);
    assert_eq!(cli.url.as_deref(), Some("http://localhost:8000"));

    // --json after subcommand
    let cli = Cli::parse_from(["vibrato", "ping", "--json"]);
    assert!(cli.json);
    assert!(matches!(cli.command, Command::Ping));
}

#[test]
fn test_invalid_entity_rejected() {
    let result = Cli::try_parse_from(["vibrato", "list", "users"]);
    assert!(result.is_err());
}
