use agentdeck::tooling::cli::{Cli, Commands};
use clap::Parser;

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["agentdeck", "list"],
        vec!["agentdeck", "list", "--format", "json"],
        vec!["agentdeck", "show", "default"],
        vec!["agentdeck", "add"],
        vec!["agentdeck", "rename", "a1", "Research Lead"],
        vec!["agentdeck", "set-role", "a1", "Researcher"],
        vec!["agentdeck", "tool", "a1", "Wikipedia", "--disable"],
        vec!["agentdeck", "remove", "a1", "--yes"],
        vec!["agentdeck", "switch", "a1"],
        vec!["agentdeck", "support"],
        vec!["agentdeck", "models", "ollama"],
        vec![
            "agentdeck",
            "--base-url",
            "http://localhost:8000",
            "--log-level",
            "debug",
            "list",
        ],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_missing_arguments() {
    assert!(Cli::try_parse_from(["agentdeck", "rename", "a1"]).is_err());
    assert!(Cli::try_parse_from(["agentdeck", "remove"]).is_err());
    assert!(Cli::try_parse_from(["agentdeck"]).is_err());
}

#[test]
fn remove_requires_confirmation_unless_yes() {
    let cli = Cli::try_parse_from(["agentdeck", "remove", "a1"]).unwrap();
    match cli.command {
        Commands::Remove { agent_id, yes } => {
            assert_eq!(agent_id, "a1");
            assert!(!yes);
        }
        _ => panic!("expected remove command"),
    }
}
