use clap::Parser;

use super::*;

#[test]
fn check_with_overrides() {
    let cli = Cli::try_parse_from([
        "report-guard",
        "check",
        "--root",
        "ftp://host/Отчеты",
        "--names",
        "ECH-1, ECH-2",
        "-j",
        "8",
        "--format",
        "json",
        "--strict",
    ])
    .unwrap();

    let Commands::Check(args) = cli.command else {
        panic!("expected check");
    };
    assert_eq!(args.source.root.as_deref(), Some("ftp://host/Отчеты"));
    assert_eq!(args.names.as_deref(), Some("ECH-1, ECH-2"));
    assert_eq!(args.source.concurrency, Some(8));
    assert_eq!(args.source.format, OutputFormat::Json);
    assert!(args.source.strict);
}

#[test]
fn inspect_collects_repeated_exempt() {
    let cli = Cli::try_parse_from([
        "report-guard",
        "inspect",
        "--period",
        "March",
        "--exempt",
        "Chief",
        "--exempt",
        "Deputy",
    ])
    .unwrap();

    let Commands::Inspect(args) = cli.command else {
        panic!("expected inspect");
    };
    assert_eq!(args.period.as_deref(), Some("March"));
    assert_eq!(args.exempt, vec!["Chief", "Deputy"]);
    assert_eq!(args.source.format, OutputFormat::Text);
}

#[test]
fn global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["report-guard", "check", "-vv", "--quiet", "--no-config"]).unwrap();

    assert_eq!(cli.verbose, 2);
    assert!(cli.quiet);
    assert!(cli.no_config);
}

#[test]
fn init_defaults() {
    let cli = Cli::try_parse_from(["report-guard", "init"]).unwrap();

    let Commands::Init(args) = cli.command else {
        panic!("expected init");
    };
    assert_eq!(args.output, PathBuf::from(".report-guard.toml"));
    assert!(!args.force);
}

#[test]
fn unknown_format_is_rejected() {
    assert!(Cli::try_parse_from(["report-guard", "check", "--format", "xlsx"]).is_err());
}
