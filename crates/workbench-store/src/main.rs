use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workbench_core::{ArchiveFileType, Market, Phase, TaskKind, WorkflowTask};
use workbench_store::{
    run_scenario, ActivityFilter, ActorFilter, ArchiveFilter, Scenario, Store, WorkbenchConfig,
    WorkflowService,
};

fn cli() -> Command {
    Command::new("workbench")
        .version(workbench_store::VERSION)
        .about("Sustainability Workbench: meter data workflow store")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .help("Username stamped on human activity"),
        )
        .subcommand(Command::new("summary").about("Show badge counts and dashboard totals"))
        .subcommand(
            Command::new("tasks")
                .about("List tasks")
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .value_parser(value_parser!(TaskKind))
                        .help("Only this task kind (upload, exception, validation)"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("log")
                .about("Show the activity log, newest first")
                .arg(market_arg())
                .arg(
                    Arg::new("actor")
                        .long("actor")
                        .value_parser(value_parser!(ActorFilter))
                        .help("Agent, Human, or a username"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("archive")
                .about("List archived files, newest first")
                .arg(market_arg())
                .arg(
                    Arg::new("type")
                        .long("type")
                        .value_parser(value_parser!(ArchiveFileType))
                        .help("upload, exception or audit"),
                )
                .arg(json_flag()),
        )
        .subcommand(Command::new("cycles").about("Show meter data cycles per market"))
        .subcommand(
            Command::new("scenario")
                .about("Run a scripted workflow against a fresh seeded store")
                .arg(
                    Arg::new("name")
                        .required(true)
                        .value_parser(value_parser!(Scenario))
                        .help("upload, exception or validation"),
                ),
        )
}

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

fn market_arg() -> Arg {
    Arg::new("market")
        .long("market")
        .value_parser(value_parser!(Market))
        .help("Only this market (UK, CZ, DE, FR, PL, NL, ES, IT)")
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<WorkbenchConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => WorkbenchConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => WorkbenchConfig::default(),
    };
    if let Some(user) = matches.get_one::<String>("user") {
        config = config.with_user(user.clone());
    }
    Ok(config)
}

fn init_tracing(config: &WorkbenchConfig) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_tasks<T: WorkflowTask>(tasks: &[T]) {
    for task in tasks {
        let header = task.header();
        println!(
            "  {:<14} {:<28} {:<3} {:<12} {:<22} {}",
            header.id,
            header.title,
            header.market,
            header.status,
            task.phase().label(),
            header.updated_at.format("%Y-%m-%d %H:%M"),
        );
    }
}

fn summary(store: &Store) {
    let badges = store.badges();
    let totals = store.totals();

    println!("Badges");
    println!("  Uploads:     {}", badges.uploads);
    println!("  Exceptions:  {}", badges.exceptions);
    println!("  Validations: {}", badges.validations);
    println!();
    println!("Workflow totals");
    for kind in TaskKind::ALL {
        let t = totals.get(kind);
        println!("  {:<11} {} tasks, {} meters", kind, t.tasks, t.meters);
    }
}

fn tasks(store: &Store, args: &ArgMatches) -> anyhow::Result<()> {
    let kind = args.get_one::<TaskKind>("kind").copied();
    let wanted = |k: TaskKind| kind.map_or(true, |only| only == k);

    if args.get_flag("json") {
        let mut out = serde_json::Map::new();
        if wanted(TaskKind::Upload) {
            out.insert("upload".into(), serde_json::to_value(store.uploads())?);
        }
        if wanted(TaskKind::Exception) {
            out.insert("exception".into(), serde_json::to_value(store.exceptions())?);
        }
        if wanted(TaskKind::Validation) {
            out.insert("validation".into(), serde_json::to_value(store.validations())?);
        }
        return print_json(&out);
    }

    if wanted(TaskKind::Upload) {
        println!("Upload tasks");
        print_tasks(&store.uploads());
    }
    if wanted(TaskKind::Exception) {
        println!("Exception tasks");
        print_tasks(&store.exceptions());
    }
    if wanted(TaskKind::Validation) {
        println!("Validation tasks");
        print_tasks(&store.validations());
    }
    Ok(())
}

fn activity(store: &Store, args: &ArgMatches) -> anyhow::Result<()> {
    let filter = ActivityFilter {
        market: args.get_one::<Market>("market").copied(),
        actor: args.get_one::<ActorFilter>("actor").cloned().unwrap_or_default(),
    };
    let entries: Vec<_> = store.read(|s| s.activity.filtered(&filter).cloned().collect());

    if args.get_flag("json") {
        return print_json(&entries);
    }
    for entry in &entries {
        println!(
            "{} {:<3} {:<16} {:<36} {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.market,
            entry.actor_label(),
            entry.action,
            entry.details.as_deref().unwrap_or(""),
        );
    }
    Ok(())
}

fn archive(store: &Store, args: &ArgMatches) -> anyhow::Result<()> {
    let filter = ArchiveFilter {
        market: args.get_one::<Market>("market").copied(),
        file_type: args.get_one::<ArchiveFileType>("type").copied(),
    };
    let files: Vec<_> = store.read(|s| s.archive.filtered(&filter).cloned().collect());

    if args.get_flag("json") {
        return print_json(&files);
    }
    for file in &files {
        println!(
            "{} {:<3} {:<9} {:>7}  {}",
            file.generated_at.format("%Y-%m-%d %H:%M"),
            file.market,
            file.file_type,
            file.size,
            file.filename,
        );
    }
    Ok(())
}

fn cycles(store: &Store) {
    for cycle in store.cycles() {
        println!(
            "{:<3} {:<15} {:<9} {:<8} quality {}%",
            cycle.market, cycle.period, cycle.date, cycle.status, cycle.quality_score
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    init_tracing(&config);

    let store = Arc::new(Store::default());

    match matches.subcommand() {
        Some(("summary", _)) => summary(&store),
        Some(("tasks", args)) => tasks(&store, args)?,
        Some(("log", args)) => activity(&store, args)?,
        Some(("archive", args)) => archive(&store, args)?,
        Some(("cycles", _)) => cycles(&store),
        Some(("scenario", args)) => {
            let scenario = args
                .get_one::<Scenario>("name")
                .copied()
                .context("scenario name is required")?;
            let service = WorkflowService::new(store, config);
            let report = run_scenario(&service, scenario).await;
            println!("{}", report.generate_text());
        }
        _ => {}
    }

    Ok(())
}
