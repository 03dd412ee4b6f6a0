use anyhow::Context;
use colored::Colorize;

use ballot_protocol::DeploymentDescriptor;
use ballot_server::{BallotServer, ServerConfig};
use ballot_types::AccountId;

use crate::cli::*;
use crate::simulate::{self, Script, SimulationReport};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Descriptor(args) => cmd_descriptor(args, &cli.format),
        Command::Simulate(args) => cmd_simulate(args, &cli.format),
        Command::Keygen(args) => cmd_keygen(args, &cli.format),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    let server = BallotServer::new(config)?;
    println!(
        "{} Ballot ledger {} on {}",
        "✓".green().bold(),
        server.descriptor().address.to_hex().cyan(),
        server.config().bind_addr.to_string().bold()
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_descriptor(args: DescriptorArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let owner = AccountId::from_hex(&args.owner).context("--owner must be a hex account id")?;
    let descriptor = DeploymentDescriptor::for_owner(&owner, &args.label);

    match &args.out {
        Some(path) => {
            descriptor.write_to(path)?;
            if let OutputFormat::Text = format {
                println!(
                    "{} Descriptor for {} written to {}",
                    "✓".green().bold(),
                    descriptor.address.to_hex().cyan(),
                    path.display()
                );
            }
        }
        None => println!("{}", descriptor.to_json()?),
    }
    Ok(())
}

fn cmd_simulate(args: SimulateArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let script = Script::load(&args.script)?;
    let report = simulate::run(&script)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report),
    }
    Ok(())
}

fn print_report(report: &SimulationReport) {
    println!("Owner: {}", report.owner.short_id().cyan());
    for outcome in &report.outcomes {
        match &outcome.rejected {
            None => println!("  {} {:>3}. {}", "✓".green(), outcome.step, outcome.description),
            Some(kind) => println!(
                "  {} {:>3}. {} ({})",
                "✗".red(),
                outcome.step,
                outcome.description,
                kind.yellow()
            ),
        }
    }

    println!("\n{:>4}  {:>5}  {:>6}  {}", "rank", "index", "votes", "proposal");
    for standing in &report.standings.standings {
        println!(
            "{:>4}  {:>5}  {:>6}  {}",
            standing.rank, standing.index, standing.vote_count, standing.name
        );
    }
    println!(
        "\nWinner: {}  ({} votes, {} events)",
        report.winner.bold(),
        report.standings.total_votes,
        report.events
    );
    println!("{} Ledger invariants verified", "✓".green().bold());
}

fn cmd_keygen(args: KeygenArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let account = match &args.seed {
        Some(seed) => simulate::named_account(seed),
        None => AccountId::ephemeral(),
    };

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "account": account, "short": account.short_id() })
        ),
        OutputFormat::Text => {
            println!("{}", account.to_hex());
            println!("  {}", account.short_id().dimmed());
        }
    }
    Ok(())
}
