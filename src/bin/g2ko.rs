use std::io::{self, Write};
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use g2ko::app::{App, FetchOptions};
use g2ko::config::{ConfigLoader, DEFAULT_OUTPUT_FILE, ResolvedConfig};
use g2ko::domain::{KoId, OrganismInput, collect_requests};
use g2ko::error::G2koError;
use g2ko::kegg::KeggHttpClient;
use g2ko::output::{FetchSummary, JsonOutput, LookupEntry, OutputMode, write_report};
use g2ko::report::ProgressSink;
use g2ko::tui::{self, TerminalProgress};

#[derive(Parser)]
#[command(name = "g2ko")]
#[command(about = "G2KO - extract gene IDs, KEGG KO numbers and KO function descriptions")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    non_interactive: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Fetch KO numbers for organisms and write a text report")]
    Fetch(FetchArgs),
    #[command(about = "Look up KO function descriptions")]
    Lookup(LookupArgs),
}

#[derive(Args, Clone, Default)]
struct FetchArgs {
    /// Organism code, optionally with a display name: `eco` or `eco=E. coli`
    organisms: Vec<OrganismInput>,

    #[arg(long)]
    config: Option<String>,

    /// Leave out the KO function description column
    #[arg(long)]
    no_functions: bool,

    #[arg(long)]
    output: Option<Utf8PathBuf>,

    /// Print the report to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,
}

#[derive(Args)]
struct LookupArgs {
    #[arg(required = true)]
    ko_ids: Vec<String>,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(report) => {
            eprintln!("{report:?}");
            if let Some(error) = report.downcast_ref::<G2koError>() {
                return ExitCode::from(map_exit_code(error));
            }
            ExitCode::from(1)
        }
    }
}

fn map_exit_code(error: &G2koError) -> u8 {
    match error {
        G2koError::InvalidOrganismCode(_)
        | G2koError::InvalidKoId(_)
        | G2koError::TooManyOrganisms { .. }
        | G2koError::NoOrganisms
        | G2koError::MissingConfig
        | G2koError::ConfigRead(_)
        | G2koError::ConfigParse(_) => 2,
        G2koError::KeggHttp(_) | G2koError::KeggStatus { .. } => 3,
        G2koError::Filesystem(_) => 1,
    }
}

fn run() -> miette::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    match cli.command {
        Some(Commands::Fetch(args)) => run_fetch(args, output_mode),
        Some(Commands::Lookup(args)) => run_lookup(args, output_mode),
        None => run_fetch(FetchArgs::default(), output_mode),
    }
}

fn load_config(args: &FetchArgs) -> Result<Option<ResolvedConfig>, G2koError> {
    match args.config.as_deref() {
        Some(path) => ConfigLoader::resolve(Some(path)).map(Some),
        None if args.organisms.is_empty() => match ConfigLoader::resolve(None) {
            Ok(resolved) => Ok(Some(resolved)),
            Err(G2koError::MissingConfig) => Ok(None),
            Err(err) => Err(err),
        },
        None => Ok(None),
    }
}

fn run_fetch(args: FetchArgs, output_mode: OutputMode) -> miette::Result<ExitCode> {
    let resolved = load_config(&args)?;

    let requests = if !args.organisms.is_empty() {
        collect_requests(&args.organisms)?
    } else if let Some(configured) = resolved.as_ref().and_then(ResolvedConfig::requests) {
        configured.to_vec()
    } else if matches!(output_mode, OutputMode::Interactive) {
        let stdin = io::stdin();
        let rows = tui::prompt_organisms(&mut stdin.lock(), &mut io::stderr()).into_diagnostic()?;
        collect_requests(&rows)?
    } else {
        Vec::new()
    };
    if requests.is_empty() {
        return Err(G2koError::NoOrganisms.into());
    }

    let include_functions =
        !args.no_functions && resolved.as_ref().is_none_or(|config| config.include_functions);
    let output = args
        .output
        .clone()
        .or_else(|| resolved.as_ref().map(|config| config.output.clone()))
        .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT_FILE));
    let settings = resolved
        .map(|config| config.kegg)
        .unwrap_or_default();

    let app = App::new(KeggHttpClient::with_settings(settings)?);
    let sink: &dyn ProgressSink = match output_mode {
        OutputMode::Interactive => &TerminalProgress,
        OutputMode::NonInteractive => &JsonOutput,
    };
    let result = app.fetch(&requests, FetchOptions { include_functions }, sink);

    let written = if args.stdout {
        let mut stdout = io::stdout();
        stdout.write_all(result.report.as_bytes()).into_diagnostic()?;
        stdout.flush().into_diagnostic()?;
        None
    } else if result.report.is_empty() {
        None
    } else {
        write_report(&output, &result.report)?;
        Some(output)
    };

    match output_mode {
        OutputMode::Interactive => {
            let mut stderr = io::stderr();
            tui::print_errors(&mut stderr, &result).into_diagnostic()?;
            if let Some(path) = &written {
                tui::print_saved(&mut stderr, &result, path.as_str()).into_diagnostic()?;
            }
        }
        OutputMode::NonInteractive if !args.stdout => {
            JsonOutput::print_fetch(&FetchSummary::new(&result, written.as_deref()))
                .into_diagnostic()?;
        }
        OutputMode::NonInteractive => {
            tui::print_errors(&mut io::stderr(), &result).into_diagnostic()?;
        }
    }

    if result.all_failed() {
        return Ok(ExitCode::from(3));
    }
    Ok(ExitCode::SUCCESS)
}

fn run_lookup(args: LookupArgs, output_mode: OutputMode) -> miette::Result<ExitCode> {
    let ko_ids = args
        .ko_ids
        .iter()
        .map(|value| value.parse::<KoId>())
        .collect::<Result<Vec<_>, _>>()?;

    let app = App::new(KeggHttpClient::new()?);
    let catalog = app.catalog();
    if catalog.is_empty() {
        return Err(G2koError::KeggHttp("KO function catalog unavailable".to_string()).into());
    }

    let entries = ko_ids
        .iter()
        .map(|ko| LookupEntry {
            ko_id: ko.to_string(),
            function: catalog.lookup(ko.as_str()).to_string(),
        })
        .collect::<Vec<_>>();

    match output_mode {
        OutputMode::NonInteractive => JsonOutput::print_lookup(&entries).into_diagnostic()?,
        OutputMode::Interactive => {
            let mut stdout = io::stdout();
            for entry in &entries {
                writeln!(stdout, "{}\t{}", entry.ko_id, entry.function).into_diagnostic()?;
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
