use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use harness_cli::{exit_code_for, init_logging, USAGE_EXIT_CODE};
use harness_runner::report::error_to_json;
use harness_runner::{launch_harness, LauncherConfig, Reporter, HARNESS_USAGE};

/// Tokens after the launcher options are passed through untouched:
/// `<plan> <script_name> [key=value ...] [--ls] [--help]`.
#[derive(Parser)]
#[command(
    name = "mmtk-harness",
    version,
    about = "Run an MMTk harness script under a GC plan",
    override_usage = HARNESS_USAGE,
    disable_help_flag = true
)]
struct Cli {
    /// Java interpreter used to run the harness jar.
    #[arg(long, env = "MMTK_HARNESS_JAVA", default_value = harness_runner::config::DEFAULT_JAVA)]
    java: String,
    /// Path to the harness jar.
    #[arg(long, env = "MMTK_HARNESS_JAR", default_value = harness_runner::config::DEFAULT_HARNESS_JAR)]
    jar: String,
    /// Directory holding `*.script` files.
    #[arg(long, env = "MMTK_HARNESS_SCRIPTS_DIR", default_value = harness_runner::config::DEFAULT_SCRIPTS_DIR)]
    scripts_dir: PathBuf,
    /// Print the final report as JSON.
    #[arg(long)]
    json: bool,
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

impl Cli {
    fn config(&self) -> LauncherConfig {
        LauncherConfig {
            java: self.java.clone(),
            harness_jar: self.jar.clone(),
            scripts_dir: self.scripts_dir.clone(),
            ..LauncherConfig::default()
        }
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        let code = exit_code_for(&err);
        if cli.json {
            let kind = if code == USAGE_EXIT_CODE {
                "usage_error"
            } else {
                "command_failed"
            };
            // stdout may be what failed; stderr below still carries the error.
            let _ = writeln!(io::stdout(), "{}", error_to_json(kind, err.to_string()));
        }
        eprintln!("error: {}", err);
        if code == USAGE_EXIT_CODE {
            eprintln!("usage: {}", HARNESS_USAGE);
        }
        std::process::exit(code);
    }
}

fn run(cli: &Cli) -> Result<()> {
    tracing::debug!(tokens = ?cli.tokens, java = %cli.java, jar = %cli.jar, "resolving harness invocation");
    let mut reporter = Reporter::stdio(cli.json);
    launch_harness(&cli.config(), &cli.tokens, &mut reporter)?;
    Ok(())
}
