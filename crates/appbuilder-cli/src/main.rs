mod commands;

use std::path::PathBuf;

use appbuilder_core::config::SETTINGS_FILE;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "appbuilder", about = "Build Olares app charts from a configuration")]
#[command(version)]
struct Cli {
    /// Settings file (templates override, GitHub API, server and storage)
    #[arg(long, global = true, default_value = SETTINGS_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve,
    /// Validate a configuration and write the chart directory
    Generate {
        /// Configuration JSON exported by the wizard
        configuration: PathBuf,
        /// Directory the chart directory is created in
        #[arg(long, short = 'o', default_value = ".")]
        out_dir: PathBuf,
    },
    /// Validate a configuration and write the chart archive
    Package {
        /// Configuration JSON exported by the wizard
        configuration: PathBuf,
        /// Archive path (default: ./<name>-v<version>.tar.gz)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Check a configuration without generating anything
    Validate {
        /// Configuration JSON exported by the wizard
        configuration: PathBuf,
    },
    /// Inspect a GitHub repository and print what was detected
    Inspect {
        /// Repository URL (https://github.com/<owner>/<repo>)
        url: String,
        /// Branch to read the Dockerfile and compose file from
        #[arg(long, short = 'b')]
        branch: Option<String>,
    },
    /// List the starter presets
    Presets,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => commands::serve(&cli.config).await?,
        Commands::Generate {
            configuration,
            out_dir,
        } => commands::generate(&cli.config, &configuration, &out_dir)?,
        Commands::Package {
            configuration,
            output,
        } => commands::package(&cli.config, &configuration, output.as_deref())?,
        Commands::Validate { configuration } => commands::validate(&configuration)?,
        Commands::Inspect { url, branch } => {
            commands::inspect(&cli.config, &url, branch.as_deref()).await?
        }
        Commands::Presets => commands::presets(),
    }

    Ok(())
}
