use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use cookbook_tex::{group_by, AppConfig, CookbookError, CookbookStore};

#[derive(Parser)]
#[command(name = "cookbook-tex", version, about = "Typeset a personal cookbook with LaTeX")]
struct Cli {
    /// Cookbook JSON file (overrides the configuration)
    #[arg(short, long, global = true)]
    cookbook: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the LaTeX source of the cookbook
    Render {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compile the cookbook to PDF
    Export {
        /// Directory for the generated files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Validate the stored cookbook and list its groups
    Check,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CookbookError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = cli.cookbook {
        config.cookbook_path = path;
    }

    match cli.command {
        Commands::Render { output } => {
            let source = cookbook_tex::render_stored(&config).await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, source).await?;
                    info!("Wrote {}", path.display());
                }
                None => println!("{}", source),
            }
        }
        Commands::Export { output_dir } => {
            if let Some(dir) = output_dir {
                config.latex.output_dir = dir;
            }
            let pdf = cookbook_tex::export_pdf(&config).await?;
            println!("{}", pdf.display());
        }
        Commands::Check => {
            let store = CookbookStore::new(&config.cookbook_path);
            if !store.exists().await? {
                return Err(CookbookError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no cookbook at {}", store.path().display()),
                )));
            }
            let cookbook = store.load().await?;
            println!("{} ({})", cookbook.name, cookbook.author);
            for (group, recipes) in group_by(&cookbook.recipes) {
                println!("  {}: {} recipe(s)", group, recipes.len());
            }
        }
    }

    Ok(())
}
