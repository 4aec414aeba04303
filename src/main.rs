use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use worldsheet::config::{self, WorldsheetConfig};
use worldsheet::model::ContentModel;
use worldsheet::output::{self, PageCheck};
use worldsheet::session::EditingSession;
use worldsheet::storage::{FsStorage, ProjectStorage};
use worldsheet::theme::{self, Catalogs};
use worldsheet::{assets, templates::TemplateRegistry};

#[derive(Parser)]
#[command(name = "worldsheet")]
#[command(about = "Assemble a self-contained world reference page")]
#[command(long_about = "\
Assemble a self-contained world reference page

A project's content (world overview, characters, storylines, plans,
playlists, world items and custom pages) plus its appearance settings are
assembled into a single HTML file. The file embeds a snapshot of the
content, so it can be imported again for further editing.

Storage layout:

  projects/
  └── sunken-coast/
      ├── index.html               # Assembled artifact (embeds the snapshot)
      ├── index.html.bak           # Previous artifact, kept on every save
      ├── assets/                  # Theme assets copied from the asset library
      │   └── backgrounds/parchment.jpg
      └── icons/                   # Generated icons, one folder per category
          └── places/salt-market.png

Hidden content (characters or items marked hidden, tags starting with '!')
is left out of the page but kept in the snapshot.

Run 'worldsheet gen-config' to generate a documented worldsheet.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./worldsheet.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Projects directory, overrides [storage] root
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble a content file and save it as a project
    Build {
        /// Content model as JSON
        #[arg(long)]
        input: PathBuf,
        /// Project name under the storage root
        #[arg(long)]
        project: String,
    },
    /// Decode a saved project back into a content model
    Import {
        #[arg(long)]
        project: String,
        /// Write the JSON here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List stored projects
    List,
    /// Show the theme assets a content file requires
    Assets {
        #[arg(long)]
        input: PathBuf,
    },
    /// Validate custom pages against their templates
    Check {
        #[arg(long)]
        input: PathBuf,
    },
    /// Print every style dimension and its catalog keys
    Themes,
    /// Print a stock worldsheet.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Build { input, project } => {
            let config = load_config(cli.config.as_deref())?;
            let storage = open_storage(&config, cli.storage);
            let mut session = EditingSession::with_builtin(config.export.clone());
            *session.content_mut() = read_content(&input)?;
            println!("==> Building {} from {}", project, input.display());
            let outcome = session.save(&storage, &project)?;
            output::print_build_output(&project, &outcome.receipt, &outcome.report, outcome.retried);
        }
        Command::Import { project, output } => {
            let config = load_config(cli.config.as_deref())?;
            let storage = open_storage(&config, cli.storage);
            let mut session = EditingSession::with_builtin(config.export.clone());
            session.load(&storage, &project)?;
            let json = serde_json::to_string_pretty(session.content())?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("==> Wrote {}", path.display());
                }
                None => println!("{}", json),
            }
        }
        Command::List => {
            let config = load_config(cli.config.as_deref())?;
            let storage = open_storage(&config, cli.storage);
            output::print_project_list(&storage.list_projects()?);
        }
        Command::Assets { input } => {
            let config = load_config(cli.config.as_deref())?;
            let content = read_content(&input)?;
            let theme = theme::resolve(&content.appearance, &Catalogs::builtin());
            output::print_assets(&assets::required_assets(&theme), &config.storage.asset_library);
        }
        Command::Check { input } => {
            let content = read_content(&input)?;
            let registry = TemplateRegistry::with_builtin();
            let pages: Vec<PageCheck> = content
                .custom_pages
                .iter()
                .map(|page| PageCheck {
                    name: page.name.clone(),
                    template: page.template.clone(),
                    violations: registry.validate_page(page),
                })
                .collect();
            output::print_check_report(&pages);
            if pages.iter().any(|p| !p.violations.is_empty()) {
                return Err("custom pages violate their template rules".into());
            }
        }
        Command::Themes => {
            output::print_theme_catalog(&Catalogs::builtin());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// An explicit `--config` must exist; otherwise `./worldsheet.toml` is optional.
fn load_config(path: Option<&Path>) -> Result<WorldsheetConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(".")),
    }
}

fn open_storage(config: &WorldsheetConfig, root: Option<PathBuf>) -> FsStorage {
    FsStorage::new(
        root.unwrap_or_else(|| config.storage.root.clone()),
        config.storage.asset_library.clone(),
        config.icons.size,
    )
}

fn read_content(path: &Path) -> Result<ContentModel, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
