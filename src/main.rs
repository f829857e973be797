use clap::{Parser, Subcommand, ValueEnum};
use folio::app::{self, AppContext};
use folio::page::Locale;
use folio::theme::{self, FilePreferenceStore, ThemeController};
use folio::{config, output, site};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    let hash = env!("GIT_HASH");
    if on_tag == "true" || hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        concat!(env!("CARGO_PKG_VERSION"), "+", env!("GIT_HASH"))
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Render a bilingual portfolio page from JSON fixtures")]
#[command(long_about = "\
Render a bilingual portfolio page from JSON fixtures

Every locale has its own fixture folder under the data root (a directory or an
http(s) base URL):

  data/                         # default locale (nl)
  ├── experience.json           # work history, grouped by year, newest first
  ├── academic.json             # education, newest first
  ├── skills.json               # skill bars, plus optional tech categories
  └── ui-text.json              # labels for every data-ui-text slot
  data-en/                      # same files, English
  assets/                       # copied to <output>/assets by `build`

A fixture that is missing or malformed never aborts a build: its container
shows \"Could not load <kind> data.\" and the failure is reported.

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Data root: directory or http(s) base URL holding the locale folders
    #[arg(long, default_value = ".", global = true)]
    data: String,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Site configuration file (missing file means stock defaults)
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Preference file holding the theme and language choice
    #[arg(long, default_value = "prefs.json", global = true)]
    prefs: PathBuf,

    /// Log at info level (otherwise RUST_LOG decides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every locale into the output directory
    Build,
    /// Print the rendered HTML of one container
    Render {
        /// experience, academic, skills, or tech
        kind: String,
        /// Locale to render (defaults to the stored language)
        #[arg(long)]
        locale: Option<Locale>,
    },
    /// Fetch and decode every fixture for every locale
    Check,
    /// Show or toggle the stored theme
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },
    /// Store the language preference
    Lang { locale: Locale },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeAction {
    Show,
    Toggle,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let store = FilePreferenceStore::new(&cli.prefs);

    match cli.command {
        Command::Build => {
            let site_config = config::load_config(&cli.config)?;
            println!("==> Building {} → {}", cli.data, cli.output.display());
            let report = site::build(&site_config, &cli.data, &cli.output)?;
            output::print_build_output(&report);
        }
        Command::Render { kind, locale } => {
            let site_config = config::load_config(&cli.config)?;
            let (data_kind, container) = app::render_target(&kind)
                .ok_or_else(|| format!("unknown render target '{kind}'"))?;
            let locale = locale.unwrap_or_else(|| {
                theme::read_language(&store, site_config.site.default_locale)
            });
            let mut ctx = AppContext::for_locale(site_config, &cli.data, store, locale);
            let outcome = ctx.render_kind(data_kind);
            println!("{}", ctx.page().render_container(container).into_string());
            if let Err(err) = outcome.result {
                return Err(err.into());
            }
        }
        Command::Check => {
            let site_config = config::load_config(&cli.config)?;
            println!("==> Checking {}", cli.data);
            let reports = app::check_all(&site_config, &cli.data);
            output::print_check_output(&reports);
            if reports.iter().any(|(_, report)| !report.is_ok()) {
                std::process::exit(1);
            }
        }
        Command::Theme { action } => {
            let mut controller = ThemeController::new(store);
            let line = match action {
                ThemeAction::Show => output::format_theme(controller.current(), true),
                ThemeAction::Toggle => {
                    let (theme, stored) = controller.toggle_stored();
                    output::format_theme(theme, stored)
                }
            };
            println!("{}", line);
        }
        Command::Lang { locale } => {
            let mut store = store;
            if theme::write_language(&mut store, locale) {
                println!("Language: {}", locale);
            } else {
                println!("Language: {} (not persisted)", locale);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
