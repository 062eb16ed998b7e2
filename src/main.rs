use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotyt::{archive::ARCHIVE_NAME, cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the web server
    Serve(ServeOptions),

    /// Create a user account
    Register(RegisterOptions),

    /// Import a Spotify playlist and fetch its songs
    Import(ImportOptions),

    /// List downloaded songs of a user
    Songs(SongsOptions),

    /// Bundle downloaded songs into a ZIP archive
    Zip(ZipOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Open the landing page in the default browser
    #[clap(long)]
    open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct RegisterOptions {
    username: String,
    #[clap(long)]
    password: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ImportOptions {
    /// Playlist link, e.g. https://open.spotify.com/playlist/<id>
    link: String,
    /// Account that owns the import
    #[clap(long)]
    user: String,
}

#[derive(Parser, Debug, Clone)]
pub struct SongsOptions {
    #[clap(long)]
    user: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ZipOptions {
    /// Songs as "title|artist", can be repeated
    #[clap(required = true)]
    selections: Vec<String>,
    #[clap(long, default_value = ARCHIVE_NAME)]
    output: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(opt) => cli::serve(opt.open).await,
        Command::Register(opt) => cli::register(opt.username, opt.password).await,
        Command::Import(opt) => cli::import(opt.link, opt.user).await,
        Command::Songs(opt) => cli::songs(opt.user).await,
        Command::Zip(opt) => cli::zip(opt.selections, opt.output).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
