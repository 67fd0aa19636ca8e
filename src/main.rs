// Copyright 2023 Remi Bernotavicius

use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

mod database;
mod ui;
mod workflow;

type Error = Box<dyn std::error::Error + Send + Sync + 'static>;
type Result<T> = std::result::Result<T, Error>;

#[derive(Parser, Debug)]
struct Args {
    /// Use this database file instead of the one in the user data directory.
    #[arg(long)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    commands: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Open the application window (the default).
    Run,
    AddStore {
        name: String,
    },
    AddUnit {
        name: String,
    },
}

/// This is where the database and other user-data lives on-disk. On Linux it should be like:
/// `~/.local/share/recipe_manager/`
fn data_path() -> Result<PathBuf> {
    let dirs = directories::BaseDirs::new().ok_or("failed to get user home directory")?;
    let path = dirs.data_dir().join("recipe_manager");
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

fn run(conn: database::Connection) -> Result<()> {
    let native_options = eframe::NativeOptions {
        window_builder: Some(Box::new(|mut b: egui::viewport::ViewportBuilder| {
            b.maximized = Some(true);
            b
        })),
        ..Default::default()
    };
    eframe::run_native(
        "Recipe Manager",
        native_options,
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(ui::RecipeManager::new(conn)))
        }),
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

fn main() -> Result<()> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()?;

    let args = Args::parse();
    let path = match args.database {
        Some(path) => path,
        None => data_path()?.join("data.sqlite"),
    };
    let mut conn = database::establish_connection(&path)?;
    match args.commands.unwrap_or(Commands::Run) {
        Commands::Run => run(conn)?,
        Commands::AddStore { name } => {
            let id = workflow::catalog::add_store(&mut conn, &name)?;
            log::info!("added store {id} {name:?}");
        }
        Commands::AddUnit { name } => {
            let id = workflow::catalog::add_unit(&mut conn, &name)?;
            log::info!("added unit {id} {name:?}");
        }
    }
    Ok(())
}
