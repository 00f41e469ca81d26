use std::{
    fs, io,
    path::Path,
    sync::{Arc, RwLock},
};

use actix_web::{web, App, HttpServer};
use clap::{crate_description, Parser, Subcommand};
use config::Config;
use log::{error, info};
use site::Site;

mod config;
mod error;
mod navigation;
mod page_compilers;
mod preferences;
mod registry;
mod routes;
mod site;
mod utils;
mod watcher;

#[derive(Parser)]
#[clap(author, version, about = crate_description!(), long_about=None)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a sample configuration file with all the values pre-filled
    CreateSampleConfig {
        /// Create the configuration file even if it already exists
        #[clap(long, takes_value = false)]
        force: bool,
    },
    /// Run the server
    Run,
}

const CONFIG_FILE_NAME: &str = "config.json";

macro_rules! clean_panic {
    ($message:literal$(,)? $($arg:expr),*) => {
        {
            use std::process;
            eprintln!($message, $($arg),*);
            process::exit(1);
        }
    }
}

fn create_sample_config(force: bool) -> io::Result<()> {
    let config_path = Path::new(CONFIG_FILE_NAME);
    if config_path.exists() && !force {
        clean_panic!(
            "`{:?}` already exists! To overwrite it, add a `--force` flag.",
            config_path
        );
    }
    let sample = serde_json::to_string_pretty(&Config::sample())
        .map_err(|error| io::Error::new(io::ErrorKind::Other, error))?;
    fs::write(config_path, sample)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Run => (),
        Command::CreateSampleConfig { force } => return create_sample_config(force),
    }

    let config = Config::read(Path::new(CONFIG_FILE_NAME)).unwrap_or_else(|error| {
        clean_panic!(
            "Configuration file couldn't be loaded! Consider creating a sample configuration \
            using `courses create-sample-config`, and then editing it. Details: {}",
            error
        );
    });
    if let Err(error) = utils::init_logger(&config.log_level) {
        clean_panic!("Logger couldn't be set up! Details: {}", error);
    }
    let (host_name, port) = (config.host_name.clone(), config.port);

    let site = Arc::new(RwLock::new(Site::load(config).unwrap_or_else(|error| {
        clean_panic!("The course catalog couldn't be loaded! Details: {}", error);
    })));

    let _watch_guard = match watcher::watch_articles(&site) {
        Ok(watch_guard) => Some(watch_guard),
        Err(error) => {
            error!(
                "Articles directories can't be watched, edits will need a restart. Details: {}",
                error
            );
            None
        }
    };

    info!("Serving on http://{}:{}", host_name, port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::from(site.clone()))
            .configure(routes::configure)
    })
    .bind((&host_name[..], port))?
    .run()
    .await
}
