use dotenvy::dotenv;
use log::error;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use std::{env, error::Error, process::exit};

use crate::client::{CLIENT_DEADLINE, ClientError, QuoteClient};

mod client;
mod output;

const DEFAULT_SERVER_URL: &str = "http://localhost:8080/cotacao";
const DEFAULT_OUTPUT_PATH: &str = "cotacao.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveMode {
    Ask,
    Yes,
    No,
}

impl FromStr for SaveMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ask" => Ok(SaveMode::Ask),
            "yes" | "y" => Ok(SaveMode::Yes),
            "no" | "n" => Ok(SaveMode::No),
            other => Err(format!("unknown save mode `{}` (expected ask, yes or no)", other)),
        }
    }
}

#[derive(Debug)]
struct Config {
    server_url: String,
    deadline: Duration,
    output_path: PathBuf,
    save: SaveMode,
}

impl Config {
    fn new() -> Result<Config, Box<dyn Error>> {
        dotenv().ok();
        Config::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Config, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let deadline = match var("COTACAO_CLIENT_TIMEOUT_MS") {
            Some(ms) => Duration::from_millis(ms.trim().parse()?),
            None => CLIENT_DEADLINE,
        };

        let save = match var("COTACAO_SAVE") {
            Some(mode) => mode.parse()?,
            None => SaveMode::Ask,
        };

        let config = Config {
            server_url: var("COTACAO_SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            deadline,
            output_path: PathBuf::from(
                var("COTACAO_OUTPUT_PATH").unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string()),
            ),
            save,
        };
        Ok(config)
    }
}

fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let config = match Config::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Could not create config: {}", e);
            exit(1);
        }
    };

    let client = match QuoteClient::new(&config.server_url, config.deadline) {
        Ok(client) => client,
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    };

    let quote = match client.request_quote() {
        Ok(quote) => quote,
        Err(e @ ClientError::Timeout) => {
            println!("{}", e);
            return;
        }
        Err(ClientError::Status { status, body }) => {
            println!("Error: received status {}", status);
            println!("Error: response body {}", body);
            return;
        }
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    };

    println!("{}", quote);

    let save = match config.save {
        SaveMode::Yes => true,
        SaveMode::No => false,
        SaveMode::Ask => {
            match output::confirm_save(&mut io::stdin().lock(), &mut io::stdout()) {
                Ok(confirmed) => confirmed,
                Err(e) => {
                    error!("Error reading input: {}", e);
                    false
                }
            }
        }
    };

    if save {
        match output::save_quote(&config.output_path, &quote) {
            Ok(()) => println!("Data saved successfully!"),
            Err(e) => error!("Error writing to file: {}", e),
        }
    }
}
