use awesome_api::{AwesomeAPI, FETCH_DEADLINE};
use dotenvy::dotenv;
use log::{error, info};
use quote_store::{QuoteStore, SqliteQuoteStore};
use std::{env, error::Error, process::exit, sync::Arc};

use actix_web::{App, HttpServer, middleware::Logger, web};

mod service;

const DEFAULT_BIND: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "sqlite://currency_data.db";

#[derive(Debug)]
struct Config {
    bind: String,
    port: u16,
    workers: Option<usize>,
    database_url: String,
    upstream_url: Option<String>,
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

        let port = match var("COTACAO_SERVER_PORT") {
            Some(port) => port.trim().parse()?,
            None => DEFAULT_PORT,
        };

        let workers = match var("COTACAO_SERVER_WORKERS") {
            Some(workers) => Some(workers.trim().parse::<usize>()?.max(1)),
            None => None,
        };

        let config = Config {
            bind: var("COTACAO_SERVER_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port,
            workers,
            database_url: var("COTACAO_DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            upstream_url: var("COTACAO_UPSTREAM_URL"),
        };
        Ok(config)
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let config = match Config::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Could not create config: {}", e);
            exit(1);
        }
    };

    let api = match &config.upstream_url {
        Some(url) => AwesomeAPI::with_base_url(url, FETCH_DEADLINE),
        None => AwesomeAPI::new(),
    };
    let api = match api {
        Ok(api) => api,
        Err(e) => {
            error!("Could not create quote provider client: {}", e);
            exit(1);
        }
    };

    let store = match SqliteQuoteStore::connect(&config.database_url).await {
        Ok(store) => store,
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    };

    let api = web::Data::new(api);
    let store: web::Data<dyn QuoteStore> = web::Data::from(Arc::new(store) as Arc<dyn QuoteStore>);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(api.clone())
            .app_data(store.clone())
            .configure(service::config)
            .default_service(web::to(service::not_found))
            .wrap(Logger::default())
    })
    .bind((config.bind.as_str(), config.port))?;

    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    info!("serving quotes on {}:{}", config.bind, config.port);
    server.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, Box<dyn Error>> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn config_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.workers, None);
        assert_eq!(config.database_url, "sqlite://currency_data.db");
        assert_eq!(config.upstream_url, None);
    }

    #[test]
    fn config_overrides() {
        let config = config_from(&[
            ("COTACAO_SERVER_BIND", "127.0.0.1"),
            ("COTACAO_SERVER_PORT", " 9090 "),
            ("COTACAO_SERVER_WORKERS", "4"),
            ("COTACAO_DATABASE_URL", "sqlite::memory:"),
            ("COTACAO_UPSTREAM_URL", "http://localhost:1234"),
        ])
        .unwrap();
        assert_eq!(config.bind, "127.0.0.1");
        assert_eq!(config.port, 9090);
        assert_eq!(config.workers, Some(4));
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.upstream_url.as_deref(), Some("http://localhost:1234"));
    }

    #[test]
    fn config_zero_workers_means_one() {
        let config = config_from(&[("COTACAO_SERVER_WORKERS", "0")]).unwrap();
        assert_eq!(config.workers, Some(1));
    }

    #[test]
    fn config_blank_values_fall_back() {
        let config = config_from(&[("COTACAO_SERVER_BIND", "  "), ("COTACAO_UPSTREAM_URL", "")]).unwrap();
        assert_eq!(config.bind, "0.0.0.0");
        assert_eq!(config.upstream_url, None);
    }

    #[test]
    fn config_rejects_bad_port() {
        assert!(config_from(&[("COTACAO_SERVER_PORT", "eighty")]).is_err());
        assert!(config_from(&[("COTACAO_SERVER_PORT", "70000")]).is_err());
    }
}
