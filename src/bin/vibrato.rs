//! Vibrato sync CLI binary.
//!
//! A command-line interface for interacting with a Vibrato sync server.

use clap::Parser;
use serde_json::Value;
use std::process::ExitCode;
use tabled::Table;
use vibrato_sync::cli::{Cli, Command};
use vibrato_sync::output::{PrettyPrint, ResourceRow};
use vibrato_sync::{ResourceType, VibratoClient, VibratoError};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match build_client(&cli).await {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set VIBRATO_API_URL to an absolute http(s) URL");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if let VibratoError::ConfigMissing(_) = e {
                eprintln!("Hint: Run 'vibrato login <identifier>' and set VIBRATO_TOKEN");
            }
            ExitCode::FAILURE
        }
    }
}

async fn build_client(cli: &Cli) -> vibrato_sync::Result<VibratoClient> {
    let client = VibratoClient::from_env()?;
    if let Some(url) = &cli.url {
        client.set_base_endpoint(url, true).await?;
    }
    if let Some(token) = &cli.token {
        client.set_token(token.as_str());
    }
    Ok(client)
}

async fn run(client: &VibratoClient, cli: Cli) -> vibrato_sync::Result<()> {
    match cli.command {
        Command::Login {
            identifier,
            password,
        } => {
            let status = client.login(&identifier, &password).await;
            if cli.json {
                let mut report = serde_json::to_value(&status).unwrap_or_default();
                report["token"] = serde_json::json!(client.token());
                println!("{}", to_pretty(&report));
            } else if status.success {
                println!("{}", client.token().unwrap_or_default());
            }
            if status.success {
                Ok(())
            } else {
                Err(match status.http_status {
                    Some(code) => VibratoError::Server {
                        status: code,
                        detail: status.error_message,
                    },
                    None => VibratoError::Transport {
                        detail: status.error_message,
                    },
                })
            }
        }
        Command::Ping => {
            let status = client.check_endpoint().await?;
            println!("{} answered with HTTP {}", client.base_endpoint(), status);
            Ok(())
        }
        Command::List { entity } => {
            let items = client.resources(entity.into()).list().await?;
            output_list(&items, cli.json);
            Ok(())
        }
        Command::Get { entity, sync_hash } => {
            let item = client.resources(entity.into()).get(&sync_hash).await?;
            output_single(&item, cli.json);
            Ok(())
        }
        Command::Create { entity, data } => {
            let body = parse_data(&data)?;
            let item = client.resources(entity.into()).create(body).await?;
            output_single(&item, cli.json);
            Ok(())
        }
        Command::Update {
            entity,
            sync_hash,
            data,
            replace,
        } => {
            let body = parse_data(&data)?;
            let resources = client.resources(entity.into());
            let item = if replace {
                resources.replace(&sync_hash, body).await?
            } else {
                resources.update(&sync_hash, body).await?
            };
            output_single(&item, cli.json);
            Ok(())
        }
        Command::Delete { entity, sync_hash } => {
            client.resources(entity.into()).delete(&sync_hash).await?;
            let kind: ResourceType = entity.into();
            if !cli.json {
                println!("Deleted {} from {}", sync_hash, kind);
            }
            Ok(())
        }
    }
}

fn parse_data(data: &str) -> vibrato_sync::Result<Value> {
    match serde_json::from_str::<Value>(data) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(VibratoError::ConfigMissing(
            "item data must be a JSON object".to_string(),
        )),
        Err(e) => Err(VibratoError::ConfigMissing(format!(
            "item data is not valid JSON: {e}"
        ))),
    }
}

fn output_single(item: &Value, json: bool) {
    if json {
        println!("{}", to_pretty(item));
    } else {
        println!("{}", item.pretty_print());
    }
}

fn output_list(items: &Value, json: bool) {
    match items.as_array() {
        Some(list) if !json => {
            let rows: Vec<ResourceRow> = list.iter().map(ResourceRow::from).collect();
            println!("{}", Table::new(rows));
            println!("\n{} items", list.len());
        }
        _ => println!("{}", to_pretty(items)),
    }
}

fn to_pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
