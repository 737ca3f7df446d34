use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing::info;

use docktui::app::App;
use docktui::cli::{Cli, Commands};
use docktui::core::docker::TailSpec;
use docktui::core::{DockerEngine, Engine};
use docktui::utils::{filter_containers, format_bytes, logging, short_id, AppConfig};

const MISSING_ID: &str = "Please provide a container ID.";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The dashboard owns the terminal, so it installs its own file logger
    if cli.command != Some(Commands::Ui) {
        logging::init_cli();
    }

    let config = AppConfig::load(cli.config.as_deref());
    let engine = DockerEngine::new();

    match cli.command {
        None => {
            Cli::command().print_help()?;
            println!();
        }
        Some(Commands::List { running, name, json }) => {
            handle_list(&engine, &config, running, name, json).await?;
        }
        Some(Commands::Start { id }) => match id {
            Some(id) => handle_start(&engine, &config, &id).await?,
            None => println!("{}", MISSING_ID),
        },
        Some(Commands::Stop { id }) => match id {
            Some(id) => handle_stop(&engine, &config, &id).await?,
            None => println!("{}", MISSING_ID),
        },
        Some(Commands::Logs { id, tail }) => match id {
            Some(id) => {
                let tail = tail.unwrap_or_else(|| config.logs_tail());
                handle_logs(&engine, &id, tail).await?;
            }
            None => println!("{}", MISSING_ID),
        },
        Some(Commands::Inspect { id }) => match id {
            Some(id) => handle_inspect(&engine, &id).await?,
            None => println!("{}", MISSING_ID),
        },
        Some(Commands::Images) => {
            handle_images(&engine, &config).await?;
        }
        Some(Commands::Ui) => {
            logging::init_dashboard()?;
            let mut app = App::new(engine, &config);
            app.run().await?;
        }
    }

    Ok(())
}

async fn handle_list(
    engine: &impl Engine,
    config: &AppConfig,
    running: bool,
    name: Option<String>,
    json: bool,
) -> Result<()> {
    // Flags extend the configured defaults
    let running = running || config.list.running;
    let json = json || config.list.json;
    let name = name.unwrap_or_else(|| config.list.name.clone());

    let containers = engine.list_containers().await?;
    let containers = filter_containers(containers, running, &name);
    info!(count = containers.len(), running, filter = %name, "listing containers");

    if json {
        println!("{}", serde_json::to_string_pretty(&containers)?);
        return Ok(());
    }

    if containers.is_empty() {
        println!("No containers found.");
        return Ok(());
    }

    println!(
        "{}",
        format!("{:<14} {:<30} {:<28} {}", "CONTAINER ID", "IMAGE", "STATUS", "NAMES")
            .color(config.ui.accent_color.as_str())
            .bold()
    );

    for container in &containers {
        let status = format!("{:<28}", container.status);
        println!(
            "{:<14} {:<30} {} {}",
            container.short_id(),
            container.image,
            status.color(container.state().cli_color()),
            container.names.join(",")
        );
    }

    Ok(())
}

async fn handle_start(engine: &impl Engine, config: &AppConfig, id: &str) -> Result<()> {
    engine
        .start_container(id)
        .await
        .with_context(|| format!("Failed to start container {}", id))?;

    println!(
        "{}",
        format!("Container {} started.", id).color(config.ui.status_color.as_str())
    );
    Ok(())
}

async fn handle_stop(engine: &impl Engine, config: &AppConfig, id: &str) -> Result<()> {
    engine
        .stop_container(id)
        .await
        .with_context(|| format!("Failed to stop container {}", id))?;

    println!(
        "{}",
        format!("Container {} stopped.", id).color(config.ui.status_color.as_str())
    );
    Ok(())
}

async fn handle_logs(engine: &impl Engine, id: &str, tail: TailSpec) -> Result<()> {
    let logs = engine
        .fetch_logs(id, tail)
        .await
        .with_context(|| format!("Failed to fetch logs for {}", id))?;

    print!("{}", logs);
    Ok(())
}

async fn handle_inspect(engine: &impl Engine, id: &str) -> Result<()> {
    let info = engine
        .inspect_container(id)
        .await
        .with_context(|| format!("Failed to inspect container {}", id))?;

    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

async fn handle_images(engine: &impl Engine, config: &AppConfig) -> Result<()> {
    let images = engine.list_images().await?;

    if images.is_empty() {
        println!("No images found.");
        return Ok(());
    }

    println!(
        "{}",
        format!("{:<14} {:<50} {}", "IMAGE ID", "REPOSITORY:TAG", "SIZE")
            .color(config.ui.accent_color.as_str())
            .bold()
    );

    for image in &images {
        let tags = if image.repo_tags.is_empty() {
            "<none>".to_string()
        } else {
            image.repo_tags.join(", ")
        };
        println!(
            "{:<14} {:<50} {}",
            short_id(&image.id),
            tags,
            format_bytes(image.size)
        );
    }

    Ok(())
}
