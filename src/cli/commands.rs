//! Subcommand execution

use std::io::Write;

use anyhow::{bail, Context};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::setting::{BackendType, SettingFilter, SettingSubmission, Settings};
use crate::infrastructure::logging;

use super::{Cli, Command};

/// Loads configuration, opens the backend and runs the parsed command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().context("Failed to load configuration")?;

    if let Some(backend) = cli.backend {
        config.settings.backend = Some(backend);
    }

    // Warming is an explicit command here, not a side effect of every invocation
    config.settings.warm_cache_on_start = false;

    logging::init_logging(&config.logging);

    let settings = crate::create_settings(&config).await?;
    let mut stdout = std::io::stdout().lock();

    execute(&settings, cli.command, &mut stdout).await
}

/// Runs one command against `settings`, writing its output to `out`
pub async fn execute<W: Write>(
    settings: &Settings,
    command: Command,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Command::Get { name } => match settings.get(&name).await? {
            Some(value) => writeln!(out, "{}", value)?,
            None => bail!("Setting '{}' has no value", name),
        },
        Command::Set { name, value } => {
            let value = settings.editor().update(&name, &value).await?;
            writeln!(out, "{} = {}", name, value)?;
        }
        Command::Define {
            name,
            kind,
            value,
            app,
        } => {
            let mut submission = SettingSubmission::new(name.clone(), kind, value);

            if let Some(app) = app {
                submission = submission.with_app(app);
            }

            let value = settings.editor().submit(submission).await?;
            writeln!(out, "{} = {}", name, value)?;
        }
        Command::Delete { name } => {
            if !settings.backend().delete(&name).await? {
                bail!("Setting '{}' does not exist", name);
            }
            writeln!(out, "Deleted {}", name)?;
        }
        Command::List { apps } => {
            let filter = if apps.is_empty() {
                settings.filter().clone()
            } else {
                SettingFilter::apps(apps)
            };

            let mut listed = settings.backend().get_all(&filter).await?;
            listed.sort_by(|a, b| a.name().as_str().cmp(b.name().as_str()));

            for setting in listed {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    setting.name(),
                    setting.kind(),
                    setting.app().unwrap_or("-"),
                    setting.value()
                )?;
            }
        }
        Command::Warm => {
            if settings.backend_type() != BackendType::Cache {
                bail!(
                    "Warming requires the cache backend, current backend is '{}'",
                    settings.backend_type()
                );
            }

            let count = settings.backend().warm_up().await?;
            info!(count, "Settings cache warmed");
            writeln!(out, "Cached {} settings", count)?;
        }
    }

    Ok(())
}
