//! Config subcommand handlers.

use std::io::IsTerminal;
use std::path::PathBuf;

use dialoguer::{Input, Select};

use crate::cli::{ColorMode, ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config, DashboardSettings, Defaults, RiskSettings};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Pick one of a `ValueEnum`'s names, starting on `current`.
fn prompt_choice<T: clap::ValueEnum>(prompt: &str, current: &str) -> Result<String, CliError> {
    let names: Vec<String> = T::value_variants()
        .iter()
        .filter_map(|v| v.to_possible_value())
        .map(|p| p.get_name().to_owned())
        .collect();
    let default = names.iter().position(|n| n == current).unwrap_or(0);
    let selection = Select::new()
        .with_prompt(prompt)
        .items(&names)
        .default(default)
        .interact()
        .map_err(prompt_err)?;
    Ok(names.get(selection).cloned().unwrap_or_default())
}

fn prompt_number<T>(prompt: &str, default: T) -> Result<T, CliError>
where
    T: Clone + std::fmt::Display + std::str::FromStr,
    T::Err: std::fmt::Display + std::fmt::Debug,
{
    Input::new()
        .with_prompt(prompt)
        .default(default)
        .interact_text()
        .map_err(prompt_err)
}

/// Guided setup, starting from the built-in defaults.
fn wizard(path: &std::path::Path) -> Result<Config, CliError> {
    eprintln!("Connexia configuration");
    eprintln!("   Config path: {}\n", path.display());

    let base = Config::default();

    let output = prompt_choice::<OutputFormat>("Default output format", &base.defaults.output)?;
    let color = prompt_choice::<ColorMode>("Color", &base.defaults.color)?;

    let data: String = Input::new()
        .with_prompt("Dataset file (empty for the built-in sample)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;
    let data = data.trim();

    let order_window_days = prompt_number(
        "Flag orders due within (days)",
        base.risk.order_window_days,
    )?;
    let sla_threshold_hours = prompt_number(
        "Flag open cases due within (hours)",
        base.risk.sla_threshold_hours,
    )?;
    let activity_limit = prompt_number(
        "Recent events on the dashboard",
        base.dashboard.activity_limit,
    )?;

    let cfg = Config {
        defaults: Defaults {
            output,
            color,
            data: (!data.is_empty()).then(|| PathBuf::from(data)),
        },
        risk: RiskSettings {
            order_window_days,
            sla_threshold_hours,
        },
        dashboard: DashboardSettings { activity_limit },
    };

    // Reject thresholds now rather than on the next data command.
    connexia_config::risk_policy(&cfg)?;
    Ok(cfg)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::active_config_path(global);

    match args.command {
        // ── Init: guided setup ──────────────────────────────────────
        ConfigCommand::Init => {
            let interactive = std::io::stdin().is_terminal();
            if !interactive && !global.yes {
                return Err(CliError::NonInteractiveRequiresYes {
                    action: "config init".into(),
                });
            }

            if path.exists()
                && !util::confirm(
                    &format!("Overwrite existing config at {}?", path.display()),
                    global.yes,
                )?
            {
                eprintln!("Aborted; {} left unchanged", path.display());
                return Ok(());
            }

            // --yes takes every default without prompting.
            let cfg = if global.yes {
                Config::default()
            } else {
                wizard(&path)?
            };

            let written = config::save_config(&cfg, Some(&path))?;
            tracing::info!(path = %written.display(), "wrote config");
            if !global.quiet {
                eprintln!("Configuration written to {}", written.display());
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default(global.config.as_deref());
            let format = match global.output {
                Some(format) => format,
                None => config::parse_choice("defaults.output", &cfg.defaults.output)
                    .unwrap_or(OutputFormat::Table),
            };
            let text = toml::to_string_pretty(&cfg)?;
            let out = output::render_single(
                format,
                &cfg,
                |_| text.trim_end().to_owned(),
                |_| path.display().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }
    }
}
