use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use log::LevelFilter;
use mission_core::AppState;
use mission_engine::{ReqwestGateway, SessionHandle};
use mission_logging::{mission_error, mission_info, LogDestination};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::config::MonitorConfig;
use super::ui::input::{parse_command, UiCommand};
use super::ui::render::{help_lines, render, role_catalog_lines, RenderCursor};

/// Selects the diagnostic log level (`error` .. `trace`).
const LOG_LEVEL_ENV: &str = "MISSION_MONITOR_LOG";
/// Stdin reads cannot be cancelled; don't wait on one at exit.
const RUNTIME_SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

pub fn run_app() -> anyhow::Result<()> {
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|raw| raw.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);
    // The terminal is the UI, so diagnostics go to the log file only.
    mission_logging::initialize(LogDestination::default(), level);

    let config = MonitorConfig::load()?;
    mission_info!("Mission monitor starting against {}", config.api_base_url);

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let result = runtime.block_on(run_console(config));
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_GRACE);

    if let Err(err) = &result {
        mission_error!("Mission monitor failed: {:#}", err);
    }
    result
}

async fn run_console(config: MonitorConfig) -> anyhow::Result<()> {
    let gateway = ReqwestGateway::new(config.gateway_settings())?;
    println!("Monitoring agent at {}", gateway.base_url());

    let handle = SessionHandle::spawn(
        Arc::new(gateway),
        AppState::with_settings(config.core_settings()),
        config.session_config(),
    );
    let mut views = handle.subscribe();
    let mut cursor = RenderCursor::default();

    print_lines(help_lines());
    print_lines(render(&views.borrow_and_update(), &mut cursor));

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    mission_error!("Monitor session ended unexpectedly");
                    break;
                }
                let lines = render(&views.borrow_and_update(), &mut cursor);
                print_lines(lines);
            }
            line = input.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(Some(UiCommand::Quit)) => break,
                    Ok(Some(command)) => apply_command(&handle, command),
                    Ok(None) => {}
                    Err(message) => println!("{message}"),
                }
            }
        }
    }

    handle.shutdown().await;
    mission_info!("Mission monitor stopped");
    Ok(())
}

fn apply_command(handle: &SessionHandle, command: UiCommand) {
    match command {
        UiCommand::Launch => handle.launch(),
        UiCommand::Toggle(role) => handle.toggle_role(role),
        UiCommand::Location(location) => handle.set_location(location),
        UiCommand::Language(language) => handle.select_language(language),
        UiCommand::Refresh => handle.refresh_jobs(),
        UiCommand::Export => handle.export_report(),
        UiCommand::Roles => print_lines(role_catalog_lines(&handle.view().filters)),
        UiCommand::Help => print_lines(help_lines()),
        UiCommand::Quit => {}
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}
