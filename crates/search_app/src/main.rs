mod cli;
mod controller;
mod render;

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use search_core::{MemoryLocation, PageLocation};
use search_engine::EngineHandle;
use search_logging::{search_info, search_warn};

use crate::cli::Cli;
use crate::controller::SearchController;
use crate::render::Printer;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const DRAIN_TIMEOUT: Duration = Duration::from_secs(60);

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    search_logging::initialize(cli.log.into(), cli.log_level);

    let settings = cli.search_settings()?;
    let location = MemoryLocation::parse(&cli.page_url)
        .with_context(|| format!("invalid page url {:?}", cli.page_url))?;
    search_info!("search endpoint {}", settings.base_url);
    let engine = EngineHandle::new(settings)?;

    let mut controller = SearchController::new(location, engine);
    controller.mount();
    run(&mut controller, cli.json)
}

fn run(controller: &mut SearchController<MemoryLocation>, json: bool) -> anyhow::Result<()> {
    let (line_tx, line_rx) = mpsc::channel::<String>();
    // Blocking stdin reads stay off the UI loop.
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut printer = Printer::new(json);
    if !controller.view().input_text.is_empty() {
        writeln!(out, "> {}", controller.view().input_text)?;
    }

    let mut input_open = true;
    loop {
        if controller.consume_dirty() {
            printer.print(&mut out, &controller.view(), controller.fetch_state())?;
        }

        if input_open {
            match line_rx.try_recv() {
                Ok(line) => {
                    let href_before = controller.location().href();
                    controller.submit(&line);
                    let href = controller.location().href();
                    if href != href_before && !json {
                        writeln!(out, "location: {href}")?;
                    }
                    continue;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => input_open = false,
            }
        } else {
            if !controller.wait_until_settled(DRAIN_TIMEOUT) {
                search_warn!("gave up waiting for the last search to settle");
            }
            if controller.consume_dirty() {
                printer.print(&mut out, &controller.view(), controller.fetch_state())?;
            }
            break;
        }

        controller.pump(POLL_INTERVAL);
    }

    out.flush()?;
    Ok(())
}
