//! Interactive loop: polls in the background, redraws on every controller
//! event and turns typed lines into votes.

use std::sync::Arc;

use anyhow::{Context, Result};
use client_core::{PollVoteController, VoteControls};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
};
use tracing::{debug, info};

use crate::ui::{
    input::{parse_line, TerminalCommand},
    render::render_view,
};

pub async fn run_watch(controller: Arc<PollVoteController>, controls: VoteControls) -> Result<()> {
    let mut events = controller.subscribe_events();
    let mut poller = controller.start();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    redraw(&controller, &controls);
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    debug!(?event, "controller event");
                    redraw(&controller, &controls);
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "render fell behind controller events");
                    redraw(&controller, &controls);
                }
                Err(RecvError::Closed) => break,
            },
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read from stdin")? else {
                    break;
                };
                match parse_line(&line, &controls) {
                    TerminalCommand::Vote(control) => {
                        let controller = Arc::clone(&controller);
                        tokio::spawn(async move {
                            let outcome = control.trigger(&controller).await;
                            debug!(option = control.option().as_str(), ?outcome, "vote finished");
                        });
                    }
                    TerminalCommand::Quit => break,
                    TerminalCommand::Help => println!("{}", help_text(&controls)),
                    TerminalCommand::Redraw => redraw(&controller, &controls),
                    TerminalCommand::Unknown(input) => {
                        println!("Unrecognised input '{input}'. {}", help_text(&controls));
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poller.stop();
    info!("watch session ended");
    Ok(())
}

fn redraw(controller: &PollVoteController, controls: &VoteControls) {
    println!("\n{}", render_view(&controller.view(), controls));
}

fn help_text(controls: &VoteControls) -> String {
    let keys: Vec<String> = controls
        .iter()
        .map(|control| format!("'{}' votes for {}", control.key(), control.option()))
        .collect();
    format!("Type {}, or 'q' to quit.", keys.join(", "))
}
