use client_core::{ViewState, VoteControls};
use shared::domain::VoteOption;

const MISSING_COUNT: &str = "-";

pub fn render_counts(view: &ViewState) -> String {
    VoteOption::ALL
        .iter()
        .map(|option| {
            let count = view
                .results
                .map(|results| results.count(*option).to_string())
                .unwrap_or_else(|| MISSING_COUNT.to_string());
            format!("Option {}: {count}", option.short_label())
        })
        .collect::<Vec<_>>()
        .join("   ")
}

pub fn render_status(view: &ViewState) -> String {
    format!("Status: {}", view.status)
}

pub fn render_controls(controls: &VoteControls) -> String {
    let mut labels: Vec<String> = controls.iter().map(|control| control.label()).collect();
    labels.push("[q] Quit".to_string());
    labels.join("  ")
}

pub fn render_view(view: &ViewState, controls: &VoteControls) -> String {
    format!(
        "{}\n{}\n{}",
        render_counts(view),
        render_status(view),
        render_controls(controls)
    )
}
