//! Gate-side commands: payload inspection and token verification.

use std::io::{self, BufRead};

use messgate_client::GateWorkflow;
use messgate_core::{extract_token_id, GateState, StatusBadge};

use super::CliError;
use crate::config::ServiceArgs;
use crate::output::{format_gate_state, severity_tag};

pub fn extract(text: &str) -> Result<(), CliError> {
    let token_id = extract_token_id(text);
    if token_id.is_empty() {
        return Err(CliError::NoTokenInScan);
    }
    println!("{token_id}");
    Ok(())
}

pub fn classify(status: &str) -> Result<(), CliError> {
    let badge = StatusBadge::for_raw(status);
    println!(
        "{} {:?} [{}]",
        badge.label,
        badge.status,
        severity_tag(badge.severity)
    );
    Ok(())
}

/// Verifies a typed token id; exits 1 unless entry is allowed.
pub async fn verify(service: &ServiceArgs, token: String) -> Result<(), CliError> {
    let workflow = GateWorkflow::new(service.connect()?);
    workflow.set_manual_input(token);
    let state = workflow.submit().await?;
    println!("{}", format_gate_state(&state));

    if !matches!(state, GateState::Allowed { .. }) {
        std::process::exit(1);
    }
    Ok(())
}

/// Verifies each stdin line as a decoded scan.
pub async fn scan(service: &ServiceArgs) -> Result<(), CliError> {
    let workflow = GateWorkflow::new(service.connect()?);
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match workflow.scan(&line).await {
            Some(state) => println!("{}", format_gate_state(&state)),
            None => eprintln!("No token id found in scan"),
        }
    }
    Ok(())
}
