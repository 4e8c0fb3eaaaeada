//! Event form commands.

use messgate_client::{GateApi, CREATE_EVENT_FAILED};
use messgate_core::{DraftError, EventForm};
use tracing::info;

use super::{read_input, service_error, CliError};
use crate::config::ServiceArgs;
use crate::output::{format_json, format_report, report_json};

fn load_form(input: Option<String>) -> Result<EventForm, CliError> {
    let text = read_input(input)?;
    Ok(serde_json::from_str(&text)?)
}

/// Prints the validation report; exits 1 when the form cannot be submitted.
pub fn check(input: Option<String>, json_output: bool) -> Result<(), CliError> {
    let form = load_form(input)?;
    let report = form.report();

    if json_output {
        println!("{}", format_json(&report_json(&report)));
    } else {
        println!("{}", format_report(&report));
    }

    if !report.can_submit() {
        std::process::exit(1);
    }
    Ok(())
}

/// Validates the form and submits it.
pub async fn create(service: &ServiceArgs, input: Option<String>) -> Result<(), CliError> {
    let form = load_form(input)?;
    let payload = form.to_payload().map_err(|e| {
        if let DraftError::NotSubmittable(report) = &e {
            eprintln!("{}", format_report(report));
        }
        e
    })?;

    let api = service.connect()?;
    let message = api
        .create_event(&payload)
        .await
        .map_err(service_error(CREATE_EVENT_FAILED))?;
    info!(title = %payload.title, slots = payload.slots.len(), "event created");
    println!("{}", message.unwrap_or_else(|| "Event created".to_string()));
    Ok(())
}
