//! Student-side commands.

use messgate_client::{GateApi, GENERATE_FAILED, LOAD_DATA_FAILED};
use messgate_core::{GatePass, StudentInfo, TokenId};

use super::{service_error, CliError};
use crate::config::ServiceArgs;
use crate::output::{format_event, format_token};

pub async fn generate(service: &ServiceArgs) -> Result<(), CliError> {
    let api = service.connect()?;
    let token = api
        .generate_token()
        .await
        .map_err(service_error(GENERATE_FAILED))?;
    println!("{}", format_token(&token));
    println!("Token generated. Show this QR at the entry gate.");
    Ok(())
}

/// Shows the caller's token; with a holder, prints the gate pass payload instead.
pub async fn my_token(service: &ServiceArgs, holder: Option<StudentInfo>) -> Result<(), CliError> {
    let api = service.connect()?;
    let Some(token) = api.my_token().await.map_err(service_error(LOAD_DATA_FAILED))? else {
        println!("No token generated yet.");
        return Ok(());
    };

    match holder {
        Some(student) => {
            let token_id = TokenId::parse(&token.token_id)?;
            println!("{}", GatePass::new(token_id, &student).encode());
        }
        None => println!("{}", format_token(&token)),
    }
    Ok(())
}

pub async fn active_event(service: &ServiceArgs) -> Result<(), CliError> {
    let api = service.connect()?;
    match api
        .active_event()
        .await
        .map_err(service_error(LOAD_DATA_FAILED))?
    {
        Some(event) => println!("{}", format_event(&event)),
        None => println!("No active event."),
    }
    Ok(())
}
