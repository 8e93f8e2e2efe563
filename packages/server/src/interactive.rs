//! Interactive mode for the server.
//!
//! Prompts for bind address, port and database path before starting the
//! server.

use dialoguer::{Confirm, Input};

use crate::config::{DEFAULT_BIND_ADDR, DEFAULT_PORT};

/// Runs the server in interactive mode, prompting for configuration.
///
/// Sets `BIND_ADDR`, `PORT` and `ARREST_MAP_DB` from the answers and
/// delegates to [`super::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("Arrest Map Server");
    println!();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(DEFAULT_BIND_ADDR.to_string())
        .interact_text()
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let port_str: String = Input::new()
        .with_prompt("Port")
        .default(DEFAULT_PORT.to_string())
        .interact_text()
        .unwrap_or_else(|_| DEFAULT_PORT.to_string());

    let db_path: String = Input::new()
        .with_prompt("Database path")
        .default(arrest_map_store::db_path_from_env().display().to_string())
        .interact_text()
        .unwrap_or_else(|_| arrest_map_store::DEFAULT_DB_PATH.to_string());

    // SAFETY: We are single-threaded at this point (before server starts) and
    // these variables are only read once during server initialisation.
    unsafe {
        std::env::set_var("BIND_ADDR", &bind_addr);
        std::env::set_var("PORT", &port_str);
        std::env::set_var("ARREST_MAP_DB", &db_path);
    }

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port_str}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server().await
}
