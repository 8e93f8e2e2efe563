//! Interactive menu for inspecting and editing arrest data.
//!
//! The signed-in user lives in a [`Session`]; an observer echoes every
//! sign-in change to the terminal.

use std::collections::BTreeMap;

use arrest_map_admin::{AdminService, Session, User};
use arrest_map_region::valid_regions;
use arrest_map_stats::{CountValue, Snapshot};
use dialoguer::{Confirm, Input, Select};

use crate::output;

/// Top-level actions in the interactive menu.
enum Action {
    ShowSummary,
    ShowTable,
    LookUp,
    SignIn,
    SetCounts,
    DeleteRecord,
    AddMedia,
    ListMedia,
    DeleteMedia,
    StartServer,
    SignOut,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::ShowSummary,
        Self::ShowTable,
        Self::LookUp,
        Self::SignIn,
        Self::SetCounts,
        Self::DeleteRecord,
        Self::AddMedia,
        Self::ListMedia,
        Self::DeleteMedia,
        Self::StartServer,
        Self::SignOut,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::ShowSummary => "Show map summary",
            Self::ShowTable => "Show ranked table",
            Self::LookUp => "Look up a region",
            Self::SignIn => "Sign in",
            Self::SetCounts => "Set counts for a region",
            Self::DeleteRecord => "Delete a region's record",
            Self::AddMedia => "Add media",
            Self::ListMedia => "List media",
            Self::DeleteMedia => "Delete media",
            Self::StartServer => "Start server",
            Self::SignOut => "Sign out",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive menu until the user quits.
///
/// # Errors
///
/// Returns an error if a prompt fails or the server cannot start. Admin
/// operation failures are printed and the menu continues.
pub async fn run(
    service: AdminService,
    email: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Arrest Map");
    println!();

    let mut session = Session::new(service.identity().clone());
    session.subscribe(|user| {
        match user {
            Some(user) => println!("Signed in as {}", user.label()),
            None => println!("Signed out"),
        }
        Ok(())
    });

    if let Some(email) = email {
        session.set_user(Some(User::new(email)));
    }

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        println!();
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        let result = match Action::ALL[idx] {
            Action::ShowSummary => {
                output::print_summary(&load_snapshot(&service).await);
                Ok(())
            }
            Action::ShowTable => {
                output::print_table(&load_snapshot(&service).await.table());
                Ok(())
            }
            Action::LookUp => handle_look_up(&service).await,
            Action::SignIn => handle_sign_in(&mut session),
            Action::SetCounts => handle_set_counts(&service, &session).await,
            Action::DeleteRecord => handle_delete_record(&service, &session).await,
            Action::AddMedia => handle_add_media(&service, &session).await,
            Action::ListMedia => {
                output::print_media(&service.load_media().await.unwrap_or_else(|e| {
                    log::warn!("Showing no media: {e}");
                    BTreeMap::new()
                }));
                Ok(())
            }
            Action::DeleteMedia => handle_delete_media(&service, &session).await,
            Action::StartServer => {
                // The server uses actix-web's runtime, so we need to run it
                // in a blocking task to avoid nesting tokio runtimes.
                tokio::task::spawn_blocking(|| {
                    actix_web::rt::System::new().block_on(arrest_map_server::interactive::run())
                })
                .await??;
                return Ok(());
            }
            Action::SignOut => {
                session.set_user(None);
                Ok(())
            }
            Action::Quit => return Ok(()),
        };

        if let Err(e) = result {
            println!("Error: {e}");
        }
    }
}

/// Loads every record into a snapshot, showing empty data on failure.
pub async fn load_snapshot(service: &AdminService) -> Snapshot {
    match service.load_records().await {
        Ok(records) => Snapshot::build(records),
        Err(e) => {
            log::warn!("Could not load records, showing empty data: {e}");
            Snapshot::empty()
        }
    }
}

fn pick_region(prompt: &str) -> Result<String, Box<dyn std::error::Error>> {
    let regions = valid_regions();
    let idx = Select::new()
        .with_prompt(prompt)
        .items(&regions)
        .default(0)
        .interact()?;
    Ok(regions[idx].to_string())
}

async fn handle_look_up(service: &AdminService) -> Result<(), Box<dyn std::error::Error>> {
    let name: String = Input::new().with_prompt("Region name").interact_text()?;
    output::print_tooltip(&load_snapshot(service).await.tooltip(&name));
    Ok(())
}

fn handle_sign_in(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    let email: String = Input::new().with_prompt("Email").interact_text()?;
    session.set_user(Some(User::new(email.trim())));
    if !session.is_admin() {
        println!("This account cannot make changes.");
    }
    Ok(())
}

async fn handle_set_counts(
    service: &AdminService,
    session: &Session,
) -> Result<(), Box<dyn std::error::Error>> {
    let region = pick_region("Region")?;
    let arrests: String = Input::new().with_prompt("Arrests").interact_text()?;
    let fir: String = Input::new()
        .with_prompt("FIRs")
        .default("0".to_string())
        .interact_text()?;
    let additive = Confirm::new()
        .with_prompt("Add to the current counts?")
        .default(false)
        .interact()?;

    let update = service
        .set_counts(
            session,
            &region,
            &CountValue::Text(arrests),
            &CountValue::Text(fir),
            additive,
        )
        .await?;

    println!(
        "{} now has {} arrests and {} FIRs",
        update.region, update.arrests, update.fir
    );
    Ok(())
}

async fn handle_delete_record(
    service: &AdminService,
    session: &Session,
) -> Result<(), Box<dyn std::error::Error>> {
    let region = pick_region("Region to delete")?;

    if !Confirm::new()
        .with_prompt(format!("Delete the record for {region}?"))
        .default(false)
        .interact()?
    {
        println!("Cancelled.");
        return Ok(());
    }

    let region = service.delete_record(session, &region).await?;
    println!("Deleted {region}");
    Ok(())
}

async fn handle_add_media(
    service: &AdminService,
    session: &Session,
) -> Result<(), Box<dyn std::error::Error>> {
    let region = pick_region("Region")?;
    let url: String = Input::new().with_prompt("Link").interact_text()?;
    let title: String = Input::new().with_prompt("Title").interact_text()?;
    let kinds = ["article", "video"];
    let kind = Select::new()
        .with_prompt("Kind")
        .items(&kinds)
        .default(0)
        .interact()?;

    let id = service
        .add_media(session, &region, &url, &title, Some(kinds[kind]))
        .await?;
    println!("Added media {id}");
    Ok(())
}

async fn handle_delete_media(
    service: &AdminService,
    session: &Session,
) -> Result<(), Box<dyn std::error::Error>> {
    let media = service.load_media().await?;
    let items: Vec<_> = media.values().flatten().collect();
    if items.is_empty() {
        println!("No media found.");
        return Ok(());
    }

    let labels: Vec<String> = items
        .iter()
        .map(|item| format!("[{}] {}", item.region, item.title))
        .collect();
    let idx = Select::new()
        .with_prompt("Media to delete")
        .items(&labels)
        .default(0)
        .interact()?;

    service.delete_media(session, &items[idx].id).await?;
    println!("Deleted media {}", items[idx].id);
    Ok(())
}
