//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the BookBuddy application,
//! including all slash commands, autocomplete handlers, and bot context management.

/// Discord command implementations (book, cart, sales, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;
/// Pure rendering and argument parsing helpers
pub mod views;

use crate::{
    config::{staff::StaffRoster, store::StoreConfig},
    core::{search::SearchSequencer, session::CartSessions},
    errors::{Error, Result},
};
use chrono::FixedOffset;
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{debug, error, info, warn};

/// Commands anyone may run, even when not on the staff roster
const OPEN_COMMANDS: [&str; 2] = ["ping", "help"];

/// Shared data available to all bot commands.
/// This structure holds the database connection, the shop settings and the
/// in-memory till state.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Shop settings from config.toml
    pub store: StoreConfig,
    /// The shop's offset from UTC, resolved from `store`
    pub offset: FixedOffset,
    /// Who may use the bot
    pub staff: StaffRoster,
    /// Carts in progress, one per staff member
    pub carts: CartSessions,
    /// Latest-wins sequencing for catalog autocomplete
    pub searches: SearchSequencer,
}

impl BotData {
    /// Creates a new `BotData` instance with empty till state.
    ///
    /// # Errors
    /// Returns an error if the configured UTC offset is out of range.
    pub fn new(
        database: DatabaseConnection,
        store: StoreConfig,
        staff: StaffRoster,
    ) -> Result<Self> {
        let offset = store.utc_offset()?;
        Ok(Self {
            database,
            store,
            offset,
            staff,
            carts: CartSessions::new(),
            searches: SearchSequencer::new(),
        })
    }

    /// Formats an amount with the shop's currency symbol.
    #[must_use]
    pub fn money(&self, amount: rust_decimal::Decimal) -> String {
        crate::core::money::format_amount(&self.store.currency_symbol, amount)
    }
}

/// Whether `user_id` may run the command with the given qualified name.
fn command_allowed(staff: &StaffRoster, command: &str, user_id: &str) -> bool {
    OPEN_COMMANDS.contains(&command) || staff.permits(user_id)
}

/// Lets only rostered staff run commands other than `ping` and `help`.
async fn staff_check(ctx: poise::Context<'_, BotData, Error>) -> Result<bool> {
    let user_id = ctx.author().id.to_string();
    if command_allowed(&ctx.data().staff, &ctx.command().qualified_name, &user_id) {
        return Ok(true);
    }

    warn!(user_id, command = %ctx.command().qualified_name, "Rejected command from non-staff user");
    ctx.say(format!("❌ {}", Error::NotStaff { user_id })).await?;
    Ok(false)
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            let reply = if error.is_user_facing() {
                debug!("Command `{}` rejected input: {error}", ctx.command().name);
                format!("❌ {error}")
            } else {
                error!("Error in command `{}`: {error:?}", ctx.command().name);
                "❌ Something went wrong talking to the store. Please try again.".to_string()
            };
            if let Err(e) = ctx.say(reply).await {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Connects to Discord and serves commands until the client stops.
///
/// # Errors
/// Returns an error if the configuration is invalid or the client fails.
pub async fn run_bot(
    token: &str,
    store: StoreConfig,
    staff: StaffRoster,
    database: DatabaseConnection,
) -> Result<()> {
    if staff.is_open() {
        warn!("STAFF_USER_IDS is empty; every Discord user can use the till");
    } else {
        info!("Staff roster has {} members", staff.len());
    }
    let data = BotData::new(database, store, staff)?;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            on_error: |error| Box::pin(on_error(error)),
            command_check: Some(|ctx| Box::pin(staff_check(ctx))),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;
