//! General Discord commands - ping and help.
//! This module contains simple commands that don't require database operations
//! and are open to everyone, staff or not.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = format!(
            "**{} Help**\n\
            Here is a summary of all available commands.\n\n\
            **Till**\n\
            • `/cart add <book>` - Adds one copy of a book to your cart.\n\
            • `/cart set|increase|decrease <line>` - Changes the quantity of a line.\n\
            • `/cart total` - Recomputes the cart total.\n\
            • `/cart show` / `/cart clear` - Shows or empties your cart.\n\
            • `/cart checkout` - Records the sale.\n\n\
            **Catalog**\n\
            • `/book add|edit|cover` - Maintains the catalog.\n\
            • `/book list [genre] [search]` / `/book show <book>` - Browses it.\n\n\
            **Sales**\n\
            • `/sales list [from] [to] [title]` - Lists sales.\n\
            • `/sales day <date>` / `/sales show <id>` - Looks up sales.\n\n\
            **Utility**\n\
            • `/ping` - Checks if the bot is responsive.\n\
            • `/help` - Shows this help message.",
            ctx.data().store.name
        );

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
