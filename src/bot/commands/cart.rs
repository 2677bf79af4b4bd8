//! Till Discord commands - the `/cart` family.
//!
//! Each staff member has their own cart. Books are selected from the catalog,
//! quantities are adjusted per line, `/cart total` recomputes the total and
//! `/cart checkout` records the sale.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::book::resolve_book, handlers::autocomplete, views},
        core::cart::{BookId, Cart, checkout},
        errors::{Error, Result},
    };
    use tracing::error;

    /// Parent command for the till.
    #[poise::command(
        slash_command,
        subcommands(
            "cart_add",
            "cart_set",
            "cart_increase",
            "cart_decrease",
            "cart_total",
            "cart_show",
            "cart_clear",
            "cart_checkout"
        )
    )]
    pub async fn cart(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Till command. Available subcommands:\n\
            `/cart add` - Add one copy of a book\n\
            `/cart set` - Set the quantity of a line\n\
            `/cart increase` / `/cart decrease` - Change a line by one\n\
            `/cart total` - Recompute the total\n\
            `/cart show` - Show the cart\n\
            `/cart clear` - Empty the cart\n\
            `/cart checkout` - Record the sale";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds one copy of a catalog book to your cart.
    #[poise::command(slash_command, rename = "add")]
    pub async fn cart_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Book to add"]
        #[autocomplete = "autocomplete::autocomplete_book"]
        book: String,
    ) -> Result<()> {
        let data = ctx.data();
        let book = resolve_book(&data.database, &book).await?;

        let handle = data.carts.session(&ctx.author().id.to_string()).await;
        let mut cart = handle.lock().await;
        let line = cart.select_book(&book)?;
        let message = format!(
            "🛒 '{}' is in the cart (quantity {}). Use `/cart total` to update the total.",
            line.title, line.quantity
        );

        ctx.say(message).await?;
        Ok(())
    }

    /// Sets the quantity of a line in your cart. Zero keeps the line.
    #[poise::command(slash_command, rename = "set")]
    pub async fn cart_set(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Line to change"]
        #[autocomplete = "autocomplete::autocomplete_cart_line"]
        line: String,
        #[description = "New quantity"] quantity: i64,
    ) -> Result<()> {
        change_line(ctx, &line, |cart, id| cart.set_quantity(id, quantity).map(|_| ())).await
    }

    /// Adds one to the quantity of a line in your cart.
    #[poise::command(slash_command, rename = "increase")]
    pub async fn cart_increase(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Line to change"]
        #[autocomplete = "autocomplete::autocomplete_cart_line"]
        line: String,
    ) -> Result<()> {
        change_line(ctx, &line, |cart, id| cart.adjust_quantity(id, 1).map(|_| ())).await
    }

    /// Takes one from the quantity of a line in your cart.
    #[poise::command(slash_command, rename = "decrease")]
    pub async fn cart_decrease(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Line to change"]
        #[autocomplete = "autocomplete::autocomplete_cart_line"]
        line: String,
    ) -> Result<()> {
        change_line(ctx, &line, |cart, id| cart.adjust_quantity(id, -1).map(|_| ())).await
    }

    /// Applies a quantity change to the line named by `reference` and shows the
    /// cart. The total is left as it was.
    async fn change_line(
        ctx: poise::Context<'_, BotData, Error>,
        reference: &str,
        change: impl FnOnce(&mut Cart, BookId) -> Result<()>,
    ) -> Result<()> {
        let data = ctx.data();
        let handle = data.carts.session(&ctx.author().id.to_string()).await;
        let summary = {
            let mut cart = handle.lock().await;
            let id = views::resolve_line(&cart, reference)?;
            change(&mut *cart, id)?;
            views::cart_summary(&cart, &data.store.currency_symbol)
        };

        ctx.say(summary).await?;
        Ok(())
    }

    /// Recomputes the total of your cart from its lines.
    #[poise::command(slash_command, rename = "total")]
    pub async fn cart_total(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let handle = data.carts.session(&ctx.author().id.to_string()).await;
        let summary = {
            let mut cart = handle.lock().await;
            cart.recompute_total()?;
            views::cart_summary(&cart, &data.store.currency_symbol)
        };

        ctx.say(summary).await?;
        Ok(())
    }

    /// Shows your cart and its total.
    #[poise::command(slash_command, rename = "show")]
    pub async fn cart_show(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let handle = data.carts.session(&ctx.author().id.to_string()).await;
        let summary = views::cart_summary(&*handle.lock().await, &data.store.currency_symbol);

        ctx.say(summary).await?;
        Ok(())
    }

    /// Empties your cart without recording a sale.
    #[poise::command(slash_command, rename = "clear")]
    pub async fn cart_clear(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let user_id = ctx.author().id.to_string();

        let had_cart = data.carts.abandon(&user_id).await;
        data.searches.end(&user_id).await;

        if had_cart {
            ctx.say("🗑️ Cart cleared.").await?;
        } else {
            ctx.say("🛒 The cart is already empty.").await?;
        }
        Ok(())
    }

    /// Records your cart as a sale and empties it.
    #[poise::command(slash_command, rename = "checkout")]
    pub async fn cart_checkout(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let user_id = ctx.author().id.to_string();
        let handle = data.carts.session(&user_id).await;

        let result = {
            let mut cart = handle.lock().await;
            checkout(&data.database, &mut *cart, &user_id).await
        };

        match result {
            Ok(sale) => {
                let message = format!(
                    "✅ Sale added successfully\n**{}**\n{}",
                    views::sale_heading(&sale, &data.store.currency_symbol, data.offset),
                    views::sale_lines(&sale)
                );
                ctx.say(views::truncate_text(&message, views::MAX_MESSAGE_LEN))
                    .await?;
            }
            Err(Error::EmptyCart) => {
                ctx.say("❌ Nothing to add. Use `/cart add` to select a book.")
                    .await?;
            }
            Err(e) if e.is_user_facing() => return Err(e),
            Err(e) => {
                error!(user_id, "Failed to record sale: {e:?}");
                ctx.say("❌ Failed to record the sale. The cart was kept; please try again.")
                    .await?;
            }
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
