//! Catalog Discord commands - `/book add`, `edit`, `list`, `show` and `cover`.
//!
//! This module contains the commands staff use to maintain the shop's catalog,
//! including cover images uploaded as Discord attachments.

use crate::{
    bot::views::{BookReference, parse_book_reference},
    core::catalog,
    entities::book,
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;

/// Finds the catalog book a command argument refers to.
///
/// # Errors
/// Returns [`Error::BookNotFound`] when nothing matches, or a database error.
pub async fn resolve_book(db: &DatabaseConnection, reference: &str) -> Result<book::Model> {
    let found = match parse_book_reference(reference) {
        // Titles like "1984" also parse as ids
        BookReference::Id(id) => match catalog::get_book_by_id(db, id).await? {
            Some(book) => Some(book),
            None => catalog::get_book_by_title(db, reference).await?,
        },
        BookReference::Title(title) => catalog::get_book_by_title(db, &title).await?,
    };
    found.ok_or_else(|| Error::BookNotFound {
        id: reference.trim().to_string(),
    })
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::resolve_book;
    use crate::{
        bot::{BotData, handlers::autocomplete, views},
        core::{catalog::{self, BookDetails}, money},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use tracing::info;

    /// Most books shown by `/book list`, to stay within Discord's embed limits
    const MAX_LISTED: usize = 25;

    /// Downloads an attachment after checking its advertised size.
    async fn download_cover(
        attachment: &serenity::Attachment,
        limit: usize,
    ) -> Result<Vec<u8>> {
        let advertised = attachment.size as usize;
        if advertised > limit {
            return Err(Error::ImageTooLarge {
                size: advertised,
                limit,
            });
        }
        let bytes = attachment.download().await?;
        catalog::validate_image(&bytes, limit)?;
        Ok(bytes)
    }

    /// Parent command for the shop's catalog.
    #[poise::command(
        slash_command,
        subcommands("book_add", "book_edit", "book_list", "book_show", "book_cover")
    )]
    pub async fn book(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Catalog command. Available subcommands:\n\
            `/book add` - Add a book to the catalog\n\
            `/book edit` - Change a book's details\n\
            `/book list` - List books, by genre or search text\n\
            `/book show` - Show a book with its cover\n\
            `/book cover` - Replace or remove a book's cover";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a book to the catalog, optionally with a cover image.
    #[poise::command(slash_command, rename = "add")]
    pub async fn book_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Title of the book"] title: String,
        #[description = "Author of the book"] author: String,
        #[description = "Price of one copy (e.g., 12.99)"] price: f64,
        #[description = "Genre of the book"]
        #[autocomplete = "autocomplete::autocomplete_genre"]
        genre: String,
        #[description = "Short description"] description: Option<String>,
        #[description = "Cover image"] cover: Option<serenity::Attachment>,
    ) -> Result<()> {
        let data = ctx.data();
        let image = match &cover {
            Some(attachment) => Some(download_cover(attachment, data.store.max_image_bytes).await?),
            None => None,
        };

        let details = BookDetails {
            title,
            author,
            price,
            genre,
            description: description.unwrap_or_default(),
        };
        let book = catalog::create_book(&data.database, details, image).await?;

        ctx.say(format!(
            "✅ Book '{}' added to the catalog as #{} at **{}**.",
            book.title,
            book.id,
            data.money(money::to_decimal(book.price)?)
        ))
        .await?;
        Ok(())
    }

    /// Changes the details of a book. Options left empty keep their current value.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn book_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Book to edit"]
        #[autocomplete = "autocomplete::autocomplete_book"]
        book: String,
        #[description = "New title"] title: Option<String>,
        #[description = "New author"] author: Option<String>,
        #[description = "New price"] price: Option<f64>,
        #[description = "New genre"]
        #[autocomplete = "autocomplete::autocomplete_genre"]
        genre: Option<String>,
        #[description = "New description"] description: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let existing = resolve_book(db, &book).await?;

        let current = BookDetails::from(&existing);
        let details = BookDetails {
            title: title.unwrap_or(current.title),
            author: author.unwrap_or(current.author),
            price: price.unwrap_or(current.price),
            genre: genre.unwrap_or(current.genre),
            description: description.unwrap_or(current.description),
        };
        let updated = catalog::update_book(db, existing.id, details).await?;

        ctx.say(format!("✅ Book '{}' (#{}) updated.", updated.title, updated.id))
            .await?;
        Ok(())
    }

    /// Lists the catalog, optionally by genre and search text.
    #[poise::command(slash_command, rename = "list")]
    pub async fn book_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only books of this genre"]
        #[autocomplete = "autocomplete::autocomplete_genre"]
        genre: Option<String>,
        #[description = "Text to look for in titles and authors"] search: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let books = catalog::list_books(&data.database, genre.as_deref()).await?;
        let books = catalog::filter_books(books, search.as_deref().unwrap_or_default());

        if books.is_empty() {
            ctx.say("No books match. Use `/book add` to add one.").await?;
            return Ok(());
        }

        let fields = views::fit_fields(books.iter().take(MAX_LISTED).map(|b| {
            (
                format!("{} - {}", b.title, b.author),
                views::book_line(b, &data.store.currency_symbol),
            )
        }));
        let shown = fields.len();

        let mut list_embed = serenity::CreateEmbed::default()
            .title(format!("📚 {} Catalog", data.store.name))
            .color(0x0058_65F2)
            .fields(fields);
        if shown < books.len() {
            list_embed = list_embed.footer(serenity::CreateEmbedFooter::new(format!(
                "Showing {shown} of {} books. Narrow the list with genre or search.",
                books.len()
            )));
        }

        ctx.send(poise::CreateReply::default().embed(list_embed))
            .await?;
        Ok(())
    }

    /// Shows a book's details and cover.
    #[poise::command(slash_command, rename = "show")]
    pub async fn book_show(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Book to show"]
        #[autocomplete = "autocomplete::autocomplete_book"]
        book: String,
    ) -> Result<()> {
        const COVER_NAME: &str = "cover.png";

        let data = ctx.data();
        let book = resolve_book(&data.database, &book).await?;

        let mut embed = serenity::CreateEmbed::default()
            .title(views::truncate_text(&book.title, views::MAX_FIELD_NAME_LEN))
            .color(0x0058_65F2)
            .field(
                "Author",
                views::truncate_text(&book.author, views::MAX_FIELD_VALUE_LEN),
                true,
            )
            .field(
                "Genre",
                views::truncate_text(&book.genre, views::MAX_FIELD_VALUE_LEN),
                true,
            )
            .field(
                "Price",
                data.money(money::to_decimal(book.price)?),
                true,
            )
            .footer(serenity::CreateEmbedFooter::new(format!("Book #{}", book.id)));
        if !book.description.is_empty() {
            embed = embed.description(views::truncate_text(
                &book.description,
                views::MAX_DESCRIPTION_LEN,
            ));
        }

        let mut reply = poise::CreateReply::default();
        if let Some(image) = book.image {
            embed = embed.attachment(COVER_NAME);
            reply = reply.attachment(serenity::CreateAttachment::bytes(image, COVER_NAME));
        }

        ctx.send(reply.embed(embed)).await?;
        Ok(())
    }

    /// Replaces a book's cover image, or removes it when no image is given.
    #[poise::command(slash_command, rename = "cover")]
    pub async fn book_cover(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Book to change"]
        #[autocomplete = "autocomplete::autocomplete_book"]
        book: String,
        #[description = "New cover image; leave empty to remove the cover"] image: Option<
            serenity::Attachment,
        >,
    ) -> Result<()> {
        let data = ctx.data();
        let existing = resolve_book(&data.database, &book).await?;

        let bytes = match &image {
            Some(attachment) => Some(download_cover(attachment, data.store.max_image_bytes).await?),
            None => None,
        };
        let had_image = bytes.is_some();
        let updated = catalog::set_book_image(&data.database, existing.id, bytes).await?;

        if had_image {
            info!(book_id = updated.id, "Replaced cover image");
            ctx.say(format!("✅ Cover for '{}' updated.", updated.title))
                .await?;
        } else {
            info!(book_id = updated.id, "Removed cover image");
            ctx.say(format!("✅ Cover for '{}' removed.", updated.title))
                .await?;
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
