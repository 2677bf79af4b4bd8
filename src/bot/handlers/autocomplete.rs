//! Autocomplete handlers for Discord slash command parameters.
//!
//! Book suggestions are sequenced per user: every keystroke starts a new search
//! and a response is only used if no newer search has started since, so a slow
//! early query can never replace the suggestions for what the user typed last.

use crate::{
    bot::{BotData, views},
    core::catalog,
    errors::Error,
};
use tracing::warn;

/// Discord accepts at most this many autocomplete choices
pub const MAX_CHOICES: usize = 25;

/// Suggests catalog books whose title starts with the user's input. Users off
/// the staff roster get no suggestions.
///
/// Choices are labelled `Title (#id)` so commands can tell apart books that
/// share a title.
pub async fn autocomplete_book(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let data = ctx.data();
    let user_id = ctx.author().id.to_string();
    if !data.staff.permits(&user_id) {
        return Vec::new();
    }
    let ticket = data.searches.begin(&user_id).await;

    let books = match catalog::suggest_books_by_title(&data.database, partial, MAX_CHOICES as u64)
        .await
    {
        Ok(books) => books,
        Err(e) => {
            warn!("Error fetching book suggestions: {e}");
            return Vec::new();
        }
    };

    if !data.searches.is_current(&ticket).await {
        warn!(
            sequence = ticket.sequence(),
            "Discarding suggestions from a superseded search"
        );
        return Vec::new();
    }

    books.iter().map(views::book_choice).collect()
}

/// Suggests the lines of the user's cart that match the input.
pub async fn autocomplete_cart_line(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let user_id = ctx.author().id.to_string();
    if !ctx.data().staff.permits(&user_id) {
        return Vec::new();
    }
    let handle = ctx.data().carts.session(&user_id).await;
    let cart = handle.lock().await;
    let partial_lower = partial.to_lowercase();

    cart.items()
        .iter()
        .filter(|line| line.title.to_lowercase().contains(&partial_lower))
        .map(|line| views::choice_label(&line.title, line.id))
        .take(MAX_CHOICES)
        .collect()
}

/// Suggests the configured genres.
pub async fn autocomplete_genre(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let partial_lower = partial.to_lowercase();

    ctx.data()
        .store
        .genres
        .iter()
        .filter(|genre| genre.to_lowercase().contains(&partial_lower))
        .take(MAX_CHOICES)
        .cloned()
        .collect()
}
