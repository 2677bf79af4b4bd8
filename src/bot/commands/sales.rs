//! Sale history Discord commands - `/sales list`, `day` and `show`.
//!
//! Dates are calendar days in the shop's configured UTC offset.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, views},
        core::sales::{self, SaleFilter, SaleRecord},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Most sales shown in one reply, to stay within Discord's embed limits
    const MAX_LISTED: usize = 20;

    /// Parent command for the sale history.
    #[poise::command(slash_command, subcommands("sales_list", "sales_day", "sales_show"))]
    pub async fn sales(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Sale history command. Available subcommands:\n\
            `/sales list` - List sales, optionally between dates or by title\n\
            `/sales day` - List the sales of one day\n\
            `/sales show` - Show one sale";

        ctx.say(help_text).await?;
        Ok(())
    }

    async fn send_sales(
        ctx: poise::Context<'_, BotData, Error>,
        heading: String,
        sales: &[SaleRecord],
    ) -> Result<()> {
        let data = ctx.data();
        if sales.is_empty() {
            ctx.say("No sales match.").await?;
            return Ok(());
        }

        let fields = views::fit_fields(sales.iter().take(MAX_LISTED).map(|sale| {
            (
                views::sale_heading(sale, &data.store.currency_symbol, data.offset),
                views::sale_lines(sale),
            )
        }));
        let shown = fields.len();

        let mut embed = serenity::CreateEmbed::default()
            .title(heading)
            .color(0x0058_65F2)
            .fields(fields);
        if shown < sales.len() {
            embed = embed.footer(serenity::CreateEmbedFooter::new(format!(
                "Showing the newest {shown} of {} sales.",
                sales.len()
            )));
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Lists sales, newest first, optionally between two dates and by title.
    #[poise::command(slash_command, rename = "list")]
    pub async fn sales_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "First day to include (YYYY-MM-DD)"] from: Option<String>,
        #[description = "Last day to include (YYYY-MM-DD)"] to: Option<String>,
        #[description = "Text to look for in the sold titles"] title: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let from = views::parse_optional_day(from.as_deref())?;
        let to = views::parse_optional_day(to.as_deref())?;

        let filter = SaleFilter::new(data.offset)
            .between(from, to)
            .with_title(title.as_deref().unwrap_or_default());
        let found = sales::find_sales(&data.database, &filter).await?;

        send_sales(ctx, "🧾 Sales".to_string(), &found).await
    }

    /// Lists the sales of one calendar day.
    #[poise::command(slash_command, rename = "day")]
    pub async fn sales_day(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Day to show (YYYY-MM-DD)"] date: String,
    ) -> Result<()> {
        let data = ctx.data();
        let day = views::parse_day(&date)?;

        let filter = SaleFilter::new(data.offset).on_day(day);
        let found = sales::find_sales(&data.database, &filter).await?;

        send_sales(ctx, format!("🧾 Sales on {day}"), &found).await
    }

    /// Shows one sale with all its lines.
    #[poise::command(slash_command, rename = "show")]
    pub async fn sales_show(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Sale number"] id: i64,
    ) -> Result<()> {
        let data = ctx.data();
        let sale = sales::get_sale_by_id(&data.database, id)
            .await?
            .ok_or(Error::SaleNotFound { id })?;

        let embed = serenity::CreateEmbed::default()
            .title(views::sale_heading(
                &sale,
                &data.store.currency_symbol,
                data.offset,
            ))
            .color(0x0058_65F2)
            .description(views::truncate_text(
                &views::sale_lines(&sale),
                views::MAX_DESCRIPTION_LEN,
            ))
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Recorded by {}",
                sale.recorded_by
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
