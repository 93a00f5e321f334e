use clap::{Args, Subcommand};
use serde_json::json;

use crate::cli::utils::{or_dash, output_collection, output_success};
use crate::cli::CliContext;
use crate::models::TipInput;

#[derive(Subcommand)]
pub enum TipCommands {
    #[command(about = "List awareness tips")]
    List {
        #[arg(long, help = "Only this category")]
        category: Option<String>,
    },

    #[command(about = "Publish a tip")]
    Add {
        #[command(flatten)]
        fields: TipFields,
    },

    #[command(about = "Edit a tip")]
    Update {
        #[arg(help = "Tip id")]
        id: i64,
        #[command(flatten)]
        fields: TipFields,
    },

    #[command(about = "Delete a tip")]
    Delete {
        #[arg(help = "Tip id")]
        id: i64,
    },
}

#[derive(Args)]
pub struct TipFields {
    #[arg(help = "Tip text")]
    pub description: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, help = "e.g. Phishing, Passwords, Devices")]
    pub category: Option<String>,
}

impl From<TipFields> for TipInput {
    fn from(fields: TipFields) -> Self {
        TipInput {
            title: fields.title,
            description: fields.description,
            category: fields.category,
        }
    }
}

pub async fn handle(cmd: TipCommands, ctx: &CliContext) -> anyhow::Result<()> {
    match cmd {
        TipCommands::List { category } => {
            ctx.guard("/tips")?;
            let mut tips = ctx.client.list_tips().await?;
            if let Some(category) = category {
                tips.retain(|t| {
                    t.category
                        .as_deref()
                        .is_some_and(|c| c.eq_ignore_ascii_case(category.trim()))
                });
            }
            output_collection(&ctx.output, "tips", &tips, |t| {
                format!(
                    "[{}] {} ({}): {}",
                    t.tip_id,
                    or_dash(t.title.as_deref()),
                    or_dash(t.category.as_deref()),
                    or_dash(t.description.as_deref()),
                )
            })
        }
        TipCommands::Add { fields } => {
            ctx.guard("/manage-tips")?;
            let created = ctx.client.create_tip(&fields.into()).await?;
            output_success(&ctx.output, "Tip published", Some(json!({ "tip": created })))
        }
        TipCommands::Update { id, fields } => {
            ctx.guard("/manage-tips")?;
            let updated = ctx.client.update_tip(id, &fields.into()).await?;
            output_success(
                &ctx.output,
                &format!("Tip {} updated", id),
                Some(json!({ "tip": updated })),
            )
        }
        TipCommands::Delete { id } => {
            ctx.guard("/manage-tips")?;
            ctx.client.delete_tip(id).await?;
            output_success(
                &ctx.output,
                &format!("Tip {} deleted", id),
                Some(json!({ "tip_id": id })),
            )
        }
    }
}
