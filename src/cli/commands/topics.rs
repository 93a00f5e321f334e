use clap::{Args, Subcommand};
use serde_json::json;

use crate::cli::utils::{or_dash, output_collection, output_record, output_success};
use crate::cli::CliContext;
use crate::models::TopicInput;

#[derive(Subcommand)]
pub enum TopicCommands {
    #[command(about = "List awareness topics")]
    List,

    #[command(about = "Show one topic")]
    Show {
        #[arg(help = "Topic id")]
        id: i64,
    },

    #[command(about = "Add a topic")]
    Add {
        #[command(flatten)]
        fields: TopicFields,
    },

    #[command(about = "Update a topic")]
    Update {
        #[arg(help = "Topic id")]
        id: i64,
        #[command(flatten)]
        fields: TopicFields,
    },

    #[command(about = "Delete a topic")]
    Delete {
        #[arg(help = "Topic id")]
        id: i64,
    },
}

#[derive(Args)]
pub struct TopicFields {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, help = "Reference URL")]
    pub link: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
}

impl From<TopicFields> for TopicInput {
    fn from(fields: TopicFields) -> Self {
        TopicInput {
            title: fields.title,
            description: fields.description,
            link: fields.link,
            category: fields.category,
            file_path: None,
        }
    }
}

pub async fn handle(cmd: TopicCommands, ctx: &CliContext) -> anyhow::Result<()> {
    match cmd {
        TopicCommands::List => {
            ctx.guard("/topic-view")?;
            let topics = ctx.client.list_topics().await?;
            output_collection(&ctx.output, "topics", &topics, |t| {
                format!("[{}] {} ({})", t.topic_id, t.title, or_dash(t.category.as_deref()))
            })
        }
        TopicCommands::Show { id } => {
            ctx.guard("/topic-view")?;
            let topic = ctx.client.get_topic(id).await?;
            output_record(
                &ctx.output,
                "topic",
                &topic,
                &[
                    ("Topic", format!("{} ({})", topic.title, topic.topic_id)),
                    ("Category", or_dash(topic.category.as_deref()).to_string()),
                    ("Description", or_dash(topic.description.as_deref()).to_string()),
                    ("Link", or_dash(topic.link.as_deref()).to_string()),
                    ("File", or_dash(topic.file_path.as_deref()).to_string()),
                ],
            )
        }
        TopicCommands::Add { fields } => {
            ctx.guard("/topics")?;
            let topic = ctx.client.create_topic(&fields.into()).await?;
            output_success(
                &ctx.output,
                &format!("Topic {} added", topic.topic_id),
                Some(json!({ "topic": topic })),
            )
        }
        TopicCommands::Update { id, fields } => {
            ctx.guard("/topics")?;
            let topic = ctx.client.update_topic(id, &fields.into()).await?;
            output_success(
                &ctx.output,
                &format!("Topic {} updated", id),
                Some(json!({ "topic": topic })),
            )
        }
        TopicCommands::Delete { id } => {
            ctx.guard("/topics")?;
            ctx.client.delete_topic(id).await?;
            output_success(
                &ctx.output,
                &format!("Topic {} deleted", id),
                Some(json!({ "topic_id": id })),
            )
        }
    }
}
