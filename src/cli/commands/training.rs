use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{format_timestamp, output_collection, output_success};
use crate::cli::CliContext;
use crate::models::{AssignmentInput, Role, TrainingInput};

#[derive(Subcommand)]
pub enum TrainingCommands {
    #[command(about = "List training modules (Staff see their assigned ones)")]
    List,

    #[command(about = "Create a training module")]
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
    },

    #[command(about = "Delete a training module")]
    Delete {
        #[arg(help = "Training id")]
        id: i64,
    },

    #[command(about = "Assign a training module to a staff member")]
    Assign {
        #[arg(help = "Training id")]
        training_id: i64,
        #[arg(help = "User id")]
        user_id: i64,
    },

    #[command(about = "Remove a training assignment")]
    Unassign {
        #[arg(help = "Assignment id")]
        id: i64,
    },

    #[command(about = "List training assignments")]
    Assignments,
}

pub async fn handle(cmd: TrainingCommands, ctx: &CliContext) -> anyhow::Result<()> {
    match cmd {
        TrainingCommands::List => {
            let identity = ctx.guard("/training")?;
            let mut trainings = ctx.client.list_trainings().await?;

            if identity.role() == &Role::Staff {
                let assigned: Vec<i64> = ctx
                    .client
                    .list_assignments()
                    .await?
                    .into_iter()
                    .filter(|a| a.user_id == identity.user_id())
                    .map(|a| a.training_id)
                    .collect();
                trainings.retain(|t| assigned.contains(&t.training_id));
            }

            output_collection(&ctx.output, "trainings", &trainings, |t| {
                format!("[{}] {}: {}", t.training_id, t.title, t.description)
            })
        }
        TrainingCommands::Add { title, description } => {
            ctx.guard("/assign-training")?;
            let training = ctx
                .client
                .create_training(&TrainingInput { title, description })
                .await?;
            output_success(
                &ctx.output,
                &format!("Training {} created", training.training_id),
                Some(json!({ "training": training })),
            )
        }
        TrainingCommands::Delete { id } => {
            ctx.guard("/assign-training")?;
            ctx.client.delete_training(id).await?;
            output_success(
                &ctx.output,
                &format!("Training {} deleted", id),
                Some(json!({ "training_id": id })),
            )
        }
        TrainingCommands::Assign { training_id, user_id } => {
            ctx.guard("/assign-training")?;
            let assignment = ctx
                .client
                .assign_training(&AssignmentInput { training_id, user_id })
                .await?;
            output_success(
                &ctx.output,
                &format!("Training {} assigned to user {}", training_id, user_id),
                Some(json!({ "assignment": assignment })),
            )
        }
        TrainingCommands::Unassign { id } => {
            ctx.guard("/assign-training")?;
            ctx.client.delete_assignment(id).await?;
            output_success(
                &ctx.output,
                &format!("Assignment {} removed", id),
                Some(json!({ "assignment_id": id })),
            )
        }
        TrainingCommands::Assignments => {
            ctx.guard("/assign-training")?;
            let assignments = ctx.client.list_assignments().await?;
            output_collection(&ctx.output, "assignments", &assignments, |a| {
                format!(
                    "[{}] training {} -> user {} ({})",
                    a.id,
                    a.training_id,
                    a.user_id,
                    format_timestamp(a.created_at)
                )
            })
        }
    }
}
