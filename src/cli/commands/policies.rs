use clap::Subcommand;
use serde_json::json;
use std::path::{Path, PathBuf};

use crate::cli::utils::{format_timestamp, or_dash, output_collection, output_success};
use crate::cli::CliContext;
use crate::models::{Policy, PolicyInput};

#[derive(Subcommand)]
pub enum PolicyCommands {
    #[command(about = "List security policy documents")]
    List,

    #[command(about = "Download a policy document")]
    Download {
        #[arg(help = "Policy id")]
        id: i64,
        #[arg(long, short, help = "Output file (defaults to the document's file name)")]
        out: Option<PathBuf>,
    },

    #[command(about = "Fetch a policy document for inline viewing")]
    Preview {
        #[arg(help = "Policy id")]
        id: i64,
        #[arg(long, short, help = "Output file (defaults to the document's file name)")]
        out: Option<PathBuf>,
    },

    #[command(about = "Edit a policy's title and description")]
    Update {
        #[arg(help = "Policy id")]
        id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },

    #[command(about = "Delete a policy document")]
    Delete {
        #[arg(help = "Policy id")]
        id: i64,
    },
}

pub async fn handle(cmd: PolicyCommands, ctx: &CliContext) -> anyhow::Result<()> {
    match cmd {
        PolicyCommands::List => {
            ctx.guard("/policies")?;
            let policies = ctx.client.list_policies().await?;
            output_collection(&ctx.output, "policies", &policies, |p| {
                format!(
                    "[{}] {} - {} (by {}, {} downloads, {})",
                    p.policy_id,
                    p.title,
                    or_dash(p.description.as_deref()),
                    or_dash(p.uploaded_by.as_deref()),
                    p.download_count,
                    format_timestamp(p.created_at),
                )
            })
        }
        PolicyCommands::Download { id, out } => {
            ctx.guard("/policies")?;
            let target = resolve_target(ctx, id, out).await?;
            let bytes = ctx.client.download_policy(id).await?;
            save(ctx, id, &target, &bytes).await
        }
        PolicyCommands::Preview { id, out } => {
            ctx.guard("/policies")?;
            let target = resolve_target(ctx, id, out).await?;
            let bytes = ctx.client.preview_policy(id).await?;
            save(ctx, id, &target, &bytes).await
        }
        PolicyCommands::Update { id, title, description } => {
            ctx.guard("/manage-policies")?;
            let policy = ctx
                .client
                .update_policy(id, &PolicyInput { title, description })
                .await?;
            output_success(
                &ctx.output,
                &format!("Policy {} updated", id),
                Some(json!({ "policy": policy })),
            )
        }
        PolicyCommands::Delete { id } => {
            ctx.guard("/manage-policies")?;
            ctx.client.delete_policy(id).await?;
            output_success(
                &ctx.output,
                &format!("Policy {} deleted", id),
                Some(json!({ "policy_id": id })),
            )
        }
    }
}

async fn resolve_target(ctx: &CliContext, id: i64, out: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = out {
        return Ok(path);
    }
    let policies = ctx.client.list_policies().await?;
    Ok(default_file_name(policies.iter().find(|p| p.policy_id == id), id))
}

/// Last path segment of the stored document, else `policy-<id>`
fn default_file_name(policy: Option<&Policy>, id: i64) -> PathBuf {
    policy
        .and_then(|p| {
            Path::new(p.file_path.replace('\\', "/").as_str())
                .file_name()
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from(format!("policy-{}", id)))
}

async fn save(ctx: &CliContext, id: i64, target: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    tokio::fs::write(target, bytes).await?;
    output_success(
        &ctx.output,
        &format!("Saved policy {} to {} ({} bytes)", id, target.display(), bytes.len()),
        Some(json!({
            "policy_id": id,
            "file": target.display().to_string(),
            "bytes": bytes.len(),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(file_path: &str) -> Policy {
        Policy {
            policy_id: 2,
            title: "Acceptable use".into(),
            description: None,
            file_path: file_path.into(),
            uploaded_by: None,
            created_at: None,
            download_count: 0,
        }
    }

    #[test]
    fn file_name_comes_from_stored_path() {
        assert_eq!(
            default_file_name(Some(&policy("uploads/policies/aup.pdf")), 2),
            PathBuf::from("aup.pdf")
        );
        assert_eq!(
            default_file_name(Some(&policy("uploads\\policies\\aup.pdf")), 2),
            PathBuf::from("aup.pdf")
        );
        assert_eq!(default_file_name(Some(&policy("")), 2), PathBuf::from("policy-2"));
        assert_eq!(default_file_name(None, 5), PathBuf::from("policy-5"));
    }
}
