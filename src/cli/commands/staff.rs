use clap::{Args, Subcommand};
use serde_json::json;

use crate::cli::utils::{format_timestamp, or_dash, output_collection, output_success};
use crate::cli::CliContext;
use crate::error::ClientError;
use crate::models::{Role, StaffInput};

#[derive(Subcommand)]
pub enum StaffCommands {
    #[command(about = "List staff members")]
    List {
        #[arg(long, help = "Only this department")]
        department: Option<String>,
    },

    #[command(about = "Add a staff member")]
    Add {
        #[command(flatten)]
        fields: StaffFields,
    },

    #[command(about = "Update a staff member")]
    Update {
        #[arg(help = "User id")]
        id: i64,
        #[command(flatten)]
        fields: StaffFields,
    },

    #[command(about = "Remove a staff member")]
    Delete {
        #[arg(help = "User id")]
        id: i64,
    },
}

#[derive(Args)]
pub struct StaffFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long, default_value = "Staff", help = "SuperAdmin, Admin or Staff")]
    pub role: String,
    #[arg(long, help = "Initial or replacement password")]
    pub password: Option<String>,
}

impl From<StaffFields> for StaffInput {
    fn from(fields: StaffFields) -> Self {
        StaffInput {
            name: fields.name,
            email: fields.email,
            department: fields.department,
            role: Role::parse(&fields.role),
            password: fields.password,
        }
    }
}

pub async fn handle(cmd: StaffCommands, ctx: &CliContext) -> anyhow::Result<()> {
    ctx.guard("/staff")?;

    match cmd {
        StaffCommands::List { department } => {
            let mut staff = ctx.client.list_staff().await?;
            if let Some(department) = department.as_deref().map(str::trim) {
                staff.retain(|s| s.department.as_deref() == Some(department));
            }
            output_collection(&ctx.output, "staff", &staff, |s| {
                format!(
                    "[{}] {} <{}> {} / {} since {}",
                    s.user_id,
                    s.name,
                    s.email,
                    s.role,
                    or_dash(s.department.as_deref()),
                    format_timestamp(s.created_at),
                )
            })
        }
        StaffCommands::Add { fields } => {
            let input = StaffInput::from(fields);
            if input.password.is_none() {
                return Err(ClientError::validation("password", "is required for new staff").into());
            }
            let created = ctx.client.create_staff(&input).await?;
            output_success(
                &ctx.output,
                &format!("Added {} ({})", created.name, created.user_id),
                Some(json!({ "staff": created })),
            )
        }
        StaffCommands::Update { id, fields } => {
            let updated = ctx.client.update_staff(id, &fields.into()).await?;
            output_success(
                &ctx.output,
                &format!("Updated {} ({})", updated.name, id),
                Some(json!({ "staff": updated })),
            )
        }
        StaffCommands::Delete { id } => {
            ctx.client.delete_staff(id).await?;
            output_success(
                &ctx.output,
                &format!("Deleted staff member {}", id),
                Some(json!({ "user_id": id })),
            )
        }
    }
}
