use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde_json::json;
use std::path::PathBuf;

use crate::cli::utils::{format_score, format_timestamp, or_dash, output_collection, output_success};
use crate::cli::{CliContext, OutputFormat};
use crate::models::{Report, StaffRecord};
use crate::reports::{
    active_user_ids, average_score, chart_series, latest_n_by_created, score_tier, total_attempts, ReportFilter,
};

#[derive(Subcommand)]
pub enum ReportCommands {
    #[command(about = "List reports, optionally filtered")]
    List {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, help = "Only the N most recent reports")]
        latest: Option<usize>,
    },

    #[command(about = "Aggregate score and attempt figures")]
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },

    #[command(about = "Write matching reports to a JSON file")]
    Export {
        #[arg(help = "Output file")]
        file: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long, help = "Match user name or email (case-insensitive)")]
    pub search: Option<String>,
    #[arg(long, help = "Exact department name")]
    pub department: Option<String>,
    #[arg(long, help = "First day to include (YYYY-MM-DD)")]
    pub from: Option<NaiveDate>,
    #[arg(long, help = "Last day to include (YYYY-MM-DD)")]
    pub to: Option<NaiveDate>,
}

impl From<FilterArgs> for ReportFilter {
    fn from(args: FilterArgs) -> Self {
        ReportFilter {
            search: args.search,
            department: args.department,
            date_from: args.from,
            date_to: args.to,
        }
    }
}

pub async fn handle(cmd: ReportCommands, ctx: &CliContext) -> anyhow::Result<()> {
    ctx.guard("/reports")?;

    match cmd {
        ReportCommands::List { filter, latest } => {
            let (reports, staff) = fetch(ctx, filter.into()).await?;
            let reports = match latest {
                Some(n) => latest_n_by_created(&reports, n),
                None => reports,
            };
            output_collection(&ctx.output, "reports", &reports, |r| describe(r, &staff))
        }
        ReportCommands::Summary { filter } => {
            let (reports, _) = fetch(ctx, filter.into()).await?;
            let average = average_score(&reports);
            let active = active_user_ids(&reports);

            match ctx.output {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({
                        "reports": reports.len(),
                        "total_attempts": total_attempts(&reports),
                        "average_score": average,
                        "tier": score_tier(average),
                        "active_users": active.len(),
                        "chart": chart_series(&reports),
                    }))?);
                }
                OutputFormat::Text => {
                    println!("Reports:        {}", reports.len());
                    println!("Total attempts: {}", total_attempts(&reports));
                    println!("Average score:  {}", format_score(average));
                    println!("Active users:   {}", active.len());
                }
            }
            Ok(())
        }
        ReportCommands::Export { file, filter } => {
            let (reports, _) = fetch(ctx, filter.into()).await?;
            let body = serde_json::to_vec_pretty(&reports)?;
            tokio::fs::write(&file, body).await?;
            output_success(
                &ctx.output,
                &format!("Exported {} report(s) to {}", reports.len(), file.display()),
                Some(json!({ "count": reports.len(), "file": file.display().to_string() })),
            )
        }
    }
}

/// Reports matching `filter`, plus the staff directory used to resolve
/// names and departments. The directory is only fetched when a filter
/// needs it or reports arrive without user details.
async fn fetch(ctx: &CliContext, filter: ReportFilter) -> anyhow::Result<(Vec<Report>, Vec<StaffRecord>)> {
    let reports = ctx.client.list_reports().await?;
    let needs_directory = !filter.is_empty() || reports.iter().any(|r| r.user.is_none());
    let staff = if needs_directory && !reports.is_empty() {
        ctx.client.list_staff().await?
    } else {
        Vec::new()
    };

    let reports = if filter.is_empty() {
        reports
    } else {
        filter.apply(&reports, &staff)
    };
    Ok((reports, staff))
}

fn describe(report: &Report, staff: &[StaffRecord]) -> String {
    let member = staff.iter().find(|s| s.user_id == report.user_id);
    let name = report
        .user_name()
        .or(member.map(|s| s.name.as_str()))
        .unwrap_or("Unknown User");
    let department = report
        .user_department()
        .or(member.and_then(|s| s.department.as_deref()));

    format!(
        "#{} {} [{}] score {} correct {}/{} at {}",
        report.report_id,
        name,
        or_dash(department),
        format_score(report.awareness_score),
        report.correct_count,
        report.total_attempts,
        format_timestamp(report.created_at),
    )
}
