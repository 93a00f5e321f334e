use serde::Serialize;
use serde_json::json;

use crate::cli::utils::{format_score, format_timestamp, or_dash};
use crate::cli::{CliContext, OutputFormat};
use crate::models::{Identity, Report, Role, Training, UserProfile};
use crate::policy::{home_path, LOGIN_PATH};
use crate::reports::{chart_series, latest_n_by_created, staff_progress, DepartmentOverview, SuperAdminOverview};

pub async fn handle(ctx: &CliContext) -> anyhow::Result<()> {
    // Each role lands on its own home route; anyone else is sent to login
    let route = ctx
        .store()
        .get()?
        .map(|i| home_path(i.role()))
        .unwrap_or(LOGIN_PATH);
    let identity = ctx.guard(route)?;

    match identity.role() {
        Role::SuperAdmin => superadmin(ctx).await,
        Role::Admin => admin(ctx, &identity).await,
        _ => staff(ctx, &identity).await,
    }
}

async fn superadmin(ctx: &CliContext) -> anyhow::Result<()> {
    let (staff, topics, reports) = futures::try_join!(
        ctx.client.list_staff(),
        ctx.client.list_topics(),
        ctx.client.list_reports()
    )?;
    let overview = SuperAdminOverview::build(&staff, topics.len(), &reports);

    match ctx.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                "overview": overview,
                "chart": chart_series(&reports),
            }))?);
        }
        OutputFormat::Text => {
            println!("SuperAdmin dashboard");
            println!("  Users:        {}", overview.users);
            println!("  Departments:  {}", overview.departments);
            println!("  Topics:       {}", overview.topics);
            println!("  Reports:      {}", overview.reports);
            println!("  Attempts:     {}", overview.attempts);
            println!("  Avg score:    {}", format_score(overview.average_score));
        }
    }
    Ok(())
}

async fn admin(ctx: &CliContext, identity: &Identity) -> anyhow::Result<()> {
    let (staff, reports) = futures::try_join!(ctx.client.list_staff(), ctx.client.list_reports())?;
    let overview = DepartmentOverview::build(&staff, &reports);

    match ctx.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                "department": identity.profile.department,
                "overview": overview,
                "active_staff": overview.active_staff(&staff),
            }))?);
        }
        OutputFormat::Text => {
            println!(
                "Admin dashboard - {} department",
                or_dash(identity.profile.department.as_deref())
            );
            println!("  Staff:        {}", overview.staff_count);
            println!("  Active staff: {}", overview.active_staff(&staff));
            println!("  Attempts:     {}", overview.total_attempts);
            println!("  Avg score:    {}", format_score(overview.average_score));

            if !staff.is_empty() {
                println!();
                println!("Staff");
                for member in &staff {
                    let badge = if overview.is_active(member.user_id) { "active" } else { "inactive" };
                    println!("  [{}] {} <{}> {}", member.user_id, member.name, member.email, badge);
                }
            }

            println!();
            println!("Latest reports");
            if overview.latest.is_empty() {
                println!("  none yet");
            }
            for report in &overview.latest {
                println!(
                    "  #{} {} {} {}/{} {}",
                    report.report_id,
                    report.user_name().unwrap_or("Unknown User"),
                    format_score(report.awareness_score),
                    report.correct_count,
                    report.total_attempts,
                    format_timestamp(report.created_at),
                );
            }
        }
    }
    Ok(())
}

/// Everything the staff home shows
#[derive(Debug, Serialize)]
pub struct StaffHome {
    pub user: UserProfile,
    pub progress: u32,
    pub available_quizzes: usize,
    pub topics: usize,
    pub tips: usize,
    pub last_score: Option<f64>,
    pub reports: Vec<Report>,
    pub assigned_trainings: Vec<Training>,
}

pub async fn staff_home(ctx: &CliContext, identity: &Identity) -> anyhow::Result<StaffHome> {
    let (quizzes, reports, topics, tips, trainings, assignments) = futures::try_join!(
        ctx.client.list_quizzes(None),
        ctx.client.list_reports(),
        ctx.client.list_topics(),
        ctx.client.list_tips(),
        ctx.client.list_trainings(),
        ctx.client.list_assignments()
    )?;

    let assigned_trainings = assignments
        .iter()
        .filter(|a| a.user_id == identity.user_id())
        .filter_map(|a| trainings.iter().find(|t| t.training_id == a.training_id))
        .cloned()
        .collect();

    Ok(StaffHome {
        user: identity.profile.clone(),
        progress: staff_progress(&reports),
        available_quizzes: quizzes.len(),
        topics: topics.len(),
        tips: tips.len(),
        last_score: latest_n_by_created(&reports, 1).first().map(|r| r.awareness_score),
        reports,
        assigned_trainings,
    })
}

async fn staff(ctx: &CliContext, identity: &Identity) -> anyhow::Result<()> {
    let home = staff_home(ctx, identity).await?;

    match ctx.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&home)?),
        OutputFormat::Text => {
            println!("Welcome, {}", identity.name());
            println!("  Quizzes:      {} available", home.available_quizzes);
            println!("  Progress:     {}% completed", home.progress);
            println!("  Quiz reports: {}", home.reports.len());
            println!("  Topics:       {}", home.topics);
            println!("  Tips:         {}", home.tips);
            if let Some(score) = home.last_score {
                println!("  Last score:   {}", format_score(score));
            }
            if !home.assigned_trainings.is_empty() {
                println!();
                println!("Assigned training");
                for training in &home.assigned_trainings {
                    println!("  [{}] {}", training.training_id, training.title);
                }
            }
        }
    }
    Ok(())
}
