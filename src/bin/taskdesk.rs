//! taskdesk CLI — run the HTTP service or inspect the task store.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::{Parser, Subcommand};
use secrecy::ExposeSecret;
use taskdesk::api::{AppState, router};
use taskdesk::config::Config;
use taskdesk::config::secrets::redacted_url;
use taskdesk::db::Db;
use taskdesk::engine::{NotificationService, TaskService};
use taskdesk::model::{Notification, Priority, RequestContext, TaskFilter, TaskStatus};
use taskdesk::telemetry::{TelemetryConfig, init_telemetry};
use tracing::info;

#[derive(Parser)]
#[command(name = "taskdesk", about = "Task tracking service with admin alerts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Address to listen on (overrides BIND_ADDR)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Apply pending database migrations
    Migrate,
    /// Print current admin alerts
    Notifications {
        /// Re-print every N seconds until Ctrl-C
        #[arg(long)]
        watch: Option<u64>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Task operations (run as admin)
    Tasks {
        #[command(subcommand)]
        action: TaskAction,
    },
}

#[derive(Subcommand)]
enum TaskAction {
    /// List tasks
    List {
        /// Text to search in title and description
        #[arg(long)]
        q: Option<String>,
        /// Filter by status
        #[arg(long)]
        status: Option<String>,
        /// Filter by priority
        #[arg(long)]
        priority: Option<String>,
        /// Filter by assignee
        #[arg(long)]
        assigned_to: Option<String>,
    },
    /// Show a task
    Show {
        /// Task ID
        id: String,
    },
    /// Delete a task and record the deletion
    Delete {
        /// Task ID
        id: String,
        /// Operator user ID recorded in the audit log
        #[arg(long, default_value = "cli")]
        by: String,
        /// Operator email recorded in the audit log
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Serve { bind } => cmd_serve(config, bind).await,
        Command::Migrate => {
            let db = Db::connect(config.database_url.expose_secret()).await?;
            db.migrate().await?;
            println!("Migrations applied.");
            Ok(())
        }
        Command::Notifications { watch, json } => {
            let db = Arc::new(Db::connect(config.database_url.expose_secret()).await?);
            let service = NotificationService::new(db.clone(), db, config.retry_policy());
            cmd_notifications(&service, watch, json).await
        }
        Command::Tasks { action } => {
            let db = Arc::new(Db::connect(config.database_url.expose_secret()).await?);
            let service = TaskService::new(db.clone(), db, config.retry_policy());
            match action {
                TaskAction::List {
                    q,
                    status,
                    priority,
                    assigned_to,
                } => {
                    let filter = TaskFilter {
                        q,
                        status: status.map(TaskStatus::from),
                        priority: priority.map(Priority::from),
                        assigned_to,
                    };
                    cmd_tasks_list(&service, &filter).await
                }
                TaskAction::Show { id } => cmd_tasks_show(&service, &id).await,
                TaskAction::Delete { id, by, email } => {
                    let ctx = RequestContext::admin(by).with_email(email);
                    service.delete(&ctx, &id).await?;
                    println!("Deleted: {id}");
                    Ok(())
                }
            }
        }
    }
}

async fn cmd_serve(config: Config, bind: Option<String>) -> anyhow::Result<()> {
    let _guard = init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: "taskdesk".to_string(),
        log_level: config.log_level.clone(),
    })?;

    info!(database = %redacted_url(&config.database_url), "connecting");
    let db = Arc::new(Db::connect(config.database_url.expose_secret()).await?);
    db.migrate().await?;

    let state = AppState::new(db.clone(), db, config.retry_policy());
    let addr = bind.unwrap_or(config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "taskdesk listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("shutting down");
        })
        .await?;
    Ok(())
}

async fn cmd_notifications(
    service: &NotificationService,
    watch: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let Some(secs) = watch else {
        let notifications = service.notifications(Utc::now()).await?;
        return print_notifications(&notifications, json);
    };

    let mut ticker = tokio::time::interval(Duration::from_secs(secs.max(1)));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            _ = ticker.tick() => {
                let notifications = service.notifications(Utc::now()).await?;
                print_notifications(&notifications, json)?;
            }
        }
    }
}

fn print_notifications(notifications: &[Notification], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(notifications)?);
        return Ok(());
    }
    if notifications.is_empty() {
        println!("No alerts.");
        return Ok(());
    }

    println!("{:<10}  {:<8}  {:<40}  DESCRIPTION", "TYPE", "PRI", "TITLE");
    println!("{}", "-".repeat(100));
    for n in notifications {
        println!(
            "{:<10}  {:<8}  {:<40}  {}",
            n.kind.wire_type(),
            n.priority,
            truncate(&n.title(), 40),
            n.description()
        );
    }
    println!("\n{} alert(s)", notifications.len());
    Ok(())
}

async fn cmd_tasks_list(service: &TaskService, filter: &TaskFilter) -> anyhow::Result<()> {
    let ctx = RequestContext::admin("cli");
    let tasks = service.list(&ctx, filter).await?;

    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    println!(
        "{:<8}  {:<12}  {:<8}  {:<12}  {:<30}  DUE",
        "ID", "STATUS", "PRI", "ASSIGNEE", "TITLE"
    );
    println!("{}", "-".repeat(100));
    for task in &tasks {
        println!(
            "{:<8}  {:<12}  {:<8}  {:<12}  {:<30}  {}",
            truncate(&task.id, 8),
            task.status,
            task.priority.as_ref().map_or("-", |p| p.as_str()),
            truncate(task.assigned_to.as_deref().unwrap_or("-"), 12),
            truncate(&task.title, 30),
            task.due_date
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    }
    println!("\n{} task(s)", tasks.len());
    Ok(())
}

async fn cmd_tasks_show(service: &TaskService, id: &str) -> anyhow::Result<()> {
    let task = service.get(&RequestContext::admin("cli"), id).await?;

    println!("ID:          {}", task.id);
    println!("Title:       {}", task.title);
    println!("Status:      {}", task.status);
    println!(
        "Priority:    {}",
        task.priority.as_ref().map_or("-", |p| p.as_str())
    );
    println!("Assigned To: {}", task.assigned_to.as_deref().unwrap_or("-"));
    println!("Created By:  {}", task.created_by.as_deref().unwrap_or("-"));
    if let Some(due) = task.due_date {
        println!("Due:         {due}");
    }
    println!("Created:     {}", task.created_at);
    println!("Updated:     {}", task.updated_at);
    if let Some(ref description) = task.description {
        println!("---");
        println!("{description}");
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}
