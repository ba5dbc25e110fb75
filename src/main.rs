//! Founder Blueprint - command line entry point
//!
//! Onboards a founder profile, generates its blueprint and tracks task
//! completion against a JSON data directory.

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use founder_blueprint::blueprints::TaskFilter;
use founder_blueprint::catalog::{FileCatalogSource, Resource};
use founder_blueprint::core::error::Result;
use founder_blueprint::core::types::{TaskId, TaskWithStatus};
use founder_blueprint::core::EngineConfig;
use founder_blueprint::profile::ProfileDraft;
use founder_blueprint::rules::load_rules_file;
use founder_blueprint::BlueprintEngine;

/// Personalized 90-day task blueprints for early-stage founders
#[derive(Parser, Debug)]
#[command(name = "founder-blueprint")]
#[command(about = "Generate and track a founder's 90-day task blueprint")]
struct Args {
    /// Engine config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format: text or json
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer the onboarding questions and generate a blueprint
    Onboard {
        /// Start from the catalog's sample profile
        #[arg(long)]
        sample: bool,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        industry: Option<String>,
        #[arg(long)]
        stage: Option<String>,
        #[arg(long)]
        founders: Option<u32>,
        #[arg(long)]
        funding_goal: Option<String>,
        #[arg(long)]
        current_state: Option<String>,
        /// Goal tag; repeat for several
        #[arg(long = "goal")]
        goals: Vec<String>,
    },
    /// Regenerate the blueprint for the stored profile
    Regenerate,
    /// Show the blueprint grouped by week
    Blueprint,
    /// List catalog tasks
    Tasks {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        /// completed or pending
        #[arg(long)]
        status: Option<String>,
    },
    /// Show one catalog task with its templates and articles
    Task { id: String },
    /// Mark a task completed
    Complete { id: String },
    /// Mark a task pending again
    Reopen { id: String },
    /// Show progress and the next tasks
    Progress,
    /// List document templates
    Templates {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        query: Option<String>,
    },
    /// Show a playbook article
    Article { slug: String },
    /// Manage the custom rule override
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
    /// Forget the stored profile
    ResetProfile,
}

#[derive(Subcommand, Debug)]
enum RulesAction {
    /// Replace the catalog rules with the rules in a JSON or TOML file
    Import { file: PathBuf },
    /// Go back to the catalog rules
    Clear,
    /// Print the rules currently in effect
    Show,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = EngineConfig::resolve(args.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let rt = Runtime::new()?;
    let engine = BlueprintEngine::from_config(config);
    rt.block_on(run(&engine, args.command, args.format))
}

async fn run(engine: &BlueprintEngine<FileCatalogSource>, command: Command, format: Format) -> Result<()> {
    match command {
        Command::Onboard {
            sample,
            company,
            industry,
            stage,
            founders,
            funding_goal,
            current_state,
            goals,
        } => {
            let mut draft = if sample {
                ProfileDraft::from_profile(&engine.sample_profile().await)
            } else {
                ProfileDraft::default()
            };
            if let Some(v) = company {
                draft.company_name = v;
            }
            if let Some(v) = industry {
                draft.industry = v;
            }
            if let Some(v) = stage {
                draft.stage = v;
            }
            if let Some(v) = founders {
                draft.founder_count = v;
            }
            if let Some(v) = funding_goal {
                draft.funding_goal = v;
            }
            if let Some(v) = current_state {
                draft.current_state = v;
            }
            if !goals.is_empty() {
                draft.goals = goals;
            }

            let (profile, tasks) = engine.onboard(draft).await?;
            match format {
                Format::Json => print_json(&tasks),
                Format::Text => {
                    println!("Blueprint for {}: {} tasks", profile.company_name, tasks.len());
                    if tasks.is_empty() {
                        println!("No tasks matched this profile yet.");
                    }
                }
            }
        }
        Command::Regenerate => match engine.profile() {
            Some(profile) => {
                let tasks = engine.generate_blueprint(&profile).await;
                match format {
                    Format::Json => print_json(&tasks),
                    Format::Text => println!("Regenerated blueprint: {} tasks", tasks.len()),
                }
            }
            None => println!("No profile yet. Run `onboard` first."),
        },
        Command::Blueprint => {
            let weeks = engine.week_groups().await;
            match format {
                Format::Json => print_json(&weeks),
                Format::Text => {
                    if weeks.is_empty() {
                        println!("No tasks yet. Run `onboard` to generate a blueprint.");
                    }
                    for week in &weeks {
                        println!(
                            "Week {} - {}/{} done ({}%)",
                            week.week,
                            week.completed,
                            week.total(),
                            week.percentage
                        );
                        for task in &week.tasks {
                            print_task(task);
                        }
                    }
                }
            }
        }
        Command::Tasks {
            category,
            priority,
            status,
        } => {
            let filter =
                TaskFilter::from_args(category.as_deref(), priority.as_deref(), status.as_deref())?;
            let tasks = engine.find_tasks(&filter).await;
            match format {
                Format::Json => print_json(&tasks),
                Format::Text => {
                    if tasks.is_empty() && filter.is_active() {
                        println!("No tasks match these filters.");
                    } else if tasks.is_empty() {
                        println!("The catalog has no tasks.");
                    }
                    tasks.iter().for_each(print_task);
                }
            }
        }
        Command::Task { id } => {
            let id = TaskId::from(id.as_str());
            match engine.task(&id).await {
                Some(task) => {
                    let resources = engine.task_resources(&id).await;
                    match format {
                        Format::Json => print_json(&serde_json::json!({
                            "task": task,
                            "resources": resources,
                        })),
                        Format::Text => {
                            println!("{} (week {}, {}, {})", task.title, task.week, task.category, task.priority);
                            if !task.description.is_empty() {
                                println!("{}", task.description);
                            }
                            if !task.dependencies.is_empty() {
                                let deps: Vec<_> = task.dependencies.iter().map(TaskId::as_str).collect();
                                println!("After: {}", deps.join(", "));
                            }
                            for resource in &resources {
                                match resource {
                                    Resource::Template(t) => println!("  template: {} ({})", t.title, t.id),
                                    Resource::Article(a) => println!("  article: {} ({})", a.title, a.slug),
                                }
                            }
                        }
                    }
                }
                None => println!("No task named '{}'", id),
            }
        }
        Command::Complete { id } => {
            engine.set_status(&TaskId::from(id.as_str()), true).await;
            println!("Marked {} completed", id);
        }
        Command::Reopen { id } => {
            engine.set_status(&TaskId::from(id.as_str()), false).await;
            println!("Marked {} pending", id);
        }
        Command::Progress => {
            let progress = engine.calculate_progress().await;
            let upcoming = engine.upcoming_tasks().await;
            match format {
                Format::Json => print_json(&serde_json::json!({
                    "progress": progress,
                    "upcoming": upcoming,
                })),
                Format::Text => {
                    println!(
                        "{}/{} tasks done ({}%) across {} weeks",
                        progress.completed_tasks,
                        progress.total_tasks,
                        progress.percentage,
                        progress.weeks_covered
                    );
                    if !upcoming.is_empty() {
                        println!("Up next:");
                        upcoming.iter().for_each(print_task);
                    }
                }
            }
        }
        Command::Templates { category, query } => {
            let templates = engine
                .search_templates(category.as_deref(), query.as_deref())
                .await;
            match format {
                Format::Json => print_json(&templates),
                Format::Text => {
                    if templates.is_empty() {
                        println!("No templates match your search.");
                    }
                    for template in &templates {
                        println!(
                            "{} [{}] {} ({})",
                            template.id, template.category, template.title, template.file_type
                        );
                    }
                }
            }
        }
        Command::Article { slug } => match engine.article(&slug).await {
            Some(article) => match format {
                Format::Json => print_json(&article),
                Format::Text => println!("{}\n\n{}", article.title, article.content),
            },
            None => println!("No article named '{}'", slug),
        },
        Command::Rules { action } => match action {
            RulesAction::Import { file } => {
                let rules = load_rules_file(&file)?;
                engine.save_custom_rules(&rules);
                println!("Imported {} rules from {}", rules.len(), file.display());
            }
            RulesAction::Clear => {
                engine.clear_custom_rules();
                println!("Using catalog rules");
            }
            RulesAction::Show => print_json(&engine.effective_rules().await),
        },
        Command::ResetProfile => {
            engine.clear_profile();
            println!("Profile cleared");
        }
    }

    Ok(())
}

fn print_task(task: &TaskWithStatus) {
    let mark = if task.completed { "x" } else { " " };
    println!(
        "  [{}] {} {} (week {}, {}, {}, {}h)",
        mark,
        task.task.id,
        task.task.title,
        task.task.week,
        task.task.category,
        task.task.priority,
        task.task.estimated_hours
    );
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}
