use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use tagkeeper::config::Config;
use tagkeeper::core::db::{
    NewProject, NewTag, ProjectRepository, Tag, TagRepository, TagUpdate, WorkspaceDb,
};
use tagkeeper::core::tags::{TagFilter, random_color};
use tagkeeper::telemetry;

#[derive(Parser)]
#[command(name = "tagkeeper")]
#[command(about = "Manage the colored tags of projects in a workspace file")]
struct Cli {
    /// Config file (defaults to $TAGKEEPER_CONFIG or ./tagkeeper.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Workspace archive to operate on (overrides the config)
    #[arg(short, long, value_name = "FILE", global = true)]
    workspace: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create, list and remove projects
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Create, list, edit and remove tags of a project
    #[command(subcommand)]
    Tag(TagCommand),
    /// Open the tag manager window
    #[cfg(feature = "gui")]
    Gui {
        /// Project to manage (defaults to the configured project)
        project: Option<i64>,
    },
}

#[derive(Subcommand)]
enum ProjectCommand {
    Add { name: String },
    List,
    /// Remove a project and all of its tags
    Remove { project: i64 },
}

#[derive(Subcommand)]
enum TagCommand {
    List {
        project: i64,
        /// Only show tags whose title contains this text (case-insensitive)
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        project: i64,
        title: String,
        /// Color as #rrggbb
        #[arg(long, conflicts_with = "random_color")]
        color: Option<String>,
        /// Pick a random color
        #[arg(long)]
        random_color: bool,
    },
    Edit {
        project: i64,
        tag: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    Remove { project: i64, tag: i64 },
    /// Remove every tag of a project
    Purge { project: i64 },
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let config = Config::load(args.config.as_deref())?;
    telemetry::init_tracing(&config.logging, args.verbose);

    let workspace = args.workspace.clone().or_else(|| config.workspace.clone());

    match args.command {
        #[cfg(feature = "gui")]
        Command::Gui { project } => {
            let project = project
                .or(config.default_project)
                .context("no project given (pass one or set default_project)")?;
            tagkeeper::gui::run(workspace, project)
        }
        command => {
            let workspace =
                workspace.context("no workspace given (use --workspace or the config)")?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_command(workspace, command))
        }
    }
}

async fn run_command(workspace: PathBuf, command: Command) -> anyhow::Result<()> {
    let db = WorkspaceDb::new(&workspace).await?;
    let mutated = match command {
        Command::Project(command) => run_project_command(&db, command).await?,
        Command::Tag(command) => run_tag_command(&db, command).await?,
        #[cfg(feature = "gui")]
        Command::Gui { .. } => anyhow::bail!("the gui is started outside the command runtime"),
    };
    if mutated {
        db.save_workspace().await?;
    }
    Ok(())
}

async fn run_project_command(db: &WorkspaceDb, command: ProjectCommand) -> anyhow::Result<bool> {
    match command {
        ProjectCommand::Add { name } => {
            let project = db.add_project(&NewProject { name }).await?;
            println!("Project #{} created: {}", project.id, project.name);
            Ok(true)
        }
        ProjectCommand::List => {
            let projects = db.get_projects().await?;
            if projects.is_empty() {
                println!("No projects.");
            }
            for project in projects {
                println!("#{:<5} {}", project.id, project.name);
            }
            Ok(false)
        }
        ProjectCommand::Remove { project } => {
            let found = db
                .get_project_by_id(project)
                .await?
                .with_context(|| format!("project #{project} not found"))?;
            db.delete_project(found).await?;
            println!("Project #{project} removed");
            Ok(true)
        }
    }
}

fn print_tag(tag: &Tag) {
    println!("#{:<5} {} {}", tag.id, tag.color, tag.title);
}

async fn run_tag_command(db: &WorkspaceDb, command: TagCommand) -> anyhow::Result<bool> {
    match command {
        TagCommand::List { project, search } => {
            let tags = db.get_tags(project).await?;
            let filter = TagFilter::new(&tags, search.as_deref().unwrap_or(""));
            let mut shown = 0;
            for tag in &filter {
                print_tag(tag);
                shown += 1;
            }
            if shown == 0 {
                println!("No tags.");
            }
            Ok(false)
        }
        TagCommand::Add {
            project,
            title,
            color,
            random_color: randomize,
        } => {
            let color = match color {
                Some(color) => color,
                None if randomize => random_color(),
                None => anyhow::bail!("either --color or --random-color is required"),
            };
            let tag = db.add_tag(project, NewTag { title, color }).await?;
            println!("Tag #{} created", tag.id);
            print_tag(&tag);
            Ok(true)
        }
        TagCommand::Edit {
            project,
            tag,
            title,
            color,
        } => {
            let tag = db.update_tag(project, tag, TagUpdate { title, color }).await?;
            println!("Tag #{} edited", tag.id);
            print_tag(&tag);
            Ok(true)
        }
        TagCommand::Remove { project, tag } => {
            db.delete_tag(project, tag).await?;
            println!("Tag #{tag} removed from Project #{project}");
            Ok(true)
        }
        TagCommand::Purge { project } => {
            let removed = db.delete_all_tags(project).await?;
            println!("Removed {removed} tag(s) from Project #{project}");
            Ok(true)
        }
    }
}
