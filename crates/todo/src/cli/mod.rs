use clap::{Parser, Subcommand};
use todo_engine::model::{Priority, Status};

#[derive(Parser, Debug)]
#[command(name = "todo", version, about = "Manage your tasks from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: todo add "Buy milk" --desc "2 litres, whole" -p high
    Add {
        title: String,
        /// Task description
        #[arg(short = 'd', long = "desc", default_value = "")]
        description: String,
        /// Task priority (low, medium, high)
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
    },
    /// List tasks (active ones by default)
    ///
    /// Example: todo list --status completed
    /// Example: todo list --all
    List {
        /// Filter by status (pending, in_progress, completed)
        #[arg(short, long)]
        status: Option<Status>,
        /// Show every task regardless of status
        #[arg(short, long)]
        all: bool,
    },
    /// Show details of a task
    ///
    /// Example: todo show 1
    Show { id: u64 },
    /// Update fields of an existing task
    ///
    /// Example: todo update 1 --title "Buy oat milk" --status in_progress
    Update {
        id: u64,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New description
        #[arg(short = 'd', long = "desc")]
        description: Option<String>,
        /// New priority
        #[arg(short, long)]
        priority: Option<Priority>,
        /// New status
        #[arg(short, long)]
        status: Option<Status>,
    },
    /// Mark a task as completed
    ///
    /// Example: todo complete 1
    Complete { id: u64 },
    /// Delete a task
    ///
    /// Example: todo delete 1 --force
    Delete {
        id: u64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Show task statistics
    Stats,
    /// Remove all completed tasks
    ///
    /// Example: todo clear --force
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}
