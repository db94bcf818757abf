use clap::{CommandFactory, Parser};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use todo::cli::{Cli, Command};
use todo_engine::error::AppError;
use todo_engine::manager::{TaskChanges, TaskManager};
use todo_engine::model::{Status, Task};
use todo_engine::storage::json_store::JsonStore;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created: String,
}

fn task_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id.unwrap_or(0),
        title: task.title.clone(),
        priority: task.priority.to_string(),
        status: task.status.to_string(),
        created: short_timestamp(&task.created_at),
    }
}

/// "2026-08-30T12:34:56Z" -> "2026-08-30 12:34"
fn short_timestamp(stamp: &str) -> String {
    let mut short: String = stamp.chars().take(16).collect();
    if let Some(pos) = short.find('T') {
        short.replace_range(pos..=pos, " ");
    }
    short
}

fn print_tasks_table(tasks: &[Task], heading: &str) {
    if tasks.is_empty() {
        println!("No {} found.", heading.to_lowercase());
        return;
    }

    let mut table = Table::new(tasks.iter().map(task_row));
    table.with(Style::rounded());
    println!("{heading}");
    println!("{table}");
}

fn print_task_details(task: &Task) {
    println!("Task #{}", task.id.unwrap_or(0));
    println!("  Title:       {}", task.title);
    if task.description.is_empty() {
        println!("  Description: -");
    } else {
        println!("  Description: {}", task.description);
    }
    println!("  Priority:    {}", task.priority);
    println!("  Status:      {}", task.status);
    println!("  Created:     {}", task.created_at);
    if let Some(completed_at) = task.completed_at.as_deref() {
        println!("  Completed:   {completed_at}");
    }
}

fn print_task_json(task: &Task) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(task)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{json}");
    Ok(())
}

fn print_tasks_json(tasks: &[Task]) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(tasks)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{json}");
    Ok(())
}

fn print_not_found(id: u64) {
    println!("Task #{id} not found.");
}

fn confirm(prompt: &str) -> Result<bool, AppError> {
    print!("{prompt} [y/N] ");
    io::stdout()
        .flush()
        .map_err(|err| AppError::io(err.to_string()))?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|err| AppError::io(err.to_string()))?;

    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// A failed write never rolls back the in-memory change, so surface it
/// loudly without failing the command.
fn report_save_warning(manager: &mut TaskManager) {
    if let Some(warning) = manager.take_save_warning() {
        eprintln!("WARNING: tasks were changed but could not be saved: {warning}");
    }
}

fn run_command(cli: Cli, manager: &mut TaskManager) -> Result<(), AppError> {
    match cli.command {
        Command::Add {
            title,
            description,
            priority,
        } => {
            let task = manager.add(&title, &description, priority)?;
            report_save_warning(manager);
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Added task #{}: {}", task.id.unwrap_or(0), task.title);
                print_task_details(&task);
            }
        }
        Command::List { status, all } => {
            let (tasks, heading) = if all {
                (manager.get_all(None), "All Tasks".to_string())
            } else if let Some(status) = status {
                (manager.get_all(Some(status)), format!("{status} Tasks"))
            } else {
                // Default view: pending first, then in-progress.
                let mut tasks = manager.get_all(Some(Status::Pending));
                tasks.extend(manager.get_all(Some(Status::InProgress)));
                (tasks, "Active Tasks".to_string())
            };

            if cli.json {
                print_tasks_json(&tasks)?;
            } else {
                print_tasks_table(&tasks, &heading);
            }
        }
        Command::Show { id } => match manager.get_by_id(id) {
            Some(task) => {
                if cli.json {
                    print_task_json(task)?;
                } else {
                    print_task_details(task);
                }
            }
            None => print_not_found(id),
        },
        Command::Update {
            id,
            title,
            description,
            priority,
            status,
        } => {
            let changes = TaskChanges {
                title,
                description,
                priority,
                status,
            };
            if manager.update(id, &changes)? {
                report_save_warning(manager);
                let task = manager.get_by_id(id).cloned();
                if let Some(task) = task {
                    if cli.json {
                        print_task_json(&task)?;
                    } else {
                        println!("Updated task #{id}.");
                        print_task_details(&task);
                    }
                }
            } else {
                print_not_found(id);
            }
        }
        Command::Complete { id } => {
            if manager.mark_completed(id)? {
                report_save_warning(manager);
                if cli.json {
                    if let Some(task) = manager.get_by_id(id) {
                        print_task_json(task)?;
                    }
                } else {
                    println!("Task #{id} marked as completed!");
                }
            } else {
                print_not_found(id);
            }
        }
        Command::Delete { id, force } => {
            let Some(task) = manager.get_by_id(id).cloned() else {
                print_not_found(id);
                return Ok(());
            };

            if !cli.json {
                print_task_details(&task);
            }

            if !force && !confirm(&format!("Delete task #{id}?"))? {
                println!("Deletion cancelled.");
                return Ok(());
            }

            if manager.delete(id) {
                report_save_warning(manager);
                if cli.json {
                    print_task_json(&task)?;
                } else {
                    println!("Task #{id} deleted.");
                }
            } else {
                print_not_found(id);
            }
        }
        Command::Stats => {
            let tasks = manager.get_all(None);
            print_stats(&tasks, cli.json)?;
        }
        Command::Clear { force } => {
            let completed = manager.get_all(Some(Status::Completed));
            if completed.is_empty() {
                println!("No completed tasks to clear.");
                return Ok(());
            }

            if !cli.json {
                print_tasks_table(&completed, "Completed Tasks to Remove");
            }

            if !force
                && !confirm(&format!(
                    "Delete {} completed task(s)?",
                    completed.len()
                ))?
            {
                println!("Clear operation cancelled.");
                return Ok(());
            }

            let mut deleted = 0usize;
            for task in &completed {
                if let Some(id) = task.id
                    && manager.delete(id)
                {
                    deleted += 1;
                }
            }
            report_save_warning(manager);

            if cli.json {
                println!("{}", serde_json::json!({ "cleared": deleted }));
            } else {
                println!("{deleted} completed task(s) cleared.");
            }
        }
    }

    Ok(())
}

fn print_stats(tasks: &[Task], json: bool) -> Result<(), AppError> {
    use todo_engine::model::Priority;

    let total = tasks.len();
    let count_status =
        |status: Status| tasks.iter().filter(|task| task.status == status).count();
    let count_priority =
        |priority: Priority| tasks.iter().filter(|task| task.priority == priority).count();

    let pending = count_status(Status::Pending);
    let in_progress = count_status(Status::InProgress);
    let completed = count_status(Status::Completed);
    let rate = if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    };

    if json {
        let json = serde_json::json!({
            "total": total,
            "status": {
                "pending": pending,
                "in_progress": in_progress,
                "completed": completed,
            },
            "priority": {
                "low": count_priority(Priority::Low),
                "medium": count_priority(Priority::Medium),
                "high": count_priority(Priority::High),
            },
            "completion_rate": rate,
        });
        println!("{json}");
        return Ok(());
    }

    if total == 0 {
        println!("No tasks found.");
        return Ok(());
    }

    println!("Total tasks: {total}");
    println!("Status:");
    println!("  pending:     {pending}");
    println!("  in_progress: {in_progress}");
    println!("  completed:   {completed}");
    println!("Priority:");
    println!("  low:    {}", count_priority(Priority::Low));
    println!("  medium: {}", count_priority(Priority::Medium));
    println!("  high:   {}", count_priority(Priority::High));
    println!("Completion rate: {rate:.1}%");

    Ok(())
}

fn print_welcome() {
    println!("todo - manage your tasks from the terminal");
    println!();
    println!("Example: todo add \"Buy groceries\" --desc \"Milk, bread, eggs\"");
    println!();
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn main() -> ExitCode {
    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        print_welcome();
        return ExitCode::SUCCESS;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version requests arrive as parse "errors".
            if err.use_stderr() {
                eprintln!("ERROR: {err}");
                return ExitCode::FAILURE;
            }
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
    };

    let store = match JsonStore::open_default() {
        Ok(store) => store,
        Err(err) => {
            eprintln!("ERROR: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut manager = TaskManager::new(store);
    if let Some(warning) = manager.load_warning() {
        eprintln!("WARNING: {warning}");
        eprintln!("Starting with an empty task list.");
    }

    if let Err(err) = run_command(cli, &mut manager) {
        eprintln!("ERROR: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
