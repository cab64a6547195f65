use crate::api::{resolve_base_url, ApiClient};
use crate::errors::AppResult;
use crate::stats;
use crate::storage::{resolve_data_path, resolve_token_path};
use crate::store::HabitStore;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "habit-tracker", about = "Track daily habits from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List habits with their current streak and 30-day completion rate
    List,
    /// Create a habit
    Add {
        name: String,
        #[arg(long, default_value = "primary")]
        color: String,
    },
    /// Delete a habit and all of its completions
    Delete { id: String },
    /// Flip a habit's completion for a day (defaults to today)
    Toggle {
        habit_id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Streak and completion rate for one habit
    Stats {
        habit_id: String,
        #[arg(long, default_value_t = 30)]
        window: u32,
    },
    /// Per-day completion counts for a month (defaults to the current one)
    Month {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// How many habits are completed today
    Today,
    /// Whether the backend is reachable
    Status,
    /// Create an account and log in
    Register {
        email: String,
        name: String,
        #[arg(long, env = "HABIT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Obtain a bearer credential for later commands
    Login {
        email: String,
        #[arg(long, env = "HABIT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored credential
    Logout,
    /// Show the logged-in account
    Whoami,
}

pub async fn run(cli: Cli) -> AppResult<()> {
    let mut api = ApiClient::connect(resolve_base_url(), resolve_token_path()).await;

    match cli.command {
        Command::Register {
            email,
            name,
            password,
        } => {
            let user = api.register(&email, &password, &name).await?;
            api.login(&email, &password).await?;
            println!("registered and logged in as {} <{}>", user.name, user.email);
        }
        Command::Login { email, password } => {
            api.login(&email, &password).await?;
            println!("logged in as {email}");
        }
        Command::Logout => {
            api.logout().await?;
            println!("logged out");
        }
        Command::Whoami => match api.me().await {
            Ok(user) => println!("{} <{}>", user.name, user.email),
            Err(err) => {
                // A stale credential is dropped rather than surfaced.
                api.logout().await?;
                return Err(err);
            }
        },
        command => {
            let mut store = HabitStore::new(api, resolve_data_path());
            store.load().await;
            run_store_command(&mut store, command).await?;
        }
    }

    Ok(())
}

async fn run_store_command(store: &mut HabitStore, command: Command) -> AppResult<()> {
    match command {
        Command::List => {
            if store.habits().is_empty() {
                println!("no habits yet");
            }
            for habit in store.habits() {
                println!(
                    "{}  {}  streak {}  rate {}%",
                    habit.id,
                    habit.name,
                    store.streak(&habit.id),
                    store.completion_rate(&habit.id, 30),
                );
            }
        }
        Command::Add { name, color } => {
            let habit = store.add_habit(&name, &color).await?;
            println!("added {} ({})", habit.name, habit.id);
        }
        Command::Delete { id } => {
            store.delete_habit(&id).await;
            println!("deleted {id}");
        }
        Command::Toggle { habit_id, date } => {
            let date = date.unwrap_or_else(stats::today);
            store.toggle_completion(&habit_id, date).await;
            let state = if store.is_habit_completed(&habit_id, date) {
                "completed"
            } else {
                "not completed"
            };
            println!("{habit_id} on {date}: {state}");
        }
        Command::Stats { habit_id, window } => {
            println!("streak: {} days", store.streak(&habit_id));
            println!(
                "completion rate ({} days): {}%",
                window + 1,
                store.completion_rate(&habit_id, window),
            );
        }
        Command::Month { date } => {
            let reference = date.unwrap_or_else(stats::today);
            for day in store.monthly_completions(reference) {
                println!("{}  {}/{}", day.date, day.completions, day.total);
            }
        }
        Command::Today => {
            println!(
                "{} of {} habits completed today",
                store.today_completions(),
                store.habits().len(),
            );
        }
        Command::Status => {
            let mode = if store.is_online() { "online" } else { "offline" };
            println!("{mode} (backend {})", resolve_base_url());
            println!("snapshot: {}", resolve_data_path().display());
        }
        Command::Register { .. }
        | Command::Login { .. }
        | Command::Logout
        | Command::Whoami => unreachable!("auth commands are handled before the store is built"),
    }

    Ok(())
}
