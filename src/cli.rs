use crate::backend::{Backend, CloneProgress, CloneRequest, LocalBackend, Repository};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// Browse git repositories, their history and trees from the terminal
#[derive(Parser, Debug)]
#[command(name = "gitdeck", version, about = "Browse git repositories, their history and trees from the terminal", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ~/.config/gitdeck/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the cloned repositories
    #[arg(long, global = true, value_name = "DIR")]
    pub repos_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the repositories
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Clone a repository over https
    Clone {
        /// Host to clone from, e.g. github.com
        host: String,
        /// Path on the host, e.g. /creationix/conquest.git
        path: String,
        /// Description stored with the clone
        #[arg(short, long, default_value = "")]
        description: String,
    },
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::utils::get_config_path)
    }

    /// Load the configuration file and apply command line overrides
    pub fn load_config(&self) -> Result<Config> {
        let config_path = self.config_path();
        let mut config =
            Config::load_or_create(&config_path).context("Failed to load configuration")?;
        if let Some(repos_dir) = &self.repos_dir {
            config.repos_dir = repos_dir.clone();
        }
        Ok(config)
    }

    /// Execute the subcommand, if any. Without one the TUI is launched instead.
    pub fn execute(&self, config: &Config) -> Result<()> {
        let backend = LocalBackend::new(config.repos_dir.clone());
        match &self.command {
            Some(Commands::List { json }) => Self::cmd_list(&backend, *json),
            Some(Commands::Clone {
                host,
                path,
                description,
            }) => Self::cmd_clone(&backend, host, path, description),
            None => Ok(()),
        }
    }

    fn cmd_list(backend: &dyn Backend, json: bool) -> Result<()> {
        let repos = backend.get_repos().context("Failed to list repositories")?;
        if json {
            let output =
                serde_json::to_string_pretty(&repos).context("Failed to serialize repositories")?;
            println!("{}", output);
            return Ok(());
        }

        if repos.is_empty() {
            println!("No repositories yet. Clone one with 'gitdeck clone <host> <path>'.");
            return Ok(());
        }
        for line in format_repo_table(&repos) {
            println!("{}", line);
        }
        Ok(())
    }

    fn cmd_clone(backend: &LocalBackend, host: &str, path: &str, description: &str) -> Result<()> {
        let request = CloneRequest {
            hostname: host.trim().to_string(),
            pathname: path.trim().to_string(),
            description: description.trim().to_string(),
        };
        println!("📥 Cloning {}...", request.url());

        let mut stdout = std::io::stdout();
        let mut report = |progress: CloneProgress| {
            let _ = write!(stdout, "\r{}", progress_line(&progress));
            let _ = stdout.flush();
            true
        };
        let repo = backend.add_repo(&request, &mut report);
        println!();

        let repo = repo.with_context(|| format!("Failed to clone {}", request.url()))?;
        println!(
            "✅ Cloned {} into {:?}",
            repo.name,
            backend.repos_dir().join(&repo.name)
        );
        Ok(())
    }
}

/// One aligned line per repository: name, remote, description
pub fn format_repo_table(repos: &[Repository]) -> Vec<String> {
    let name_width = repos.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
    let remote_width = repos
        .iter()
        .map(|r| r.remote_display().chars().count())
        .max()
        .unwrap_or(0);

    repos
        .iter()
        .map(|repo| {
            let line = format!(
                "{:<name_width$}  {:<remote_width$}  {}",
                repo.name,
                repo.remote_display(),
                repo.description,
            );
            line.trim_end().to_string()
        })
        .collect()
}

/// Single-line clone progress, e.g. `Receiving objects: 50% (5/10)`
pub fn progress_line(progress: &CloneProgress) -> String {
    format!(
        "{}: {:>3}% ({}/{})",
        progress.label,
        (progress.ratio() * 100.0).round() as u32,
        progress.value,
        progress.max
    )
}
