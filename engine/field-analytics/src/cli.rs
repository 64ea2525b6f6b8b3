//! # Command Line Interface
//!
//! CLI for querying a loaded contest: exposure, combinations, stacks,
//! and duplicate lineups under a percentile/rank filter.

use crate::config::AnalysisConfig;
use crate::filter::FilterWindow;
use crate::query::QueryEngine;
use crate::stacks::StackBy;
use crate::ContestAnalysis;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Field analytics CLI for DFS contest results
#[derive(Parser)]
#[command(name = "field-cli")]
#[command(about = "Field analytics CLI for DFS contest results")]
pub struct Cli {
    /// Path to the canonical contest artifact (JSON)
    #[arg(short, long)]
    pub contest: PathBuf,

    /// Keep only the top P percent of the field (0 < P <= 100)
    #[arg(long, global = true, conflicts_with_all = ["min_rank", "max_rank"])]
    pub percentile: Option<f64>,

    /// Lowest rank to keep, inclusive
    #[arg(long, global = true)]
    pub min_rank: Option<u32>,

    /// Highest rank to keep, inclusive
    #[arg(long, global = true)]
    pub max_rank: Option<u32>,

    /// Emit JSON instead of text tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Filter window described by the shared flags.
    ///
    /// An absent bound falls back to the field's own edge, so only
    /// bounds the user actually supplied can trigger clamping feedback.
    pub fn window(&self, total_entries: usize) -> FilterWindow {
        if let Some(pct) = self.percentile {
            return FilterWindow::TopPercentile(pct / 100.0);
        }
        match (self.min_rank, self.max_rank) {
            (None, None) => FilterWindow::Full,
            (lo, hi) => FilterWindow::RankRange {
                lo: lo.unwrap_or(1),
                hi: hi.unwrap_or(total_entries as u32),
            },
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show contest metadata, window feedback, and diagnostics
    Status,
    /// Show player exposure under the current window
    Exposure {
        /// Rows to show
        #[arg(long, default_value = "25")]
        top: usize,
    },
    /// Show per-user exposure compared against the field
    Users {
        /// Restrict to one username
        #[arg(long)]
        user: Option<String>,
        /// Rows to show
        #[arg(long, default_value = "25")]
        top: usize,
    },
    /// Show player combinations of a given size
    Combos {
        /// Combination size (players per combo)
        #[arg(long, default_value = "2")]
        size: usize,
        /// Rows to show
        #[arg(long, default_value = "25")]
        top: usize,
    },
    /// Show team or game stacks
    Stacks {
        /// Grouping attribute
        #[arg(long, value_enum, default_value = "team")]
        group_by: StackBy,
        /// Rows to show
        #[arg(long, default_value = "25")]
        top: usize,
    },
    /// Show duplicated lineups
    Dupes {
        /// Rows to show
        #[arg(long, default_value = "25")]
        top: usize,
    },
}

/// CLI handler owning the loaded contest and its query engine
pub struct CliHandler {
    engine: QueryEngine,
    json: bool,
}

impl CliHandler {
    /// Load the contest artifact, build all indices, and apply the
    /// requested window.
    pub async fn new(
        contest_path: &Path,
        window: impl FnOnce(usize) -> FilterWindow,
        json: bool,
    ) -> Result<Self> {
        let table = contest_registry::load_contest(contest_path).await?;
        let analysis =
            Arc::new(ContestAnalysis::build(Arc::new(table), AnalysisConfig::default()));
        let engine = QueryEngine::new(analysis);

        let window = window(engine.analysis().table().total_entries());
        let resolved = engine.set_window(window);
        if resolved.clamped {
            eprintln!(
                "note: filter bounds adjusted to ranks {}..={}",
                resolved.lo, resolved.hi
            );
        }

        Ok(Self { engine, json })
    }

    /// Handle CLI commands
    pub fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Status => self.show_status()?,
            Commands::Exposure { top } => self.show_exposure(top)?,
            Commands::Users { user, top } => self.show_users(user.as_deref(), top)?,
            Commands::Combos { size, top } => self.show_combos(size, top)?,
            Commands::Stacks { group_by, top } => self.show_stacks(group_by, top)?,
            Commands::Dupes { top } => self.show_dupes(top)?,
        }
        Ok(())
    }

    fn window_line(&self) -> String {
        let state = self.engine.window_state();
        format!(
            "Window: ranks {}..={} ({} of {} entries)",
            state.window.lo, state.window.hi, state.active_entries, state.total_entries
        )
    }

    fn show_status(&self) -> Result<()> {
        let analysis = self.engine.analysis();
        let meta = analysis.table().meta();
        let diagnostics = analysis.diagnostics();

        if self.json {
            let status = serde_json::json!({
                "meta": meta,
                "window": self.engine.window_state(),
                "diagnostics": diagnostics,
                "unmatched_players": analysis.table().unmatched_players(),
                "combo_sizes": analysis.combo_sizes().collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
            return Ok(());
        }

        println!("Contest Status");
        println!("{}", "=".repeat(50));
        println!("Site/sport:       {} / {}", meta.site, meta.sport);
        println!("Entries:          {}", meta.n_entries);
        println!("Slate players:    {}", meta.n_players);
        println!("Loaded at:        {}", meta.loaded_at);
        println!("{}", self.window_line());
        println!(
            "Diagnostics:      {} unresolved refs, {} duplicate slots, {} unmatched names",
            diagnostics.unresolved_refs,
            diagnostics.duplicate_slots,
            analysis.table().unmatched_players().len()
        );
        Ok(())
    }

    fn show_exposure(&self, top: usize) -> Result<()> {
        let rows = self.engine.top_exposure(top);
        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        println!("Player Exposure - {}", self.window_line());
        println!("{}", "=".repeat(50));
        for row in rows {
            println!(
                "{:<28} {:>6} entries  {:>6.2}%",
                row.name, row.effective_count, row.exposure_pct
            );
        }
        Ok(())
    }

    fn show_users(&self, user: Option<&str>, top: usize) -> Result<()> {
        let rows = self.engine.top_user_exposure(user, top);
        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        println!("User Exposure vs Field - {}", self.window_line());
        println!("{}", "=".repeat(50));
        for row in rows {
            println!(
                "{:<20} {:<28} {:>4} entries  {:>6.2}%  field {:>6.2}%  delta {:>+7.2}%",
                row.username,
                row.name,
                row.effective_count,
                row.user_exposure_pct,
                row.field_pct,
                row.delta_vs_field
            );
        }
        Ok(())
    }

    fn show_combos(&self, size: usize, top: usize) -> Result<()> {
        let rows = self.engine.top_combos(size, top)?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        println!("{size}-Player Combos - {}", self.window_line());
        println!("{}", "=".repeat(50));
        for row in rows {
            println!("{:<60} {:>6} entries", row.label, row.effective_count);
        }
        Ok(())
    }

    fn show_stacks(&self, group_by: StackBy, top: usize) -> Result<()> {
        let rows = self.engine.top_stacks(group_by, top);
        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        let kind = match group_by {
            StackBy::Team => "Team",
            StackBy::Game => "Game",
        };
        println!("{kind} Stacks - {}", self.window_line());
        println!("{}", "=".repeat(50));
        for row in rows {
            println!("{:<12} x{:<2} {:>6} entries", row.group, row.tally, row.effective_count);
        }
        Ok(())
    }

    fn show_dupes(&self, top: usize) -> Result<()> {
        let rows = self.engine.top_duplicates(top);
        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        println!("Duplicate Lineups - {}", self.window_line());
        println!("{}", "=".repeat(50));
        if rows.is_empty() {
            println!("No duplicated lineups inside the window");
        }
        for row in rows {
            println!("{:>4}x  {}", row.effective_count, row.label);
        }
        Ok(())
    }

    /// Query engine, for driving the handler programmatically.
    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }
}
