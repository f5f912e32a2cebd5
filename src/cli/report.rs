//! Read-only reports printed to stdout
//!
//! These commands hydrate the stores and never write back.

use std::fmt::Write;

use clap::Args;

use crate::api::AppState;
use crate::domain::{ActivitySnapshot, ExternalCounts, LearnedPattern, TimeWindow, WindowActivity};
use crate::infrastructure::logging;

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Print the full snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct PatternsArgs {
    /// Only patterns of this category
    #[arg(long)]
    pub category: Option<String>,

    /// Maximum number of patterns to list
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ActivityArgs {
    /// Trailing window: 24h, 7d or 30d
    #[arg(long, default_value = "7d")]
    pub window: TimeWindow,
}

pub async fn stats(args: StatsArgs) -> anyhow::Result<()> {
    let state = load_state()?;
    let snapshot = state.stats.snapshot(ExternalCounts::default()).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render_stats(&snapshot));
    }
    Ok(())
}

pub async fn patterns(args: PatternsArgs) -> anyhow::Result<()> {
    let state = load_state()?;
    let mut patterns = state.learner.list(args.category.as_deref()).await;
    if let Some(limit) = args.limit {
        patterns.truncate(limit);
    }

    print!("{}", render_patterns(&patterns));
    Ok(())
}

pub async fn activity(args: ActivityArgs) -> anyhow::Result<()> {
    let state = load_state()?;
    let activity = state.stats.activity(args.window).await;

    print!("{}", render_activity(&activity));
    Ok(())
}

pub async fn candidates() -> anyhow::Result<()> {
    let state = load_state()?;
    let threshold = state.learner.policy().threshold;
    let candidates = state.learner.promotion_candidates().await;

    if candidates.is_empty() {
        println!("No patterns reached {} observations without being promoted.", threshold);
    } else {
        print!("{}", render_patterns(&candidates));
    }
    Ok(())
}

fn load_state() -> anyhow::Result<AppState> {
    let config = super::load_config()?;
    logging::init_logging(&config.logging);

    crate::create_app_state_with_config(&config)
}

fn render_stats(snapshot: &ActivitySnapshot) -> String {
    let mut out = String::new();
    let cache = &snapshot.cache;
    let learning = &snapshot.learning;

    let _ = writeln!(out, "Response cache");
    let _ = writeln!(out, "  entries:        {}", cache.total_entries);
    let _ = writeln!(out, "  hits:           {}", cache.total_hits);
    let _ = writeln!(out, "  used entries:   {}", cache.used_entries);
    let _ = writeln!(out, "  avg hits/entry: {:.2}", cache.avg_hits_per_entry);
    let _ = writeln!(
        out,
        "  est. savings:   {} calls, ${:.4}",
        cache.estimated_savings.api_calls, cache.estimated_savings.dollars
    );

    let _ = writeln!(out, "Learned patterns");
    let _ = writeln!(out, "  patterns:       {}", learning.total_patterns);
    let _ = writeln!(
        out,
        "  frequent:       {} (>= {} observations)",
        learning.total_frequent, learning.threshold
    );
    let _ = writeln!(out, "  in training:    {}", learning.total_in_training);
    for (category, count) in &learning.by_category {
        let _ = writeln!(out, "    {:<14}{}", category, count);
    }

    let _ = writeln!(out, "Activity");
    for window in &snapshot.windows {
        let _ = writeln!(
            out,
            "  {:<4} cache used {}, patterns asked {}, new patterns {}",
            window.window, window.cache_entries_used, window.patterns_asked, window.new_patterns
        );
    }

    if !snapshot.top_questions.is_empty() {
        let _ = writeln!(out, "Top cached questions");
        for top in &snapshot.top_questions {
            let _ = writeln!(out, "  {:>5}  {}", top.hits, top.question);
        }
    }

    out
}

fn render_patterns(patterns: &[LearnedPattern]) -> String {
    if patterns.is_empty() {
        return "No patterns learned yet.\n".to_string();
    }

    let mut out = String::new();
    for pattern in patterns {
        let marker = if pattern.added_to_training() { "*" } else { " " };
        let _ = writeln!(
            out,
            "{} {:>5}  [{}] {}  ({})",
            marker,
            pattern.frequency(),
            pattern.category(),
            pattern.question,
            pattern.id()
        );
    }
    out
}

fn render_activity(activity: &WindowActivity) -> String {
    format!(
        concat!(
            "Last {} (since {})\n",
            "  cache entries used: {}\n",
            "  patterns asked:     {}\n",
            "  new patterns:       {}\n",
        ),
        activity.window,
        activity.since.to_rfc3339(),
        activity.cache_entries_used,
        activity.patterns_asked,
        activity.new_patterns
    )
}
