//! Text output formatting with score bars and colors.

use drishti_api::PoseTrend;
use drishti_core::{
    DailyRollup, METRIC_MAX, Metric, Paginated, Pose, PracticeSession, ScoreCard, SessionDetail,
    SessionStatus, Side, TrendSide, TrendSummary, TrendWindow,
};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

// Score bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// Score card metrics shown on a card, in display order.
const CARD_METRICS: [Metric; 6] = [
    Metric::Ease,
    Metric::Comfort,
    Metric::Stability,
    Metric::Pain,
    Metric::Breath,
    Metric::Focus,
];

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    bar_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            bar_width: 10,
        }
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Formats one page of sessions.
    pub fn format_sessions(&self, page: &Paginated<PracticeSession>) -> String {
        if page.items.is_empty() {
            return self.dim("No sessions yet");
        }

        let mut lines = vec![format!(
            "{:<12} {:<24} {:<10} {:>6}  {}",
            self.bold("Date"),
            self.bold("Session"),
            self.bold("Status"),
            self.bold("Score"),
            self.bold("ID")
        )];

        for session in &page.items {
            lines.push(format!(
                "{:<12} {:<24} {:<10} {:>6}  {}",
                day_of(&session.date),
                truncate(session.display_label(), 24),
                self.status(session.status),
                format_score(session.overall_score),
                self.dim(&session.id)
            ));
        }

        if let Some(cursor) = page.next_cursor.as_deref().filter(|_| page.has_next()) {
            lines.push(String::new());
            lines.push(self.dim(&format!("More: --cursor {cursor}")));
        }

        lines.join("\n")
    }

    /// Formats a session with its score cards.
    pub fn format_session_detail(&self, session: &SessionDetail) -> String {
        let mut lines = Vec::new();

        let title = session.label.as_deref().unwrap_or("Practice");
        lines.push(self.bold(title));
        lines.push("─".repeat(40));
        if let Some(date) = session.date.as_deref() {
            lines.push(format!("Date:    {}", day_of(date)));
        }
        if let Some(status) = session.status {
            lines.push(format!("Status:  {}", self.status(status)));
        }
        lines.push(format!("Score:   {}", format_score(session.overall_score)));
        lines.push(format!("ID:      {}", self.dim(&session.id)));

        if !session.score_cards.is_empty() {
            lines.push(String::new());
            let incomplete = session.incomplete_count();
            lines.push(self.dim(&format!(
                "Score cards ({} of {} complete):",
                session.score_cards.len() - incomplete,
                session.score_cards.len()
            )));
            for card in &session.score_cards {
                let mark = if card.is_complete {
                    self.green("✓")
                } else {
                    self.yellow("•")
                };
                lines.push(format!(
                    "  {} {:<28} {:>6}  {}",
                    mark,
                    pose_label(card.pose.display_name(), card.side),
                    format_score(card.overall_score),
                    self.dim(&card.id)
                ));
            }
        }

        lines.join("\n")
    }

    // ========================================================================
    // Score cards
    // ========================================================================

    /// Formats a score card with one bar per metric.
    pub fn format_score_card(&self, card: &ScoreCard) -> String {
        let mut lines = vec![self.bold(&pose_label(card.pose.display_name(), card.side))];

        if card.skipped {
            lines.push(self.dim("Skipped"));
        }

        for metric in CARD_METRICS {
            let label = format!("{}:", capitalize(metric.as_str()));
            let line = match card.metric(metric) {
                Some(value) => format!("{:<11} {} {:.0}", label, self.score_bar(value), value),
                None => format!("{:<11} {}", label, self.dim("−")),
            };
            lines.push(line);
        }

        lines.push(format!("Overall:    {}", format_score(card.overall_score)));
        if let Some(notes) = card.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            lines.push(format!("Notes:      {notes}"));
        }
        lines.push(format!("ID:         {}", self.dim(&card.id)));

        lines.join("\n")
    }

    /// Formats a score bar for a value on the 1-10 scale.
    pub fn score_bar(&self, value: f64) -> String {
        let ratio = (value / f64::from(METRIC_MAX)).clamp(0.0, 1.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let filled = (ratio * self.bar_width as f64).round() as usize;
        let empty = self.bar_width.saturating_sub(filled);

        let bar = format!(
            "{}{}",
            BAR_FULL.to_string().repeat(filled),
            BAR_EMPTY.to_string().repeat(empty)
        );

        self.color_for_score(value, &bar)
    }

    // ========================================================================
    // Poses
    // ========================================================================

    /// Formats a pose list.
    pub fn format_poses(&self, poses: &[&Pose]) -> String {
        if poses.is_empty() {
            return self.dim("No matching poses");
        }

        let mut lines = vec![format!(
            "{:<30} {:<28} {:<14} {}",
            self.bold("Pose"),
            self.bold("Slug"),
            self.bold("Group"),
            self.bold("Sides")
        )];

        for pose in poses {
            let group = pose.group().map_or(pose.sequence_group.as_str(), |g| g.label());
            let sides = if pose.is_two_sided { "L/R" } else { "−" };
            lines.push(format!(
                "{:<30} {:<28} {:<14} {}",
                truncate(&pose.sanskrit_name, 30),
                self.cyan(&pose.slug),
                group,
                sides
            ));
        }

        lines.join("\n")
    }

    // ========================================================================
    // Trends
    // ========================================================================

    /// Formats a pose trend: header, summary, then one row per day.
    pub fn format_trend(
        &self,
        pose: &Pose,
        metric: Metric,
        window: TrendWindow,
        side: TrendSide,
        trend: &PoseTrend,
    ) -> String {
        let mut header = format!("{} {}", self.bold(&pose.sanskrit_name), self.dim(&format!("({metric}, {window}")));
        if pose.is_two_sided {
            header.push_str(&self.dim(&format!(", side {side}")));
        }
        header.push_str(&self.dim(")"));

        let mut lines = vec![header, "─".repeat(40)];

        if trend.series.is_empty() {
            lines.push(self.dim("No data in this window"));
            return lines.join("\n");
        }

        lines.push(self.format_summary(&trend.summary));
        lines.push(String::new());
        for day in &trend.series {
            lines.push(self.format_day(day));
        }

        lines.join("\n")
    }

    /// Formats the summary line.
    pub fn format_summary(&self, summary: &TrendSummary) -> String {
        let mut parts = vec![
            format!("Average {}", format_score(summary.overall)),
            format!("Last 7 {}", format_score(summary.last7)),
        ];
        if let Some(delta) = summary.delta7 {
            let text = format!("{delta:+.1} vs prior 7");
            parts.push(if delta > 0.0 {
                self.green(&text)
            } else if delta < 0.0 {
                self.red(&text)
            } else {
                text
            });
        }
        parts.push(self.dim(&format!("{} days", summary.days)));
        parts.join("  ")
    }

    fn format_day(&self, day: &DailyRollup) -> String {
        format!(
            "{}  {} {:.1}",
            day.day.format("%Y-%m-%d"),
            self.score_bar(day.value),
            day.value
        )
    }

    // ========================================================================
    // Status
    // ========================================================================

    /// Formats the status report.
    pub fn format_status(&self, base_url: &str, backend: &str, signed_in: bool) -> String {
        let state = if signed_in {
            self.green("signed in")
        } else {
            self.yellow("signed out")
        };
        [
            format!("Backend: {}", self.cyan(base_url)),
            format!("Token:   {backend}"),
            format!("Auth:    {state}"),
        ]
        .join("\n")
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn status(&self, status: SessionStatus) -> String {
        let text = status.to_string();
        match status {
            SessionStatus::Draft => self.yellow(&text),
            SessionStatus::Published => self.green(&text),
            SessionStatus::Archived => self.dim(&text),
        }
    }

    fn color_for_score(&self, value: f64, text: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }

        if value < 4.0 {
            self.red(text)
        } else if value < 7.0 {
            self.yellow(text)
        } else {
            self.green(text)
        }
    }

    /// Bold text.
    pub fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    /// Dimmed text.
    pub fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    /// Green text.
    pub fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    /// Red text.
    pub fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

// ============================================================================
// Plain helpers
// ============================================================================

fn format_score(score: Option<f64>) -> String {
    score.map_or_else(|| "−".to_string(), |s| format!("{s:.1}"))
}

/// First ten characters of an ISO timestamp.
fn day_of(iso: &str) -> &str {
    iso.get(..10).unwrap_or(iso)
}

fn pose_label(name: &str, side: Option<Side>) -> String {
    match side.filter(Side::is_sided) {
        Some(side) => format!("{name} • {side}"),
        None => name.to_string(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
