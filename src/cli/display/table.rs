//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::domain::application::{ApplicationSource, HelmApplication};
use crate::infrastructure::cd::Submission;
use crate::shared::Outcome;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Color, ContentArrangement, Table};

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render the versions of a catalogue application
    pub fn render_versions(&self, application: &HelmApplication) -> String {
        if application.spec.versions.is_empty() {
            return format!("No versions found for {}", application.name());
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("VERSION").set_alignment(CellAlignment::Left),
                Cell::new("SOURCE").set_alignment(CellAlignment::Left),
                Cell::new("NAMESPACE").set_alignment(CellAlignment::Left),
                Cell::new("RELEASE").set_alignment(CellAlignment::Left),
                Cell::new("DEPENDENCIES").set_alignment(CellAlignment::Left),
                Cell::new("VALID").set_alignment(CellAlignment::Center),
            ]);

        for version in &application.spec.versions {
            let source = match version.source() {
                Some(ApplicationSource::Chart { repo, chart }) => format!("{} ({})", chart, repo),
                Some(ApplicationSource::Git { repo, branch, path }) => match path {
                    Some(path) => format!("{}@{}:{}", repo, branch, path),
                    None => format!("{}@{}", repo, branch),
                },
                None => "-".to_string(),
            };

            let dependencies = version
                .dependencies
                .iter()
                .map(|d| match &d.constraints {
                    Some(constraints) => format!("{} {}", d.name, constraints),
                    None => d.name.clone(),
                })
                .collect::<Vec<_>>()
                .join("\n");

            let valid = version.validate().is_ok();

            table.add_row(vec![
                Cell::new(&version.version),
                Cell::new(source),
                Cell::new(version.namespace.as_deref().unwrap_or("-")),
                Cell::new(version.release.as_deref().unwrap_or("-")),
                Cell::new(if dependencies.is_empty() { "-".to_string() } else { dependencies }),
                Cell::new(StatusIcon::for_validity(valid))
                    .fg(self.theme.get_validity_color(valid))
                    .set_alignment(CellAlignment::Center),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ {} {} ─╮\n",
            application.name(),
            format!("[{} versions]", application.spec.versions.len())
                .bright_black()
                .to_string()
        ));
        output.push_str(&table.to_string());
        output.push('\n');

        output
    }

    /// Render a generated application descriptor
    pub fn render_submission(&self, submission: &Submission, outcome: Outcome, passes: usize) -> String {
        let application = &submission.application;

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.add_row(vec![
            Cell::new(format!("{} {}", StatusIcon::for_outcome(outcome), submission.id))
                .fg(self.theme.info),
            Cell::new(format!(
                "{} after {} pass{}",
                StatusIcon::get_status_text(outcome),
                passes,
                if passes == 1 { "" } else { "es" }
            ))
            .fg(self.theme.get_outcome_color(outcome)),
        ]);

        let mut row = |key: &str, value: String| {
            table.add_row(vec![Cell::new(key), Cell::new(value)]);
        };

        row("Repo", application.repo.clone());
        if application.is_git() {
            row("Branch", application.branch.clone());
            if !application.path.is_empty() {
                row("Path", application.path.clone());
            }
        } else {
            row("Chart", application.chart.clone());
        }
        row("Version", application.version.clone());
        row("Release", or_dash(&application.release));
        row("Namespace", application.namespace.clone());
        row(
            "Cluster",
            application
                .cluster
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "(management)".to_string()),
        );
        row(
            "Parameters",
            application
                .parameters
                .iter()
                .flatten()
                .map(|p| format!("{}={}", p.name, p.value))
                .collect::<Vec<_>>()
                .join("\n"),
        );
        if let Some(values) = &application.values {
            row("Values", values.to_string());
        }
        for field in &application.ignore_differences {
            row(
                "Ignore",
                format!("{}/{} {}", field.group, field.kind, field.json_pointers.join(",")),
            );
        }

        let flags = [
            ("create-namespace", application.create_namespace),
            ("server-side-apply", application.server_side_apply),
            ("allow-degraded", application.allow_degraded),
        ];
        let enabled: Vec<&str> = flags
            .iter()
            .filter(|(_, on)| *on)
            .map(|(name, _)| *name)
            .collect();
        if !enabled.is_empty() {
            table.add_row(vec![
                Cell::new("Flags"),
                Cell::new(enabled.join(", ")).fg(Color::Cyan),
            ]);
        }

        table.to_string()
    }
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}
