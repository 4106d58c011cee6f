use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use prdash::{Action, DisplayMode, ProcessedPullRequest, Section};

const LABEL_WIDTH: usize = 13;
const ACTION_SEPARATOR: &str = " | ";

fn format_relative_time(time: DateTime<Utc>) -> String {
    use chrono_humanize::HumanTime;
    HumanTime::from(time).to_string()
}

fn format_local_time(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local)
        .format("%d %b %y %H:%M %Z")
        .to_string()
}

fn format_action(action: &Action) -> String {
    format!(
        "{} by {} at {} ({})",
        action.kind.as_str().green(),
        action.actor.red(),
        format_local_time(action.time).yellow(),
        format_relative_time(action.time),
    )
}

fn write_labelled<W: Write>(label: &str, value: &str, writer: &mut W) -> Result<()> {
    writeln!(
        writer,
        "{:<width$}{value}",
        format!("{label}:"),
        width = LABEL_WIDTH
    )?;
    Ok(())
}

struct PrFormatter<'a> {
    pr: &'a ProcessedPullRequest,
}

impl<'a> PrFormatter<'a> {
    fn new(pr: &'a ProcessedPullRequest) -> Self {
        Self { pr }
    }

    fn format<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.write_title(writer)?;
        self.write_url(writer)?;
        self.write_actions(writer)?;
        self.write_info(writer)?;
        self.write_checks(writer)?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_title<W: Write>(&self, writer: &mut W) -> Result<()> {
        let detail = &self.pr.pull_request.detail;
        write_labelled(
            "PR",
            &format!("{} | {}", detail.author().red(), detail.title),
            writer,
        )
    }

    fn write_url<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_labelled("Url", self.pr.pull_request.detail.html_url(), writer)
    }

    fn write_actions<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut actions = String::new();
        for action in &self.pr.timeline {
            actions.push_str(&format_action(action));
            actions.push_str(ACTION_SEPARATOR);
        }
        write_labelled("Actions", actions.trim_end(), writer)
    }

    fn write_info<W: Write>(&self, writer: &mut W) -> Result<()> {
        let flags = &self.pr.flags;
        let state = if self.pr.pull_request.detail.draft {
            "draft".normal().to_string()
        } else {
            "open".green().to_string()
        };

        let parts: Vec<String> = std::iter::once(Some(state))
            .chain([
                flags.reviewed.then(|| "reviewed".to_string()),
                flags
                    .changes_requested
                    .then(|| "changes requested".red().to_string()),
                flags.approved.then(|| "approved".green().to_string()),
            ])
            .flatten()
            .collect();

        write_labelled("Info", &parts.join(" "), writer)
    }

    fn write_checks<W: Write>(&self, writer: &mut W) -> Result<()> {
        let flags = &self.pr.flags;
        let parts: Vec<String> = [
            flags.checks_running.then(|| "running".yellow().to_string()),
            flags.checks_failed.then(|| "failed".red().to_string()),
        ]
        .into_iter()
        .flatten()
        .collect();

        write_labelled("Checks", &parts.join(" "), writer)
    }
}

fn display_section_header<W: Write>(section: &Section, writer: &mut W) -> Result<()> {
    writeln!(writer, "{}", format!("#### {} ####", section.kind).bold())?;
    Ok(())
}

fn display_sections_quiet<W: Write>(sections: &[Section], writer: &mut W) -> Result<()> {
    for section in sections {
        display_section_header(section, writer)?;
        for pr in &section.pull_requests {
            writeln!(writer, "{}", pr.pull_request.detail.html_url())?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn display_sections_normal<W: Write>(sections: &[Section], writer: &mut W) -> Result<()> {
    for section in sections {
        display_section_header(section, writer)?;
        for pr in &section.pull_requests {
            PrFormatter::new(pr).format(writer)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Prints every section in the order given. An empty slice prints nothing.
pub fn display_sections<W: Write>(
    sections: &[Section],
    mode: DisplayMode,
    writer: &mut W,
) -> Result<()> {
    match mode {
        DisplayMode::Quiet => display_sections_quiet(sections, writer),
        DisplayMode::Normal => display_sections_normal(sections, writer),
    }
}
