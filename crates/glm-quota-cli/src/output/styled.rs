//! Table rendering for the terminal report

use colored::Colorize;
use serde::Serialize;
use serde_json::Number;
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use glm_quota_core::{ModelUsageSummary, Platform, QuotaLimitRecord, ReportBundle, ToolUsageSummary};

use super::report::ReportPresenter;
use super::{
    format_count, format_number, format_percent, paint_for_usage, progress_bar, BAR_WIDTH,
};

// Output types

#[derive(Debug, Serialize, Tabled)]
pub struct StatsRow {
    #[tabled(rename = "指标")]
    pub metric: String,
    #[tabled(rename = "数值")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct ToolRow {
    #[tabled(rename = "工具")]
    pub tool: String,
    #[tabled(rename = "使用次数")]
    pub count: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct QuotaRow {
    #[tabled(rename = "类型")]
    pub kind: String,
    #[tabled(rename = "周期")]
    pub period: String,
    #[tabled(rename = "使用率")]
    pub percentage: String,
    #[tabled(rename = "进度")]
    pub bar: String,
}

/// Renders the report as rounded tables
pub struct StyledPresenter {
    width: usize,
}

impl StyledPresenter {
    pub fn new(width: usize) -> Self {
        Self { width }
    }
}

impl ReportPresenter for StyledPresenter {
    fn render(&self, bundle: &ReportBundle) -> String {
        let mut out = String::new();

        out.push('\n');
        out.push_str(&render_title(self.width));
        out.push_str("\n\n");

        out.push_str(&render_info(bundle.platform, &bundle.queried_at));
        out.push_str("\n\n");

        out.push_str(&render_model_usage(&bundle.model_summary(), bundle.model_error()));
        out.push_str("\n\n");

        out.push_str(&render_tool_usage(&bundle.tool_summary(), bundle.tool_error()));
        out.push_str("\n\n");

        let quota = render_quota_limits(&bundle.quota_limits, bundle.quota_error());
        if !quota.is_empty() {
            out.push_str(&quota);
            out.push('\n');
        }

        out
    }
}

// ============ Sections ============

fn section_title(title: &str, error: Option<(String, String)>) -> String {
    match error {
        Some((label, message)) => format!(
            "{}\n{}",
            title,
            format!("⚠ 数据获取失败: {} {}", label, message).yellow()
        ),
        None => title.to_string(),
    }
}

fn centered(block: &str, block_width: usize, width: usize) -> String {
    let pad = " ".repeat(width.saturating_sub(block_width) / 2);
    block
        .lines()
        .map(|line| format!("{}{}", pad, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Centered title panel
pub fn render_title(width: usize) -> String {
    let title = format!(
        "{}{}",
        "GLM Coding Plan ".cyan().bold(),
        "使用统计".white().bold()
    );

    let mut builder = Builder::default();
    builder.push_record([title]);
    let mut table = builder.build();
    table.with(Style::rounded());

    centered(&table.to_string(), table.total_width(), width)
}

/// Platform and query time panel
pub fn render_info(platform: Platform, queried_at: &str) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        format!("{} {}", "平台:".bold(), platform.display_name()),
    ]);
    builder.push_record([format!("{} {}", "查询时间:".bold(), queried_at)]);
    let mut table = builder.build();
    table.with(Style::rounded());

    format!("{}\n{}", "信息".yellow(), table)
}

/// Model usage table with peak and trough rows
pub fn render_model_usage(summary: &ModelUsageSummary, error: Option<(String, String)>) -> String {
    let mut rows = vec![
        StatsRow {
            metric: "总调用次数".cyan().to_string(),
            value: format_count(summary.total_calls),
        },
        StatsRow {
            metric: "总Token使用".cyan().to_string(),
            value: format_count(summary.total_tokens),
        },
    ];

    if let (Some(peak), Some(trough)) = (summary.peak(), summary.trough()) {
        rows.push(StatsRow {
            metric: "高峰时段".cyan().to_string(),
            value: format!("{} ({}次)", peak.label, format_count(peak.count)),
        });
        rows.push(StatsRow {
            metric: "低谷时段".cyan().to_string(),
            value: format!("{} ({}次)", trough.label, format_count(trough.count)),
        });
    }

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::single(1)).with(Alignment::right()));

    format!(
        "{}\n{}",
        section_title(&"模型使用".green().to_string(), error),
        table
    )
}

/// Tool usage table with a bold total row
pub fn render_tool_usage(summary: &ToolUsageSummary, error: Option<(String, String)>) -> String {
    let mut rows: Vec<ToolRow> = summary
        .tools
        .iter()
        .map(|tool| ToolRow {
            tool: tool.display_name().cyan().to_string(),
            count: format_count(tool.count),
        })
        .collect();

    rows.push(ToolRow {
        tool: "---".to_string(),
        count: "---".to_string(),
    });
    rows.push(ToolRow {
        tool: "总计".bold().to_string(),
        count: format_count(summary.total).bold().to_string(),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::single(1)).with(Alignment::right()));

    format!(
        "{}\n{}",
        section_title(&"工具使用".blue().to_string(), error),
        table
    )
}

/// Quota table with severity colours and progress bars
///
/// Empty when there is nothing to show.
pub fn render_quota_limits(limits: &[QuotaLimitRecord], error: Option<(String, String)>) -> String {
    let title = "配额状态".yellow().to_string();

    if limits.is_empty() {
        return match error {
            Some(_) => section_title(&title, error),
            None => String::new(),
        };
    }

    let mut rows = Vec::with_capacity(limits.len() * 2);
    for limit in limits {
        rows.push(QuotaRow {
            kind: limit.display_type.clone(),
            period: limit.period.clone(),
            percentage: paint_for_usage(&format_percent(&limit.percentage), limit.percent())
                .to_string(),
            bar: paint_for_usage(&progress_bar(limit.percent(), BAR_WIDTH), limit.percent())
                .to_string(),
        });

        if let Some(current) = &limit.current {
            let total = limit.total.clone().unwrap_or_else(|| Number::from(0));
            rows.push(QuotaRow {
                kind: String::new(),
                period: String::new(),
                percentage: format!("  {} / {}", format_number(current), format_number(&total)),
                bar: String::new(),
            });
        }
    }

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::single(2)).with(Alignment::right()));

    format!("{}\n{}", section_title(&title, error), table)
}
