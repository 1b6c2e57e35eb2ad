//! Report command
//!
//! Fetches model usage, tool usage and quota limits one after another and
//! prints them as tables (or JSON).

use anyhow::Result;

use glm_quota_core::{
    collect_report, ApiClient, Endpoint, GlmUsageProvider, UsageQuery, AUTH_TOKEN_ENV,
    BASE_URL_ENV, DEFAULT_BASE_URL,
};

use super::{Context, Outcome};
use crate::output::report::presenter;
use crate::output::{print_info, OutputFormat};

pub async fn execute(ctx: &Context) -> Result<Outcome> {
    let Some(credentials) = ctx.resolver.resolve() else {
        print_missing_config(ctx);
        return Ok(Outcome::Failure);
    };

    let provider = GlmUsageProvider::new(ApiClient::new(), credentials);
    let show_progress = !ctx.quiet && ctx.format == OutputFormat::Table;

    print_info("正在获取配额数据...", !show_progress);
    let collect = collect_report(&provider, UsageQuery::current(), |endpoint| {
        print_info(progress_message(endpoint), !show_progress);
    });

    let bundle = tokio::select! {
        bundle = collect => bundle,
        _ = tokio::signal::ctrl_c() => {
            println!("\n\n已取消");
            return Ok(Outcome::Failure);
        }
    };

    match ctx.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&bundle)?);
        }
        OutputFormat::Table => {
            print!("\n\n{}", presenter().render(&bundle));
        }
    }

    Ok(Outcome::Success)
}

fn progress_message(endpoint: Endpoint) -> &'static str {
    match endpoint {
        Endpoint::ModelUsage => "获取模型使用数据...",
        Endpoint::ToolUsage => "获取工具使用数据...",
        Endpoint::QuotaLimit => "获取配额限制...",
    }
}

fn print_missing_config(ctx: &Context) {
    println!("[错误] 未找到 API 配置");
    println!();
    println!(
        "请确保 Claude Code 已正确配置，设置环境变量 {} / {}，或在 {} 中设置:",
        AUTH_TOKEN_ENV,
        BASE_URL_ENV,
        ctx.resolver.settings_path().display()
    );
    println!(
        "  {{\"env\": {{\"{}\": \"your-token\", \"{}\": \"{}\"}}}}",
        AUTH_TOKEN_ENV, BASE_URL_ENV, DEFAULT_BASE_URL
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_messages_are_distinct() {
        let messages = [
            progress_message(Endpoint::ModelUsage),
            progress_message(Endpoint::ToolUsage),
            progress_message(Endpoint::QuotaLimit),
        ];
        assert_ne!(messages[0], messages[1]);
        assert_ne!(messages[1], messages[2]);
    }

    #[tokio::test]
    async fn test_missing_token_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let ctx = Context {
            resolver: glm_quota_core::CredentialResolver::with_settings_path(
                dir.path().join("settings.json"),
            )
            .with_env(|_| None),
            format: OutputFormat::Table,
            quiet: true,
        };
        assert_eq!(execute(&ctx).await.unwrap(), Outcome::Failure);
    }
}
