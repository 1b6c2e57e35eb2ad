//! Serve command
//!
//! Starts the local viewer server and opens it in the browser. Runs until
//! Ctrl-C.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;

use glm_quota_core::ApiClient;

use super::{expand_path, Context, Outcome};
use crate::output::{print_info, print_warning};
use crate::server::{build_router, find_free_port, ProxyState, DEFAULT_PORT, PORT_PROBE_SPAN};

/// File name of the viewer page looked up beside the executable
const VIEWER_FILE: &str = "viewer.html";

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// First port to try; the next free one is used if taken
    #[arg(long, short, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Viewer page served at `/` (defaults to viewer.html beside the executable)
    #[arg(long, env = "GLM_QUOTA_VIEWER")]
    pub asset: Option<String>,

    /// Do not open the browser
    #[arg(long)]
    pub no_browser: bool,
}

pub async fn execute(ctx: &Context, args: ServeArgs) -> Result<Outcome> {
    let port = find_free_port(args.port, PORT_PROBE_SPAN);

    if ctx.resolver.resolve().is_none() {
        print_warning("⚠️  警告: 未找到 API Token");
        print_warning("   请确保 Claude Code 已正确配置");
        println!();
    }

    let asset_path = args
        .asset
        .as_deref()
        .map(expand_path)
        .unwrap_or_else(default_asset_path);
    log::debug!("[glm:server] Viewer page: {:?}", asset_path);

    let (listener, url) = bind_viewer(port).await?;
    print_info(&banner(&url), ctx.quiet);

    if !args.no_browser {
        open_browser(&url, |target| open::that_detached(target));
    }

    let app = build_router(ProxyState {
        resolver: ctx.resolver.clone(),
        client: ApiClient::new(),
        asset_path,
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("服务器异常退出")?;

    print_info("\n\n👋 服务器已停止", ctx.quiet);
    Ok(Outcome::Success)
}

/// `viewer.html` beside the executable, else the copy in this crate's assets
fn default_asset_path() -> PathBuf {
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(VIEWER_FILE)));

    match beside_exe {
        Some(path) if path.exists() => path,
        _ => PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/viewer.html")),
    }
}

/// Bind the loopback listener and build the URL of the port it really got
async fn bind_viewer(port: u16) -> Result<(tokio::net::TcpListener, String)> {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("无法监听端口 {}", port))?;
    let bound = listener
        .local_addr()
        .context("无法获取监听地址")?
        .port();

    Ok((listener, format!("http://localhost:{}", bound)))
}

/// Open the page once without waiting on the opener; failure only gets logged
fn open_browser<F>(url: &str, opener: F) -> bool
where
    F: FnOnce(&str) -> std::io::Result<()>,
{
    match opener(url) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("[glm:server] Could not open browser for {}: {}", url, e);
            false
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("[glm:server] Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

fn banner(url: &str) -> String {
    let rule = "═".repeat(62);
    format!(
        "\n╔{rule}╗\n\
         ║  🚀 GLM 配额查询服务器已启动！\n\
         ║\n\
         ║  📱 请在浏览器中打开: {url}\n\
         ║\n\
         ║  按 Ctrl+C 停止服务器\n\
         ╚{rule}╝\n"
    )
}
