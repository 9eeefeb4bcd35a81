//! # bounty-app
//!
//! Bounty Hunter CLI 바이너리 진입점.
//! 설정 로드, 세션 저장소 선택, 와이어링, 명령 실행을 담당한다.

mod cli;
mod commands;
mod context;
mod render;

use anyhow::{Context, Result};
use bounty_core::config::AppConfig;
use bounty_core::config_manager::ConfigManager;
use bounty_core::error::CoreError;
use bounty_core::models::session::Session;
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::context::{open_storage, AppContext};

/// 세션 DB 파일 이름 (`--data-dir` 지정 시)
const DB_FILE_NAME: &str = "bounty.db";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_filter = format!(
        "bounty={lvl},bounty_app={lvl},bounty_core={lvl},bounty_storage={lvl},bounty_session={lvl},bounty_network={lvl}",
        lvl = cli.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let recoverable = e
                .downcast_ref::<CoreError>()
                .is_some_and(CoreError::is_recoverable);
            if !recoverable {
                // 재시도로 해결되지 않는 로컬 문제 (설정, 저장소)
                error!("{e:?}");
            }
            eprintln!("오류: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let manager = open_config_manager(&cli)?;

    if let Command::Config(command) = cli.command {
        let manager = manager.context("설정 파일을 열 수 없습니다")?;
        println!("{}", commands::configure(&manager, command)?);
        return Ok(());
    }

    let config = effective_config(&cli, manager.as_ref())?;
    let storage = open_storage(&config, cli.ephemeral).context("세션 저장소 열기 실패")?;
    let ctx = AppContext::build(&config, storage)?;

    // 로그인/로그아웃 전이 출력
    ctx.session.subscribe(|session: &Session| {
        println!("{}", crate::render::session_transition(session));
        Ok(())
    });

    let output = commands::execute(&ctx, cli.command).await?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

fn open_config_manager(cli: &Cli) -> Result<Option<ConfigManager>> {
    match &cli.config {
        Some(path) => ConfigManager::with_path(path.clone())
            .map(Some)
            .with_context(|| format!("설정 파일 로드 실패: {}", path.display())),
        None => match ConfigManager::new() {
            Ok(manager) => Ok(Some(manager)),
            Err(e) => {
                warn!("설정 관리자 초기화 실패, 기본 설정 사용: {e}");
                Ok(None)
            }
        },
    }
}

/// 설정 파일 값에 CLI 인자를 덮어쓴 이번 실행용 설정 (파일에는 저장하지 않음)
fn effective_config(cli: &Cli, manager: Option<&ConfigManager>) -> Result<AppConfig> {
    let mut config = match manager {
        Some(manager) => {
            debug!("설정 파일: {}", manager.config_path().display());
            manager.get()
        }
        None => AppConfig::default_config(),
    };

    if let Some(server) = &cli.server {
        config.server.base_url = server.clone();
    }
    if let Some(dir) = &cli.data_dir {
        config.storage.db_path = Some(dir.join(DB_FILE_NAME));
    }

    config.validate()?;
    Ok(config)
}
