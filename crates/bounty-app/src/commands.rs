//! 명령 실행.
//!
//! 명령 하나가 사용자 액션 하나다. 실패는 그 명령에서 끝나며
//! 세션과 캐시된 목록은 이전 상태로 남는다.

use bounty_core::config_manager::ConfigManager;
use bounty_core::error::CoreError;
use bounty_core::models::recurring::CreateRecurringRequest;
use bounty_core::models::user::RegisterRequest;
use bounty_core::models::workout::LogWorkoutRequest;
use bounty_session::collection::{refresh_into, RefreshOutcome};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

use crate::cli::{Command, ConfigCommand, RecurringCommand, RegisterArgs, WorkoutsCommand};
use crate::context::{AppContext, SharedCollection};
use crate::render;

/// 명령 실행 후 표준 출력에 쓸 문자열 반환
pub async fn execute(ctx: &AppContext, command: Command) -> Result<String, CoreError> {
    match command {
        Command::Register(args) => register(ctx, args).await,
        Command::Login { username, password } => {
            let user = ctx.auth.login(&username, &password).await?;
            Ok(render::welcome(&user))
        }
        Command::Logout => {
            if !ctx.session.is_authenticated() {
                return Ok("이미 로그아웃 상태입니다".to_string());
            }
            ctx.auth.logout()?;
            Ok("로그아웃되었습니다".to_string())
        }
        Command::Whoami => Ok(render::whoami(ctx.session.current_user().as_ref())),
        Command::Suggestions => {
            refresh(&ctx.suggestions, ctx.api.suggestions()).await?;
            Ok(render::suggestions(ctx.suggestions.lock().items()))
        }
        Command::Workouts(WorkoutsCommand::List) => {
            refresh(&ctx.workouts, ctx.api.workouts()).await?;
            Ok(render::workouts(ctx.workouts.lock().items()))
        }
        Command::Workouts(WorkoutsCommand::Log {
            title,
            kind,
            duration,
            notes,
        }) => {
            let request = LogWorkoutRequest::new(title, kind, duration, notes);
            let workout = ctx.api.log_workout(&request).await?;
            Ok(render::workout_logged(&workout))
        }
        Command::Recurring(RecurringCommand::List) => {
            refresh(&ctx.recurring, ctx.api.recurring_workouts()).await?;
            Ok(render::recurring_list(ctx.recurring.lock().items()))
        }
        Command::Recurring(RecurringCommand::Create { title, schedule }) => {
            let request = CreateRecurringRequest::new(title, schedule);
            let recurring = ctx.api.create_recurring(&request).await?;
            Ok(format!("반복 운동 생성: {}", render::recurring_line(&recurring)))
        }
        Command::Config(_) => Err(CoreError::Internal(
            "설정 명령은 세션 없이 configure()로 실행된다".to_string(),
        )),
    }
}

/// 설정 파일 명령 실행. 세션과 서버는 건드리지 않는다
pub fn configure(manager: &ConfigManager, command: ConfigCommand) -> Result<String, CoreError> {
    let config = match command {
        ConfigCommand::Show => manager.get(),
        ConfigCommand::SetServer { url } => {
            let config = manager.update_with(|c| c.server.base_url = url)?;
            info!("서버 URL 변경: {}", config.server.base_url);
            config
        }
        ConfigCommand::SetTimeout { millis } => {
            manager.update_with(|c| c.server.request_timeout_ms = millis)?
        }
    };
    Ok(render::config_summary(&config, manager.config_path()))
}

async fn register(ctx: &AppContext, args: RegisterArgs) -> Result<String, CoreError> {
    let no_login = args.no_login;
    let request = register_request(args);

    if no_login {
        let user = ctx.auth.register(&request).await?;
        return Ok(render::registered(&user));
    }

    let user = ctx.auth.register_and_login(&request).await?;
    Ok(format!("{}\n{}", render::registered(&user), render::welcome(&user)))
}

fn register_request(args: RegisterArgs) -> RegisterRequest {
    let mut request = RegisterRequest::new(args.username, args.email, args.password);
    request.full_name = args.full_name;
    request.location = args.location;
    request.age = args.age;
    request.weight = args.weight;
    request.activity_types = args.activities;
    request.payment_info = args.payment_info;
    request
}

/// 목록 새로고침. 실패하면 이전 목록을 그대로 두고 에러 반환
async fn refresh<T, F>(target: &SharedCollection<T>, request: F) -> Result<(), CoreError>
where
    F: Future<Output = Result<Vec<T>, CoreError>>,
{
    match refresh_into(Arc::downgrade(target), request).await {
        RefreshOutcome::Applied(count) => {
            debug!("목록 갱신: {count}건");
            Ok(())
        }
        RefreshOutcome::Failed(e) => Err(e),
        RefreshOutcome::Discarded => Err(CoreError::Internal("목록 대상이 해제됨".to_string())),
    }
}
