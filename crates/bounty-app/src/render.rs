//! 터미널 출력 프레젠터.
//!
//! 도메인 모델 → 표시용 문자열 변환. 입출력은 하지 않는다.

use bounty_core::config::AppConfig;
use bounty_core::models::recurring::RecurringWorkout;
use bounty_core::models::session::Session;
use bounty_core::models::suggestion::Suggestion;
use bounty_core::models::user::User;
use bounty_core::models::workout::Workout;
use chrono::NaiveDateTime;
use std::path::Path;

/// 타임스탬프 표시 형식
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// 세션 전이 알림 한 줄
pub fn session_transition(session: &Session) -> String {
    match session.user() {
        Some(user) => format!("[세션] 로그인됨: {}", user.username),
        None => "[세션] 로그아웃됨".to_string(),
    }
}

pub fn whoami(user: Option<&User>) -> String {
    match user {
        Some(user) => format!("{} <{}> (id {})", user.username, user.email, user.id),
        None => "로그인되어 있지 않습니다".to_string(),
    }
}

pub fn welcome(user: &User) -> String {
    format!("{}님, 환영합니다!", user.username)
}

pub fn registered(user: &User) -> String {
    format!("회원가입 완료: {} (id {})", user.username, user.id)
}

pub fn suggestions(items: &[Suggestion]) -> String {
    if items.is_empty() {
        return "추천할 운동이 없습니다".to_string();
    }
    items
        .iter()
        .map(|s| format!("#{:<4} {} [{}] {}", s.id, s.title, s.kind, s.duration))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn workout_line(workout: &Workout) -> String {
    let mut line = format!(
        "{}  {} [{}] {}",
        format_time(workout.timestamp),
        workout.title,
        workout.kind,
        workout.duration
    );
    if let Some(notes) = workout.notes() {
        line.push_str(&format!(" ({notes})"));
    }
    line
}

pub fn workouts(items: &[Workout]) -> String {
    if items.is_empty() {
        return "기록된 운동이 없습니다".to_string();
    }
    items.iter().map(workout_line).collect::<Vec<_>>().join("\n")
}

pub fn workout_logged(workout: &Workout) -> String {
    format!("운동 기록 완료: {}", workout_line(workout))
}

pub fn recurring_line(recurring: &RecurringWorkout) -> String {
    format!(
        "#{:<4} {} ({}) 생성 {}",
        recurring.id,
        recurring.title,
        recurring.schedule,
        format_time(recurring.created_at)
    )
}

pub fn recurring_list(items: &[RecurringWorkout]) -> String {
    if items.is_empty() {
        return "반복 운동 일정이 없습니다".to_string();
    }
    items.iter().map(recurring_line).collect::<Vec<_>>().join("\n")
}

pub fn config_summary(config: &AppConfig, path: &Path) -> String {
    let timeout = match config.server.request_timeout_ms {
        Some(ms) => format!("{ms} ms"),
        None => "기본값".to_string(),
    };
    let db_path = match &config.storage.db_path {
        Some(path) => path.display().to_string(),
        None => "기본 데이터 디렉토리".to_string(),
    };
    format!(
        "설정 파일: {}\n서버: {}\n타임아웃: {timeout}\n세션 DB: {db_path}",
        path.display(),
        config.server.base_url
    )
}

fn format_time(time: NaiveDateTime) -> String {
    time.format(TIME_FORMAT).to_string()
}
