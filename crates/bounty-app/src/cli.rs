//! 명령줄 인자 정의.

use bounty_core::models::recurring::RecurringSchedule;
use bounty_core::models::user::ActivityType;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Bounty Hunter 운동 기록 클라이언트
///
/// 로그인 상태는 로컬에 저장되어 다음 실행에서도 유지된다.
#[derive(Parser, Debug)]
#[command(name = "bounty")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 서버 API URL (기본: 설정 파일, 없으면 http://localhost:5000/api)
    #[arg(long, short = 's', global = true)]
    pub server: Option<String>,

    /// 세션 DB 저장 디렉토리 (기본: 플랫폼 데이터 디렉토리)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// 세션을 디스크에 저장하지 않음
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// 회원가입 (기본적으로 가입 후 바로 로그인)
    Register(RegisterArgs),

    /// 로그인
    Login { username: String, password: String },

    /// 로그아웃 (로컬 세션 삭제)
    Logout,

    /// 현재 로그인 사용자 표시
    Whoami,

    /// 활동 유형에 맞춘 운동 제안
    Suggestions,

    /// 운동 기록
    #[command(subcommand)]
    Workouts(WorkoutsCommand),

    /// 반복 운동 일정
    #[command(subcommand)]
    Recurring(RecurringCommand),

    /// 설정 파일 조회/변경
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct RegisterArgs {
    pub username: String,
    pub email: String,
    pub password: String,

    #[arg(long)]
    pub full_name: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub age: Option<u32>,

    /// 체중 (kg)
    #[arg(long)]
    pub weight: Option<u32>,

    /// 선호 활동 유형 (individual, group, gym, sports, free), 여러 번 지정 가능
    #[arg(long = "activity")]
    pub activities: Vec<ActivityType>,

    #[arg(long)]
    pub payment_info: Option<String>,

    /// 가입만 하고 로그인하지 않음
    #[arg(long)]
    pub no_login: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum WorkoutsCommand {
    /// 운동 이력
    List,

    /// 운동 기록 추가
    Log {
        title: String,
        /// 운동 유형 (예: individual, gym)
        #[arg(value_name = "TYPE")]
        kind: String,
        /// 소요 시간 (예: "30 min")
        duration: String,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum RecurringCommand {
    /// 반복 운동 목록
    List,

    /// 반복 운동 생성
    Create {
        title: String,
        /// daily, weekly, biweekly, monthly
        schedule: RecurringSchedule,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ConfigCommand {
    /// 현재 설정 파일 내용
    Show,

    /// 서버 API URL 저장
    SetServer { url: String },

    /// 요청 타임아웃(ms) 저장. 생략하면 타임아웃 해제
    SetTimeout { millis: Option<u64> },
}
