//! # Course Catalog
//!
//! 在线课程目录的维护工具：清理重复课程、从 YouTube 导入课程
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 持有稀缺资源（HTTP 客户端、凭据），只暴露能力
//! - `CourseStore` / `FirestoreStore` - 课程的读取、删除、创建
//! - `MetadataFetcher` / `YouTubeClient` - 播放列表和视频元数据
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 纯函数，不做 I/O
//! - `duplicate_resolver` - 按标题分组，决定删谁
//! - `playlist_converter` - 视频分组为模块，构建课程树
//! - `course_inference` / `duration` / `youtube_url` / `catalog_search`
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个 URL"的完整导入流程
//! - `ImportCtx` - 上下文封装（序号 + URL）
//! - `ImportFlow` - 流程编排（识别 → 抓取 → 转换 → 写入）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 应用主结构，命令分发
//! - `orchestrator/bulk_importer` - 批量 URL 导入
//! - `orchestrator/duplicate_cleaner` - 重复课程清理
//! - `orchestrator/json_importer` - JSON 课程导入

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{CourseStore, FirestoreStore, MetadataFetcher, YouTubeClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Course, CourseOverrides, CourseRecord, Instructor};
pub use orchestrator::{App, BulkImportOutcome, RemovalReport};
pub use workflow::{ImportCtx, ImportFlow, ImportOutcome};
