//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和命令调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用主结构
//! - 持有配置、课程存储、YouTube 客户端
//! - 每个命令一个入口方法
//! - 输出全局统计信息
//!
//! ### `bulk_importer` - 批量 URL 导入
//! - 逐个导入 URL，单个失败不影响后续
//!
//! ### `duplicate_cleaner` - 重复课程清理
//! - 扫描、逐个删除、重新扫描
//!
//! ### `json_importer` - JSON 课程导入
//! - 跳过格式错误的条目，逐条写入存储
//!
//! ## 层次关系
//!
//! ```text
//! app (命令)
//!     ↓
//! bulk_importer / duplicate_cleaner / json_importer (处理 Vec<Item>)
//!     ↓
//! workflow::ImportFlow (处理单个 URL)
//!     ↓
//! services (能力层：识别 / 转换 / 推断 / 去重)
//!     ↓
//! clients (基础设施：CourseStore / MetadataFetcher)
//! ```

pub mod app;
pub mod bulk_importer;
pub mod duplicate_cleaner;
pub mod json_importer;

// 重新导出主要类型
pub use app::App;
pub use bulk_importer::{bulk_import_from_youtube, BulkImportOutcome};
pub use duplicate_cleaner::{remove_duplicates, scan_duplicates, RemovalReport};
pub use json_importer::import_courses_from_json;
