//! 应用主结构 - 编排层
//!
//! ## 职责
//!
//! 1. **资源所有者**：持有配置、课程存储和元数据抓取客户端
//! 2. **命令分发**：每个命令对应一个方法，由 `main` 调用
//! 3. **全局统计**：输出每个命令的最终统计
//!
//! 抓取客户端只在导入命令中需要，其余命令不要求 YouTube 配置

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::clients::{CourseStore, FirestoreStore, MetadataFetcher, YouTubeClient};
use crate::config::Config;
use crate::models::{load_url_list, CourseOverrides, CourseRecord, Instructor};
use crate::orchestrator::bulk_importer::{bulk_import_from_youtube, BulkImportOutcome};
use crate::orchestrator::duplicate_cleaner::{self, RemovalReport};
use crate::orchestrator::json_importer::import_courses_from_json;
use crate::services::catalog_search::{filter_courses, sort_courses, CatalogFilter, SortOrder};
use crate::services::duplicate_resolver::DuplicateGroup;
use crate::services::playlist_converter::ConvertOptions;
use crate::utils::logging::print_final_stats;
use crate::workflow::{ImportCtx, ImportFlow, ImportOutcome};

/// 应用主结构
pub struct App {
    config: Config,
    store: Box<dyn CourseStore>,
    fetcher: Option<Box<dyn MetadataFetcher>>,
}

impl App {
    /// 初始化应用
    ///
    /// # 参数
    /// - `config`: 配置
    /// - `with_fetcher`: 是否创建 YouTube 客户端（导入命令需要）
    pub fn initialize(config: Config, with_fetcher: bool) -> Result<Self> {
        let store = FirestoreStore::new(&config).context("无法创建课程存储客户端")?;

        let fetcher: Option<Box<dyn MetadataFetcher>> = if with_fetcher {
            let client = YouTubeClient::new(&config).context("无法创建 YouTube 客户端")?;
            Some(Box::new(client))
        } else {
            None
        };

        Ok(Self::with_collaborators(config, Box::new(store), fetcher))
    }

    /// 使用已有的协作方创建应用
    pub fn with_collaborators(
        config: Config,
        store: Box<dyn CourseStore>,
        fetcher: Option<Box<dyn MetadataFetcher>>,
    ) -> Self {
        Self {
            config,
            store,
            fetcher,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn instructor(&self) -> Instructor {
        Instructor::new(&self.config.instructor_id, &self.config.instructor_name)
    }

    fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            lessons_per_module: self.config.lessons_per_module,
            preview_chars: self.config.lesson_preview_chars,
        }
    }

    fn import_flow(&self) -> Result<ImportFlow<'_>> {
        let fetcher = self
            .fetcher
            .as_deref()
            .ok_or_else(|| anyhow!("未配置 YouTube 客户端，无法导入"))?;
        Ok(ImportFlow::new(
            self.store.as_ref(),
            fetcher,
            self.convert_options(),
        ))
    }

    /// 扫描重复课程（只读）
    pub async fn scan_duplicates(&self) -> Result<Vec<DuplicateGroup>> {
        let groups = duplicate_cleaner::scan_duplicates(self.store.as_ref()).await?;

        let removable: usize = groups.iter().map(|g| g.removable().len()).sum();
        info!("\n{}", "=".repeat(60));
        info!("📊 重复组: {}，可删除记录: {}", groups.len(), removable);
        info!("{}", "=".repeat(60));

        Ok(groups)
    }

    /// 删除重复课程
    ///
    /// `confirmed` 为 false 时只扫描，不删除
    pub async fn remove_duplicates(&self, confirmed: bool) -> Result<Option<RemovalReport>> {
        if !confirmed {
            self.scan_duplicates().await?;
            warn!("⚠️ 预览模式：未删除任何课程，加 --yes 执行删除");
            return Ok(None);
        }

        let report = duplicate_cleaner::remove_duplicates(self.store.as_ref()).await?;
        print_final_stats(
            "重复课程清理统计",
            report.removed,
            report.failed.len(),
            report.requested,
        );
        Ok(Some(report))
    }

    /// 导入单个 URL
    pub async fn import(&self, url: &str, overrides: &CourseOverrides) -> Result<ImportOutcome> {
        let flow = self.import_flow()?;
        let outcome = flow
            .run(url, &self.instructor(), overrides, &ImportCtx::single(url))
            .await;
        Ok(outcome)
    }

    /// 从 URL 列表文件批量导入
    pub async fn bulk_import(&self, list_file: &Path) -> Result<BulkImportOutcome> {
        let flow = self.import_flow()?;
        let urls = load_url_list(list_file).await?;

        if urls.is_empty() {
            warn!("⚠️ URL 列表为空: {}", list_file.display());
        }

        let outcome = bulk_import_from_youtube(&flow, &urls, &self.instructor()).await;
        print_final_stats(
            "批量导入统计",
            outcome.imported.len(),
            outcome.failed.len(),
            outcome.total(),
        );
        Ok(outcome)
    }

    /// 从 JSON 文件导入课程
    pub async fn import_json(&self, json_file: &Path) -> Result<BulkImportOutcome> {
        let outcome =
            import_courses_from_json(json_file, self.store.as_ref(), &self.instructor()).await?;

        print_final_stats(
            "JSON 导入统计",
            outcome.imported.len(),
            outcome.failed.len(),
            outcome.total(),
        );
        if outcome.skipped > 0 {
            warn!("⚠️ 跳过 {} 条格式错误的条目", outcome.skipped);
        }
        Ok(outcome)
    }

    /// 检索课程目录
    pub async fn search(&self, filter: &CatalogFilter, order: SortOrder) -> Result<Vec<CourseRecord>> {
        let records = self.store.list().await?;
        let mut matched = filter_courses(&records, filter);
        sort_courses(&mut matched, order);

        info!("🔍 匹配 {}/{} 门课程", matched.len(), records.len());
        for record in &matched {
            info!(
                "  {} | {} | {} | {} | {}",
                record.id,
                record.display_title(),
                record.category.as_deref().unwrap_or("-"),
                record.level.as_deref().unwrap_or("-"),
                format_price(record.price)
            );
        }

        Ok(matched.into_iter().cloned().collect())
    }
}

fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) if p > 0.0 => format!("${:.2}", p),
        _ => "免费".to_string(),
    }
}
