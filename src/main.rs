use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use course_catalog::models::{Category, CourseOverrides, Level};
use course_catalog::services::{CatalogFilter, SortOrder};
use course_catalog::utils::logging;
use course_catalog::{App, Config};

/// 课程目录维护工具
#[derive(Debug, Parser)]
#[command(name = "course-catalog", version, about)]
struct Cli {
    /// TOML 配置文件（不指定时只读环境变量）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long, global = true)]
    verbose: bool,

    /// 覆盖配置中的讲师ID
    #[arg(long, global = true)]
    instructor_id: Option<String>,

    /// 覆盖配置中的讲师名称
    #[arg(long, global = true)]
    instructor_name: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 扫描重复课程
    ScanDuplicates,
    /// 删除重复课程（不加 --yes 时只预览）
    RemoveDuplicates {
        #[arg(long)]
        yes: bool,
    },
    /// 从 YouTube 播放列表或视频导入一门课程
    Import {
        url: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        level: Option<Level>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        publish: bool,
        #[arg(long)]
        image: Option<String>,
    },
    /// 从 URL 列表文件批量导入（每行一个）
    BulkImport { file: PathBuf },
    /// 从 JSON 文件导入课程
    ImportJson { file: PathBuf },
    /// 检索课程目录
    Search {
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        level: Option<Level>,
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long)]
        free: bool,
        #[arg(long)]
        published: bool,
        #[arg(long, default_value = "newest")]
        sort: SortOrder,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::ScanDuplicates => "scan-duplicates",
            Command::RemoveDuplicates { .. } => "remove-duplicates",
            Command::Import { .. } => "import",
            Command::BulkImport { .. } => "bulk-import",
            Command::ImportJson { .. } => "import-json",
            Command::Search { .. } => "search",
        }
    }

    fn needs_fetcher(&self) -> bool {
        matches!(self, Command::Import { .. } | Command::BulkImport { .. })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::from_env(),
    };
    if let Some(id) = cli.instructor_id.clone() {
        config.instructor_id = id;
    }
    if let Some(name) = cli.instructor_name.clone() {
        config.instructor_name = name;
    }
    config.verbose_logging |= cli.verbose;

    // 初始化日志
    logging::init(config.verbose_logging);

    let command_name = cli.command.name();
    logging::init_log_file(&config.output_log_file, command_name)?;
    logging::log_startup(
        command_name,
        &config.firestore_project_id,
        &config.firestore_collection,
    );

    // 初始化并运行应用
    let app = App::initialize(config, cli.command.needs_fetcher())?;
    run(&app, cli.command).await?;

    info!("\n日志已保存至: {}", app.config().output_log_file);
    Ok(())
}

async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::ScanDuplicates => {
            app.scan_duplicates().await?;
        }
        Command::RemoveDuplicates { yes } => {
            if let Some(report) = app.remove_duplicates(yes).await? {
                if !report.failed.is_empty() {
                    return Err(anyhow!("{} 条重复课程删除失败", report.failed.len()));
                }
            }
        }
        Command::Import {
            url,
            title,
            description,
            category,
            level,
            price,
            publish,
            image,
        } => {
            let overrides = CourseOverrides {
                title,
                description,
                category,
                level,
                price,
                published: publish.then_some(true),
                image,
            };

            let outcome = app.import(&url, &overrides).await?;
            if !outcome.success {
                error!("❌ {}", outcome.message);
                return Err(anyhow!(outcome.message));
            }
            info!("✅ {}", outcome.message);
        }
        Command::BulkImport { file } => {
            let outcome = app.bulk_import(&file).await?;
            if !outcome.success {
                return Err(anyhow!("没有任何 URL 导入成功"));
            }
        }
        Command::ImportJson { file } => {
            app.import_json(&file).await?;
        }
        Command::Search {
            query,
            category,
            level,
            max_price,
            free,
            published,
            sort,
        } => {
            let filter = CatalogFilter {
                query,
                category,
                level,
                max_price,
                free_only: free,
                published_only: published,
            };
            app.search(&filter, sort).await?;
        }
    }

    Ok(())
}
