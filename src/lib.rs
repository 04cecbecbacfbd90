// ==========================================
// EMAGE 关联加载器 - 核心库
// ==========================================
// 职责: EMAGE ID 与 GXD 检测图像面板对账,生成
//       差异报告与 ACC_Accession 装载文件
// 技术栈: Rust + SQLite (rusqlite) + TAB 分隔文件 (csv)
// 运行模型: 单线程、顺序执行、全量批次
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 输入文件解析
pub mod importer;

// 数据仓储层 - 参照键/标签索引/暂存表
pub mod repository;

// 引擎层 - 参照键解析、匹配、关联构建、流程编排
pub mod engine;

// 输出层 - 装载文件、报告、摘要
pub mod output;

// 配置层 - 启动配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{ConfigError, LoadConfig};

pub use domain::{
    AccIdParts, AssociationRecord, CandidateRecord, ChildLabel, DiscrepancyEntry,
    DiscrepancyKind, ReferenceKeys,
};

pub use engine::{
    AccessionKeyCounter, AssociationBuilder, DiscrepancyReport, EmageLoadPipeline, LoadError,
    LoadResult, LoadSummary, MatchEngine, ReconciliationResult, ReferenceResolver, RunContext,
    SqliteLoadPipeline,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "EMAGE 关联加载器";
