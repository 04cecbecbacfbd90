// ==========================================
// EMAGE 关联加载器 - 加载流程编排
// ==========================================
// 步骤:
// 1. 读取输入文件 → 候选记录（任一行非法即中止）
// 2. 解析参照键 → RunContext（任一键不唯一即中止）
// 3. 写出暂存文件并批量装入暂存表
// 4. 读回暂存表,匹配引擎对账 → 匹配集 + 差异集
// 5. 构建关联记录（EMAGE ID 非法即中止）
// 6. 写出差异报告、关联装载文件、运行摘要
// 红线: 第 6 步之前失败不产生报告与关联文件（暂存文件是中间产物,第 3 步之后会保留）
// ==========================================

use crate::config::LoadConfig;
use crate::domain::DiscrepancyKind;
use crate::engine::association_builder::AssociationBuilder;
use crate::engine::discrepancy_report::DiscrepancyReport;
use crate::engine::error::{LoadError, LoadResult};
use crate::engine::match_engine::MatchEngine;
use crate::engine::reference_resolver::{ReferenceNames, ReferenceResolver};
use crate::importer::{CandidateSource, TabDelimitedParser};
use crate::output;
use crate::repository::{
    LabelIndex, ReferenceRepository, RepositoryResult, SqliteLabelIndex, SqliteReferenceRepository,
    SqliteStagingRepository, StagingArea,
};
use chrono::{Local, NaiveDateTime};
use rusqlite::Connection;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument};

// ==========================================
// LoadSummary - 运行摘要
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub total_candidates: usize,
    pub staged_rows: usize,
    pub matched_candidates: usize,
    pub discrepancies: usize,
    pub no_parent: usize,
    pub no_matching_label: usize,
    pub associations: usize,
    pub first_accession_key: i64,
    pub next_accession_key: i64, // = first_accession_key + associations
    pub report_file: PathBuf,
    pub acc_bcp_file: PathBuf,
}

// ==========================================
// EmageLoadPipeline - 加载流程
// ==========================================
pub struct EmageLoadPipeline<S, R, L, A>
where
    S: CandidateSource,
    R: ReferenceRepository,
    L: LabelIndex,
    A: StagingArea,
{
    source: S,
    reference_repo: R,
    label_index: L,
    staging: A,
}

/// 基于 SQLite 共享连接的流程
pub type SqliteLoadPipeline = EmageLoadPipeline<
    TabDelimitedParser,
    SqliteReferenceRepository,
    SqliteLabelIndex,
    SqliteStagingRepository,
>;

impl SqliteLoadPipeline {
    /// 以同一连接构建全部仓储（暂存 TEMP 表需同一会话）
    pub fn from_connection(
        conn: Arc<Mutex<Connection>>,
        temp_table: &str,
    ) -> RepositoryResult<Self> {
        Ok(Self::new(
            TabDelimitedParser,
            SqliteReferenceRepository::from_connection(conn.clone()),
            SqliteLabelIndex::from_connection(conn.clone()),
            SqliteStagingRepository::from_connection(conn, temp_table)?,
        ))
    }
}

impl<S, R, L, A> EmageLoadPipeline<S, R, L, A>
where
    S: CandidateSource,
    R: ReferenceRepository,
    L: LabelIndex,
    A: StagingArea,
{
    pub fn new(source: S, reference_repo: R, label_index: L, staging: A) -> Self {
        Self {
            source,
            reference_repo,
            label_index,
            staging,
        }
    }

    /// 以当前本地时间执行一次完整加载
    pub fn run(&self, config: &LoadConfig) -> LoadResult<LoadSummary> {
        self.run_at(config, Local::now().naive_local())
    }

    /// 执行一次完整加载
    ///
    /// # 参数
    /// - config: 运行配置
    /// - now: 运行时刻（装载日期、报告时间戳）
    #[instrument(skip(self, config), fields(input = %config.input_file.display()))]
    pub fn run_at(&self, config: &LoadConfig, now: NaiveDateTime) -> LoadResult<LoadSummary> {
        info!("开始 EMAGE 关联加载");

        // === 步骤 1: 读取输入 ===
        let candidates = self.source.read_candidates(&config.input_file)?;

        // === 步骤 2: 解析参照键 ===
        let names = ReferenceNames::from(config);
        let mut ctx = ReferenceResolver::new(&self.reference_repo).resolve(&names, now)?;

        // === 步骤 3: 暂存装载 ===
        debug!(path = %config.temp_bcp_file.display(), "写出暂存文件");
        output::write_staging_file(&config.temp_bcp_file, &candidates)?;

        info!(table = %config.temp_table, "Load the temp table with the input data");
        let staged_rows = self.staging.bulk_load(&config.temp_bcp_file)?;
        let staged = self.staging.staged_candidates()?;
        if staged_rows != candidates.len() || staged.len() != candidates.len() {
            return Err(LoadError::StagingMismatch {
                expected: candidates.len(),
                actual: staged.len(),
            });
        }

        // === 步骤 4: 对账（以暂存表中的行为准） ===
        let mut engine = MatchEngine::new(&self.label_index, ctx.keys.parent_mgi_type_key);
        let result = engine.reconcile(&staged)?;

        // === 步骤 5: 构建关联记录 ===
        let first_accession_key = ctx.accession.first_value();
        let records = AssociationBuilder::build(&result.matches, &mut ctx)?;

        // === 步骤 6: 写出 ===
        info!("Create the discrepancy report");
        let report = DiscrepancyReport::new(ctx.report_timestamp.clone(), result.discrepancies.clone());
        output::write_text_report(&config.report_file, &report.render())?;

        info!("Create the bcp file for the EMAGE associations");
        output::write_association_file(&config.acc_bcp_file, &records)?;

        let summary = LoadSummary {
            total_candidates: result.total_candidates,
            staged_rows,
            matched_candidates: result.matched_candidates,
            discrepancies: result.discrepancies.len(),
            no_parent: result.count_of(DiscrepancyKind::NoParent),
            no_matching_label: result.count_of(DiscrepancyKind::NoMatchingLabel),
            associations: records.len(),
            first_accession_key,
            next_accession_key: ctx.accession.next_value(),
            report_file: config.report_file.clone(),
            acc_bcp_file: config.acc_bcp_file.clone(),
        };

        if let Some(summary_file) = &config.summary_file {
            output::write_json_summary(summary_file, &summary)?;
        }

        info!(
            discrepancies = summary.discrepancies,
            associations = summary.associations,
            next_accession_key = summary.next_accession_key,
            "EMAGE 关联加载完成"
        );
        Ok(summary)
    }
}
