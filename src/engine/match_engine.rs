// ==========================================
// EMAGE 关联加载器 - 匹配引擎
// ==========================================
// 判定（按顺序）:
// 1. 父实体存在性: MGI ID 不区分大小写,限定父实体类型 → 否则 NoParent
// 2. 标签存在性: figureLabel + paneLabel == 候选标签（去尾部空白）
//    区分大小写（"1A" 与 "1a" 是不同标签）→ 否则 NoMatchingLabel
// 输出:
// - 匹配按 (EMAGE ID, 面板键) 去重,按同序升序
// - 差异按 类型 → EMAGE ID → MGI ID → 标签 升序
// ==========================================

use crate::domain::{CandidateRecord, ChildLabel, DiscrepancyEntry, DiscrepancyKind};
use crate::repository::{LabelIndex, RepositoryResult};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

// ==========================================
// CandidateOutcome - 单条候选的判定结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOutcome {
    /// 命中的图像面板键（升序,非空）
    Matched(Vec<i64>),
    Discrepancy(DiscrepancyKind),
}

// ==========================================
// MatchedAssociation - 已接受的匹配
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedAssociation {
    pub external_id: String,
    pub parent_mgi_id: String,
    pub composite_label: String,
    pub image_pane_key: i64,
    pub line_number: usize, // 首次出现的输入行
}

// ==========================================
// ReconciliationResult - 对账结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ReconciliationResult {
    pub matches: Vec<MatchedAssociation>,
    pub discrepancies: Vec<DiscrepancyEntry>,
    pub total_candidates: usize,
    pub matched_candidates: usize,
}

impl ReconciliationResult {
    /// 匹配候选数 + 差异数 == 候选总数
    pub fn is_partition_complete(&self) -> bool {
        self.matched_candidates + self.discrepancies.len() == self.total_candidates
    }

    pub fn count_of(&self, kind: DiscrepancyKind) -> usize {
        self.discrepancies.iter().filter(|d| d.kind == kind).count()
    }
}

// ==========================================
// MatchEngine - 匹配引擎
// ==========================================
pub struct MatchEngine<'a, L: LabelIndex> {
    label_index: &'a L,
    parent_type_key: i64,
    // 键: 小写 MGI ID;值: None = 父实体不存在
    parent_cache: HashMap<String, Option<Vec<ChildLabel>>>,
}

impl<'a, L: LabelIndex> MatchEngine<'a, L> {
    pub fn new(label_index: &'a L, parent_type_key: i64) -> Self {
        Self {
            label_index,
            parent_type_key,
            parent_cache: HashMap::new(),
        }
    }

    /// 父实体的标签集合（同一运行内按 MGI ID 缓存）
    fn parent_labels(&mut self, parent_mgi_id: &str) -> RepositoryResult<Option<&[ChildLabel]>> {
        let cache_key = parent_mgi_id.to_ascii_lowercase();

        if !self.parent_cache.contains_key(&cache_key) {
            let labels = if self
                .label_index
                .parent_exists(parent_mgi_id, self.parent_type_key)?
            {
                Some(
                    self.label_index
                        .labels_for_parent(parent_mgi_id, self.parent_type_key)?,
                )
            } else {
                None
            };
            self.parent_cache.insert(cache_key.clone(), labels);
        }

        Ok(self
            .parent_cache
            .get(&cache_key)
            .and_then(|labels| labels.as_deref()))
    }

    /// 判定单条候选
    pub fn classify(&mut self, candidate: &CandidateRecord) -> RepositoryResult<CandidateOutcome> {
        let wanted = candidate.match_label();

        let labels = match self.parent_labels(&candidate.parent_mgi_id)? {
            Some(labels) => labels,
            None => return Ok(CandidateOutcome::Discrepancy(DiscrepancyKind::NoParent)),
        };

        let mut pane_keys: Vec<i64> = labels
            .iter()
            .filter(|label| label.concatenated() == wanted)
            .map(|label| label.image_pane_key)
            .collect();
        pane_keys.sort_unstable();
        pane_keys.dedup();

        if pane_keys.is_empty() {
            Ok(CandidateOutcome::Discrepancy(DiscrepancyKind::NoMatchingLabel))
        } else {
            Ok(CandidateOutcome::Matched(pane_keys))
        }
    }

    /// 对整批候选执行对账
    pub fn reconcile(
        &mut self,
        candidates: &[CandidateRecord],
    ) -> RepositoryResult<ReconciliationResult> {
        let mut matched: BTreeMap<(String, i64), MatchedAssociation> = BTreeMap::new();
        let mut discrepancies = Vec::new();
        let mut matched_candidates = 0;

        for candidate in candidates {
            match self.classify(candidate)? {
                CandidateOutcome::Matched(pane_keys) => {
                    matched_candidates += 1;
                    for image_pane_key in pane_keys {
                        matched
                            .entry((candidate.external_id.clone(), image_pane_key))
                            .or_insert_with(|| MatchedAssociation {
                                external_id: candidate.external_id.clone(),
                                parent_mgi_id: candidate.parent_mgi_id.clone(),
                                composite_label: candidate.composite_label.clone(),
                                image_pane_key,
                                line_number: candidate.line_number,
                            });
                    }
                }
                CandidateOutcome::Discrepancy(kind) => {
                    debug!(
                        line = candidate.line_number,
                        external_id = %candidate.external_id,
                        kind = %kind,
                        "候选记录未匹配"
                    );
                    discrepancies.push(DiscrepancyEntry {
                        external_id: candidate.external_id.clone(),
                        parent_mgi_id: candidate.parent_mgi_id.clone(),
                        composite_label: candidate.composite_label.clone(),
                        kind,
                    });
                }
            }
        }

        discrepancies.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let result = ReconciliationResult {
            matches: matched.into_values().collect(),
            discrepancies,
            total_candidates: candidates.len(),
            matched_candidates,
        };

        info!(
            total = result.total_candidates,
            matched_candidates = result.matched_candidates,
            associations = result.matches.len(),
            discrepancies = result.discrepancies.len(),
            "对账完成"
        );
        Ok(result)
    }
}
