// ==========================================
// 资源预测单据拆分 - 引擎层
// ==========================================
// 职责: 实现拆分与额度匹配规则, 不拼 SQL
// 红线: Engine 不拼 SQL, 所有跳过的切片必须输出 reason
// ==========================================

pub mod assembler;
pub mod capacity_source;
pub mod device_catalog;
pub mod error;
pub mod matcher;
pub mod quota_gate;
pub mod repositories;
pub mod split_group;
pub mod splitter;

// 重导出核心引擎
pub use assembler::SubTicketAssembler;
pub use capacity_source::{CapacitySource, StaticCapacitySource};
pub use device_catalog::{lookup_device, DeviceCatalog, DeviceTypeMap, DeviceTypeSource};
pub use error::{SplitError, SplitResult};
pub use matcher::{match_adjustable, match_transfer_in, MatchOutcome, RemainderTable};
pub use quota_gate::{QuotaDecision, QuotaGate, TransferQuotaSource};
pub use repositories::{ResPlanTicketStore, SplitterDeps, SqliteTicketStore};
pub use split_group::SplitGroups;
pub use splitter::{SplitRun, TicketSplitter};
