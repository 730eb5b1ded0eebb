// ==========================================
// 资源预测单据拆分 - 主单数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::DATETIME_FORMAT;
use crate::domain::demand::{Demand, ResourceTotals};
use crate::domain::ticket::TicketBaseInfo;
use crate::domain::types::{TicketSplitStatus, TicketType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

const TICKET_COLUMNS: &str = r#"
    id, ticket_type, demands, bk_biz_id, bk_biz_name, bk_product_id, bk_product_name,
    plan_product_id, plan_product_name, op_product_name, virtual_dept_id, virtual_dept_name,
    original_os, original_cpu_core, original_memory, original_disk_size,
    updated_os, updated_cpu_core, updated_memory, updated_disk_size,
    applicant, remark, split_status, split_message, submitted_at, created_at, updated_at
"#;

/// 数据库原始行 (类型转换前)
struct TicketRow {
    id: String,
    ticket_type: String,
    demands: String,
    bk_biz_id: i64,
    bk_biz_name: String,
    bk_product_id: i64,
    bk_product_name: String,
    plan_product_id: i64,
    plan_product_name: String,
    op_product_name: String,
    virtual_dept_id: i64,
    virtual_dept_name: String,
    original: ResourceTotals,
    updated: ResourceTotals,
    applicant: String,
    remark: String,
    split_status: String,
    split_message: Option<String>,
    submitted_at: String,
    created_at: String,
    updated_at: String,
}

impl TicketRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            ticket_type: row.get(1)?,
            demands: row.get(2)?,
            bk_biz_id: row.get(3)?,
            bk_biz_name: row.get(4)?,
            bk_product_id: row.get(5)?,
            bk_product_name: row.get(6)?,
            plan_product_id: row.get(7)?,
            plan_product_name: row.get(8)?,
            op_product_name: row.get(9)?,
            virtual_dept_id: row.get(10)?,
            virtual_dept_name: row.get(11)?,
            original: ResourceTotals {
                os: row.get(12)?,
                cpu_core: row.get(13)?,
                memory: row.get(14)?,
                disk_size: row.get(15)?,
            },
            updated: ResourceTotals {
                os: row.get(16)?,
                cpu_core: row.get(17)?,
                memory: row.get(18)?,
                disk_size: row.get(19)?,
            },
            applicant: row.get(20)?,
            remark: row.get(21)?,
            split_status: row.get(22)?,
            split_message: row.get(23)?,
            submitted_at: row.get(24)?,
            created_at: row.get(25)?,
            updated_at: row.get(26)?,
        })
    }

    fn into_base_info(self) -> RepositoryResult<TicketBaseInfo> {
        let ticket_type = TicketType::from_str(&self.ticket_type).ok_or_else(|| {
            RepositoryError::FieldValueError {
                field: "ticket_type".to_string(),
                message: format!("未知单据类型: {}", self.ticket_type),
            }
        })?;
        let demands: Vec<Demand> = serde_json::from_str(&self.demands)?;

        Ok(TicketBaseInfo {
            id: self.id,
            ticket_type,
            demands,
            bk_biz_id: self.bk_biz_id,
            bk_biz_name: self.bk_biz_name,
            bk_product_id: self.bk_product_id,
            bk_product_name: self.bk_product_name,
            plan_product_id: self.plan_product_id,
            plan_product_name: self.plan_product_name,
            op_product_name: self.op_product_name,
            virtual_dept_id: self.virtual_dept_id,
            virtual_dept_name: self.virtual_dept_name,
            original: self.original,
            updated: self.updated,
            applicant: self.applicant,
            remark: self.remark,
            split_status: TicketSplitStatus::from_str(&self.split_status),
            split_message: self.split_message,
            submitted_at: parse_datetime("submitted_at", &self.submitted_at)?,
            created_at: parse_datetime("created_at", &self.created_at)?,
            updated_at: parse_datetime("updated_at", &self.updated_at)?,
        })
    }
}

pub(crate) fn parse_datetime(field: &str, value: &str) -> RepositoryResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).map_err(|e| {
        RepositoryError::FieldValueError {
            field: field.to_string(),
            message: format!("{} ({})", e, value),
        }
    })
}

// ==========================================
// ResPlanTicketRepository - 资源预测主单仓储
// ==========================================
pub struct ResPlanTicketRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ResPlanTicketRepository {
    /// 创建新的 ResPlanTicketRepository 实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询主单基本信息
    ///
    /// # 返回
    /// - `Ok(TicketBaseInfo)`: 恰好命中一条
    /// - `Err(NotFound)`: 未命中
    /// - `Err(UnexpectedRowCount)`: 命中多条
    pub fn get_ticket_base_info(&self, ticket_id: &str) -> RepositoryResult<TicketBaseInfo> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM res_plan_ticket WHERE id = ?1", TICKET_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;

        let mut rows = stmt
            .query_map(params![ticket_id], TicketRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        match rows.len() {
            0 => Err(RepositoryError::NotFound {
                entity: "res_plan_ticket".to_string(),
                id: ticket_id.to_string(),
            }),
            1 => rows.remove(0).into_base_info(),
            n => Err(RepositoryError::UnexpectedRowCount {
                entity: "res_plan_ticket".to_string(),
                id: ticket_id.to_string(),
                actual: n,
            }),
        }
    }

    /// 创建主单
    ///
    /// 汇总字段按需求列表重新计算, 不信任入参中的汇总值
    pub fn create(&self, ticket: &TicketBaseInfo) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let demands_json = serde_json::to_string(&ticket.demands)?;
        let (original, updated) = ResourceTotals::of_demands(&ticket.demands);

        conn.execute(
            r#"INSERT INTO res_plan_ticket (
                id, ticket_type, demands, bk_biz_id, bk_biz_name, bk_product_id, bk_product_name,
                plan_product_id, plan_product_name, op_product_name, virtual_dept_id, virtual_dept_name,
                original_os, original_cpu_core, original_memory, original_disk_size,
                updated_os, updated_cpu_core, updated_memory, updated_disk_size,
                applicant, remark, split_status, split_message, submitted_at, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                      ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27)"#,
            params![
                ticket.id,
                ticket.ticket_type.to_db_str(),
                demands_json,
                ticket.bk_biz_id,
                ticket.bk_biz_name,
                ticket.bk_product_id,
                ticket.bk_product_name,
                ticket.plan_product_id,
                ticket.plan_product_name,
                ticket.op_product_name,
                ticket.virtual_dept_id,
                ticket.virtual_dept_name,
                original.os,
                original.cpu_core,
                original.memory,
                original.disk_size,
                updated.os,
                updated.cpu_core,
                updated.memory,
                updated.disk_size,
                ticket.applicant,
                ticket.remark,
                ticket.split_status.to_db_str(),
                ticket.split_message,
                ticket.submitted_at.format(DATETIME_FORMAT).to_string(),
                ticket.created_at.format(DATETIME_FORMAT).to_string(),
                ticket.updated_at.format(DATETIME_FORMAT).to_string(),
            ],
        )?;

        Ok(ticket.id.clone())
    }

    /// 回写拆分结果
    pub fn update_split_status(
        &self,
        ticket_id: &str,
        status: TicketSplitStatus,
        message: Option<&str>,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let now = Utc::now().naive_utc().format(DATETIME_FORMAT).to_string();

        let affected = conn.execute(
            r#"UPDATE res_plan_ticket
               SET split_status = ?1, split_message = ?2, updated_at = ?3
               WHERE id = ?4"#,
            params![status.to_db_str(), message, now, ticket_id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "res_plan_ticket".to_string(),
                id: ticket_id.to_string(),
            });
        }
        Ok(())
    }
}
