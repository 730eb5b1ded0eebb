// ==========================================
// 资源预测单据拆分 - 子单数据仓储
// ==========================================
// 红线: 一次拆分的子单必须在同一事务中全部创建
// ==========================================

use crate::db::DATETIME_FORMAT;
use crate::domain::demand::ResourceTotals;
use crate::domain::ticket::SubTicket;
use crate::domain::types::{AdminAuditStatus, SubTicketStage, SubTicketStatus, SubTicketType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::ticket_repo::parse_datetime;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

/// 数据库原始行 (类型转换前)
struct SubTicketRow {
    id: String,
    ticket_id: String,
    bk_biz_id: i64,
    sub_type: String,
    sub_demands: String,
    original: ResourceTotals,
    updated: ResourceTotals,
    status: String,
    stage: String,
    admin_audit_status: String,
    crp_sn: Option<String>,
    submitted_at: String,
}

impl SubTicketRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            ticket_id: row.get(1)?,
            bk_biz_id: row.get(2)?,
            sub_type: row.get(3)?,
            sub_demands: row.get(4)?,
            original: ResourceTotals {
                os: row.get(5)?,
                cpu_core: row.get(6)?,
                memory: row.get(7)?,
                disk_size: row.get(8)?,
            },
            updated: ResourceTotals {
                os: row.get(9)?,
                cpu_core: row.get(10)?,
                memory: row.get(11)?,
                disk_size: row.get(12)?,
            },
            status: row.get(13)?,
            stage: row.get(14)?,
            admin_audit_status: row.get(15)?,
            crp_sn: row.get(16)?,
            submitted_at: row.get(17)?,
        })
    }

    fn into_sub_ticket(self) -> RepositoryResult<SubTicket> {
        let sub_type = SubTicketType::from_str(&self.sub_type).ok_or_else(|| {
            RepositoryError::FieldValueError {
                field: "sub_type".to_string(),
                message: format!("未知子单类型: {}", self.sub_type),
            }
        })?;

        Ok(SubTicket {
            id: self.id,
            ticket_id: self.ticket_id,
            bk_biz_id: self.bk_biz_id,
            sub_type,
            sub_demands: serde_json::from_str(&self.sub_demands)?,
            original: self.original,
            updated: self.updated,
            status: SubTicketStatus::from_str(&self.status),
            stage: SubTicketStage::from_str(&self.stage),
            admin_audit_status: AdminAuditStatus::from_str(&self.admin_audit_status),
            crp_sn: self.crp_sn,
            submitted_at: parse_datetime("submitted_at", &self.submitted_at)?,
        })
    }
}

// ==========================================
// ResPlanSubTicketRepository - 资源预测子单仓储
// ==========================================
pub struct ResPlanSubTicketRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ResPlanSubTicketRepository {
    /// 创建新的 ResPlanSubTicketRepository 实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批量创建子单
    ///
    /// # 返回
    /// - `Ok(ids)`: 全部创建成功, 按入参顺序返回子单ID
    /// - `Err`: 任一失败则整体回滚, 不存在部分成功
    pub fn batch_create(&self, sub_tickets: &[SubTicket]) -> RepositoryResult<Vec<String>> {
        if sub_tickets.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO res_plan_sub_ticket (
                        id, ticket_id, bk_biz_id, sub_type, sub_demands,
                        original_os, original_cpu_core, original_memory, original_disk_size,
                        updated_os, updated_cpu_core, updated_memory, updated_disk_size,
                        status, stage, admin_audit_status, crp_sn, submitted_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)"#,
            )?;

            for sub_ticket in sub_tickets {
                let sub_demands = serde_json::to_string(&sub_ticket.sub_demands)?;
                stmt.execute(params![
                    sub_ticket.id,
                    sub_ticket.ticket_id,
                    sub_ticket.bk_biz_id,
                    sub_ticket.sub_type.to_db_str(),
                    sub_demands,
                    sub_ticket.original.os,
                    sub_ticket.original.cpu_core,
                    sub_ticket.original.memory,
                    sub_ticket.original.disk_size,
                    sub_ticket.updated.os,
                    sub_ticket.updated.cpu_core,
                    sub_ticket.updated.memory,
                    sub_ticket.updated.disk_size,
                    sub_ticket.status.to_db_str(),
                    sub_ticket.stage.to_db_str(),
                    sub_ticket.admin_audit_status.to_db_str(),
                    sub_ticket.crp_sn,
                    sub_ticket.submitted_at.format(DATETIME_FORMAT).to_string(),
                ])?;
            }
        }

        tx.commit()?;
        Ok(sub_tickets.iter().map(|s| s.id.clone()).collect())
    }

    /// 按主单查询子单 (按创建顺序)
    pub fn list_by_ticket(&self, ticket_id: &str) -> RepositoryResult<Vec<SubTicket>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT id, ticket_id, bk_biz_id, sub_type, sub_demands,
                      original_os, original_cpu_core, original_memory, original_disk_size,
                      updated_os, updated_cpu_core, updated_memory, updated_disk_size,
                      status, stage, admin_audit_status, crp_sn, submitted_at
               FROM res_plan_sub_ticket
               WHERE ticket_id = ?1
               ORDER BY rowid"#,
        )?;

        let rows = stmt
            .query_map(params![ticket_id], SubTicketRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(SubTicketRow::into_sub_ticket).collect()
    }
}
