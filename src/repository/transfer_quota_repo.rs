// ==========================================
// 资源预测单据拆分 - 转移额度数据仓储
// ==========================================
// 存储: res_plan_transfer_quota (年度 × 业务 × 项目类型)
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::sync::{Arc, Mutex};

/// 转移额度仓储
pub struct TransferQuotaRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TransferQuotaRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询业务剩余转移额度 (核)
    ///
    /// # 参数
    /// - `year`: 年度
    /// - `bk_biz_id`: 业务ID
    /// - `obs_projects`: 项目类型过滤, 为空时统计全部项目类型
    ///
    /// # 返回
    /// 剩余额度 = Σ(total_core - applied_core), 无记录时为 0
    pub fn remain_transfer_quota(
        &self,
        year: i32,
        bk_biz_id: i64,
        obs_projects: &[String],
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        let mut sql = String::from(
            "SELECT COALESCE(SUM(total_core - applied_core), 0) FROM res_plan_transfer_quota \
             WHERE year = ? AND bk_biz_id = ?",
        );
        let mut values: Vec<Value> = vec![Value::Integer(year as i64), Value::Integer(bk_biz_id)];

        if !obs_projects.is_empty() {
            let placeholders = vec!["?"; obs_projects.len()].join(", ");
            sql.push_str(&format!(" AND obs_project IN ({})", placeholders));
            values.extend(obs_projects.iter().map(|p| Value::Text(p.clone())));
        }

        let remain: i64 = conn.query_row(&sql, params_from_iter(values), |row| row.get(0))?;
        Ok(remain)
    }

    /// 设置年度额度
    pub fn upsert_quota(
        &self,
        year: i32,
        bk_biz_id: i64,
        obs_project: &str,
        total_core: i64,
        applied_core: i64,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO res_plan_transfer_quota (year, bk_biz_id, obs_project, total_core, applied_core)
               VALUES (?1, ?2, ?3, ?4, ?5)
               ON CONFLICT(year, bk_biz_id, obs_project) DO UPDATE SET
                   total_core = ?4, applied_core = ?5"#,
            params![year, bk_biz_id, obs_project, total_core, applied_core],
        )?;
        Ok(())
    }
}
