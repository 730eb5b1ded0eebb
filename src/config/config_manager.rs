// ==========================================
// 资源预测单据拆分 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::plan_config_trait::PlanConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::quota::TransferQuotaConfig;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取数值配置, 缺失或格式错误时使用默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr + Copy + std::fmt::Display,
    {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };

        match raw.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default = %default,
                    "配置格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }
}

// ==========================================
// PlanConfigReader Trait 实现
// ==========================================
#[async_trait]
impl PlanConfigReader for ConfigManager {
    async fn get_plan_transfer_quota_configs(&self) -> Result<TransferQuotaConfig, Box<dyn Error>> {
        Ok(TransferQuotaConfig {
            quota: self.get_parsed_or_default(config_keys::PLAN_TRANSFER_QUOTA, 0i64)?,
            audit_quota: self.get_parsed_or_default(config_keys::PLAN_TRANSFER_AUDIT_QUOTA, 0i64)?,
        })
    }

    async fn get_device_cache_ttl_secs(&self) -> Result<u64, Box<dyn Error>> {
        self.get_parsed_or_default(
            config_keys::DEVICE_TYPE_CACHE_TTL_SECS,
            DEFAULT_DEVICE_TYPE_CACHE_TTL_SECS,
        )
    }
}

/// 机型缓存默认有效期（秒）
pub const DEFAULT_DEVICE_TYPE_CACHE_TTL_SECS: u64 = 300;

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 转移额度
    pub const PLAN_TRANSFER_QUOTA: &str = "plan_transfer_quota";
    pub const PLAN_TRANSFER_AUDIT_QUOTA: &str = "plan_transfer_audit_quota";

    // 机型缓存
    pub const DEVICE_TYPE_CACHE_TTL_SECS: &str = "device_type_cache_ttl_secs";
}
