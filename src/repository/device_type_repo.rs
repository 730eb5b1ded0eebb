// ==========================================
// 资源预测单据拆分 - 机型数据仓储
// ==========================================

use crate::domain::device::DeviceTypeInfo;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

/// 机型仓储
/// 职责: device_type 表读写, 作为机型缓存的数据源
pub struct DeviceTypeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DeviceTypeRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询全部机型
    pub fn list_all(&self) -> RepositoryResult<Vec<DeviceTypeInfo>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT device_type, device_family, cpu_core, memory FROM device_type ORDER BY device_type",
        )?;

        let devices = stmt
            .query_map([], |row| {
                Ok(DeviceTypeInfo {
                    device_type: row.get(0)?,
                    device_family: row.get(1)?,
                    cpu_core: row.get(2)?,
                    memory: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(devices)
    }

    /// 插入或更新机型
    pub fn upsert(&self, device: &DeviceTypeInfo) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO device_type (device_type, device_family, cpu_core, memory)
               VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT(device_type) DO UPDATE SET
                   device_family = ?2, cpu_core = ?3, memory = ?4"#,
            params![
                device.device_type,
                device.device_family,
                device.cpu_core,
                device.memory
            ],
        )?;
        Ok(())
    }
}
