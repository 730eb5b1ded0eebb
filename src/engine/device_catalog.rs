// ==========================================
// 资源预测单据拆分 - 机型目录缓存
// ==========================================
// 职责: 机型 → (单台核数, 单台内存) 的读穿透缓存
// 策略: 过期后在写锁内刷新, 读锁命中直接返回共享快照
// ==========================================

use crate::domain::device::DeviceTypeInfo;
use crate::engine::error::{SplitError, SplitResult};
use crate::repository::DeviceTypeRepository;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// 机型映射: device_type → 规格
pub type DeviceTypeMap = HashMap<String, DeviceTypeInfo>;

// ==========================================
// Trait: DeviceTypeSource
// ==========================================
// 用途: 机型目录的数据源
pub trait DeviceTypeSource: Send + Sync {
    fn list_device_types(&self) -> SplitResult<Vec<DeviceTypeInfo>>;
}

impl DeviceTypeSource for DeviceTypeRepository {
    fn list_device_types(&self) -> SplitResult<Vec<DeviceTypeInfo>> {
        Ok(self.list_all()?)
    }
}

struct CachedDevices {
    loaded_at: Instant,
    devices: Arc<DeviceTypeMap>,
}

// ==========================================
// DeviceCatalog - 机型目录
// ==========================================
pub struct DeviceCatalog {
    source: Arc<dyn DeviceTypeSource>,
    ttl: Duration,
    cache: RwLock<Option<CachedDevices>>,
}

impl DeviceCatalog {
    pub fn new(source: Arc<dyn DeviceTypeSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cache: RwLock::new(None),
        }
    }

    fn fresh(&self, cached: &Option<CachedDevices>) -> Option<Arc<DeviceTypeMap>> {
        cached
            .as_ref()
            .filter(|c| c.loaded_at.elapsed() < self.ttl)
            .map(|c| Arc::clone(&c.devices))
    }

    /// 获取机型映射 (过期则刷新)
    pub fn get_device_types(&self) -> SplitResult<Arc<DeviceTypeMap>> {
        if let Some(devices) = self.fresh(&self.cache.read()) {
            return Ok(devices);
        }

        let mut guard = self.cache.write();
        // 等待写锁期间可能已被其他调用方刷新
        if let Some(devices) = self.fresh(&guard) {
            return Ok(devices);
        }

        let devices: DeviceTypeMap = self
            .source
            .list_device_types()?
            .into_iter()
            .map(|d| (d.device_type.clone(), d))
            .collect();
        let devices = Arc::new(devices);

        info!(device_count = devices.len(), "机型缓存已刷新");
        *guard = Some(CachedDevices {
            loaded_at: Instant::now(),
            devices: Arc::clone(&devices),
        });
        Ok(devices)
    }

    /// 主动失效缓存
    pub fn invalidate(&self) {
        debug!("机型缓存已失效");
        *self.cache.write() = None;
    }
}

/// 查询机型规格
///
/// 机型为空视为输入错误; 未登记或单台核数为 0 的机型不做默认值兜底
pub fn lookup_device<'a>(
    devices: &'a DeviceTypeMap,
    device_type: &str,
) -> SplitResult<&'a DeviceTypeInfo> {
    if device_type.trim().is_empty() {
        return Err(SplitError::InvalidInput("device type is empty".to_string()));
    }

    match devices.get(device_type) {
        Some(device) if device.cpu_core > 0 => Ok(device),
        _ => Err(SplitError::DeviceTypeNotFound(device_type.to_string())),
    }
}
