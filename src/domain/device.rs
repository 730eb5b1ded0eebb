// ==========================================
// 资源预测单据拆分 - 机型领域模型
// ==========================================

use serde::{Deserialize, Serialize};

/// 机型规格 (单台核数与内存)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceTypeInfo {
    pub device_type: String,   // 机型
    pub device_family: String, // 机型族
    pub cpu_core: i64,         // 单台 CPU 核数
    pub memory: f64,           // 单台内存 (GB)
}

impl DeviceTypeInfo {
    /// 核数折算实例数 (允许非整数)
    pub fn os_of_cores(&self, cpu_core: i64) -> f64 {
        if self.cpu_core <= 0 {
            return 0.0;
        }
        cpu_core as f64 / self.cpu_core as f64
    }
}
