// ==========================================
// 资源预测单据拆分 - 主入口
// ==========================================
// 打开 (或初始化) 数据库并输出当前配置, 拆分由 split_ticket 工具触发
// ==========================================

use std::sync::Arc;

use hcm_res_plan::app::{get_default_db_path, AppState};
use hcm_res_plan::config::PlanConfigReader;
use hcm_res_plan::engine::StaticCapacitySource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hcm_res_plan::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", hcm_res_plan::APP_NAME);
    tracing::info!("系统版本: {}", hcm_res_plan::VERSION);
    tracing::info!("==================================================");

    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let capacity_source = Arc::new(StaticCapacitySource::default());
    let state = AppState::new(&db_path, capacity_source)
        .await
        .map_err(anyhow::Error::msg)?;

    let quota = state
        .config_manager
        .get_plan_transfer_quota_configs()
        .await
        .map_err(|e| anyhow::anyhow!("读取转移额度配置失败: {}", e))?;
    tracing::info!(
        quota = quota.quota,
        audit_quota = quota.audit_quota,
        "转移额度配置"
    );

    Ok(())
}
