// ==========================================
// 资源预测单据拆分 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供建表脚本, 供开发工具与测试共用
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 时间字段统一存储格式
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 建表脚本
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS config_scope (
    scope_id TEXT PRIMARY KEY,
    scope_type TEXT NOT NULL,
    scope_key TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(scope_type, scope_key)
);

INSERT OR IGNORE INTO config_scope (scope_id, scope_type, scope_key)
VALUES ('global', 'GLOBAL', 'global');

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL REFERENCES config_scope(scope_id) ON DELETE CASCADE,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS res_plan_ticket (
    id TEXT PRIMARY KEY,
    ticket_type TEXT NOT NULL,
    demands TEXT NOT NULL,
    bk_biz_id INTEGER NOT NULL,
    bk_biz_name TEXT NOT NULL DEFAULT '',
    bk_product_id INTEGER NOT NULL DEFAULT 0,
    bk_product_name TEXT NOT NULL DEFAULT '',
    plan_product_id INTEGER NOT NULL DEFAULT 0,
    plan_product_name TEXT NOT NULL DEFAULT '',
    op_product_name TEXT NOT NULL DEFAULT '',
    virtual_dept_id INTEGER NOT NULL DEFAULT 0,
    virtual_dept_name TEXT NOT NULL DEFAULT '',
    original_os REAL NOT NULL DEFAULT 0,
    original_cpu_core INTEGER NOT NULL DEFAULT 0,
    original_memory REAL NOT NULL DEFAULT 0,
    original_disk_size INTEGER NOT NULL DEFAULT 0,
    updated_os REAL NOT NULL DEFAULT 0,
    updated_cpu_core INTEGER NOT NULL DEFAULT 0,
    updated_memory REAL NOT NULL DEFAULT 0,
    updated_disk_size INTEGER NOT NULL DEFAULT 0,
    applicant TEXT NOT NULL DEFAULT '',
    remark TEXT NOT NULL DEFAULT '',
    split_status TEXT NOT NULL DEFAULT 'INIT',
    split_message TEXT,
    submitted_at TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS res_plan_sub_ticket (
    id TEXT PRIMARY KEY,
    ticket_id TEXT NOT NULL REFERENCES res_plan_ticket(id) ON DELETE CASCADE,
    bk_biz_id INTEGER NOT NULL,
    sub_type TEXT NOT NULL,
    sub_demands TEXT NOT NULL,
    original_os REAL NOT NULL DEFAULT 0,
    original_cpu_core INTEGER NOT NULL DEFAULT 0,
    original_memory REAL NOT NULL DEFAULT 0,
    original_disk_size INTEGER NOT NULL DEFAULT 0,
    updated_os REAL NOT NULL DEFAULT 0,
    updated_cpu_core INTEGER NOT NULL DEFAULT 0,
    updated_memory REAL NOT NULL DEFAULT 0,
    updated_disk_size INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL,
    stage TEXT NOT NULL,
    admin_audit_status TEXT NOT NULL,
    crp_sn TEXT,
    submitted_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sub_ticket_ticket_id ON res_plan_sub_ticket(ticket_id);

CREATE TABLE IF NOT EXISTS device_type (
    device_type TEXT PRIMARY KEY,
    device_family TEXT NOT NULL,
    cpu_core INTEGER NOT NULL,
    memory REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS res_plan_transfer_quota (
    year INTEGER NOT NULL,
    bk_biz_id INTEGER NOT NULL,
    obs_project TEXT NOT NULL,
    total_core INTEGER NOT NULL DEFAULT 0,
    applied_core INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (year, bk_biz_id, obs_project)
);

INSERT OR IGNORE INTO schema_version (version) VALUES (1);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表 (幂等)
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
