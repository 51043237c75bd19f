// ==========================================
// 包装车间周排班系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value)
// 约定: 键缺失或表不存在时回落到内置默认值
// ==========================================

use crate::config::rota_config_trait::RotaConfigReader;
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// 配置键与默认值
// ==========================================

pub const KEY_ROTATION_LOOKBACK_DAYS: &str = "rota.rotation_lookback_days";
pub const KEY_ROTATION_PENALTY_TIERS: &str = "rota.rotation_penalty_tiers";
pub const KEY_DEFAULT_PILOTS_REQUIRED: &str = "rota.default_pilots_required";

pub const DEFAULT_ROTATION_LOOKBACK_DAYS: i64 = 28;
pub const DEFAULT_ROTATION_PENALTY_TIERS: [i32; 4] = [-20, -15, -10, -5];
pub const DEFAULT_PILOTS_REQUIRED: i32 = 2;

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

    /// 从已有连接创建配置管理器
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 读取单个配置值（键缺失或表不存在返回 None）
    fn get_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("配置连接锁获取失败: {}", e))?;

        let result = conn
            .query_row(
                "SELECT value FROM config_kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional();

        match result {
            Ok(v) => Ok(v),
            // 空库/旧库没有 config_kv 表时按"未配置"处理
            Err(rusqlite::Error::SqliteFailure(_, Some(msg))) if msg.contains("no such table") => {
                Ok(None)
            }
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入配置值（INSERT OR REPLACE）
    pub fn set_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("配置连接锁获取失败: {}", e))?;
        conn.execute(
            "INSERT OR REPLACE INTO config_kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
            params![key, value],
        )?;
        Ok(())
    }
}

#[async_trait]
impl RotaConfigReader for ConfigManager {
    async fn get_rotation_lookback_days(&self) -> Result<i64, Box<dyn Error>> {
        match self.get_value(KEY_ROTATION_LOOKBACK_DAYS)? {
            Some(v) => Ok(v.trim().parse::<i64>()?),
            None => Ok(DEFAULT_ROTATION_LOOKBACK_DAYS),
        }
    }

    async fn get_rotation_penalty_tiers(&self) -> Result<[i32; 4], Box<dyn Error>> {
        match self.get_value(KEY_ROTATION_PENALTY_TIERS)? {
            Some(v) => {
                let tiers: Vec<i32> = serde_json::from_str(&v)?;
                if tiers.len() != 4 {
                    return Err(format!(
                        "轮换惩罚分级必须为 4 个值, 实际 {} 个",
                        tiers.len()
                    )
                    .into());
                }
                Ok([tiers[0], tiers[1], tiers[2], tiers[3]])
            }
            None => Ok(DEFAULT_ROTATION_PENALTY_TIERS),
        }
    }

    async fn get_default_pilots_required(&self) -> Result<i32, Box<dyn Error>> {
        match self.get_value(KEY_DEFAULT_PILOTS_REQUIRED)? {
            Some(v) => Ok(v.trim().parse::<i32>()?),
            None => Ok(DEFAULT_PILOTS_REQUIRED),
        }
    }
}
