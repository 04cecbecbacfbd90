// ==========================================
// EMAGE 关联加载器 - 配置层
// ==========================================
// 职责: 启动配置装配（JSON 文件 + 环境变量覆写）
// 红线: 配置仅在启动时读取一次,运行期不变
// ==========================================

pub mod error;
pub mod load_config;

// 重导出
pub use error::{ConfigError, ConfigResult};
pub use load_config::{config_keys, LoadConfig, LoadConfigFile};
