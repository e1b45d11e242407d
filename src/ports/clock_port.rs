use chrono::{DateTime, Utc};

/// 时钟端口接口，请求时间戳由此取得
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
