//! # 通用工具函数

use std::time::Duration;

/// 字节大小格式化
pub mod size {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    /// 以可读格式输出字节大小，例如 `512b`、`1.50kb`
    pub fn readable_size(size: u64) -> String {
        let s = size as f64;
        if size >= GB {
            format!("{:.2}gb", s / GB as f64)
        } else if size >= MB {
            format!("{:.2}mb", s / MB as f64)
        } else if size >= KB {
            format!("{:.2}kb", s / KB as f64)
        } else {
            format!("{size}b")
        }
    }
}

/// 时间工具函数
pub mod time {
    use super::*;

    /// 小于1秒的时长截断到毫秒（不足1毫秒时截断到微秒），用于日志展示
    pub fn truncate_duration(d: Duration) -> Duration {
        if d >= Duration::from_secs(1) {
            return d;
        }
        if d >= Duration::from_millis(1) {
            return Duration::from_millis(d.as_millis() as u64);
        }
        Duration::from_micros(d.as_micros() as u64)
    }

    /// 当前毫秒时间戳
    pub fn timestamp_millis() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// 网络工具函数
pub mod network {
    use executor_errors::{ExecutorError, ExecutorResult};

    /// 获取本机IPv4地址
    ///
    /// UDP connect 不会真正发包，只用来让系统选出出口网卡的地址。
    pub fn get_local_ip() -> ExecutorResult<String> {
        let socket = std::net::UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| ExecutorError::Internal(format!("Failed to create socket: {e}")))?;

        socket
            .connect("8.8.8.8:80")
            .map_err(|e| ExecutorError::Internal(format!("Failed to connect: {e}")))?;

        let local_addr = socket
            .local_addr()
            .map_err(|e| ExecutorError::Internal(format!("Failed to get local address: {e}")))?;

        if local_addr.ip().is_loopback() || local_addr.ip().is_unspecified() {
            return Err(ExecutorError::Internal(
                "No routable local address found".to_string(),
            ));
        }

        Ok(local_addr.ip().to_string())
    }

    /// 获取本机IP，失败时退回到回环地址
    pub fn local_ip_or_loopback() -> String {
        get_local_ip().unwrap_or_else(|_| "127.0.0.1".to_string())
    }

    /// 获取主机名
    pub fn get_hostname() -> ExecutorResult<String> {
        let name = hostname::get()
            .map_err(|e| ExecutorError::Internal(format!("Failed to get hostname: {e}")))?;
        Ok(name.to_string_lossy().into_owned())
    }
}

pub use network::{get_hostname, get_local_ip, local_ip_or_loopback};
pub use size::readable_size;
pub use time::{timestamp_millis, truncate_duration};
