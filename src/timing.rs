//! # 耗时统计模块
//!
//! 隐写与提取完成后 (无论成功与否)，以固定事件名把耗时 (毫秒) 通知给调用方。

use log::info;
use std::time::{Duration, Instant};

/// 隐写操作的耗时事件名。
pub const HIDE_DURATION_EVENT: &str = "hide_function_duration";

/// 提取操作的耗时事件名。
pub const EXTRACT_DURATION_EVENT: &str = "extract_function_duration";

/// 接收耗时通知的一方，例如命令行输出或界面层。
pub trait DurationListener {
    fn on_duration(&self, event: &str, elapsed: Duration);
}

impl<F> DurationListener for F
where
    F: Fn(&str, Duration),
{
    fn on_duration(&self, event: &str, elapsed: Duration) {
        self(event, elapsed)
    }
}

/// 只写日志的监听器。
#[derive(Debug, Default, Clone, Copy)]
pub struct LogListener;

impl DurationListener for LogListener {
    fn on_duration(&self, event: &str, elapsed: Duration) {
        info!("{event}: {} ms", elapsed.as_millis());
    }
}

/// 执行 `op`，在其返回后把耗时报告给 `listener`，并原样返回结果。
pub fn timed<T, E>(
    event: &str,
    listener: &dyn DurationListener,
    op: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    let start = Instant::now();
    let result = op();
    listener.on_duration(event, start.elapsed());
    result
}
