//! 基于 tokio 的异步防抖任务
//!
//! 面向已有 tokio 运行时的宿主：原始信号经 `watch` 通道输入，
//! 防抖后的值从另一个 `watch` 通道输出。
//!
//! 每次输入变化都会丢弃旧的 `sleep` 并重新计时，旧计时随之被取消，
//! 因此只有静默期结束时的最新值会被发布，中间值从不排队。

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// 启动防抖任务，返回防抖后的接收端与任务句柄。
///
/// 输入端全部关闭或输出端无人接收时任务退出；关闭时处于静默期的值会被丢弃。
pub fn spawn_debounce_task(
    mut input: watch::Receiver<String>,
    quiet: Duration,
) -> (watch::Receiver<String>, JoinHandle<()>) {
    let initial = input.borrow_and_update().clone();
    let (tx, rx) = watch::channel(initial);

    let handle = tokio::spawn(async move {
        loop {
            if input.changed().await.is_err() {
                log::debug!("🔌 防抖输入通道已关闭，任务退出");
                return;
            }

            loop {
                tokio::select! {
                    changed = input.changed() => {
                        if changed.is_err() {
                            log::debug!("🔌 防抖输入通道在静默期内关闭，丢弃待提交值");
                            return;
                        }
                    }
                    _ = tokio::time::sleep(quiet) => {
                        let value = input.borrow_and_update().clone();
                        log::debug!("⏱️ 防抖提交（{} 个字符）", value.chars().count());
                        if tx.send(value).is_err() {
                            return;
                        }
                        break;
                    }
                }
            }
        }
    });

    (rx, handle)
}
