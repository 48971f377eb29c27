//! 请求闸门 - 基础设施层
//!
//! 所有真正发出的请求（首次抓取和重试）都要先在这里预约发起时刻

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// 请求闸门
///
/// 任意两次放行之间至少间隔 `delay`。
/// 时刻按预约顺序分配，预约后被取消的时刻不会回收。
#[derive(Debug)]
pub struct RequestGate {
    delay: Duration,
    next_slot: Mutex<Option<Instant>>,
    issued: AtomicUsize,
}

impl RequestGate {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_slot: Mutex::new(None),
            issued: AtomicUsize::new(0),
        }
    }

    /// 预约下一个可用时刻并等到该时刻
    pub async fn acquire(&self) {
        let slot = {
            let mut next_slot = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next_slot {
                Some(at) if at > now => at,
                _ => now,
            };
            *next_slot = Some(slot + self.delay);
            slot
        };

        if slot > Instant::now() {
            sleep_until(slot).await;
        }
        self.issued.fetch_add(1, Ordering::Relaxed);
    }

    /// 已放行的请求数
    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::Relaxed)
    }
}
