//! 模拟网络延迟

use std::time::Duration;

use rand::Rng;

/// 模拟调用延迟
///
/// 每次调用在 `[min, max]` 之间随机休眠，阻塞当前线程。
/// 协作方调用都运行在工作池的阻塞线程上，因此这里直接使用 `std::thread::sleep`。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulatedLatency {
    min_ms: u64,
    max_ms: u64,
}

impl SimulatedLatency {
    /// 无延迟
    pub fn none() -> Self {
        Self::default()
    }

    /// 固定延迟
    pub fn fixed(delay: Duration) -> Self {
        Self::between(delay, delay)
    }

    /// 随机延迟，min 大于 max 时交换
    pub fn between(min: Duration, max: Duration) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min_ms: min.as_millis() as u64,
            max_ms: max.as_millis() as u64,
        }
    }

    pub fn is_none(&self) -> bool {
        self.max_ms == 0
    }

    /// 随机取一个延迟时长
    pub fn sample(&self) -> Duration {
        if self.is_none() {
            return Duration::ZERO;
        }
        let ms = rand::thread_rng().gen_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }

    /// 阻塞当前线程模拟一次调用延迟
    pub fn pause(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_never_sleeps() {
        let latency = SimulatedLatency::none();
        assert!(latency.is_none());
        assert_eq!(latency.sample(), Duration::ZERO);
    }

    #[test]
    fn test_between_samples_in_range() {
        let latency = SimulatedLatency::between(Duration::from_millis(30), Duration::from_millis(5));
        for _ in 0..100 {
            let d = latency.sample();
            assert!(d >= Duration::from_millis(5) && d <= Duration::from_millis(30));
        }
    }

    #[test]
    fn test_fixed_latency() {
        let latency = SimulatedLatency::fixed(Duration::from_millis(7));
        assert_eq!(latency.sample(), Duration::from_millis(7));
    }
}
