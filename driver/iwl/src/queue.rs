//! 收发队列指针与流量日志

use alloc::vec;
use alloc::vec::Vec;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxQueue {
    pub read_ptr: u32,
    pub write_ptr: u32,
    /// 低 2 位为 AC，其余为硬件队列号
    pub swq_id: u8,
    pub stopped: bool,
}

impl TxQueue {
    #[inline]
    pub fn ac(&self) -> u8 {
        self.swq_id & 3
    }

    #[inline]
    pub fn hwq(&self) -> u8 {
        (self.swq_id >> 2) & 0x1f
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RxQueue {
    pub read: u32,
    pub write: u32,
    pub free_count: u32,
    /// 状态区未分配时为 None
    pub closed_rb_num: Option<u16>,
}

pub const IWL_TRAFFIC_ENTRIES: usize = 256;
pub const IWL_TRAFFIC_ENTRY_SIZE: usize = 64;

/// 调试等级中控制流量日志输出的位
pub const IWL_DL_TX: u32 = 1 << 0;
pub const IWL_DL_RX: u32 = 1 << 1;

/// 环形流量日志：每帧保留前 `IWL_TRAFFIC_ENTRY_SIZE` 字节
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficLog {
    pub data: Vec<u8>,
    pub idx: u16,
}

impl Default for TrafficLog {
    fn default() -> Self {
        Self {
            data: vec![0; IWL_TRAFFIC_ENTRIES * IWL_TRAFFIC_ENTRY_SIZE],
            idx: 0,
        }
    }
}

impl TrafficLog {
    pub fn record(&mut self, frame: &[u8]) {
        let start = self.idx as usize * IWL_TRAFFIC_ENTRY_SIZE;
        let slot = &mut self.data[start..start + IWL_TRAFFIC_ENTRY_SIZE];
        let n = frame.len().min(IWL_TRAFFIC_ENTRY_SIZE);
        slot[..n].copy_from_slice(&frame[..n]);
        slot[n..].fill(0);
        self.idx = ((self.idx as usize + 1) % IWL_TRAFFIC_ENTRIES) as u16;
    }

    pub fn reset(&mut self) {
        self.data.fill(0);
        self.idx = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_wraps_and_resets() {
        let mut log = TrafficLog::default();
        log.record(&[0xaa; 80]);
        assert_eq!(log.idx, 1);
        assert_eq!(&log.data[..IWL_TRAFFIC_ENTRY_SIZE], &[0xaa; IWL_TRAFFIC_ENTRY_SIZE][..]);
        log.idx = (IWL_TRAFFIC_ENTRIES - 1) as u16;
        log.record(&[1, 2]);
        assert_eq!(log.idx, 0);
        log.reset();
        assert!(log.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn swq_id_split() {
        let q = TxQueue {
            swq_id: 0x0e,
            ..Default::default()
        };
        assert_eq!(q.ac(), 2);
        assert_eq!(q.hwq(), 3);
    }
}
