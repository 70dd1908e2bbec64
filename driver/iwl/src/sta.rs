//! 站点表与每 TID 聚合状态

use alloc::vec::Vec;

pub const MAX_TID_COUNT: usize = 9;
pub const ETH_ALEN: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggState {
    pub txq_id: u16,
    pub frame_count: u16,
    pub start_idx: u16,
    pub bitmap: u64,
    pub rate_n_flags: u32,
    pub wait_for_ba: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TidData {
    pub seq_number: u16,
    pub tfds_in_queue: u16,
    pub agg: AggState,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StationEntry {
    pub used: bool,
    pub addr: [u8; ETH_ALEN],
    pub station_flags_msk: u32,
    pub tid: [TidData; MAX_TID_COUNT],
}

/// 定长站点表，容量为型号的最大站点数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationTable {
    entries: Vec<StationEntry>,
}

impl StationTable {
    pub fn new(max_stations: usize) -> Self {
        let mut entries = Vec::new();
        entries.resize(max_stations, StationEntry::default());
        Self { entries }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn num_stations(&self) -> usize {
        self.entries.iter().filter(|s| s.used).count()
    }

    /// 在第一个空位加入站点，返回其索引；表满返回 None
    pub fn add(&mut self, addr: [u8; ETH_ALEN], flags: u32) -> Option<usize> {
        let idx = self.entries.iter().position(|s| !s.used)?;
        self.entries[idx] = StationEntry {
            used: true,
            addr,
            station_flags_msk: flags,
            tid: [TidData::default(); MAX_TID_COUNT],
        };
        Some(idx)
    }

    pub fn remove(&mut self, idx: usize) {
        if let Some(s) = self.entries.get_mut(idx) {
            *s = StationEntry::default();
        }
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut StationEntry> {
        self.entries.get_mut(idx).filter(|s| s.used)
    }

    /// (索引, 站点)，只含在用的
    pub fn iter_used(&self) -> impl Iterator<Item = (usize, &StationEntry)> {
        self.entries.iter().enumerate().filter(|(_, s)| s.used)
    }
}
