//! 驱动私有状态 (IwlPriv)
//!
//! 长期存在的设备状态。中断/收发路径更新计数，调试文件系统只在一次调用内借用它，
//! 两者都在驱动自己的 `spin::Mutex<IwlPriv<O>>` 之下。

use alloc::vec::Vec;
use core::result::Result;

use ieee80211::{Band, Channel, AC_NUM};

use crate::calib::{ChainNoiseData, SensitivityData};
use crate::cfgfile::IwlCfg;
use crate::ops::{IwlOps, ResetMethod, IWL_MAX_FORCE_RESET};
use crate::power::{PowerData, TtMgmt};
use crate::queue::{RxQueue, TrafficLog, TxQueue};
use crate::sta::StationTable;
use crate::stats::{IsrStats, ReplyTxErrors, TrafficStats, UcodeStats};
use crate::status::*;

pub const IWL_MISSED_BEACON_THRESHOLD_MIN: u32 = 1;
pub const IWL_MISSED_BEACON_THRESHOLD_DEF: u32 = 5;
pub const IWL_MISSED_BEACON_THRESHOLD_MAX: u32 = IWL_MISSED_BEACON_THRESHOLD_DEF;

/// 两次非外部触发的复位之间的最小间隔
pub const IWL_DELAY_NEXT_FORCE_RF_RESET_MS: u64 = 3000;
pub const IWL_DELAY_NEXT_FORCE_FW_RELOAD_MS: u64 = 5000;

/// 片上数据段默认起始地址
pub const SRAM_DATA_BASE: u32 = 0x80_0000;

/// EEPROM 版本字所在偏移
pub const EEPROM_VERSION: usize = 0x88;

pub const RXON_FILTER_ASSOC_MSK: u32 = 1 << 3;

pub const IWL_RXON_CTX_BSS: usize = 0;
pub const IWL_RXON_CTX_PAN: usize = 1;

/// 蓝牙共存流量负载
pub const IWL_BT_COEX_TRAFFIC_LOAD_NONE: u8 = 0;
pub const IWL_BT_COEX_TRAFFIC_LOAD_LOW: u8 = 1;
pub const IWL_BT_COEX_TRAFFIC_LOAD_HIGH: u8 = 2;
pub const IWL_BT_COEX_TRAFFIC_LOAD_CONTINUOUS: u8 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NvmDeviceType {
    #[default]
    Eeprom,
    Otp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UcodeType {
    Init,
    #[default]
    Runtime,
}

/// 单个接入类别的 EDCA 参数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcParams {
    pub cw_min: u16,
    pub cw_max: u16,
    pub aifsn: u8,
    pub edca_txop: u16,
}

/// RXON 上下文（BSS / PAN）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RxonContext {
    pub ctxid: u8,
    pub qos: [AcParams; AC_NUM],
    pub active_flags: u32,
    pub active_filter_flags: u32,
}

impl RxonContext {
    #[inline]
    pub fn is_associated(&self) -> bool {
        self.active_filter_flags & RXON_FILTER_ASSOC_MSK != 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedBand {
    pub band: Band,
    pub channels: Vec<Channel>,
}

/// 固件事件日志跟踪计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventLog {
    pub ucode_trace: bool,
    pub non_wraps_count: u32,
    pub wraps_once_count: u32,
    pub wraps_more_count: u32,
}

/// 某种强制复位的历史
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForceReset {
    pub reset_request_count: u32,
    pub reset_success_count: u32,
    pub reset_reject_count: u32,
    pub reset_duration_ms: u64,
    pub last_force_reset_ms: Option<u64>,
}

/// 蓝牙共存状态，仅高级共存型号有
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BtCoex {
    pub enable_flag: u8,
    pub full_concurrent: bool,
    pub status: bool,
    pub last_traffic_load: u8,
    pub ch_announce: bool,
    pub kill_ack_mask: u32,
    pub kill_cts_mask: u32,
    pub traffic_load: u8,
}

/// SRAM 转储窗口
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SramWindow {
    /// 当前固件的整个数据段
    #[default]
    Default,
    /// 从 offset 起 len 字节，按字节序逐字节输出
    Range { offset: u32, len: u32 },
    /// offset 处的一个字，按设备字节序输出
    Word { offset: u32 },
}

pub struct IwlPriv<O> {
    pub cfg: IwlCfg,
    pub ops: O,
    pub status: Status,

    pub tx_stats: TrafficStats,
    pub rx_stats: TrafficStats,
    pub isr_stats: IsrStats,
    pub ucode_stats: UcodeStats,
    pub reply_tx_errors: ReplyTxErrors,

    pub stations: StationTable,
    pub eeprom: Option<Vec<u8>>,
    pub nvm_device_type: NvmDeviceType,
    pub bands: Vec<SupportedBand>,
    pub contexts: Vec<RxonContext>,

    pub thermal_throttle: TtMgmt,
    pub power_data: PowerData,
    pub disable_ht40: bool,

    /// 发送队列尚未建立时为 None
    pub txq: Option<Vec<TxQueue>>,
    pub queue_stop_count: [u32; AC_NUM],
    pub rxq: RxQueue,
    pub tx_traffic: Option<TrafficLog>,
    pub rx_traffic: Option<TrafficLog>,
    /// `IWL_DL_*` 调试等级位
    pub debug_level: u32,

    pub sensitivity_data: Option<SensitivityData>,
    pub chain_noise_data: Option<ChainNoiseData>,
    pub disable_sens_cal: bool,
    pub disable_chain_noise_cal: bool,

    pub event_log: EventLog,
    pub missed_beacon_threshold: u32,
    pub force_reset: [ForceReset; IWL_MAX_FORCE_RESET],
    pub bt: Option<BtCoex>,

    pub sram: SramWindow,
    pub ucode_type: UcodeType,
    pub ucode_init_data_len: u32,
    pub ucode_rt_data_len: u32,
}

impl<O: IwlOps> IwlPriv<O> {
    pub fn new(cfg: IwlCfg, ops: O) -> Self {
        let mut force_reset = [ForceReset::default(); IWL_MAX_FORCE_RESET];
        force_reset[ResetMethod::Rf.index()].reset_duration_ms = IWL_DELAY_NEXT_FORCE_RF_RESET_MS;
        force_reset[ResetMethod::Fw.index()].reset_duration_ms = IWL_DELAY_NEXT_FORCE_FW_RELOAD_MS;
        log::info!(
            target: "wireless::iwl",
            "iwl: new device, {} stations, {} queues",
            cfg.max_stations,
            cfg.num_of_queues
        );
        Self {
            stations: StationTable::new(cfg.max_stations as usize),
            cfg,
            ops,
            status: Status::default(),
            tx_stats: TrafficStats::default(),
            rx_stats: TrafficStats::default(),
            isr_stats: IsrStats::default(),
            ucode_stats: UcodeStats::default(),
            reply_tx_errors: ReplyTxErrors::default(),
            eeprom: None,
            nvm_device_type: NvmDeviceType::default(),
            bands: Vec::new(),
            contexts: alloc::vec![RxonContext::default()],
            thermal_throttle: TtMgmt::default(),
            power_data: PowerData::default(),
            disable_ht40: false,
            txq: None,
            queue_stop_count: [0; AC_NUM],
            rxq: RxQueue::default(),
            tx_traffic: None,
            rx_traffic: None,
            debug_level: 0,
            sensitivity_data: None,
            chain_noise_data: None,
            disable_sens_cal: false,
            disable_chain_noise_cal: false,
            event_log: EventLog::default(),
            missed_beacon_threshold: IWL_MISSED_BEACON_THRESHOLD_DEF,
            force_reset,
            bt: None,
            sram: SramWindow::Default,
            ucode_type: UcodeType::default(),
            ucode_init_data_len: 0,
            ucode_rt_data_len: 0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.status.test(STATUS_ALIVE)
    }

    #[inline]
    pub fn is_init(&self) -> bool {
        self.status.test(STATUS_INIT)
    }

    /// 已就绪：READY 且 GEO_CONFIGURED，且未在退出
    pub fn is_ready(&self) -> bool {
        self.status.test(STATUS_READY)
            && self.status.test(STATUS_GEO_CONFIGURED)
            && !self.status.test(STATUS_EXIT_PENDING)
    }

    #[inline]
    pub fn is_rfkill(&self) -> bool {
        self.status.test(STATUS_RF_KILL_HW)
    }

    #[inline]
    pub fn is_ctkill(&self) -> bool {
        self.status.test(STATUS_CT_KILL)
    }

    /// 就绪且射频未被关闭
    pub fn is_ready_rf(&self) -> bool {
        !self.is_rfkill() && self.is_ready()
    }

    pub fn is_any_associated(&self) -> bool {
        self.contexts.iter().any(|c| c.is_associated())
    }

    #[inline]
    pub fn advanced_bt_coexist(&self) -> bool {
        self.bt.is_some()
    }

    pub fn hw_mode(&self, band: Band) -> Option<&SupportedBand> {
        self.bands.iter().find(|b| b.band == band)
    }

    pub fn eeprom_version(&self) -> Option<u16> {
        let e = self.eeprom.as_ref()?;
        let b = e.get(EEPROM_VERSION..EEPROM_VERSION + 2)?;
        Some(u16::from_le_bytes([b[0], b[1]]))
    }

    /// 当前固件数据段长度
    pub fn ucode_data_len(&self) -> u32 {
        match self.ucode_type {
            UcodeType::Init => self.ucode_init_data_len,
            UcodeType::Runtime => self.ucode_rt_data_len,
        }
    }

    /// 解析 SRAM 窗口：(起始地址, 字节数, 是否按设备字节序)
    ///
    /// `Range { 0, 0 }` 与 `Default` 等价。
    pub fn sram_window(&self) -> (u32, u32, bool) {
        match self.sram {
            SramWindow::Range { offset, len } if offset != 0 || len != 0 => (offset, len, false),
            SramWindow::Word { offset } => (offset, 4, true),
            _ => (SRAM_DATA_BASE, self.ucode_data_len(), false),
        }
    }

    pub fn clear_isr_stats(&mut self) {
        self.isr_stats.clear();
        log::debug!(target: "wireless::iwl", "isr stats cleared");
    }

    pub fn clear_traffic_stats(&mut self) {
        self.tx_stats.clear();
        self.rx_stats.clear();
        log::debug!(target: "wireless::iwl", "traffic stats cleared");
    }

    pub fn reset_traffic_log(&mut self) {
        if let Some(log) = self.tx_traffic.as_mut() {
            log.reset();
        }
        if let Some(log) = self.rx_traffic.as_mut() {
            log.reset();
        }
    }

    /// 发送路径：统计并记入流量日志
    pub fn log_tx_frame(&mut self, frame: &[u8]) {
        let fc = ieee80211::frame_control(frame);
        self.tx_stats.account(fc, frame.len().min(u16::MAX as usize) as u16);
        if let Some(log) = self.tx_traffic.as_mut() {
            log.record(frame);
        }
    }

    /// 接收路径：统计并记入流量日志
    pub fn log_rx_frame(&mut self, frame: &[u8]) {
        let fc = ieee80211::frame_control(frame);
        self.rx_stats.account(fc, frame.len().min(u16::MAX as usize) as u16);
        if let Some(log) = self.rx_traffic.as_mut() {
            log.record(frame);
        }
    }

    /// 强制复位并记录历史
    ///
    /// 非外部触发的请求在上次成功后的 `reset_duration_ms` 内被拒绝（-EAGAIN）；
    /// 调试文件系统的请求都是外部触发。
    pub fn force_reset(&mut self, method: ResetMethod, external: bool) -> Result<(), i32> {
        if self.status.test(STATUS_EXIT_PENDING) {
            return Err(-22);
        }
        let now = self.ops.now_ms();
        let fr = &mut self.force_reset[method.index()];
        fr.reset_request_count = fr.reset_request_count.wrapping_add(1);
        if !external {
            if let Some(last) = fr.last_force_reset_ms {
                if now < last.saturating_add(fr.reset_duration_ms) {
                    fr.reset_reject_count = fr.reset_reject_count.wrapping_add(1);
                    log::warn!(target: "wireless::iwl", "force reset {:?} rejected: too soon", method);
                    return Err(-11);
                }
            }
        }
        self.ops.force_reset(method)?;
        let fr = &mut self.force_reset[method.index()];
        fr.reset_success_count = fr.reset_success_count.wrapping_add(1);
        fr.last_force_reset_ms = Some(now);
        log::info!(target: "wireless::iwl", "force reset {:?} done", method);
        Ok(())
    }
}
