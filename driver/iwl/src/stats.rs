//! 收发/中断/固件统计

use ieee80211::{classify, FrameClass, CONTROL_MAX, MANAGEMENT_MAX};

/// 按帧类型累计的收发计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrafficStats {
    pub mgmt: [u32; MANAGEMENT_MAX],
    pub ctrl: [u32; CONTROL_MAX],
    pub data_cnt: u32,
    pub data_bytes: u64,
}

impl TrafficStats {
    /// 按 frame_control 归类一帧；数据帧同时累计字节数
    pub fn account(&mut self, fc: u16, len: u16) {
        match classify(fc) {
            FrameClass::Mgmt(f) => self.mgmt[f.index()] = self.mgmt[f.index()].wrapping_add(1),
            FrameClass::Ctrl(f) => self.ctrl[f.index()] = self.ctrl[f.index()].wrapping_add(1),
            FrameClass::Data => {
                self.data_cnt = self.data_cnt.wrapping_add(1);
                self.data_bytes = self.data_bytes.wrapping_add(len as u64);
            }
            FrameClass::Other => {}
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// 固件命令/通知的数量上限
pub const REPLY_MAX: usize = 0xff;

/// 中断统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsrStats {
    pub hw: u32,
    pub sw: u32,
    /// 最近一次重启的错误码
    pub err_code: u32,
    pub sch: u32,
    pub alive: u32,
    pub rfkill: u32,
    pub ctkill: u32,
    pub wakeup: u32,
    pub rx: u32,
    pub rx_handlers: [u32; REPLY_MAX],
    pub tx: u32,
    pub unhandled: u32,
}

impl Default for IsrStats {
    fn default() -> Self {
        Self {
            hw: 0,
            sw: 0,
            err_code: 0,
            sch: 0,
            alive: 0,
            rfkill: 0,
            ctkill: 0,
            wakeup: 0,
            rx: 0,
            rx_handlers: [0; REPLY_MAX],
            tx: 0,
            unhandled: 0,
        }
    }
}

impl IsrStats {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// 记录一次命令响应
    pub fn count_rx(&mut self, cmd: u8) {
        self.rx = self.rx.wrapping_add(1);
        if let Some(n) = self.rx_handlers.get_mut(cmd as usize) {
            *n = n.wrapping_add(1);
        }
    }
}

/// 固件命令名
pub fn cmd_name(cmd: u8) -> &'static str {
    match cmd {
        0x01 => "REPLY_ALIVE",
        0x02 => "REPLY_ERROR",
        0x10 => "REPLY_RXON",
        0x11 => "REPLY_RXON_ASSOC",
        0x13 => "REPLY_QOS_PARAM",
        0x14 => "REPLY_RXON_TIMING",
        0x18 => "REPLY_ADD_STA",
        0x19 => "REPLY_REMOVE_STA",
        0x1a => "REPLY_REMOVE_ALL_STA",
        0x1b => "REPLY_3945_RX",
        0x1c => "REPLY_TX",
        0x1d => "REPLY_RATE_SCALE",
        0x1e => "REPLY_TXFIFO_FLUSH",
        0x20 => "REPLY_WEPKEY",
        0x48 => "REPLY_LEDS_CMD",
        0x4e => "REPLY_TX_LINK_QUALITY_CMD",
        0x5a => "COEX_PRIORITY_TABLE_CMD",
        0x5b => "COEX_MEDIUM_NOTIFICATION",
        0x5c => "COEX_EVENT_CMD",
        0x62 => "TEMPERATURE_NOTIFICATION",
        0x65 => "CALIBRATION_CFG_CMD",
        0x66 => "CALIBRATION_RES_NOTIFICATION",
        0x67 => "CALIBRATION_COMPLETE_NOTIFICATION",
        0x71 => "REPLY_QUIET_CMD",
        0x72 => "REPLY_CHANNEL_SWITCH",
        0x73 => "CHANNEL_SWITCH_NOTIFICATION",
        0x74 => "REPLY_SPECTRUM_MEASUREMENT_CMD",
        0x75 => "SPECTRUM_MEASURE_NOTIFICATION",
        0x77 => "POWER_TABLE_CMD",
        0x7a => "PM_SLEEP_NOTIFICATION",
        0x7b => "PM_DEBUG_STATISTIC_NOTIFIC",
        0x80 => "REPLY_SCAN_CMD",
        0x81 => "REPLY_SCAN_ABORT_CMD",
        0x82 => "SCAN_START_NOTIFICATION",
        0x83 => "SCAN_RESULTS_NOTIFICATION",
        0x84 => "SCAN_COMPLETE_NOTIFICATION",
        0x90 => "BEACON_NOTIFICATION",
        0x91 => "REPLY_TX_BEACON",
        0x94 => "WHO_IS_AWAKE_NOTIFICATION",
        0x96 => "QUIET_NOTIFICATION",
        0x97 => "REPLY_TX_PWR_TABLE_CMD",
        0x99 => "MEASURE_ABORT_NOTIFICATION",
        0x9b => "REPLY_BT_CONFIG",
        0x9c => "REPLY_STATISTICS_CMD",
        0x9d => "STATISTICS_NOTIFICATION",
        0xa0 => "REPLY_CARD_STATE_CMD",
        0xa1 => "CARD_STATE_NOTIFICATION",
        0xa2 => "MISSED_BEACONS_NOTIFICATION",
        0xa4 => "REPLY_CT_KILL_CONFIG_CMD",
        0xa8 => "SENSITIVITY_CMD",
        0xb0 => "REPLY_PHY_CALIBRATION_CMD",
        0xc0 => "REPLY_RX_PHY_CMD",
        0xc1 => "REPLY_RX_MPDU_CMD",
        0xc3 => "REPLY_RX",
        0xc5 => "REPLY_COMPRESSED_BA",
        0xcc => "REPLY_BT_COEX_PRIO_TABLE",
        0xcd => "REPLY_BT_COEX_PROT_ENV",
        0xce => "REPLY_BT_COEX_PROFILE_NOTIF",
        _ => "UNKNOWN",
    }
}

/// 固件统计标志位
pub const UCODE_STATISTICS_CLEAR_MSK: u32 = 0x1 << 0;
pub const UCODE_STATISTICS_FREQUENCY_MSK: u32 = 0x1 << 1;
pub const UCODE_STATISTICS_NARROW_BAND_MSK: u32 = 0x1 << 2;

pub const GENERAL_STATS_NUM: usize = 15;

/// 固件上报的通用统计（一次通知的快照）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneralStats {
    pub temperature: u32,
    pub temperature_m: u32,
    pub ttl_timestamp: u32,
    pub burst_check: u32,
    pub burst_count: u32,
    pub wait_for_silence_timeout_cnt: u32,
    pub sleep_time: u32,
    pub slots_out: u32,
    pub slots_idle: u32,
    pub tx_on_a: u32,
    pub tx_on_b: u32,
    pub exec_time: u32,
    pub probe_time: u32,
    pub rx_enable_counter: u32,
    pub num_of_sos_states: u32,
}

impl GeneralStats {
    pub fn to_array(&self) -> [u32; GENERAL_STATS_NUM] {
        [
            self.temperature,
            self.temperature_m,
            self.ttl_timestamp,
            self.burst_check,
            self.burst_count,
            self.wait_for_silence_timeout_cnt,
            self.sleep_time,
            self.slots_out,
            self.slots_idle,
            self.tx_on_a,
            self.tx_on_b,
            self.exec_time,
            self.probe_time,
            self.rx_enable_counter,
            self.num_of_sos_states,
        ]
    }

    pub fn from_array(a: [u32; GENERAL_STATS_NUM]) -> Self {
        Self {
            temperature: a[0],
            temperature_m: a[1],
            ttl_timestamp: a[2],
            burst_check: a[3],
            burst_count: a[4],
            wait_for_silence_timeout_cnt: a[5],
            sleep_time: a[6],
            slots_out: a[7],
            slots_idle: a[8],
            tx_on_a: a[9],
            tx_on_b: a[10],
            exec_time: a[11],
            probe_time: a[12],
            rx_enable_counter: a[13],
            num_of_sos_states: a[14],
        }
    }
}

/// 一组固件统计字段的当前/累计/增量/最大增量
///
/// 只有递增的字段计入增量。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatTable<const N: usize> {
    pub current: [u32; N],
    pub accum: [u32; N],
    pub delta: [u32; N],
    pub max_delta: [u32; N],
}

impl<const N: usize> Default for StatTable<N> {
    fn default() -> Self {
        Self {
            current: [0; N],
            accum: [0; N],
            delta: [0; N],
            max_delta: [0; N],
        }
    }
}

impl<const N: usize> StatTable<N> {
    pub fn update(&mut self, clear: bool, new: [u32; N]) {
        if clear {
            self.accum = [0; N];
            self.delta = [0; N];
            self.max_delta = [0; N];
        }
        for i in 0..N {
            if new[i] > self.current[i] {
                let d = new[i] - self.current[i];
                self.delta[i] = d;
                self.accum[i] = self.accum[i].wrapping_add(d);
                self.max_delta[i] = self.max_delta[i].max(d);
            }
        }
        self.current = new;
    }
}

/// OFDM/CCK 物理层接收统计字段数
pub const RX_PHY_NUM: usize = 19;
/// 非物理层接收统计字段数
pub const RX_NON_PHY_NUM: usize = 21;
/// HT 接收统计字段数
pub const RX_HT_PHY_NUM: usize = 10;
pub const TX_STATS_NUM: usize = 24;
/// BT 活动统计：8 个请求/拒绝计数 + 接收侧 bt kill 次数
pub const BT_ACTIVITY_NUM: usize = 9;

/// 一次统计通知的内容
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatisticsNotification {
    pub flag: u32,
    pub general: GeneralStats,
    pub rx_ofdm: [u32; RX_PHY_NUM],
    pub rx_cck: [u32; RX_PHY_NUM],
    pub rx_non_phy: [u32; RX_NON_PHY_NUM],
    pub rx_ofdm_ht: [u32; RX_HT_PHY_NUM],
    pub tx: [u32; TX_STATS_NUM],
    /// 各天线发射功率，1/2 dB 步进
    pub tx_power: [u8; 3],
    pub bt_activity: [u32; BT_ACTIVITY_NUM],
}

/// 固件统计：最近一次通知及其累计历史
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UcodeStats {
    pub flag: u32,
    pub general: StatTable<GENERAL_STATS_NUM>,
    pub rx_ofdm: StatTable<RX_PHY_NUM>,
    pub rx_cck: StatTable<RX_PHY_NUM>,
    pub rx_non_phy: StatTable<RX_NON_PHY_NUM>,
    pub rx_ofdm_ht: StatTable<RX_HT_PHY_NUM>,
    pub tx: StatTable<TX_STATS_NUM>,
    pub tx_power: [u8; 3],
    pub bt_activity: StatTable<BT_ACTIVITY_NUM>,
}

impl UcodeStats {
    /// 收到新的统计通知；带清除标志的通知先清空累计值
    pub fn update(&mut self, n: &StatisticsNotification) {
        let clear = n.flag & UCODE_STATISTICS_CLEAR_MSK != 0;
        self.flag = n.flag;
        self.general.update(clear, n.general.to_array());
        self.rx_ofdm.update(clear, n.rx_ofdm);
        self.rx_cck.update(clear, n.rx_cck);
        self.rx_non_phy.update(clear, n.rx_non_phy);
        self.rx_ofdm_ht.update(clear, n.rx_ofdm_ht);
        self.tx.update(clear, n.tx);
        self.tx_power = n.tx_power;
        self.bt_activity.update(clear, n.bt_activity);
    }
}

/// 单帧发送失败原因，最后一项为 UNKNOWN
pub const TX_FAIL_REASONS: [&str; 23] = [
    "DELAY",
    "FEW_BYTES",
    "BT_PRIO",
    "QUIET_PERIOD",
    "CALC_TTAK",
    "INTERNAL_CROSSED_RETRY",
    "SHORT_LIMIT",
    "LONG_LIMIT",
    "FIFO_UNDERRUN",
    "DRAIN_FLOW",
    "RFKILL_FLUSH",
    "LIFE_EXPIRE",
    "DEST_PS",
    "HOST_ABORTED",
    "BT_RETRY",
    "STA_INVALID",
    "FRAG_DROPPED",
    "TID_DISABLE",
    "FIFO_FLUSHED",
    "INSUFFICIENT_CF_POLL",
    "PASSIVE_NO_RX",
    "NO_BEACON_ON_RADAR",
    "UNKNOWN",
];

/// 聚合发送失败原因，最后一项为 UNKNOWN
pub const AGG_TX_FAIL_REASONS: [&str; 13] = [
    "UNDERRUN_MSK",
    "BT_PRIO_MSK",
    "FEW_BYTES_MSK",
    "ABORT_MSK",
    "LAST_SENT_TTL_MSK",
    "LAST_SENT_TRY_CNT_MSK",
    "LAST_SENT_BT_KILL_MSK",
    "SCD_QUERY_MSK",
    "TEST_BAD_CRC32_MSK",
    "RESPONSE_MSK",
    "DUMP_TX_MSK",
    "DELAY_TX_MSK",
    "UNKNOWN",
];

/// 发送响应里的失败计数，按 [`TX_FAIL_REASONS`] / [`AGG_TX_FAIL_REASONS`] 下标
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplyTxErrors {
    pub tx: [u32; TX_FAIL_REASONS.len()],
    pub agg: [u32; AGG_TX_FAIL_REASONS.len()],
}

impl ReplyTxErrors {
    /// 越界的原因记为 UNKNOWN
    pub fn record_tx(&mut self, reason: usize) {
        let i = reason.min(self.tx.len() - 1);
        self.tx[i] = self.tx[i].wrapping_add(1);
    }

    pub fn record_agg(&mut self, reason: usize) {
        let i = reason.min(self.agg.len() - 1);
        self.agg[i] = self.agg[i].wrapping_add(1);
    }
}
