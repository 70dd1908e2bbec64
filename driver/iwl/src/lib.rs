//! iwl 无线驱动状态与调试文件系统端点
//!
//! 功能包括:
//! - 驱动私有状态 (device) - 统计、站点、队列、校准、省电、复位历史
//! - 协作方接口 (ops) - 寄存器/片上内存、事件日志、复位、看门狗，附占位实现
//! - 型号配置 (cfgfile) - ini 风格的配置文件
//! - 调试端点表 (debugfs) - `data/`、`debug/`、`rf/` 三个目录

#![no_std]

extern crate alloc;

mod calib;
mod cfgfile;
pub mod debugfs;
mod device;
mod ops;
mod power;
mod queue;
mod sta;
mod stats;
mod status;

pub use calib::{ChainNoiseData, SensitivityData, NRG_NUM_PREV_STAT_L, NUM_RX_CHAINS};
pub use cfgfile::{
    parse_iwl_configfile, ANT_A, ANT_ABC, ANT_B, ANT_C, HtParams, IwlCfg, MAX_PLCP_ERR_THRESHOLD_DEF, MAX_PLCP_ERR_THRESHOLD_DISABLE,
    MAX_PLCP_ERR_THRESHOLD_MAX, MAX_PLCP_ERR_THRESHOLD_MIN,
};
pub use debugfs::{iwl_endpoints, iwl_registry, DBGFS_DIRS, DIR_DATA, DIR_DEBUG, DIR_RF};
pub use device::{
    AcParams, BtCoex, EventLog, ForceReset, IwlPriv, NvmDeviceType, RxonContext, SramWindow,
    SupportedBand, UcodeType, IWL_BT_COEX_TRAFFIC_LOAD_CONTINUOUS, IWL_BT_COEX_TRAFFIC_LOAD_HIGH,
    IWL_BT_COEX_TRAFFIC_LOAD_LOW, IWL_BT_COEX_TRAFFIC_LOAD_NONE, IWL_MISSED_BEACON_THRESHOLD_DEF,
    IWL_MISSED_BEACON_THRESHOLD_MAX, IWL_MISSED_BEACON_THRESHOLD_MIN, IWL_RXON_CTX_BSS, IWL_RXON_CTX_PAN,
    RXON_FILTER_ASSOC_MSK, SRAM_DATA_BASE,
};
pub use ops::{
    IwlOps, IwlOpsStub, OpsCall, ResetMethod, IWL_DROP_ALL, IWL_DROP_SELECTED, IWL_DROP_SINGLE,
    IWL_FW_RESET, IWL_RF_RESET,
};
pub use power::{PowerData, PowerTableCmd, TtMgmt, TtRestriction, DEF_WD_TIMEOUT, MAX_WD_TIMEOUT};
pub use queue::{RxQueue, TrafficLog, TxQueue, IWL_DL_RX, IWL_DL_TX};
pub use sta::{AggState, StationEntry, StationTable, TidData};
pub use stats::{
    GeneralStats, IsrStats, ReplyTxErrors, StatTable, StatisticsNotification, TrafficStats, UcodeStats,
    AGG_TX_FAIL_REASONS, BT_ACTIVITY_NUM, GENERAL_STATS_NUM, RX_HT_PHY_NUM, RX_NON_PHY_NUM, RX_PHY_NUM,
    TX_FAIL_REASONS, TX_STATS_NUM,
};
pub use status::*;

/// 驱动锁：中断/收发路径与调试文件系统共用
pub type IwlLock<O> = spin::Mutex<IwlPriv<O>>;
