//! 省电、温控与看门狗参数

use alloc::vec::Vec;

/// 可选的省电等级数
pub const IWL_POWER_NUM: i32 = 5;
pub const IWL_POWER_VEC_SIZE: usize = 5;

/// 未覆盖省电等级
pub const SLEEP_LEVEL_NO_OVERRIDE: i32 = -1;

pub const DEF_WD_TIMEOUT: u32 = 2000;
pub const MAX_WD_TIMEOUT: u32 = 120_000;

/// CSR_GP_CNTRL 寄存器中的省电状态
pub const CSR_GP_CNTRL: u32 = 0x024;
pub const CSR_GP_REG_POWER_SAVE_STATUS_MSK: u32 = 0x0300_0000;
pub const CSR_GP_REG_NO_POWER_SAVE: u32 = 0x0000_0000;
pub const CSR_GP_REG_MAC_POWER_SAVE: u32 = 0x0100_0000;
pub const CSR_GP_REG_PHY_POWER_SAVE: u32 = 0x0200_0000;

/// 最近下发给固件的省电命令
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerTableCmd {
    pub flags: u16,
    pub rx_data_timeout: u32,
    pub tx_data_timeout: u32,
    pub sleep_interval: [u32; IWL_POWER_VEC_SIZE],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerData {
    /// 内部以 0 起计；`SLEEP_LEVEL_NO_OVERRIDE` 表示不覆盖
    pub debug_sleep_level_override: i32,
    pub sleep_cmd: PowerTableCmd,
}

impl Default for PowerData {
    fn default() -> Self {
        Self {
            debug_sleep_level_override: SLEEP_LEVEL_NO_OVERRIDE,
            sleep_cmd: PowerTableCmd::default(),
        }
    }
}

/// 一个温控等级下的限制
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TtRestriction {
    pub tx_stream: u8,
    pub rx_stream: u8,
    pub is_ht: bool,
}

/// 温控管理
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TtMgmt {
    pub advanced_tt: bool,
    pub state: u8,
    /// 按等级索引，仅高级温控使用
    pub restriction: Vec<TtRestriction>,
}

impl TtMgmt {
    pub fn current_restriction(&self) -> Option<&TtRestriction> {
        self.restriction.get(self.state as usize)
    }
}
