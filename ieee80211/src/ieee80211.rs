//! IEEE 802.11 类型与常量
//!
//! 帧控制字段的分类、管理/控制帧子类型表、频段与信道描述。

/// 频段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Band {
    #[default]
    TwoGhz = 0,
    FiveGhz = 1,
}

/// 信道标志
pub mod chan_flags {
    pub const DISABLED: u32 = 1 << 0;
    pub const PASSIVE_SCAN: u32 = 1 << 1;
    pub const NO_IBSS: u32 = 1 << 2;
    pub const RADAR: u32 = 1 << 3;
}

/// 信道
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    /// 中心频率 MHz
    pub center_freq: u32,
    pub band: Band,
    /// 硬件信道号
    pub hw_value: u16,
    /// 最大功率 dBm
    pub max_power: i8,
    /// `chan_flags::*`
    pub flags: u32,
}

impl Channel {
    pub const fn new_2g(hw_value: u16, max_power: i8, flags: u32) -> Self {
        Self {
            center_freq: 2407 + 5 * hw_value as u32,
            band: Band::TwoGhz,
            hw_value,
            max_power,
            flags,
        }
    }

    pub const fn new_5g(hw_value: u16, max_power: i8, flags: u32) -> Self {
        Self {
            center_freq: 5000 + 5 * hw_value as u32,
            band: Band::FiveGhz,
            hw_value,
            max_power,
            flags,
        }
    }

    #[inline]
    pub fn is_radar(&self) -> bool {
        self.flags & chan_flags::RADAR != 0
    }

    #[inline]
    pub fn is_passive(&self) -> bool {
        self.flags & chan_flags::PASSIVE_SCAN != 0
    }

    /// 允许 IBSS：既未禁止 IBSS 也不需要雷达检测
    #[inline]
    pub fn allows_ibss(&self) -> bool {
        self.flags & (chan_flags::NO_IBSS | chan_flags::RADAR) == 0
    }
}

/// 帧控制字段掩码
pub mod fc {
    pub const FTYPE: u16 = 0x000C;
    pub const STYPE: u16 = 0x00F0;
    pub const TYPE_MGMT: u16 = 0x0000;
    pub const TYPE_CTL: u16 = 0x0004;
    pub const TYPE_DATA: u16 = 0x0008;
}

/// 从帧取 frame_control（前 2 字节，little-endian）
#[inline]
pub fn frame_control(buf: &[u8]) -> u16 {
    if buf.len() >= 2 {
        u16::from_le_bytes([buf[0], buf[1]])
    } else {
        0
    }
}

#[inline]
pub fn is_mgmt(fc: u16) -> bool {
    (fc & fc::FTYPE) == fc::TYPE_MGMT
}

#[inline]
pub fn is_ctl(fc: u16) -> bool {
    (fc & fc::FTYPE) == fc::TYPE_CTL
}

#[inline]
pub fn is_data(fc: u16) -> bool {
    (fc & fc::FTYPE) == fc::TYPE_DATA
}

/// 子类型编号 0..=15
#[inline]
pub fn subtype(fc: u16) -> u8 {
    ((fc & fc::STYPE) >> 4) as u8
}

/// 统计用的管理帧分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MgmtFrame {
    AssocReq = 0,
    AssocResp,
    ReassocReq,
    ReassocResp,
    ProbeReq,
    ProbeResp,
    Beacon,
    Atim,
    Disassoc,
    Auth,
    Deauth,
    Action,
}

pub const MANAGEMENT_MAX: usize = 12;

impl MgmtFrame {
    pub const ALL: [MgmtFrame; MANAGEMENT_MAX] = [
        MgmtFrame::AssocReq,
        MgmtFrame::AssocResp,
        MgmtFrame::ReassocReq,
        MgmtFrame::ReassocResp,
        MgmtFrame::ProbeReq,
        MgmtFrame::ProbeResp,
        MgmtFrame::Beacon,
        MgmtFrame::Atim,
        MgmtFrame::Disassoc,
        MgmtFrame::Auth,
        MgmtFrame::Deauth,
        MgmtFrame::Action,
    ];

    /// 按帧控制字段的子类型分类；保留子类型返回 None
    pub fn from_subtype(stype: u8) -> Option<Self> {
        Some(match stype {
            0 => MgmtFrame::AssocReq,
            1 => MgmtFrame::AssocResp,
            2 => MgmtFrame::ReassocReq,
            3 => MgmtFrame::ReassocResp,
            4 => MgmtFrame::ProbeReq,
            5 => MgmtFrame::ProbeResp,
            8 => MgmtFrame::Beacon,
            9 => MgmtFrame::Atim,
            10 => MgmtFrame::Disassoc,
            11 => MgmtFrame::Auth,
            12 => MgmtFrame::Deauth,
            13 => MgmtFrame::Action,
            _ => return None,
        })
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            MgmtFrame::AssocReq => "MANAGEMENT_ASSOC_REQ",
            MgmtFrame::AssocResp => "MANAGEMENT_ASSOC_RESP",
            MgmtFrame::ReassocReq => "MANAGEMENT_REASSOC_REQ",
            MgmtFrame::ReassocResp => "MANAGEMENT_REASSOC_RESP",
            MgmtFrame::ProbeReq => "MANAGEMENT_PROBE_REQ",
            MgmtFrame::ProbeResp => "MANAGEMENT_PROBE_RESP",
            MgmtFrame::Beacon => "MANAGEMENT_BEACON",
            MgmtFrame::Atim => "MANAGEMENT_ATIM",
            MgmtFrame::Disassoc => "MANAGEMENT_DISASSOC",
            MgmtFrame::Auth => "MANAGEMENT_AUTH",
            MgmtFrame::Deauth => "MANAGEMENT_DEAUTH",
            MgmtFrame::Action => "MANAGEMENT_ACTION",
        }
    }
}

/// 统计用的控制帧分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CtrlFrame {
    BackReq = 0,
    Back,
    PsPoll,
    Rts,
    Cts,
    Ack,
    CfEnd,
    CfEndAck,
}

pub const CONTROL_MAX: usize = 8;

impl CtrlFrame {
    pub const ALL: [CtrlFrame; CONTROL_MAX] = [
        CtrlFrame::BackReq,
        CtrlFrame::Back,
        CtrlFrame::PsPoll,
        CtrlFrame::Rts,
        CtrlFrame::Cts,
        CtrlFrame::Ack,
        CtrlFrame::CfEnd,
        CtrlFrame::CfEndAck,
    ];

    /// 子类型 8..=15 依次对应 BACK_REQ..CFENDACK
    pub fn from_subtype(stype: u8) -> Option<Self> {
        match stype {
            8..=15 => Some(Self::ALL[(stype - 8) as usize]),
            _ => None,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            CtrlFrame::BackReq => "CONTROL_BACK_REQ",
            CtrlFrame::Back => "CONTROL_BACK",
            CtrlFrame::PsPoll => "CONTROL_PSPOLL",
            CtrlFrame::Rts => "CONTROL_RTS",
            CtrlFrame::Cts => "CONTROL_CTS",
            CtrlFrame::Ack => "CONTROL_ACK",
            CtrlFrame::CfEnd => "CONTROL_CFEND",
            CtrlFrame::CfEndAck => "CONTROL_CFENDACK",
        }
    }
}

/// 一帧的统计分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameClass {
    Mgmt(MgmtFrame),
    Ctrl(CtrlFrame),
    Data,
    /// 保留类型或保留子类型
    Other,
}

pub fn classify(fc: u16) -> FrameClass {
    let stype = subtype(fc);
    if is_mgmt(fc) {
        MgmtFrame::from_subtype(stype).map_or(FrameClass::Other, FrameClass::Mgmt)
    } else if is_ctl(fc) {
        CtrlFrame::from_subtype(stype).map_or(FrameClass::Other, FrameClass::Ctrl)
    } else if is_data(fc) {
        FrameClass::Data
    } else {
        FrameClass::Other
    }
}

/// WMM 接入类别数
pub const AC_NUM: usize = 4;
