//! # ieee80211 — IEEE 802.11 帧与信道定义
//!
//! 驱动与调试文件系统共用的最小子集：
//!
//! | 内容 | 说明 |
//! |------|------|
//! | 帧控制 | frame_control 解析，管理/控制/数据帧判定 |
//! | 帧分类 | 统计用的管理帧 (12 类) 与控制帧 (8 类) 表及其名字 |
//! | 信道 | 频段、信道号、最大功率、信道标志 |

#![no_std]

pub mod ieee80211;

pub use ieee80211::{
    chan_flags, classify, frame_control, Band, Channel, CtrlFrame, FrameClass, MgmtFrame, AC_NUM,
    CONTROL_MAX, MANAGEMENT_MAX,
};
