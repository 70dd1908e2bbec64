//! 驱动协作方接口
//!
//! 寄存器/片上内存访问、事件日志、统计请求、复位、看门狗等真正接触硬件的动作，
//! 由具体的总线/固件层实现。错误为负 errno。

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::result::Result;

/// 强制复位方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ResetMethod {
    Rf = 0,
    Fw = 1,
}

pub const IWL_RF_RESET: i64 = 0;
pub const IWL_FW_RESET: i64 = 1;
pub const IWL_MAX_FORCE_RESET: usize = 2;

impl ResetMethod {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            IWL_RF_RESET => Some(ResetMethod::Rf),
            IWL_FW_RESET => Some(ResetMethod::Fw),
            _ => None,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// txfifo 清空方式
pub const IWL_DROP_SINGLE: u32 = 0;
pub const IWL_DROP_SELECTED: u32 = 1;
pub const IWL_DROP_ALL: u32 = 2;

pub trait IwlOps: Send {
    /// 读片上内存一个 32 位字（地址 4 字节对齐）
    fn read_targ_mem(&self, addr: u32) -> u32;
    fn read32(&self, reg: u32) -> u32;
    /// 把固件事件日志写入 `out`
    fn dump_event_log(&self, out: &mut dyn fmt::Write) -> Result<(), i32>;
    /// 把 FH 寄存器快照写入 `out`
    fn dump_fh(&self, out: &mut dyn fmt::Write) -> Result<(), i32>;
    /// 事件日志直接打到控制台
    fn dump_event_log_to_console(&mut self);
    fn dump_csr(&mut self);
    fn send_statistics_request(&mut self, clear: bool) -> Result<(), i32>;
    fn force_reset(&mut self, method: ResetMethod) -> Result<(), i32>;
    /// 型号是否支持清空 txfifo；决定 txfifo_flush 端点是否出现
    fn supports_txfifo_flush(&self) -> bool;
    fn txfifo_flush(&mut self, mode: u32) -> Result<(), i32>;
    fn setup_watchdog(&mut self, timeout_ms: u32);
    fn set_ucode_trace_timer(&mut self, on: bool);
    fn power_update_mode(&mut self, force: bool) -> Result<(), i32>;
    /// 单调时钟 ms，用于复位节流
    fn now_ms(&self) -> u64;
}

/// 占位实现调用记录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpsCall {
    DumpEventLogToConsole,
    DumpCsr,
    SendStatisticsRequest { clear: bool },
    ForceReset(ResetMethod),
    TxfifoFlush(u32),
    SetupWatchdog(u32),
    SetUcodeTraceTimer(bool),
    PowerUpdateMode { force: bool },
}

/// 无硬件占位实现：内存与寄存器来自预置表，动作只记录不执行
#[derive(Debug, Default)]
pub struct IwlOpsStub {
    /// 按 4 字节对齐地址索引，未预置的地址读出 0
    pub targ_mem: BTreeMap<u32, u32>,
    pub regs: BTreeMap<u32, u32>,
    pub event_log: String,
    pub fh_dump: String,
    pub txfifo_flush_supported: bool,
    /// 非 None 时所有可失败的动作返回该 errno
    pub fail_with: Option<i32>,
    pub clock_ms: u64,
    pub calls: Vec<OpsCall>,
}

impl IwlOpsStub {
    /// 从 `base` 起按小端写入片上内存
    pub fn load_targ_mem(&mut self, base: u32, bytes: &[u8]) {
        for (i, chunk) in bytes.chunks(4).enumerate() {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            self.targ_mem
                .insert(base + 4 * i as u32, u32::from_le_bytes(word));
        }
    }

    fn act(&mut self, call: OpsCall) -> Result<(), i32> {
        log::debug!(target: "wireless::iwl", "IwlOpsStub {:?}", call);
        self.calls.push(call);
        match self.fail_with {
            Some(code) => Err(code),
            None => Ok(()),
        }
    }
}

impl IwlOps for IwlOpsStub {
    fn read_targ_mem(&self, addr: u32) -> u32 {
        self.targ_mem.get(&(addr & !0x3)).copied().unwrap_or(0)
    }

    fn read32(&self, reg: u32) -> u32 {
        self.regs.get(&reg).copied().unwrap_or(0)
    }

    fn dump_event_log(&self, out: &mut dyn fmt::Write) -> Result<(), i32> {
        if let Some(code) = self.fail_with {
            return Err(code);
        }
        out.write_str(&self.event_log).map_err(|_| -5)
    }

    fn dump_fh(&self, out: &mut dyn fmt::Write) -> Result<(), i32> {
        if let Some(code) = self.fail_with {
            return Err(code);
        }
        out.write_str(&self.fh_dump).map_err(|_| -5)
    }

    fn dump_event_log_to_console(&mut self) {
        let _ = self.act(OpsCall::DumpEventLogToConsole);
    }

    fn dump_csr(&mut self) {
        let _ = self.act(OpsCall::DumpCsr);
    }

    fn send_statistics_request(&mut self, clear: bool) -> Result<(), i32> {
        self.act(OpsCall::SendStatisticsRequest { clear })
    }

    fn force_reset(&mut self, method: ResetMethod) -> Result<(), i32> {
        self.act(OpsCall::ForceReset(method))
    }

    fn supports_txfifo_flush(&self) -> bool {
        self.txfifo_flush_supported
    }

    fn txfifo_flush(&mut self, mode: u32) -> Result<(), i32> {
        if !self.txfifo_flush_supported {
            return Err(-95);
        }
        self.act(OpsCall::TxfifoFlush(mode))
    }

    fn setup_watchdog(&mut self, timeout_ms: u32) {
        let _ = self.act(OpsCall::SetupWatchdog(timeout_ms));
    }

    fn set_ucode_trace_timer(&mut self, on: bool) {
        let _ = self.act(OpsCall::SetUcodeTraceTimer(on));
    }

    fn power_update_mode(&mut self, force: bool) -> Result<(), i32> {
        self.act(OpsCall::PowerUpdateMode { force })
    }

    fn now_ms(&self) -> u64 {
        self.clock_ms
    }
}
