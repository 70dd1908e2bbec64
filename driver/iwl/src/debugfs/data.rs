//! `data/` 目录：设备数据

use alloc::vec;
use alloc::vec::Vec;

use dbgfs::{BoundedWriter, Capacity, CommandToken, DbgfsError, DbgfsResult, Endpoint, CMD_TOKEN_WIDE_MAX};
use ieee80211::{Band, AC_NUM};

use super::{out, AltHex, MacAddr, DIR_DATA};
use crate::device::{IwlPriv, NvmDeviceType, SramWindow};
use crate::ops::IwlOps;
use crate::power::IWL_POWER_NUM;
use crate::status::{STATUS_GEO_CONFIGURED, STATUS_LABELS};
use crate::stats::{cmd_name, REPLY_MAX};

const PAGE_SIZE: usize = 4096;
const LOG_EVENT_BUFSZ: usize = 16 * 1024;

/// `base + per * n`；溢出时取 `usize::MAX`，申请缓冲时即报 `AllocationFailure`
fn scaled_capacity(base: usize, per: usize, n: usize) -> usize {
    per.checked_mul(n)
        .and_then(|v| v.checked_add(base))
        .unwrap_or(usize::MAX)
}

fn sram_capacity<O: IwlOps>(p: &IwlPriv<O>) -> usize {
    let len = usize::try_from(p.sram_window().1).unwrap_or(usize::MAX);
    scaled_capacity(50, 4, len)
}

pub(super) fn endpoints<O: IwlOps>() -> Vec<Endpoint<IwlPriv<O>>> {
    vec![
        Endpoint::read_only(DIR_DATA, "nvm", nvm_read::<O>, Capacity::Computed(|p: &IwlPriv<O>| {
            scaled_capacity(256, 4, p.cfg.eeprom_size)
        })),
        Endpoint::read_write(
            DIR_DATA,
            "sram",
            sram_read::<O>,
            sram_write::<O>,
            Capacity::Computed(sram_capacity::<O>),
        )
        .with_input_max(CMD_TOKEN_WIDE_MAX),
        Endpoint::read_write(
            DIR_DATA,
            "log_event",
            log_event_read::<O>,
            log_event_write::<O>,
            Capacity::Fixed(LOG_EVENT_BUFSZ),
        ),
        Endpoint::read_only(DIR_DATA, "stations", stations_read::<O>, Capacity::Computed(|p: &IwlPriv<O>| {
            30 + 500 * p.stations.num_stations()
        })),
        Endpoint::read_only(DIR_DATA, "channels", channels_read::<O>, Capacity::Fixed(PAGE_SIZE)),
        Endpoint::read_only(DIR_DATA, "status", status_read::<O>, Capacity::Fixed(512)),
        Endpoint::read_write(
            DIR_DATA,
            "interrupt",
            interrupt_read::<O>,
            interrupt_write::<O>,
            Capacity::Fixed(24 * 64),
        ),
        Endpoint::read_only(DIR_DATA, "qos", qos_read::<O>, Capacity::Computed(|p: &IwlPriv<O>| {
            256 * p.contexts.len()
        })),
        Endpoint::read_write(
            DIR_DATA,
            "sleep_level_override",
            sleep_level_override_read::<O>,
            sleep_level_override_write::<O>,
            Capacity::Fixed(10),
        ),
        Endpoint::read_only(
            DIR_DATA,
            "current_sleep_command",
            current_sleep_command_read::<O>,
            Capacity::Fixed(200),
        ),
        Endpoint::read_only(
            DIR_DATA,
            "thermal_throttling",
            thermal_throttling_read::<O>,
            Capacity::Fixed(100),
        ),
        Endpoint::read_write(
            DIR_DATA,
            "disable_ht40",
            disable_ht40_read::<O>,
            disable_ht40_write::<O>,
            Capacity::Fixed(100),
        ),
    ]
}

fn nvm_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    let len = p.cfg.eeprom_size;
    if len % 16 != 0 {
        log::error!(target: "wireless::iwl", "NVM size {} is not multiple of 16", len);
        return Err(DbgfsError::PreconditionError("NVM size is not multiple of 16"));
    }
    let Some(image) = p.eeprom.as_deref() else {
        log::error!(target: "wireless::iwl", "invalid EEPROM/OTP memory");
        return Err(DbgfsError::PreconditionError("EEPROM/OTP image not loaded"));
    };
    out!(
        w,
        "NVM Type: {}, version: 0x{:x}\n",
        match p.nvm_device_type {
            NvmDeviceType::Otp => "OTP",
            NvmDeviceType::Eeprom => "EEPROM",
        },
        p.eeprom_version().unwrap_or(0)
    );
    for ofs in (0..len).step_by(16) {
        out!(w, "0x{:04x} ", ofs);
        let end = (ofs + 16).min(image.len());
        w.hex_words(image.get(ofs..end).unwrap_or(&[]));
        w.push_str("\n");
    }
    Ok(())
}

fn sram_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    let (start, len, device_format) = p.sram_window();
    out!(w, "sram_len: 0x{:x}\n", len);
    out!(w, "sram_offset: 0x{:x}\n", start);

    // 只能按对齐的 32 位字读
    let mut offset = start & 0x3;
    let mut sram = start & !0x3;
    let mut val = p.ops.read_targ_mem(sram);
    let mut i = 0u32;
    for _ in 0..len {
        if w.is_truncated() {
            break;
        }
        if i == 0 {
            out!(w, "{:08X}: ", sram.wrapping_add(offset));
        }
        if device_format {
            out!(w, "{:02x}", (val >> (8 * (3 - offset))) & 0xff);
        } else {
            out!(w, "{:02x} ", (val >> (8 * offset)) & 0xff);
        }
        offset += 1;
        if offset == 4 {
            sram = sram.wrapping_add(4);
            offset = 0;
            val = p.ops.read_targ_mem(sram);
        }
        i += 1;
        if i == 16 {
            i = 0;
            w.push_str("\n");
        } else if i & 7 == 0 {
            w.push_str("   ");
        } else if i & 3 == 0 {
            w.push_str(" ");
        }
    }
    if i != 0 {
        w.push_str("\n");
    }
    Ok(())
}

/// `off,len` 设窗口；单个 `off` 读一个字；其他输入恢复默认窗口
fn sram_write<O: IwlOps>(p: &mut IwlPriv<O>, t: &CommandToken<'_>) -> DbgfsResult<()> {
    p.sram = if let Ok((offset, len)) = t.parse_hex_pair() {
        SramWindow::Range { offset, len }
    } else if let Ok(offset) = t.parse_hex() {
        SramWindow::Word { offset }
    } else {
        SramWindow::Default
    };
    log::debug!(target: "wireless::iwl", "sram window {:?}", p.sram);
    Ok(())
}

fn log_event_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    p.ops.dump_event_log(w).map_err(DbgfsError::Driver)
}

fn log_event_write<O: IwlOps>(p: &mut IwlPriv<O>, t: &CommandToken<'_>) -> DbgfsResult<()> {
    if t.parse_dec()? == 1 {
        p.ops.dump_event_log_to_console();
    }
    Ok(())
}

fn stations_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    out!(w, "num of stations: {}\n\n", p.stations.num_stations());
    for (i, sta) in p.stations.iter_used() {
        out!(
            w,
            "station {} - addr: {}, flags: {}\n",
            i,
            MacAddr(&sta.addr),
            AltHex(sta.station_flags_msk as u64, 0)
        );
        w.push_str("TID\tseq_num\ttxq_id\tframes\ttfds\t");
        w.push_str("start_idx\tbitmap\t\t\trate_n_flags\n");
        for (j, tid) in sta.tid.iter().enumerate() {
            out!(
                w,
                "{}:\t{}\t{}\t{}\t{}\t{}\t\t{}\t{}",
                j,
                AltHex(tid.seq_number as u64, 0),
                AltHex(tid.agg.txq_id as u64, 0),
                tid.agg.frame_count,
                tid.tfds_in_queue,
                tid.agg.start_idx,
                AltHex(tid.agg.bitmap, 16),
                AltHex(tid.agg.rate_n_flags as u64, 0)
            );
            if tid.agg.wait_for_ba {
                w.push_str(" - waitforba");
            }
            w.push_str("\n");
        }
        w.push_str("\n");
    }
    Ok(())
}

fn channels_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    if !p.status.test(STATUS_GEO_CONFIGURED) {
        return Err(DbgfsError::PreconditionError("geography not configured"));
    }
    for (band, title) in [
        (Band::TwoGhz, "2.4GHz band 802.11bg):"),
        (Band::FiveGhz, "5.2GHz band (802.11a)"),
    ] {
        let Some(supp) = p.hw_mode(band) else {
            continue;
        };
        out!(w, "Displaying {} channels in {}\n", supp.channels.len(), title);
        for ch in supp.channels.iter() {
            out!(
                w,
                "{}: {}dBm: BSS{}{}, {}.\n",
                ch.hw_value,
                ch.max_power,
                if ch.is_radar() { " (IEEE 802.11h required)" } else { "" },
                if ch.allows_ibss() { ", IBSS" } else { "" },
                if ch.is_passive() { "passive only" } else { "active/passive" }
            );
        }
    }
    Ok(())
}

fn status_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    for (bit, label) in STATUS_LABELS {
        out!(w, "{} {}\n", label, p.status.test(bit) as u8);
    }
    Ok(())
}

fn interrupt_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    let isr = &p.isr_stats;
    w.push_str("Interrupt Statistics Report:\n");
    out!(w, "HW Error:\t\t\t {}\n", isr.hw);
    out!(w, "SW Error:\t\t\t {}\n", isr.sw);
    if isr.sw != 0 || isr.hw != 0 {
        out!(w, "\tLast Restarting Code:  0x{:X}\n", isr.err_code);
    }
    out!(w, "Frame transmitted:\t\t {}\n", isr.sch);
    out!(w, "Alive interrupt:\t\t {}\n", isr.alive);
    out!(w, "HW RF KILL switch toggled:\t {}\n", isr.rfkill);
    out!(w, "CT KILL:\t\t\t {}\n", isr.ctkill);
    out!(w, "Wakeup Interrupt:\t\t {}\n", isr.wakeup);
    out!(w, "Rx command responses:\t\t {}\n", isr.rx);
    for cmd in 0..REPLY_MAX {
        let n = isr.rx_handlers[cmd];
        if n > 0 {
            out!(w, "\tRx handler[{:>36}]:\t\t {}\n", cmd_name(cmd as u8), n);
        }
    }
    out!(w, "Tx/FH interrupt:\t\t {}\n", isr.tx);
    out!(w, "Unexpected INTA:\t\t {}\n", isr.unhandled);
    Ok(())
}

/// 十六进制 0 清空中断统计，其他值忽略
fn interrupt_write<O: IwlOps>(p: &mut IwlPriv<O>, t: &CommandToken<'_>) -> DbgfsResult<()> {
    if t.parse_hex()? == 0 {
        p.clear_isr_stats();
    }
    Ok(())
}

fn qos_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    for ctx in p.contexts.iter() {
        out!(w, "context {}:\n", ctx.ctxid);
        for (i, ac) in ctx.qos.iter().enumerate().take(AC_NUM) {
            w.push_str("\tcw_min\tcw_max\taifsn\ttxop\n");
            out!(w, "AC[{}]\t{}\t{}\t{}\t{}\n", i, ac.cw_min, ac.cw_max, ac.aifsn, ac.edca_txop);
        }
        w.push_str("\n");
    }
    Ok(())
}

fn thermal_throttling_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    let tt = &p.thermal_throttle;
    out!(
        w,
        "Thermal Throttling Mode: {}\n",
        if tt.advanced_tt { "Advance" } else { "Legacy" }
    );
    out!(w, "Thermal Throttling State: {}\n", tt.state);
    if tt.advanced_tt {
        if let Some(r) = tt.current_restriction() {
            out!(w, "Tx mode: {}\n", r.tx_stream);
            out!(w, "Rx mode: {}\n", r.rx_stream);
            out!(w, "HT mode: {}\n", r.is_ht as u8);
        }
    }
    Ok(())
}

fn disable_ht40_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    out!(
        w,
        "11n 40MHz Mode: {}\n",
        if p.disable_ht40 { "Disabled" } else { "Enabled" }
    );
    Ok(())
}

fn disable_ht40_write<O: IwlOps>(p: &mut IwlPriv<O>, t: &CommandToken<'_>) -> DbgfsResult<()> {
    let ht40 = t.parse_dec()?;
    if p.is_any_associated() {
        log::error!(
            target: "wireless::iwl",
            "Sta associated with AP - Change to 40MHz channel support is not allowed"
        );
        return Err(DbgfsError::PreconditionError("associated with AP"));
    }
    p.disable_ht40 = ht40 != 0;
    Ok(())
}

/// 对外以 1 起计，内部以 0 起计；-1 取消覆盖
fn sleep_level_override_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    let mut value = p.power_data.debug_sleep_level_override;
    if value >= 0 {
        value += 1;
    }
    out!(w, "{}\n", value);
    Ok(())
}

fn sleep_level_override_write<O: IwlOps>(p: &mut IwlPriv<O>, t: &CommandToken<'_>) -> DbgfsResult<()> {
    let mut value = t.parse_dec()?;
    if value == 0 {
        return Err(DbgfsError::RangeError);
    } else if value > 0 {
        value -= 1;
    }
    if value != -1 && !(0..IWL_POWER_NUM as i64).contains(&value) {
        return Err(DbgfsError::RangeError);
    }
    if !p.is_ready_rf() {
        return Err(DbgfsError::PreconditionError("device not ready or rf killed"));
    }
    let prev = p.power_data.debug_sleep_level_override;
    p.power_data.debug_sleep_level_override = value as i32;
    if let Err(code) = p.ops.power_update_mode(true) {
        p.power_data.debug_sleep_level_override = prev;
        return Err(DbgfsError::Driver(code));
    }
    Ok(())
}

fn current_sleep_command_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    let cmd = &p.power_data.sleep_cmd;
    out!(w, "flags: {}\n", AltHex(cmd.flags as u64, 2));
    out!(w, "RX/TX timeout: {}/{} usec\n", cmd.rx_data_timeout, cmd.tx_data_timeout);
    for (i, v) in cmd.sleep_interval.iter().enumerate() {
        out!(w, "sleep_interval[{}]: {}\n", i, v);
    }
    Ok(())
}
