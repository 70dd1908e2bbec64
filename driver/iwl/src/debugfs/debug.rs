//! `debug/` 目录：流量统计、队列、复位、校准与阈值

use alloc::vec;
use alloc::vec::Vec;

use dbgfs::{BoundedWriter, Capacity, CommandToken, DbgfsError, DbgfsResult, Endpoint, IntDomain};
use ieee80211::{CtrlFrame, MgmtFrame, AC_NUM, CONTROL_MAX, MANAGEMENT_MAX};

use super::{out, AltHex, DIR_DEBUG};
use crate::cfgfile::{MAX_PLCP_ERR_THRESHOLD_DISABLE, MAX_PLCP_ERR_THRESHOLD_MAX, MAX_PLCP_ERR_THRESHOLD_MIN};
use crate::device::*;
use crate::ops::{IwlOps, ResetMethod, IWL_DROP_ALL, IWL_MAX_FORCE_RESET};
use crate::power::*;
use crate::queue::{TrafficLog, IWL_DL_RX, IWL_DL_TX, IWL_TRAFFIC_ENTRIES, IWL_TRAFFIC_ENTRY_SIZE};
use crate::stats::*;

const MISSED_BEACON: IntDomain = IntDomain::or_default(
    IWL_MISSED_BEACON_THRESHOLD_MIN as i64,
    IWL_MISSED_BEACON_THRESHOLD_MAX as i64,
    IWL_MISSED_BEACON_THRESHOLD_DEF as i64,
);
const PLCP_DELTA: IntDomain = IntDomain::or_default(
    MAX_PLCP_ERR_THRESHOLD_MIN as i64,
    MAX_PLCP_ERR_THRESHOLD_MAX as i64,
    MAX_PLCP_ERR_THRESHOLD_DISABLE as i64,
);
const WD_TIMEOUT: IntDomain = IntDomain::or_default(0, MAX_WD_TIMEOUT as i64, DEF_WD_TIMEOUT as i64);

/// 流量日志一行：`0x%04x ` + 8 组十六进制 + 换行
const TRAFFIC_LINE: usize = 48;

pub(super) fn endpoints<O: IwlOps>() -> Vec<Endpoint<IwlPriv<O>>> {
    vec![
        Endpoint::read_only(
            DIR_DEBUG,
            "rx_statistics",
            rx_statistics_read::<O>,
            Capacity::Fixed(100 + 50 * (MANAGEMENT_MAX + CONTROL_MAX)),
        ),
        Endpoint::read_only(
            DIR_DEBUG,
            "tx_statistics",
            tx_statistics_read::<O>,
            Capacity::Fixed(100 + 50 * (MANAGEMENT_MAX + CONTROL_MAX)),
        ),
        Endpoint::read_write(
            DIR_DEBUG,
            "traffic_log",
            traffic_log_read::<O>,
            traffic_log_write::<O>,
            Capacity::Computed(traffic_log_capacity::<O>),
        ),
        Endpoint::read_only(DIR_DEBUG, "rx_queue", rx_queue_read::<O>, Capacity::Fixed(256)),
        Endpoint::read_only(DIR_DEBUG, "tx_queue", tx_queue_read::<O>, Capacity::Computed(|p: &IwlPriv<O>| {
            64 * p.txq.as_ref().map_or(0, |q| q.len()) + 32 * AC_NUM
        })),
        Endpoint::read_only(
            DIR_DEBUG,
            "power_save_status",
            power_save_status_read::<O>,
            Capacity::Fixed(60),
        ),
        Endpoint::write_only(DIR_DEBUG, "clear_ucode_statistics", clear_ucode_statistics_write::<O>),
        Endpoint::write_only(DIR_DEBUG, "clear_traffic_statistics", clear_traffic_statistics_write::<O>),
        Endpoint::write_only(DIR_DEBUG, "csr", csr_write::<O>),
        Endpoint::read_only(DIR_DEBUG, "fh_reg", fh_reg_read::<O>, Capacity::Fixed(1024)),
        Endpoint::read_write(
            DIR_DEBUG,
            "missed_beacon",
            missed_beacon_read::<O>,
            missed_beacon_write::<O>,
            Capacity::Fixed(12),
        ),
        Endpoint::read_write(
            DIR_DEBUG,
            "plcp_delta",
            plcp_delta_read::<O>,
            plcp_delta_write::<O>,
            Capacity::Fixed(12),
        ),
        Endpoint::read_write(
            DIR_DEBUG,
            "force_reset",
            force_reset_read::<O>,
            force_reset_write::<O>,
            Capacity::Fixed(300),
        ),
        Endpoint::write_only(DIR_DEBUG, "txfifo_flush", txfifo_flush_write::<O>)
            .when(|p: &IwlPriv<O>| p.ops.supports_txfifo_flush()),
        Endpoint::read_write(
            DIR_DEBUG,
            "protection_mode",
            protection_mode_read::<O>,
            protection_mode_write::<O>,
            Capacity::Fixed(40),
        ),
        Endpoint::read_only(DIR_DEBUG, "sensitivity", sensitivity_read::<O>, Capacity::Fixed(1024)),
        Endpoint::read_only(DIR_DEBUG, "chain_noise", chain_noise_read::<O>, Capacity::Fixed(512)),
        Endpoint::read_write(
            DIR_DEBUG,
            "ucode_tracing",
            ucode_tracing_read::<O>,
            ucode_tracing_write::<O>,
            Capacity::Fixed(128),
        ),
        Endpoint::read_only(DIR_DEBUG, "rxon_flags", rxon_flags_read::<O>, Capacity::Fixed(20)),
        Endpoint::read_only(
            DIR_DEBUG,
            "rxon_filter_flags",
            rxon_filter_flags_read::<O>,
            Capacity::Fixed(20),
        ),
        Endpoint::write_only(DIR_DEBUG, "wd_timeout", wd_timeout_write::<O>),
        Endpoint::read_only(DIR_DEBUG, "bt_traffic", bt_traffic_read::<O>, Capacity::Fixed(200))
            .when(|p: &IwlPriv<O>| p.advanced_bt_coexist()),
    ]
}

fn traffic_stats(w: &mut BoundedWriter, stats: &TrafficStats, ctrl_heading: &str) {
    w.push_str("Management:\n");
    for f in MgmtFrame::ALL {
        out!(w, "\t{:>25}\t\t: {}\n", f.name(), stats.mgmt[f.index()]);
    }
    w.push_str(ctrl_heading);
    for f in CtrlFrame::ALL {
        out!(w, "\t{:>25}\t\t: {}\n", f.name(), stats.ctrl[f.index()]);
    }
    w.push_str("Data:\n");
    out!(w, "\tcnt: {}\n", stats.data_cnt);
    out!(w, "\tbytes: {}\n", stats.data_bytes);
}

fn rx_statistics_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    traffic_stats(w, &p.rx_stats, "Control:\n");
    Ok(())
}

// 发送侧的控制帧标题没有冒号，保持原样
fn tx_statistics_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    traffic_stats(w, &p.tx_stats, "Control\n");
    Ok(())
}

fn traffic_dump_enabled<O>(p: &IwlPriv<O>, log: &Option<TrafficLog>, level: u32) -> bool {
    log.is_some() && p.debug_level & level != 0
}

fn traffic_log_capacity<O: IwlOps>(p: &IwlPriv<O>) -> usize {
    let dump = 32 + IWL_TRAFFIC_ENTRIES * (IWL_TRAFFIC_ENTRY_SIZE / 16) * TRAFFIC_LINE;
    let mut cap = 128 + 64 * p.txq.as_ref().map_or(0, |q| q.len());
    if traffic_dump_enabled(p, &p.tx_traffic, IWL_DL_TX) {
        cap += dump;
    }
    if traffic_dump_enabled(p, &p.rx_traffic, IWL_DL_RX) {
        cap += dump;
    }
    cap
}

fn traffic_dump(w: &mut BoundedWriter, heading: &str, log: &TrafficLog) {
    out!(w, "{} Traffic idx: {}\n", heading, log.idx);
    for (i, line) in log.data.chunks(16).enumerate() {
        if w.is_truncated() {
            break;
        }
        out!(w, "0x{:04x} ", i * 16);
        w.hex_words(line);
        w.push_str("\n");
    }
}

fn traffic_log_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    let Some(txq) = p.txq.as_deref() else {
        log::error!(target: "wireless::iwl", "txq not ready");
        return Err(DbgfsError::PreconditionError("txq not ready"));
    };
    w.push_str("Tx Queue\n");
    for (i, q) in txq.iter().enumerate() {
        out!(w, "q[{}]: read_ptr: {}, write_ptr: {}\n", i, q.read_ptr, q.write_ptr);
    }
    if let Some(log) = p.tx_traffic.as_ref().filter(|_| p.debug_level & IWL_DL_TX != 0) {
        traffic_dump(w, "Tx", log);
    }
    w.push_str("Rx Queue\n");
    out!(w, "read: {}, write: {}\n", p.rxq.read, p.rxq.write);
    if let Some(log) = p.rx_traffic.as_ref().filter(|_| p.debug_level & IWL_DL_RX != 0) {
        traffic_dump(w, "Rx", log);
    }
    Ok(())
}

fn traffic_log_write<O: IwlOps>(p: &mut IwlPriv<O>, t: &CommandToken<'_>) -> DbgfsResult<()> {
    if t.parse_dec()? == 0 {
        p.reset_traffic_log();
    }
    Ok(())
}

fn rx_queue_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    let rxq = &p.rxq;
    out!(w, "read: {}\n", rxq.read);
    out!(w, "write: {}\n", rxq.write);
    out!(w, "free_count: {}\n", rxq.free_count);
    match rxq.closed_rb_num {
        Some(n) => out!(w, "closed_rb_num: {}\n", n & 0x0fff),
        None => w.push_str("closed_rb_num: Not Allocated\n"),
    }
    Ok(())
}

fn tx_queue_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    let Some(txq) = p.txq.as_deref() else {
        log::error!(target: "wireless::iwl", "txq not ready");
        return Err(DbgfsError::PreconditionError("txq not ready"));
    };
    for (i, q) in txq.iter().enumerate() {
        out!(
            w,
            "hwq {:02}: read={} write={} stop={} swq_id={} (ac {}/hwq {})\n",
            i,
            q.read_ptr,
            q.write_ptr,
            q.stopped as u8,
            AltHex(q.swq_id as u64, 2),
            q.ac(),
            q.hwq()
        );
        // AC 队列另外显示停止计数
        if let Some(n) = p.queue_stop_count.get(i) {
            out!(w, "        stop-count: {}\n", n);
        }
    }
    Ok(())
}

fn power_save_status_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    let status = p.ops.read32(CSR_GP_CNTRL) & CSR_GP_REG_POWER_SAVE_STATUS_MSK;
    w.push_str("Power Save Status: ");
    w.push_str(match status {
        CSR_GP_REG_NO_POWER_SAVE => "none\n",
        CSR_GP_REG_MAC_POWER_SAVE => "MAC\n",
        CSR_GP_REG_PHY_POWER_SAVE => "PHY\n",
        _ => "error\n",
    });
    Ok(())
}

fn clear_ucode_statistics_write<O: IwlOps>(p: &mut IwlPriv<O>, t: &CommandToken<'_>) -> DbgfsResult<()> {
    t.parse_dec()?;
    p.ops.send_statistics_request(true).map_err(DbgfsError::Driver)
}

fn clear_traffic_statistics_write<O: IwlOps>(p: &mut IwlPriv<O>, t: &CommandToken<'_>) -> DbgfsResult<()> {
    t.parse_hex()?;
    p.clear_traffic_stats();
    Ok(())
}

fn csr_write<O: IwlOps>(p: &mut IwlPriv<O>, t: &CommandToken<'_>) -> DbgfsResult<()> {
    t.parse_dec()?;
    p.ops.dump_csr();
    Ok(())
}

fn fh_reg_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    p.ops.dump_fh(w).map_err(DbgfsError::Driver)
}

fn missed_beacon_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    out!(w, "{}\n", p.missed_beacon_threshold);
    Ok(())
}

fn missed_beacon_write<O: IwlOps>(p: &mut IwlPriv<O>, t: &CommandToken<'_>) -> DbgfsResult<()> {
    p.missed_beacon_threshold = MISSED_BEACON.apply(t.parse_dec()?)? as u32;
    Ok(())
}

fn plcp_delta_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    out!(w, "{}\n", p.cfg.plcp_delta_threshold);
    Ok(())
}

fn plcp_delta_write<O: IwlOps>(p: &mut IwlPriv<O>, t: &CommandToken<'_>) -> DbgfsResult<()> {
    p.cfg.plcp_delta_threshold = PLCP_DELTA.apply(t.parse_dec()?)? as u32;
    Ok(())
}

fn force_reset_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    for (i, fr) in p.force_reset.iter().enumerate().take(IWL_MAX_FORCE_RESET) {
        out!(w, "Force reset method {}\n", i);
        out!(w, "\tnumber of reset request: {}\n", fr.reset_request_count);
        out!(w, "\tnumber of reset request success: {}\n", fr.reset_success_count);
        out!(w, "\tnumber of reset request reject: {}\n", fr.reset_reject_count);
        out!(w, "\treset duration: {}\n", fr.reset_duration_ms);
    }
    Ok(())
}

fn force_reset_write<O: IwlOps>(p: &mut IwlPriv<O>, t: &CommandToken<'_>) -> DbgfsResult<()> {
    let method = ResetMethod::from_code(t.parse_dec()?).ok_or(DbgfsError::RangeError)?;
    p.force_reset(method, true).map_err(DbgfsError::Driver)
}

fn txfifo_flush_write<O: IwlOps>(p: &mut IwlPriv<O>, t: &CommandToken<'_>) -> DbgfsResult<()> {
    t.parse_dec()?;
    if p.is_rfkill() {
        return Err(DbgfsError::PreconditionError("rf killed"));
    }
    p.ops.txfifo_flush(IWL_DROP_ALL).map_err(DbgfsError::Driver)
}

fn protection_mode_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    match p.cfg.ht_params {
        Some(ht) => out!(
            w,
            "use {} for aggregation\n",
            if ht.use_rts_for_aggregation { "rts/cts" } else { "cts-to-self" }
        ),
        None => w.push_str("N/A"),
    }
    Ok(())
}

fn protection_mode_write<O: IwlOps>(p: &mut IwlPriv<O>, t: &CommandToken<'_>) -> DbgfsResult<()> {
    let Some(ht) = p.cfg.ht_params.as_mut() else {
        return Err(DbgfsError::UnsupportedOperation);
    };
    ht.use_rts_for_aggregation = t.parse_dec()? != 0;
    Ok(())
}

fn sensitivity_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    let Some(d) = p.sensitivity_data.as_ref() else {
        w.push_str("not available\n");
        return Ok(());
    };
    out!(w, "auto_corr_ofdm:\t\t\t {}\n", d.auto_corr_ofdm);
    out!(w, "auto_corr_ofdm_mrc:\t\t {}\n", d.auto_corr_ofdm_mrc);
    out!(w, "auto_corr_ofdm_x1:\t\t {}\n", d.auto_corr_ofdm_x1);
    out!(w, "auto_corr_ofdm_mrc_x1:\t\t {}\n", d.auto_corr_ofdm_mrc_x1);
    out!(w, "auto_corr_cck:\t\t\t {}\n", d.auto_corr_cck);
    out!(w, "auto_corr_cck_mrc:\t\t {}\n", d.auto_corr_cck_mrc);
    out!(w, "last_bad_plcp_cnt_ofdm:\t\t {}\n", d.last_bad_plcp_cnt_ofdm);
    out!(w, "last_fa_cnt_ofdm:\t\t {}\n", d.last_fa_cnt_ofdm);
    out!(w, "last_bad_plcp_cnt_cck:\t\t {}\n", d.last_bad_plcp_cnt_cck);
    out!(w, "last_fa_cnt_cck:\t\t {}\n", d.last_fa_cnt_cck);
    out!(w, "nrg_curr_state:\t\t\t {}\n", d.nrg_curr_state);
    out!(w, "nrg_prev_state:\t\t\t {}\n", d.nrg_prev_state);
    w.push_str("nrg_value:\t\t\t");
    for v in d.nrg_value.iter() {
        out!(w, " {}", v);
    }
    w.push_str("\n");
    w.push_str("nrg_silence_rssi:\t\t");
    for v in d.nrg_silence_rssi.iter() {
        out!(w, " {}", v);
    }
    w.push_str("\n");
    out!(w, "nrg_silence_ref:\t\t {}\n", d.nrg_silence_ref);
    out!(w, "nrg_energy_idx:\t\t\t {}\n", d.nrg_energy_idx);
    out!(w, "nrg_silence_idx:\t\t {}\n", d.nrg_silence_idx);
    out!(w, "nrg_th_cck:\t\t\t {}\n", d.nrg_th_cck);
    out!(w, "nrg_auto_corr_silence_diff:\t {}\n", d.nrg_auto_corr_silence_diff);
    out!(w, "num_in_cck_no_fa:\t\t {}\n", d.num_in_cck_no_fa);
    out!(w, "nrg_th_ofdm:\t\t\t {}\n", d.nrg_th_ofdm);
    Ok(())
}

fn chain_noise_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    let Some(d) = p.chain_noise_data.as_ref() else {
        w.push_str("not available\n");
        return Ok(());
    };
    out!(w, "active_chains:\t\t\t {}\n", d.active_chains);
    out!(w, "chain_noise_a:\t\t\t {}\n", d.chain_noise_a);
    out!(w, "chain_noise_b:\t\t\t {}\n", d.chain_noise_b);
    out!(w, "chain_noise_c:\t\t\t {}\n", d.chain_noise_c);
    out!(w, "chain_signal_a:\t\t\t {}\n", d.chain_signal_a);
    out!(w, "chain_signal_b:\t\t\t {}\n", d.chain_signal_b);
    out!(w, "chain_signal_c:\t\t\t {}\n", d.chain_signal_c);
    out!(w, "beacon_count:\t\t\t {}\n", d.beacon_count);
    w.push_str("disconn_array:\t\t\t");
    for v in d.disconn_array.iter() {
        out!(w, " {}", v);
    }
    w.push_str("\n");
    w.push_str("delta_gain_code:\t\t");
    for v in d.delta_gain_code.iter() {
        out!(w, " {}", v);
    }
    w.push_str("\n");
    out!(w, "radio_write:\t\t\t {}\n", d.radio_write);
    out!(w, "state:\t\t\t\t {}\n", d.state);
    Ok(())
}

fn ucode_tracing_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    let ev = &p.event_log;
    out!(w, "ucode trace timer is {}\n", if ev.ucode_trace { "On" } else { "Off" });
    out!(w, "non_wraps_count:\t\t {}\n", ev.non_wraps_count);
    out!(w, "wraps_once_count:\t\t {}\n", ev.wraps_once_count);
    out!(w, "wraps_more_count:\t\t {}\n", ev.wraps_more_count);
    Ok(())
}

fn ucode_tracing_write<O: IwlOps>(p: &mut IwlPriv<O>, t: &CommandToken<'_>) -> DbgfsResult<()> {
    let on = t.parse_dec()? != 0;
    p.event_log.ucode_trace = on;
    p.ops.set_ucode_trace_timer(on);
    Ok(())
}

fn bss_context<O>(p: &IwlPriv<O>) -> DbgfsResult<&RxonContext> {
    p.contexts
        .get(IWL_RXON_CTX_BSS)
        .ok_or(DbgfsError::PreconditionError("no BSS context"))
}

fn rxon_flags_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    out!(w, "0x{:04X}\n", bss_context(p)?.active_flags);
    Ok(())
}

fn rxon_filter_flags_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    out!(w, "0x{:04X}\n", bss_context(p)?.active_filter_flags);
    Ok(())
}

fn wd_timeout_write<O: IwlOps>(p: &mut IwlPriv<O>, t: &CommandToken<'_>) -> DbgfsResult<()> {
    let timeout = WD_TIMEOUT.apply(t.parse_dec()?)? as u32;
    p.cfg.wd_timeout = timeout;
    p.ops.setup_watchdog(timeout);
    Ok(())
}

fn bt_traffic_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    let bt = match p.bt {
        Some(bt) if bt.enable_flag != 0 => bt,
        _ => {
            w.push_str("BT coex disabled\n");
            return Ok(());
        }
    };
    out!(w, "BT enable flag: 0x{:x}\n", bt.enable_flag);
    out!(
        w,
        "BT in {} mode\n",
        if bt.full_concurrent { "full concurrency" } else { "3-wire" }
    );
    out!(
        w,
        "BT status: {}, last traffic notif: {}\n",
        if bt.status { "On" } else { "Off" },
        bt.last_traffic_load
    );
    out!(
        w,
        "ch_announcement: {}, kill_ack_mask: {:x}, kill_cts_mask: {:x}\n",
        bt.ch_announce as u8,
        bt.kill_ack_mask,
        bt.kill_cts_mask
    );
    w.push_str("bluetooth traffic load: ");
    w.push_str(match bt.traffic_load {
        IWL_BT_COEX_TRAFFIC_LOAD_CONTINUOUS => "Continuous\n",
        IWL_BT_COEX_TRAFFIC_LOAD_HIGH => "High\n",
        IWL_BT_COEX_TRAFFIC_LOAD_LOW => "Low\n",
        _ => "None\n",
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{dev, read, write};
    use super::*;
    use crate::calib::{ChainNoiseData, SensitivityData};
    use crate::cfgfile::HtParams;
    use crate::ops::OpsCall;
    use crate::queue::{TxQueue, IWL_TRAFFIC_ENTRIES};
    use crate::status::*;
    use alloc::string::String;

    #[test]
    fn traffic_statistics_headings() {
        let mut p = dev();
        p.log_rx_frame(&[0x80, 0x00, 0, 0]);
        p.log_tx_frame(&[0x08, 0x00, 1, 2, 3, 4]);
        let rx = read(&p, "debug/rx_statistics").unwrap();
        assert!(rx.starts_with("Management:\n\t     MANAGEMENT_ASSOC_REQ\t\t: 0\n"));
        assert!(rx.contains("\t        MANAGEMENT_BEACON\t\t: 1\n"));
        assert!(rx.contains("Control:\n"));
        let tx = read(&p, "debug/tx_statistics").unwrap();
        assert!(tx.contains("Control\n\t         CONTROL_BACK_REQ\t\t: 0\n"));
        assert!(tx.ends_with("Data:\n\tcnt: 1\n\tbytes: 6\n"));
    }

    #[test]
    fn clear_traffic_statistics_takes_hex() {
        let mut p = dev();
        p.log_rx_frame(&[0x08, 0x00]);
        assert_eq!(write(&mut p, "debug/clear_traffic_statistics", "x"), Err(DbgfsError::ParseError));
        assert_eq!(p.rx_stats.data_cnt, 1);
        write(&mut p, "debug/clear_traffic_statistics", "ff\n").unwrap();
        assert_eq!(p.rx_stats, TrafficStats::default());
    }

    #[test]
    fn queues_need_txq() {
        let mut p = dev();
        assert!(matches!(read(&p, "debug/tx_queue"), Err(DbgfsError::PreconditionError(_))));
        assert!(matches!(read(&p, "debug/traffic_log"), Err(DbgfsError::PreconditionError(_))));
        let mut queues = vec![TxQueue::default(); 5];
        queues[0] = TxQueue {
            read_ptr: 3,
            write_ptr: 7,
            swq_id: 0x0e,
            stopped: true,
        };
        p.txq = Some(queues);
        p.queue_stop_count[0] = 2;
        let s = read(&p, "debug/tx_queue").unwrap();
        assert!(s.starts_with(
            "hwq 00: read=3 write=7 stop=1 swq_id=0x0e (ac 2/hwq 3)\n        stop-count: 2\n"
        ));
        assert!(s.ends_with("hwq 04: read=0 write=0 stop=0 swq_id=00 (ac 0/hwq 0)\n"));
        assert_eq!(s.matches("stop-count").count(), 4);
    }

    #[test]
    fn traffic_log_dump_follows_debug_level() {
        let mut p = dev();
        p.txq = Some(vec![TxQueue::default(); 2]);
        p.tx_traffic = Some(TrafficLog::default());
        p.log_tx_frame(&[0x08, 0x00, 0xaa, 0xbb]);
        let s = read(&p, "debug/traffic_log").unwrap();
        assert_eq!(
            s,
            "Tx Queue\nq[0]: read_ptr: 0, write_ptr: 0\nq[1]: read_ptr: 0, write_ptr: 0\n\
Rx Queue\nread: 0, write: 0\n"
        );

        p.debug_level = IWL_DL_TX;
        let s = read(&p, "debug/traffic_log").unwrap();
        assert!(s.contains("Tx Traffic idx: 1\n0x0000 0008 bbaa 0000 0000 0000 0000 0000 0000\n"));
        assert_eq!(s.matches('\n').count(), 5 + 1 + IWL_TRAFFIC_ENTRIES * 4);
        assert!(s.ends_with("Rx Queue\nread: 0, write: 0\n"));

        write(&mut p, "debug/traffic_log", "1").unwrap();
        assert_eq!(p.tx_traffic.as_ref().map(|l| l.idx), Some(1));
        write(&mut p, "debug/traffic_log", "0").unwrap();
        assert_eq!(p.tx_traffic.as_ref().map(|l| l.idx), Some(0));
    }

    #[test]
    fn rx_queue_placeholder() {
        let mut p = dev();
        p.rxq.read = 4;
        p.rxq.write = 9;
        assert_eq!(
            read(&p, "debug/rx_queue").unwrap(),
            "read: 4\nwrite: 9\nfree_count: 0\nclosed_rb_num: Not Allocated\n"
        );
        p.rxq.closed_rb_num = Some(0xf123);
        assert!(read(&p, "debug/rx_queue").unwrap().ends_with("closed_rb_num: 291\n"));
    }

    #[test]
    fn power_save_status_from_csr() {
        let mut p = dev();
        assert_eq!(read(&p, "debug/power_save_status").unwrap(), "Power Save Status: none\n");
        p.ops.regs.insert(CSR_GP_CNTRL, CSR_GP_REG_PHY_POWER_SAVE | 0x1);
        assert_eq!(read(&p, "debug/power_save_status").unwrap(), "Power Save Status: PHY\n");
        p.ops.regs.insert(CSR_GP_CNTRL, CSR_GP_REG_POWER_SAVE_STATUS_MSK);
        assert_eq!(read(&p, "debug/power_save_status").unwrap(), "Power Save Status: error\n");
    }

    #[test]
    fn driver_actions() {
        let mut p = dev();
        write(&mut p, "debug/csr", "1").unwrap();
        write(&mut p, "debug/clear_ucode_statistics", "1\n").unwrap();
        assert_eq!(
            p.ops.calls,
            vec![OpsCall::DumpCsr, OpsCall::SendStatisticsRequest { clear: true }]
        );
        p.ops.fail_with = Some(-110);
        assert_eq!(write(&mut p, "debug/clear_ucode_statistics", "1"), Err(DbgfsError::Driver(-110)));
        assert_eq!(write(&mut p, "debug/csr", "z"), Err(DbgfsError::ParseError));
    }

    #[test]
    fn missed_beacon_threshold() {
        let mut p = dev();
        write(&mut p, "debug/missed_beacon", "3\n").unwrap();
        assert_eq!(read(&p, "debug/missed_beacon").unwrap(), "3\n");
        write(&mut p, "debug/missed_beacon", "999999").unwrap();
        assert_eq!(p.missed_beacon_threshold, IWL_MISSED_BEACON_THRESHOLD_DEF);
        write(&mut p, "debug/missed_beacon", "1").unwrap();
        assert_eq!(write(&mut p, "debug/missed_beacon", "abc"), Err(DbgfsError::ParseError));
        assert_eq!(p.missed_beacon_threshold, 1);
        assert_eq!(
            write(&mut p, "debug/missed_beacon", "123456789"),
            Err(DbgfsError::ParseError)
        );
    }

    #[test]
    fn plcp_delta_disables_out_of_range() {
        let mut p = dev();
        assert_eq!(read(&p, "debug/plcp_delta").unwrap(), "50\n");
        write(&mut p, "debug/plcp_delta", "255").unwrap();
        assert_eq!(p.cfg.plcp_delta_threshold, 255);
        write(&mut p, "debug/plcp_delta", "256").unwrap();
        assert_eq!(p.cfg.plcp_delta_threshold, MAX_PLCP_ERR_THRESHOLD_DISABLE);
        write(&mut p, "debug/plcp_delta", "-3").unwrap();
        assert_eq!(p.cfg.plcp_delta_threshold, MAX_PLCP_ERR_THRESHOLD_DISABLE);
    }

    #[test]
    fn force_reset_history() {
        let mut p = dev();
        assert_eq!(write(&mut p, "debug/force_reset", "2"), Err(DbgfsError::RangeError));
        write(&mut p, "debug/force_reset", "1").unwrap();
        assert_eq!(p.ops.calls, vec![OpsCall::ForceReset(ResetMethod::Fw)]);
        p.ops.fail_with = Some(-5);
        assert_eq!(write(&mut p, "debug/force_reset", "0"), Err(DbgfsError::Driver(-5)));
        let s = read(&p, "debug/force_reset").unwrap();
        assert_eq!(
            s,
            "Force reset method 0\n\tnumber of reset request: 1\n\tnumber of reset request success: 0\n\
\tnumber of reset request reject: 0\n\treset duration: 3000\n\
Force reset method 1\n\tnumber of reset request: 1\n\tnumber of reset request success: 1\n\
\tnumber of reset request reject: 0\n\treset duration: 5000\n"
        );
    }

    #[test]
    fn txfifo_flush_rules() {
        let mut p = dev();
        p.ops.txfifo_flush_supported = true;
        p.status.set(STATUS_RF_KILL_HW);
        assert!(matches!(
            write(&mut p, "debug/txfifo_flush", "1"),
            Err(DbgfsError::PreconditionError(_))
        ));
        p.status.clear(STATUS_RF_KILL_HW);
        write(&mut p, "debug/txfifo_flush", "1").unwrap();
        assert_eq!(p.ops.calls, vec![OpsCall::TxfifoFlush(IWL_DROP_ALL)]);
    }

    #[test]
    fn protection_mode_needs_ht() {
        let mut p = dev();
        assert_eq!(read(&p, "debug/protection_mode").unwrap(), "N/A");
        assert_eq!(
            write(&mut p, "debug/protection_mode", "1"),
            Err(DbgfsError::UnsupportedOperation)
        );
        p.cfg.ht_params = Some(HtParams::default());
        assert_eq!(
            read(&p, "debug/protection_mode").unwrap(),
            "use cts-to-self for aggregation\n"
        );
        write(&mut p, "debug/protection_mode", "1").unwrap();
        assert_eq!(read(&p, "debug/protection_mode").unwrap(), "use rts/cts for aggregation\n");
    }

    #[test]
    fn calibration_placeholders() {
        let mut p = dev();
        assert_eq!(read(&p, "debug/sensitivity").unwrap(), "not available\n");
        assert_eq!(read(&p, "debug/chain_noise").unwrap(), "not available\n");

        let mut sens = SensitivityData::default();
        sens.auto_corr_ofdm = 90;
        sens.nrg_value[9] = 4;
        p.sensitivity_data = Some(sens);
        let s = read(&p, "debug/sensitivity").unwrap();
        assert!(s.starts_with("auto_corr_ofdm:\t\t\t 90\n"));
        assert!(s.contains("nrg_value:\t\t\t 0 0 0 0 0 0 0 0 0 4\n"));
        assert!(s.ends_with("nrg_th_ofdm:\t\t\t 0\n"));

        p.chain_noise_data = Some(ChainNoiseData {
            active_chains: 7,
            delta_gain_code: [1, 2, 3],
            ..Default::default()
        });
        let s = read(&p, "debug/chain_noise").unwrap();
        assert!(s.starts_with("active_chains:\t\t\t 7\n"));
        assert!(s.contains("delta_gain_code:\t\t 1 2 3\n"));
        assert!(s.ends_with("state:\t\t\t\t 0\n"));
    }

    #[test]
    fn ucode_tracing_timer() {
        let mut p = dev();
        write(&mut p, "debug/ucode_tracing", "1").unwrap();
        assert!(p.event_log.ucode_trace);
        p.event_log.wraps_once_count = 2;
        assert_eq!(
            read(&p, "debug/ucode_tracing").unwrap(),
            "ucode trace timer is On\nnon_wraps_count:\t\t 0\nwraps_once_count:\t\t 2\nwraps_more_count:\t\t 0\n"
        );
        write(&mut p, "debug/ucode_tracing", "0").unwrap();
        assert_eq!(
            p.ops.calls,
            vec![OpsCall::SetUcodeTraceTimer(true), OpsCall::SetUcodeTraceTimer(false)]
        );
    }

    #[test]
    fn rxon_flags_of_bss() {
        let mut p = dev();
        p.contexts[IWL_RXON_CTX_BSS].active_flags = 0x8000_a000;
        p.contexts[IWL_RXON_CTX_BSS].active_filter_flags = 0x2c;
        assert_eq!(read(&p, "debug/rxon_flags").unwrap(), "0x8000A000\n");
        assert_eq!(read(&p, "debug/rxon_filter_flags").unwrap(), "0x002C\n");
    }

    #[test]
    fn wd_timeout_rearms_watchdog() {
        let mut p = dev();
        write(&mut p, "debug/wd_timeout", "500").unwrap();
        write(&mut p, "debug/wd_timeout", "-1").unwrap();
        assert_eq!(p.cfg.wd_timeout, DEF_WD_TIMEOUT);
        assert_eq!(
            p.ops.calls,
            vec![OpsCall::SetupWatchdog(500), OpsCall::SetupWatchdog(DEF_WD_TIMEOUT)]
        );
    }

    #[test]
    fn bt_traffic_report() {
        let mut p = dev();
        p.bt = Some(BtCoex::default());
        assert_eq!(read(&p, "debug/bt_traffic").unwrap(), "BT coex disabled\n");
        p.bt = Some(BtCoex {
            enable_flag: 1,
            status: true,
            last_traffic_load: 2,
            kill_ack_mask: 0xffff0000,
            traffic_load: IWL_BT_COEX_TRAFFIC_LOAD_HIGH,
            ..Default::default()
        });
        assert_eq!(
            read(&p, "debug/bt_traffic").unwrap(),
            "BT enable flag: 0x1\nBT in 3-wire mode\nBT status: On, last traffic notif: 2\n\
ch_announcement: 0, kill_ack_mask: ffff0000, kill_cts_mask: 0\nbluetooth traffic load: High\n"
        );
    }

    #[test]
    fn fh_reg_passthrough() {
        let mut p = dev();
        p.ops.fh_dump = String::from("FH_RSCSR_CHNL0_STTS_WPTR_REG: 0x00000000\n");
        assert_eq!(
            read(&p, "debug/fh_reg").unwrap(),
            "FH_RSCSR_CHNL0_STTS_WPTR_REG: 0x00000000\n"
        );
    }
}
