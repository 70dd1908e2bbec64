//! `debug/` 目录下的固件统计：收发物理层/非物理层表、通用统计、BT 活动、发送失败原因
//!
//! 数据来自最近一次统计通知，可能落后于固件当前状态。全部要求固件已 alive。

use alloc::vec;
use alloc::vec::Vec;

use dbgfs::{BoundedWriter, Capacity, DbgfsError, DbgfsResult, Endpoint};

use super::{out, DIR_DEBUG};
use crate::cfgfile::{ANT_A, ANT_B, ANT_C};
use crate::device::IwlPriv;
use crate::ops::IwlOps;
use crate::stats::*;

const RX_PHY_LABELS: [&str; RX_PHY_NUM] = [
    "ina_cnt:",
    "fina_cnt:",
    "plcp_err:",
    "crc32_err:",
    "overrun_err:",
    "early_overrun_err:",
    "crc32_good:",
    "false_alarm_cnt:",
    "fina_sync_err_cnt:",
    "sfd_timeout:",
    "fina_timeout:",
    "unresponded_rts:",
    "rxe_frame_lmt_ovrun:",
    "sent_ack_cnt:",
    "sent_cts_cnt:",
    "sent_ba_rsp_cnt:",
    "dsp_self_kill:",
    "mh_format_err:",
    "re_acq_main_rssi_sum:",
];

const RX_NON_PHY_LABELS: [&str; RX_NON_PHY_NUM] = [
    "bogus_cts:",
    "bogus_ack:",
    "non_bssid_frames:",
    "filtered_frames:",
    "non_channel_beacons:",
    "channel_beacons:",
    "num_missed_bcon:",
    "adc_rx_saturation_time:",
    "ina_detect_search_tm:",
    "beacon_silence_rssi_a:",
    "beacon_silence_rssi_b:",
    "beacon_silence_rssi_c:",
    "interference_data_flag:",
    "channel_load:",
    "dsp_false_alarms:",
    "beacon_rssi_a:",
    "beacon_rssi_b:",
    "beacon_rssi_c:",
    "beacon_energy_a:",
    "beacon_energy_b:",
    "beacon_energy_c:",
];

const RX_HT_PHY_LABELS: [&str; RX_HT_PHY_NUM] = [
    "plcp_err:",
    "overrun_err:",
    "early_overrun_err:",
    "crc32_good:",
    "crc32_err:",
    "mh_format_err:",
    "agg_crc32_good:",
    "agg_mpdu_cnt:",
    "agg_cnt:",
    "unsupport_mcs:",
];

const TX_LABELS: [&str; TX_STATS_NUM] = [
    "preamble:",
    "rx_detected_cnt:",
    "bt_prio_defer_cnt:",
    "bt_prio_kill_cnt:",
    "few_bytes_cnt:",
    "cts_timeout:",
    "ack_timeout:",
    "expected_ack_cnt:",
    "actual_ack_cnt:",
    "dump_msdu_cnt:",
    "abort_nxt_frame_mismatch:",
    "abort_missing_nxt_frame:",
    "cts_timeout_collision:",
    "ack_ba_timeout_collision:",
    "agg ba_timeout:",
    "agg ba_resched_frames:",
    "agg scd_query_agg_frame:",
    "agg scd_query_no_agg:",
    "agg scd_query_agg:",
    "agg scd_query_mismatch:",
    "agg frame_not_ready:",
    "agg underrun:",
    "agg bt_prio_kill:",
    "agg rx_ba_rsp_cnt:",
];

const GENERAL_STATS_LABELS: [&str; GENERAL_STATS_NUM] = [
    "temperature:",
    "temperature_m:",
    "ttl_timestamp:",
    "burst_check:",
    "burst_count:",
    "wait_for_silence_timeout_count:",
    "sleep_time:",
    "slots_out:",
    "slots_idle:",
    "tx_on_a:",
    "tx_on_b:",
    "exec_time:",
    "probe_time:",
    "rx_enable_counter:",
    "num_of_sos_states:",
];

/// 前几项只有当前值
const GENERAL_STATS_VALUE_ONLY: usize = 3;

const BT_ACTIVITY_LABELS: [&str; BT_ACTIVITY_NUM] = [
    "hi_priority_tx_req_cnt:",
    "hi_priority_tx_denied_cnt:",
    "lo_priority_tx_req_cnt:",
    "lo_priority_tx_denied_cnt:",
    "hi_priority_rx_req_cnt:",
    "hi_priority_rx_denied_cnt:",
    "lo_priority_rx_req_cnt:",
    "lo_priority_rx_denied_cnt:",
    "(rx)num_bt_kills:",
];

/// 标志块最长 4 行
const FLAG_BLOCK: usize = 128;
/// 表头与表行都是 80 列
const TABLE_LINE: usize = 80;
/// `  %-30s       0x%02X\n`
const HEX_LINE: usize = 44;
/// 制表符对齐的两列行
const TAB_LINE: usize = 64;

const RX_STATS_BUFSZ: usize =
    FLAG_BLOCK + TABLE_LINE * (4 + 2 * RX_PHY_NUM + RX_NON_PHY_NUM + RX_HT_PHY_NUM);
const TX_STATS_BUFSZ: usize = FLAG_BLOCK + TABLE_LINE * (1 + TX_STATS_NUM) + 32 + 3 * HEX_LINE;
const GENERAL_STATS_BUFSZ: usize = FLAG_BLOCK + TABLE_LINE * (1 + GENERAL_STATS_NUM);
const BT_STATS_BUFSZ: usize = FLAG_BLOCK + TAB_LINE * (2 + BT_ACTIVITY_NUM);
const REPLY_TX_ERROR_BUFSZ: usize =
    TAB_LINE * (3 + TX_FAIL_REASONS.len() + AGG_TX_FAIL_REASONS.len());

pub(super) fn endpoints<O: IwlOps>() -> Vec<Endpoint<IwlPriv<O>>> {
    vec![
        Endpoint::read_only(
            DIR_DEBUG,
            "ucode_rx_stats",
            ucode_rx_stats_read::<O>,
            Capacity::Fixed(RX_STATS_BUFSZ),
        ),
        Endpoint::read_only(
            DIR_DEBUG,
            "ucode_tx_stats",
            ucode_tx_stats_read::<O>,
            Capacity::Fixed(TX_STATS_BUFSZ),
        ),
        Endpoint::read_only(
            DIR_DEBUG,
            "ucode_general_stats",
            ucode_general_stats_read::<O>,
            Capacity::Fixed(GENERAL_STATS_BUFSZ),
        ),
        Endpoint::read_only(
            DIR_DEBUG,
            "ucode_bt_stats",
            ucode_bt_stats_read::<O>,
            Capacity::Fixed(BT_STATS_BUFSZ),
        )
        .when(|p: &IwlPriv<O>| p.advanced_bt_coexist()),
        Endpoint::read_only(
            DIR_DEBUG,
            "reply_tx_error",
            reply_tx_error_read::<O>,
            Capacity::Fixed(REPLY_TX_ERROR_BUFSZ),
        ),
    ]
}

fn require_alive<O: IwlOps>(p: &IwlPriv<O>) -> DbgfsResult<()> {
    if !p.is_alive() {
        return Err(DbgfsError::PreconditionError("uCode not alive"));
    }
    Ok(())
}

fn statistics_flag(w: &mut BoundedWriter, flag: u32) {
    out!(w, "Statistics Flag(0x{:X}):\n", flag);
    if flag & UCODE_STATISTICS_CLEAR_MSK != 0 {
        w.push_str("\tStatistics have been cleared\n");
    }
    out!(
        w,
        "\tOperational Frequency: {}\n",
        if flag & UCODE_STATISTICS_FREQUENCY_MSK != 0 { "2.4 GHz" } else { "5.2 GHz" }
    );
    out!(
        w,
        "\tTGj Narrow Band: {}\n",
        if flag & UCODE_STATISTICS_NARROW_BAND_MSK != 0 { "enabled" } else { "disabled" }
    );
}

fn table_header(w: &mut BoundedWriter, heading: &str) {
    out!(w, "{:<32}    current  cumulative       delta         max\n", heading);
}

fn table_row<const N: usize>(w: &mut BoundedWriter, label: &str, t: &StatTable<N>, i: usize) {
    out!(
        w,
        "  {:<30} {:>10}  {:>10}  {:>10}  {:>10}\n",
        label,
        t.current[i],
        t.accum[i],
        t.delta[i],
        t.max_delta[i]
    );
}

fn stat_table<const N: usize>(w: &mut BoundedWriter, heading: &str, labels: &[&str; N], t: &StatTable<N>) {
    table_header(w, heading);
    for (i, label) in labels.iter().enumerate() {
        table_row(w, label, t, i);
    }
}

/// 标签之后补制表符到第 32 列（8 列一个制表位），至少一个
fn tab_to_col32(w: &mut BoundedWriter, label_len: usize) {
    for _ in 0..4 - (label_len / 8).min(3) {
        w.push_str("\t");
    }
}

fn ucode_rx_stats_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    require_alive(p)?;
    let s = &p.ucode_stats;
    statistics_flag(w, s.flag);
    stat_table(w, "Statistics_Rx - OFDM:", &RX_PHY_LABELS, &s.rx_ofdm);
    stat_table(w, "Statistics_Rx - CCK:", &RX_PHY_LABELS, &s.rx_cck);
    stat_table(w, "Statistics_Rx - GENERAL:", &RX_NON_PHY_LABELS, &s.rx_non_phy);
    stat_table(w, "Statistics_Rx - OFDM_HT:", &RX_HT_PHY_LABELS, &s.rx_ofdm_ht);
    Ok(())
}

fn ucode_tx_stats_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    require_alive(p)?;
    let s = &p.ucode_stats;
    statistics_flag(w, s.flag);
    stat_table(w, "Statistics_Tx:", &TX_LABELS, &s.tx);

    if s.tx_power.iter().any(|&v| v != 0) {
        w.push_str("tx power: (1/2 dB step)\n");
        let antennas = [(ANT_A, "antenna A:"), (ANT_B, "antenna B:"), (ANT_C, "antenna C:")];
        for ((ant, label), &power) in antennas.iter().zip(s.tx_power.iter()) {
            if p.cfg.valid_tx_ant & ant != 0 && power != 0 {
                out!(w, "  {:<30}       0x{:02X}\n", label, power);
            }
        }
    }
    Ok(())
}

fn ucode_general_stats_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    require_alive(p)?;
    let s = &p.ucode_stats;
    statistics_flag(w, s.flag);
    table_header(w, "Statistics_General:");
    for (i, label) in GENERAL_STATS_LABELS.iter().enumerate() {
        if i < GENERAL_STATS_VALUE_ONLY {
            out!(w, "  {:<30} {:>10}\n", label, s.general.current[i]);
        } else {
            table_row(w, label, &s.general, i);
        }
    }
    Ok(())
}

fn ucode_bt_stats_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    require_alive(p)?;
    if !p.bt.is_some_and(|bt| bt.enable_flag != 0) {
        return Err(DbgfsError::PreconditionError("BT coex disabled"));
    }
    let bt = &p.ucode_stats.bt_activity;
    statistics_flag(w, p.ucode_stats.flag);
    w.push_str("Statistics_BT:\n");
    w.push_str("\t\t\tcurrent\t\t\taccumulative\n");
    for (i, label) in BT_ACTIVITY_LABELS.iter().enumerate() {
        w.push_str(label);
        tab_to_col32(w, label.len());
        out!(w, "{}\t\t\t{}\n", bt.current[i], bt.accum[i]);
    }
    Ok(())
}

fn reply_tx_error_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    require_alive(p)?;
    let e = &p.reply_tx_errors;
    w.push_str("Statistics_TX_Error:\n");
    for (name, n) in TX_FAIL_REASONS.iter().zip(e.tx.iter()) {
        out!(w, "{}:", name);
        tab_to_col32(w, name.len() + 1);
        out!(w, "{}\n", n);
    }
    w.push_str("\nStatistics_Agg_TX_Error:\n");
    for (name, n) in AGG_TX_FAIL_REASONS.iter().zip(e.agg.iter()) {
        out!(w, "{}:", name);
        tab_to_col32(w, name.len() + 1);
        out!(w, "{}\n", n);
    }
    Ok(())
}
