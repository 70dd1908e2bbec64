//! iwl 配置文件解析
//!
//! 每行一个 `KEY=value`，key 取 EEPROM_SIZE、NUM_OF_QUEUES、MAX_STATIONS、PLCP_DELTA、
//! WD_TIMEOUT、HT_RTS_AGG、VALID_TX_ANT、DBGFS_NAME 之一；`=` 两侧空白忽略，`#` 开头为注释。
//! 缺失或值非法的项使用默认值，未知 key 或无法拆分的行拒绝整个文件。

use alloc::string::String;
use core::result::Result;

use crate::power::{DEF_WD_TIMEOUT, MAX_WD_TIMEOUT};

pub const DEFAULT_EEPROM_SIZE: usize = 2048;
pub const DEFAULT_NUM_OF_QUEUES: u16 = 20;
pub const DEFAULT_MAX_STATIONS: u8 = 16;
pub const DEFAULT_DBGFS_NAME: &str = "iwlagn";

/// 发射天线位图
pub const ANT_A: u8 = 1 << 0;
pub const ANT_B: u8 = 1 << 1;
pub const ANT_C: u8 = 1 << 2;
pub const ANT_ABC: u8 = ANT_A | ANT_B | ANT_C;

pub const MAX_PLCP_ERR_THRESHOLD_MIN: u32 = 1;
pub const MAX_PLCP_ERR_THRESHOLD_DEF: u32 = 50;
pub const MAX_PLCP_ERR_THRESHOLD_MAX: u32 = 255;
pub const MAX_PLCP_ERR_THRESHOLD_DISABLE: u32 = 0;

/// HT 参数；只有支持 11n 的型号才有
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HtParams {
    pub use_rts_for_aggregation: bool,
}

/// 型号配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IwlCfg {
    /// EEPROM/OTP 镜像字节数
    pub eeprom_size: usize,
    pub num_of_queues: u16,
    pub max_stations: u8,
    /// 0 表示关闭 PLCP 错误检测
    pub plcp_delta_threshold: u32,
    /// 看门狗超时 ms，0 表示关闭
    pub wd_timeout: u32,
    pub ht_params: Option<HtParams>,
    /// 可用的发射天线，`ANT_*` 位图
    pub valid_tx_ant: u8,
    /// 调试目录名
    pub dbgfs_name: String,
}

impl Default for IwlCfg {
    fn default() -> Self {
        Self {
            eeprom_size: DEFAULT_EEPROM_SIZE,
            num_of_queues: DEFAULT_NUM_OF_QUEUES,
            max_stations: DEFAULT_MAX_STATIONS,
            plcp_delta_threshold: MAX_PLCP_ERR_THRESHOLD_DEF,
            wd_timeout: DEF_WD_TIMEOUT,
            ht_params: None,
            valid_tx_ant: ANT_ABC,
            dbgfs_name: String::from(DEFAULT_DBGFS_NAME),
        }
    }
}

/// 配置文件里允许出现的 key
const TAGS: [&str; 8] = [
    "EEPROM_SIZE",
    "NUM_OF_QUEUES",
    "MAX_STATIONS",
    "PLCP_DELTA",
    "WD_TIMEOUT",
    "HT_RTS_AGG",
    "VALID_TX_ANT",
    "DBGFS_NAME",
];

/// 配置文件格式错误
const EINVAL: i32 = -22;

fn trim(mut v: &[u8]) -> &[u8] {
    while let [b' ' | b'\t' | b'\r', rest @ ..] = v {
        v = rest;
    }
    while let [rest @ .., b' ' | b'\t' | b'\r'] = v {
        v = rest;
    }
    v
}

/// 逐行拆出 `(行号, key, value)`；空行和 `#` 注释跳过，没有 `=` 的行 value 为 None
fn entries(file_data: &[u8]) -> impl Iterator<Item = (usize, &[u8], Option<&[u8]>)> {
    file_data
        .split(|&b| b == b'\n')
        .enumerate()
        .map(|(i, line)| (i + 1, trim(line)))
        .filter(|(_, line)| !line.is_empty() && line[0] != b'#')
        .map(|(no, line)| match line.iter().position(|&b| b == b'=') {
            Some(eq) => (no, trim(&line[..eq]), Some(trim(&line[eq + 1..]))),
            None => (no, line, None),
        })
}

/// 每一行都必须是已知 key 的 `key=value`
fn check_lines(file_data: &[u8]) -> Result<(), i32> {
    for (no, key, value) in entries(file_data) {
        let known = TAGS.iter().any(|t| t.as_bytes() == key);
        if value.is_none() || !known {
            log::warn!(
                target: "wireless::iwl",
                "iwl cfg line {}: {} `{}`",
                no,
                if value.is_none() { "missing '='" } else { "unknown tag" },
                core::str::from_utf8(key).unwrap_or("?")
            );
            return Err(EINVAL);
        }
    }
    Ok(())
}

/// 取 key 对应的值；key 重复时以最后一行为准
fn find_tag<'a>(file_data: &'a [u8], tag: &str) -> Option<&'a [u8]> {
    entries(file_data)
        .filter(|(_, key, _)| *key == tag.as_bytes())
        .filter_map(|(_, _, value)| value)
        .last()
}

/// 十进制无符号数，整个值必须都是数字
fn parse_dec(s: &[u8]) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut v: u32 = 0;
    for &b in s {
        if !b.is_ascii_digit() {
            return None;
        }
        v = v.checked_mul(10)?.checked_add((b - b'0') as u32)?;
    }
    Some(v)
}

/// 解析型号配置文件
///
/// 未知 key 或缺少 `=` 的行使整个文件被拒绝（`-EINVAL`），`config` 不变；
/// 已知 key 的值非法时该项取默认值。
pub fn parse_iwl_configfile(file_data: &[u8], config: &mut IwlCfg) -> Result<(), i32> {
    check_lines(file_data)?;
    let defaults = IwlCfg::default();
    macro_rules! parse_tag {
        ($tag:expr, $field:ident, $ty:ty, $valid:expr) => {
            config.$field = find_tag(file_data, $tag)
                .and_then(parse_dec)
                .filter($valid)
                .and_then(|v| <$ty>::try_from(v).ok())
                .unwrap_or(defaults.$field);
        };
    }
    parse_tag!("EEPROM_SIZE", eeprom_size, usize, |v: &u32| *v > 0 && *v % 16 == 0);
    parse_tag!("NUM_OF_QUEUES", num_of_queues, u16, |v: &u32| *v > 0);
    parse_tag!("MAX_STATIONS", max_stations, u8, |v: &u32| *v > 0);
    parse_tag!("PLCP_DELTA", plcp_delta_threshold, u32, |v: &u32| *v <= MAX_PLCP_ERR_THRESHOLD_MAX);
    parse_tag!("WD_TIMEOUT", wd_timeout, u32, |v: &u32| *v <= MAX_WD_TIMEOUT);
    parse_tag!("VALID_TX_ANT", valid_tx_ant, u8, |v: &u32| *v != 0 && *v <= ANT_ABC as u32);

    config.ht_params = match find_tag(file_data, "HT_RTS_AGG").and_then(parse_dec) {
        Some(v) => Some(HtParams {
            use_rts_for_aggregation: v != 0,
        }),
        None => defaults.ht_params,
    };

    config.dbgfs_name = match find_tag(file_data, "DBGFS_NAME") {
        Some(v) if !v.is_empty() && !v.contains(&b'/') => match core::str::from_utf8(v) {
            Ok(name) => String::from(name),
            Err(_) => defaults.dbgfs_name,
        },
        _ => defaults.dbgfs_name,
    };

    log::debug!(target: "wireless::iwl", "iwl cfg: {:?}", config);
    Ok(())
}
