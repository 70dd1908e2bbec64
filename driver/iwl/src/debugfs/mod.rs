//! iwl 调试文件系统端点表
//!
//! 目录布局：
//! - `data/`  设备数据：NVM、SRAM、事件日志、站点、信道、状态位、中断统计、省电、温控
//! - `debug/` 收发统计、队列、固件统计、校准、复位与各类阈值
//! - `rf/`    校准开关
//!
//! 每个端点是一对普通函数：格式化 `fn(&IwlPriv, &mut BoundedWriter)` 与
//! 修改 `fn(&mut IwlPriv, &CommandToken)`，由 [`dbgfs::Registry`] 在驱动锁内调用。

use alloc::vec::Vec;
use core::fmt;

use dbgfs::{Endpoint, Registry};

use crate::device::IwlPriv;
use crate::ops::IwlOps;

mod data;
mod debug;
mod rf;
mod ucode;

pub const DIR_DATA: &str = "data";
pub const DIR_RF: &str = "rf";
pub const DIR_DEBUG: &str = "debug";

/// 创建顺序
pub const DBGFS_DIRS: [&str; 3] = [DIR_DATA, DIR_RF, DIR_DEBUG];

/// 向报告写一段格式化文本；报告写满后的内容被丢弃
macro_rules! out {
    ($w:expr, $($arg:tt)*) => {{
        let _ = core::fmt::Write::write_fmt($w, format_args!($($arg)*));
    }};
}
pub(crate) use out;

/// 全部端点描述
pub fn iwl_endpoints<O: IwlOps>() -> Vec<Endpoint<IwlPriv<O>>> {
    let mut eps = data::endpoints::<O>();
    eps.extend(debug::endpoints::<O>());
    eps.extend(ucode::endpoints::<O>());
    eps.extend(rf::endpoints::<O>());
    eps
}

/// 以 `name` 为根目录的注册表（尚未注册）
pub fn iwl_registry<O: IwlOps>(name: &str) -> Registry<IwlPriv<O>> {
    Registry::new(name, &DBGFS_DIRS, iwl_endpoints::<O>())
}

/// `%#x` 风格：非零值带 `0x` 前缀并补零到 `digits` 位，零值只输出补零后的数字
pub(crate) struct AltHex(pub u64, pub usize);

impl fmt::Display for AltHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let AltHex(value, digits) = *self;
        if value == 0 {
            if digits == 0 {
                return f.write_str("0");
            }
            return write!(f, "{:0width$x}", 0, width = digits);
        }
        write!(f, "0x{:0width$x}", value, width = digits)
    }
}

/// `aa:bb:cc:dd:ee:ff`
pub(crate) struct MacAddr<'a>(pub &'a [u8; 6]);

impl fmt::Display for MacAddr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            m[0], m[1], m[2], m[3], m[4], m[5]
        )
    }
}
