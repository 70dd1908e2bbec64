//! dbgfs 错误类型
//!
//! 所有写入失败都是 fail-fast：返回错误时驱动状态保持不变。
//! `errno()` 给出回传给宿主的负 Linux 错误码，`AxError` 转换用于向 `AxResult` 传播。

use core::fmt;

use axerrno::{AxError, LinuxError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbgfsError {
    /// 报告缓冲区申请失败（对外为 -ENOMEM）
    AllocationFailure,
    /// 输入中没有可解析的数值，或长度超限
    ParseError,
    /// 数值超出该字段的取值范围（仅用于拒绝策略的字段）
    RangeError,
    /// 驱动当前状态不允许该操作，附带原因
    PreconditionError(&'static str),
    /// 该硬件或该端点不支持此操作
    UnsupportedOperation,
    /// 端点不存在或注册表未注册
    NotFound,
    /// 驱动动作本身失败，携带其负 errno
    Driver(i32),
    /// 宿主注册面返回的错误
    Host(AxError),
}

pub type DbgfsResult<T = ()> = Result<T, DbgfsError>;

impl DbgfsError {
    /// 负 Linux errno
    pub fn errno(self) -> i32 {
        let e = match self {
            DbgfsError::AllocationFailure => LinuxError::ENOMEM,
            DbgfsError::ParseError | DbgfsError::RangeError => LinuxError::EINVAL,
            DbgfsError::PreconditionError(_) => LinuxError::EAGAIN,
            DbgfsError::UnsupportedOperation => LinuxError::EOPNOTSUPP,
            DbgfsError::NotFound => LinuxError::ENOENT,
            DbgfsError::Driver(code) => return if code > 0 { -code } else { code },
            DbgfsError::Host(e) => LinuxError::from(e),
        };
        -e.code()
    }
}

impl fmt::Display for DbgfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbgfsError::AllocationFailure => f.write_str("report buffer allocation failed"),
            DbgfsError::ParseError => f.write_str("no valid numeric value in command"),
            DbgfsError::RangeError => f.write_str("value out of range"),
            DbgfsError::PreconditionError(why) => write!(f, "not allowed now: {}", why),
            DbgfsError::UnsupportedOperation => f.write_str("operation not supported"),
            DbgfsError::NotFound => f.write_str("no such endpoint"),
            DbgfsError::Driver(code) => write!(f, "driver action failed ({})", code),
            DbgfsError::Host(e) => write!(f, "host registration failed ({:?})", e),
        }
    }
}

impl From<DbgfsError> for AxError {
    fn from(e: DbgfsError) -> Self {
        match e {
            DbgfsError::AllocationFailure => AxError::NoMemory,
            DbgfsError::ParseError | DbgfsError::RangeError => AxError::InvalidInput,
            DbgfsError::PreconditionError(_) => AxError::WouldBlock,
            DbgfsError::UnsupportedOperation => AxError::Unsupported,
            DbgfsError::NotFound => AxError::NotFound,
            DbgfsError::Driver(_) => AxError::Io,
            DbgfsError::Host(e) => e,
        }
    }
}

impl From<AxError> for DbgfsError {
    fn from(e: AxError) -> Self {
        DbgfsError::Host(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errno_is_negative() {
        assert_eq!(DbgfsError::AllocationFailure.errno(), -12);
        assert_eq!(DbgfsError::ParseError.errno(), -22);
        assert_eq!(DbgfsError::RangeError.errno(), -22);
        assert_eq!(DbgfsError::PreconditionError("busy").errno(), -11);
        assert_eq!(DbgfsError::NotFound.errno(), -2);
        assert_eq!(DbgfsError::Driver(-110).errno(), -110);
        assert_eq!(DbgfsError::Driver(5).errno(), -5);
    }

    #[test]
    fn maps_into_ax_error() {
        assert_eq!(AxError::from(DbgfsError::ParseError), AxError::InvalidInput);
        assert_eq!(AxError::from(DbgfsError::Host(AxError::AlreadyExists)), AxError::AlreadyExists);
    }
}
