//! 写端点的命令解析
//!
//! 运维写入的是很短的文本（通常是 `echo 5 > missed_beacon`），先按端点的字节上限整体校验，
//! 再解析出恰好一个数值。解析失败不会触碰驱动状态。

use crate::error::{DbgfsError, DbgfsResult};

/// 普通数值控制的输入上限（字节，含 echo 的换行）
pub const CMD_TOKEN_MAX: usize = 8;

/// SRAM 窗口 `offset,len` 的输入上限
pub const CMD_TOKEN_WIDE_MAX: usize = 64;

/// 一次写入的命令文本（已去掉首尾空白与末尾 NUL）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandToken<'a> {
    text: &'a str,
}

impl<'a> CommandToken<'a> {
    /// 超长或非 UTF-8 的输入整体拒绝
    pub fn new(input: &'a [u8], max_len: usize) -> DbgfsResult<Self> {
        if input.len() > max_len {
            log::warn!(target: "wireless::dbgfs", "command rejected: {} bytes > {}", input.len(), max_len);
            return Err(DbgfsError::ParseError);
        }
        let end = input.iter().position(|&b| b == 0).unwrap_or(input.len());
        let text = core::str::from_utf8(&input[..end]).map_err(|_| DbgfsError::ParseError)?;
        Ok(Self { text: text.trim() })
    }

    #[inline]
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// 一个带可选符号的十进制数
    pub fn parse_dec(&self) -> DbgfsResult<i64> {
        parse_signed(self.text, 10)
    }

    /// 一个十六进制数，可带 `0x` 前缀
    pub fn parse_hex(&self) -> DbgfsResult<u32> {
        parse_unsigned_hex(self.text)
    }

    /// `offset,len`，两项均为十六进制
    pub fn parse_hex_pair(&self) -> DbgfsResult<(u32, u32)> {
        let (a, b) = self.text.split_once(',').ok_or(DbgfsError::ParseError)?;
        Ok((parse_unsigned_hex(a.trim())?, parse_unsigned_hex(b.trim())?))
    }

    /// 布尔值：`1/0`、`y/n`、`Y/N`、`on/off`
    pub fn parse_bool(&self) -> DbgfsResult<bool> {
        match self.text {
            "1" | "y" | "Y" | "on" | "ON" => Ok(true),
            "0" | "n" | "N" | "off" | "OFF" => Ok(false),
            _ => Err(DbgfsError::ParseError),
        }
    }
}

fn parse_signed(s: &str, radix: u32) -> DbgfsResult<i64> {
    let (neg, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty() || !digits.bytes().all(|b| (b as char).is_digit(radix)) {
        return Err(DbgfsError::ParseError);
    }
    let v = i64::from_str_radix(digits, radix).map_err(|_| DbgfsError::RangeError)?;
    Ok(if neg { -v } else { v })
}

fn parse_unsigned_hex(s: &str) -> DbgfsResult<u32> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DbgfsError::ParseError);
    }
    u32::from_str_radix(digits, 16).map_err(|_| DbgfsError::RangeError)
}

/// 超出范围时的处理策略，按字段声明
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutOfRange {
    /// 返回 `RangeError`，状态不变
    Reject,
    /// 改写为给定的默认值
    Default(i64),
}

/// 数值字段的取值范围（闭区间）与越界策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntDomain {
    pub min: i64,
    pub max: i64,
    pub out_of_range: OutOfRange,
}

impl IntDomain {
    pub const fn reject(min: i64, max: i64) -> Self {
        Self {
            min,
            max,
            out_of_range: OutOfRange::Reject,
        }
    }

    pub const fn or_default(min: i64, max: i64, default: i64) -> Self {
        Self {
            min,
            max,
            out_of_range: OutOfRange::Default(default),
        }
    }

    #[inline]
    pub fn contains(&self, v: i64) -> bool {
        v >= self.min && v <= self.max
    }

    /// 返回应写入的值
    pub fn apply(&self, v: i64) -> DbgfsResult<i64> {
        if self.contains(v) {
            return Ok(v);
        }
        match self.out_of_range {
            OutOfRange::Reject => Err(DbgfsError::RangeError),
            OutOfRange::Default(d) => {
                log::debug!(target: "wireless::dbgfs", "value {} outside [{}, {}], using {}", v, self.min, self.max, d);
                Ok(d)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(s: &str) -> CommandToken<'_> {
        CommandToken::new(s.as_bytes(), CMD_TOKEN_MAX).unwrap()
    }

    #[test]
    fn decimal_with_echo_newline() {
        assert_eq!(tok("5\n").parse_dec(), Ok(5));
        assert_eq!(tok("-1\n").parse_dec(), Ok(-1));
        assert_eq!(tok(" +42 ").parse_dec(), Ok(42));
    }

    #[test]
    fn decimal_rejects_garbage() {
        assert_eq!(tok("abc").parse_dec(), Err(DbgfsError::ParseError));
        assert_eq!(tok("5abc").parse_dec(), Err(DbgfsError::ParseError));
        assert_eq!(tok("").parse_dec(), Err(DbgfsError::ParseError));
        assert_eq!(tok("-").parse_dec(), Err(DbgfsError::ParseError));
        assert_eq!(tok("1 2").parse_dec(), Err(DbgfsError::ParseError));
    }

    #[test]
    fn over_length_rejected() {
        assert_eq!(
            CommandToken::new(b"123456789", CMD_TOKEN_MAX),
            Err(DbgfsError::ParseError)
        );
        assert!(CommandToken::new(b"1234567\n", CMD_TOKEN_MAX).is_ok());
    }

    #[test]
    fn nul_terminated_input() {
        let t = CommandToken::new(b"7\0\0\0", CMD_TOKEN_MAX).unwrap();
        assert_eq!(t.parse_dec(), Ok(7));
    }

    #[test]
    fn hex_forms() {
        assert_eq!(tok("0").parse_hex(), Ok(0));
        assert_eq!(tok("0x1F").parse_hex(), Ok(0x1f));
        assert_eq!(tok("ff").parse_hex(), Ok(0xff));
        assert_eq!(tok("0x").parse_hex(), Err(DbgfsError::ParseError));
        assert_eq!(tok("zz").parse_hex(), Err(DbgfsError::ParseError));
    }

    #[test]
    fn hex_pair() {
        let t = CommandToken::new(b"800000,40\n", CMD_TOKEN_WIDE_MAX).unwrap();
        assert_eq!(t.parse_hex_pair(), Ok((0x80_0000, 0x40)));
        let t = CommandToken::new(b"800000", CMD_TOKEN_WIDE_MAX).unwrap();
        assert_eq!(t.parse_hex_pair(), Err(DbgfsError::ParseError));
    }

    #[test]
    fn bools() {
        assert_eq!(tok("Y\n").parse_bool(), Ok(true));
        assert_eq!(tok("0").parse_bool(), Ok(false));
        assert_eq!(tok("2").parse_bool(), Err(DbgfsError::ParseError));
    }

    #[test]
    fn domain_policies() {
        let clamp = IntDomain::or_default(1, 5, 5);
        assert_eq!(clamp.apply(3), Ok(3));
        assert_eq!(clamp.apply(999_999), Ok(5));
        assert_eq!(clamp.apply(0), Ok(5));

        let strict = IntDomain::reject(1, 5);
        assert_eq!(strict.apply(5), Ok(5));
        assert_eq!(strict.apply(6), Err(DbgfsError::RangeError));
    }
}
