//! 有界报告写入器
//!
//! 所有端点的格式化都写入同一种定长缓冲：容量在申请时固定，超出部分被截断，
//! 截断后后续字段一律丢弃（尽力而为的部分报告），不会返回错误。
//! 生成的 [`Report`] 支持按任意偏移分块读取。

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::error::{DbgfsError, DbgfsResult};

/// 定长报告缓冲，写满即停
pub struct BoundedWriter {
    buf: Vec<u8>,
    cap: usize,
    truncated: bool,
}

impl BoundedWriter {
    /// 申请 `cap` 字节容量；申请失败返回 `AllocationFailure`
    pub fn with_capacity(cap: usize) -> DbgfsResult<Self> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(cap)
            .map_err(|_| DbgfsError::AllocationFailure)?;
        Ok(Self {
            buf,
            cap,
            truncated: false,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.cap - self.buf.len()
    }

    /// 是否已发生截断
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn as_str(&self) -> &str {
        // 只会写入完整的 UTF-8 字符
        core::str::from_utf8(&self.buf).unwrap_or("")
    }

    /// 追加文本；放不下时在字符边界截断并进入截断状态
    pub fn push_str(&mut self, s: &str) {
        if self.truncated {
            return;
        }
        let room = self.remaining();
        if s.len() <= room {
            self.buf.extend_from_slice(s.as_bytes());
            return;
        }
        let mut end = room;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        self.buf.extend_from_slice(&s.as_bytes()[..end]);
        self.truncated = true;
        log::trace!(target: "wireless::dbgfs", "report truncated at {} bytes", self.buf.len());
    }

    /// 按 16 位小端字分组输出十六进制，组间以空格分隔，不含换行
    ///
    /// 16 字节一行时输出 8 组 `xxxx`；奇数尾字节单独输出 `xx`。
    pub fn hex_words(&mut self, bytes: &[u8]) {
        let mut first = true;
        let mut chunks = bytes.chunks_exact(2);
        for pair in &mut chunks {
            if !first {
                self.push_str(" ");
            }
            first = false;
            let word = u16::from_le_bytes([pair[0], pair[1]]);
            let _ = fmt::write(self, format_args!("{:04x}", word));
        }
        if let [last] = chunks.remainder() {
            if !first {
                self.push_str(" ");
            }
            let _ = fmt::write(self, format_args!("{:02x}", last));
        }
    }

    pub fn into_report(self) -> Report {
        Report { bytes: self.buf }
    }
}

impl fmt::Write for BoundedWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

/// 一次读调用渲染出的完整报告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    bytes: Vec<u8>,
}

impl Report {
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.bytes).unwrap_or("")
    }

    /// 从 `offset` 起复制到 `out`，返回复制的字节数；偏移在末尾或之后返回 0
    pub fn read_at(&self, offset: u64, out: &mut [u8]) -> usize {
        let available = self.bytes.len() as u64;
        if offset >= available {
            return 0;
        }
        let start = offset as usize;
        let n = out.len().min(self.bytes.len() - start);
        out[..n].copy_from_slice(&self.bytes[start..start + n]);
        n
    }

    pub fn into_string(self) -> String {
        String::from_utf8(self.bytes).unwrap_or_default()
    }
}

/// 在 `cap` 容量内执行一次格式化，返回报告
pub fn render<F>(cap: usize, f: F) -> DbgfsResult<Report>
where
    F: FnOnce(&mut BoundedWriter) -> DbgfsResult<()>,
{
    let mut w = BoundedWriter::with_capacity(cap)?;
    f(&mut w)?;
    Ok(w.into_report())
}
