//! 端点描述
//!
//! 一个端点 = 名字 + 所在目录 + 访问方式（只读格式化 / 只写解析 / 读写）+ 报告容量。
//! 描述在 attach 时创建一次，detach 时销毁；每次调用不保留任何分配。

use crate::error::DbgfsResult;
use crate::token::{CommandToken, CMD_TOKEN_MAX};
use crate::writer::BoundedWriter;

/// 把状态渲染为文本
pub type FormatFn<S> = fn(&S, &mut BoundedWriter) -> DbgfsResult<()>;

/// 校验命令并修改状态；返回错误时状态必须保持不变
pub type WriteFn<S> = fn(&mut S, &CommandToken<'_>) -> DbgfsResult<()>;

/// 访问方式
pub enum Access<S> {
    ReadOnly(FormatFn<S>),
    WriteOnly(WriteFn<S>),
    ReadWrite(FormatFn<S>, WriteFn<S>),
}

impl<S> Access<S> {
    pub fn formatter(&self) -> Option<FormatFn<S>> {
        match *self {
            Access::ReadOnly(f) | Access::ReadWrite(f, _) => Some(f),
            Access::WriteOnly(_) => None,
        }
    }

    pub fn mutator(&self) -> Option<WriteFn<S>> {
        match *self {
            Access::WriteOnly(w) | Access::ReadWrite(_, w) => Some(w),
            Access::ReadOnly(_) => None,
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Access::ReadOnly(_) => Mode::READ,
            Access::WriteOnly(_) => Mode::WRITE,
            Access::ReadWrite(..) => Mode::READ_WRITE,
        }
    }
}

/// 文件权限位（属主）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode(pub u16);

impl Mode {
    pub const READ: Mode = Mode(0o400);
    pub const WRITE: Mode = Mode(0o200);
    pub const READ_WRITE: Mode = Mode(0o600);
    pub const DIR: Mode = Mode(0o700);

    #[inline]
    pub fn readable(self) -> bool {
        self.0 & 0o400 != 0
    }

    #[inline]
    pub fn writable(self) -> bool {
        self.0 & 0o200 != 0
    }
}

/// 报告容量：固定值，或按当前状态中需要渲染的条目数计算
pub enum Capacity<S> {
    Fixed(usize),
    Computed(fn(&S) -> usize),
}

impl<S> Capacity<S> {
    pub fn resolve(&self, state: &S) -> usize {
        match *self {
            Capacity::Fixed(n) => n,
            Capacity::Computed(f) => f(state),
        }
    }
}

pub struct Endpoint<S> {
    pub name: &'static str,
    pub dir: &'static str,
    pub access: Access<S>,
    pub capacity: Capacity<S>,
    /// 写入的字节上限
    pub input_max: usize,
    /// attach 时判断该端点在当前硬件上是否存在
    pub present: Option<fn(&S) -> bool>,
}

impl<S> Endpoint<S> {
    pub fn read_only(dir: &'static str, name: &'static str, fmt: FormatFn<S>, capacity: Capacity<S>) -> Self {
        Self::new(dir, name, Access::ReadOnly(fmt), capacity)
    }

    pub fn write_only(dir: &'static str, name: &'static str, write: WriteFn<S>) -> Self {
        Self::new(dir, name, Access::WriteOnly(write), Capacity::Fixed(0))
    }

    pub fn read_write(
        dir: &'static str,
        name: &'static str,
        fmt: FormatFn<S>,
        write: WriteFn<S>,
        capacity: Capacity<S>,
    ) -> Self {
        Self::new(dir, name, Access::ReadWrite(fmt, write), capacity)
    }

    fn new(dir: &'static str, name: &'static str, access: Access<S>, capacity: Capacity<S>) -> Self {
        Self {
            name,
            dir,
            access,
            capacity,
            input_max: CMD_TOKEN_MAX,
            present: None,
        }
    }

    /// 修改输入上限
    pub fn with_input_max(mut self, n: usize) -> Self {
        self.input_max = n;
        self
    }

    /// 仅当 `pred` 为真时注册
    pub fn when(mut self, pred: fn(&S) -> bool) -> Self {
        self.present = Some(pred);
        self
    }

    pub fn is_present(&self, state: &S) -> bool {
        self.present.map(|p| p(state)).unwrap_or(true)
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.access.mode()
    }
}
