//! 调试文件系统外观层 (dbgfs)
//!
//! 与具体驱动无关的通用部分：
//! - 有界报告写入器 (writer) - 读端点的格式化输出与分块读取
//! - 命令解析 (token) - 写端点的定长输入、数值解析与取值范围策略
//! - 端点描述 (endpoint) - 名字、目录、访问方式、报告容量
//! - 宿主注册面 (host) - 目录/文件节点的创建与删除，附内存实现
//! - 注册表 (registry) - 全有或全无的注册、注销与读写分发

#![no_std]

extern crate alloc;

mod endpoint;
mod error;
mod host;
mod registry;
mod token;
mod writer;

pub use endpoint::{Access, Capacity, Endpoint, FormatFn, Mode, WriteFn};
pub use error::{DbgfsError, DbgfsResult};
pub use host::{HostFs, MemFs, MemNode, NodeId};
pub use registry::{endpoint_path, Registry, RegistryState};
pub use token::{CommandToken, IntDomain, OutOfRange, CMD_TOKEN_MAX, CMD_TOKEN_WIDE_MAX};
pub use writer::{render, BoundedWriter, Report};
