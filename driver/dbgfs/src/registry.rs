//! 端点注册表
//!
//! 状态机：`Unregistered → Registered → Unregistered`。
//! - register：建根目录、子目录、再逐个建文件；任何一步失败都回滚已建节点（全有或全无）。
//! - unregister：递归删除根目录；未注册时为空操作。
//! - read / write：按 `目录/名字` 分发，调用期间持有驱动自己的锁，不另加锁。

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use spin::Mutex;

use crate::endpoint::Endpoint;
use crate::error::{DbgfsError, DbgfsResult};
use crate::host::{HostFs, NodeId};
use crate::token::CommandToken;
use crate::writer::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    Unregistered,
    Registered,
}

pub struct Registry<S> {
    name: String,
    dirs: Vec<&'static str>,
    endpoints: Vec<Endpoint<S>>,
    state: RegistryState,
    root: Option<NodeId>,
    /// `目录/名字` -> endpoints 下标
    bound: BTreeMap<String, usize>,
}

impl<S> Registry<S> {
    /// `dirs` 为根目录下的子目录，端点的 `dir` 必须是其中之一
    pub fn new(name: &str, dirs: &[&'static str], endpoints: Vec<Endpoint<S>>) -> Self {
        Self {
            name: String::from(name),
            dirs: dirs.to_vec(),
            endpoints,
            state: RegistryState::Unregistered,
            root: None,
            bound: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> RegistryState {
        self.state
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// 已绑定的端点路径
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.bound.keys().map(|k| k.as_str())
    }

    pub fn is_bound(&self, path: &str) -> bool {
        self.bound.contains_key(path)
    }

    pub fn register(&mut self, host: &mut dyn HostFs, parent: Option<NodeId>, state: &Mutex<S>) -> DbgfsResult<()> {
        if self.state == RegistryState::Registered {
            log::info!(target: "wireless::dbgfs", "{}: already registered", self.name);
            return Ok(());
        }
        let root = host.create_dir(&self.name, parent).map_err(|e| {
            log::warn!(target: "wireless::dbgfs", "{}: can't create root dir: {:?}", self.name, e);
            DbgfsError::Host(e)
        })?;
        self.root = Some(root);
        self.state = RegistryState::Registered;

        if let Err(e) = self.bind_all(host, root, state) {
            log::warn!(target: "wireless::dbgfs", "{}: can't create the debugfs tree ({}), rolling back", self.name, e);
            self.unregister(host);
            return Err(e);
        }
        log::info!(target: "wireless::dbgfs", "{}: registered {} endpoints", self.name, self.bound.len());
        Ok(())
    }

    fn bind_all(&mut self, host: &mut dyn HostFs, root: NodeId, state: &Mutex<S>) -> DbgfsResult<()> {
        let mut dir_nodes: BTreeMap<&'static str, NodeId> = BTreeMap::new();
        for &dir in self.dirs.iter() {
            let node = host.create_dir(dir, Some(root))?;
            dir_nodes.insert(dir, node);
        }
        let guard = state.lock();
        for (idx, ep) in self.endpoints.iter().enumerate() {
            if !ep.is_present(&guard) {
                log::debug!(target: "wireless::dbgfs", "skip {}/{}: not present on this device", ep.dir, ep.name);
                continue;
            }
            let dir = *dir_nodes.get(ep.dir).ok_or(DbgfsError::NotFound)?;
            host.create_file(ep.name, ep.mode(), dir)?;
            self.bound.insert(endpoint_path(ep.dir, ep.name), idx);
        }
        Ok(())
    }

    /// 删除整棵树；重复调用无副作用
    pub fn unregister(&mut self, host: &mut dyn HostFs) {
        let Some(root) = self.root.take() else {
            return;
        };
        host.remove_recursive(root);
        self.bound.clear();
        self.state = RegistryState::Unregistered;
        log::info!(target: "wireless::dbgfs", "{}: unregistered", self.name);
    }

    fn resolve(&self, path: &str) -> DbgfsResult<&Endpoint<S>> {
        if self.state != RegistryState::Registered {
            return Err(DbgfsError::NotFound);
        }
        let idx = *self.bound.get(path).ok_or(DbgfsError::NotFound)?;
        Ok(&self.endpoints[idx])
    }

    /// 渲染报告并从 `offset` 复制到 `out`，返回复制字节数
    pub fn read(&self, state: &Mutex<S>, path: &str, offset: u64, out: &mut [u8]) -> DbgfsResult<usize> {
        let ep = self.resolve(path)?;
        let fmt = ep.access.formatter().ok_or(DbgfsError::UnsupportedOperation)?;
        let report = {
            let guard = state.lock();
            let cap = ep.capacity.resolve(&guard);
            render(cap, |w| fmt(&guard, w))?
        };
        let n = report.read_at(offset, out);
        log::trace!(target: "wireless::dbgfs", "read {} off={} -> {}/{}", path, offset, n, report.len());
        Ok(n)
    }

    /// 解析并应用命令，成功时返回消耗的字节数（即整个输入）
    pub fn write(&self, state: &Mutex<S>, path: &str, input: &[u8]) -> DbgfsResult<usize> {
        let ep = self.resolve(path)?;
        let mutator = ep.access.mutator().ok_or(DbgfsError::UnsupportedOperation)?;
        let token = CommandToken::new(input, ep.input_max)?;
        let mut guard = state.lock();
        mutator(&mut guard, &token).map_err(|e| {
            log::warn!(target: "wireless::dbgfs", "write {} {:?} rejected: {}", path, token.as_str(), e);
            e
        })?;
        log::debug!(target: "wireless::dbgfs", "write {} {:?} applied", path, token.as_str());
        Ok(input.len())
    }
}

pub fn endpoint_path(dir: &str, name: &str) -> String {
    let mut p = String::with_capacity(dir.len() + 1 + name.len());
    p.push_str(dir);
    p.push('/');
    p.push_str(name);
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::{Capacity, Mode};
    use crate::host::MemFs;
    use crate::token::IntDomain;
    use crate::writer::BoundedWriter;
    use alloc::vec;
    use axerrno::{AxError, AxResult};
    use core::fmt::Write;

    struct Dev {
        threshold: i64,
        flush_supported: bool,
    }

    fn threshold_read(d: &Dev, w: &mut BoundedWriter) -> DbgfsResult<()> {
        let _ = writeln!(w, "{}", d.threshold);
        Ok(())
    }

    fn threshold_write(d: &mut Dev, t: &CommandToken<'_>) -> DbgfsResult<()> {
        let v = t.parse_dec()?;
        d.threshold = IntDomain::or_default(1, 5, 5).apply(v)?;
        Ok(())
    }

    fn flush_write(_d: &mut Dev, t: &CommandToken<'_>) -> DbgfsResult<()> {
        t.parse_dec()?;
        Ok(())
    }

    fn endpoints() -> Vec<Endpoint<Dev>> {
        vec![
            Endpoint::read_write("debug", "threshold", threshold_read, threshold_write, Capacity::Fixed(12)),
            Endpoint::write_only("debug", "flush", flush_write).when(|d| d.flush_supported),
            Endpoint::read_only("data", "threshold_copy", threshold_read, Capacity::Fixed(2)),
        ]
    }

    fn dev() -> Mutex<Dev> {
        Mutex::new(Dev {
            threshold: 3,
            flush_supported: false,
        })
    }

    /// 第 N 次创建节点时失败
    struct FailingFs {
        inner: MemFs,
        fail_at: usize,
        calls: usize,
    }

    impl FailingFs {
        fn tick(&mut self) -> AxResult<()> {
            self.calls += 1;
            if self.calls == self.fail_at {
                Err(AxError::NoMemory)
            } else {
                Ok(())
            }
        }
    }

    impl HostFs for FailingFs {
        fn create_dir(&mut self, name: &str, parent: Option<NodeId>) -> AxResult<NodeId> {
            self.tick()?;
            self.inner.create_dir(name, parent)
        }

        fn create_file(&mut self, name: &str, mode: Mode, parent: NodeId) -> AxResult<NodeId> {
            self.tick()?;
            self.inner.create_file(name, mode, parent)
        }

        fn remove_recursive(&mut self, node: NodeId) {
            self.inner.remove_recursive(node)
        }
    }

    #[test]
    fn register_binds_present_endpoints() {
        let mut fs = MemFs::new();
        let state = dev();
        let mut reg = Registry::new("iwlagn", &["data", "debug"], endpoints());
        reg.register(&mut fs, None, &state).unwrap();
        assert_eq!(reg.state(), RegistryState::Registered);
        assert!(reg.is_bound("debug/threshold"));
        assert!(!reg.is_bound("debug/flush"));
        let node = fs.lookup("iwlagn/debug/threshold").unwrap();
        assert_eq!(fs.node(node).unwrap().mode, Mode::READ_WRITE);
        // 根 + 2 个子目录 + 2 个文件
        assert_eq!(fs.len(), 5);
    }

    #[test]
    fn register_then_unregister_is_idempotent() {
        let mut fs = MemFs::new();
        let state = dev();
        let mut reg = Registry::new("iwlagn", &["data", "debug"], endpoints());
        reg.register(&mut fs, None, &state).unwrap();
        reg.register(&mut fs, None, &state).unwrap();
        assert_eq!(fs.len(), 5);
        reg.unregister(&mut fs);
        reg.unregister(&mut fs);
        assert_eq!(reg.state(), RegistryState::Unregistered);
        assert!(fs.is_empty());
        assert_eq!(reg.paths().count(), 0);
    }

    #[test]
    fn failed_bind_rolls_back_everything() {
        for fail_at in 1..=5 {
            let mut fs = FailingFs {
                inner: MemFs::new(),
                fail_at,
                calls: 0,
            };
            let state = dev();
            let mut reg = Registry::new("iwlagn", &["data", "debug"], endpoints());
            let r = reg.register(&mut fs, None, &state);
            assert_eq!(r, Err(DbgfsError::Host(AxError::NoMemory)), "fail_at={}", fail_at);
            assert_eq!(reg.state(), RegistryState::Unregistered);
            assert!(fs.inner.is_empty(), "fail_at={}", fail_at);
        }
    }

    #[test]
    fn unknown_directory_rolls_back() {
        let mut fs = MemFs::new();
        let state = dev();
        let mut reg = Registry::new("iwlagn", &["debug"], endpoints());
        assert_eq!(reg.register(&mut fs, None, &state), Err(DbgfsError::NotFound));
        assert!(fs.is_empty());
    }

    #[test]
    fn dispatch_read_write() {
        let mut fs = MemFs::new();
        let state = dev();
        let mut reg = Registry::new("iwlagn", &["data", "debug"], endpoints());

        let mut out = [0u8; 16];
        assert_eq!(reg.read(&state, "debug/threshold", 0, &mut out), Err(DbgfsError::NotFound));

        reg.register(&mut fs, None, &state).unwrap();
        assert_eq!(reg.write(&state, "debug/threshold", b"5\n"), Ok(2));
        let n = reg.read(&state, "debug/threshold", 0, &mut out).unwrap();
        assert_eq!(&out[..n], b"5\n");

        assert_eq!(reg.write(&state, "debug/threshold", b"999999"), Ok(6));
        assert_eq!(state.lock().threshold, 5);

        state.lock().threshold = 4;
        assert_eq!(reg.write(&state, "debug/threshold", b"abc"), Err(DbgfsError::ParseError));
        assert_eq!(state.lock().threshold, 4);

        assert_eq!(
            reg.write(&state, "data/threshold_copy", b"1"),
            Err(DbgfsError::UnsupportedOperation)
        );
        assert_eq!(reg.write(&state, "debug/nope", b"1"), Err(DbgfsError::NotFound));
    }

    #[test]
    fn read_respects_capacity_and_offset() {
        let mut fs = MemFs::new();
        let state = dev();
        state.lock().threshold = 1234;
        let mut reg = Registry::new("iwlagn", &["data", "debug"], endpoints());
        reg.register(&mut fs, None, &state).unwrap();
        let mut out = [0u8; 16];
        let n = reg.read(&state, "data/threshold_copy", 0, &mut out).unwrap();
        assert_eq!(&out[..n], b"12");
        let n = reg.read(&state, "debug/threshold", 2, &mut out).unwrap();
        assert_eq!(&out[..n], b"34\n");
        assert_eq!(reg.read(&state, "debug/threshold", 5, &mut out), Ok(0));
    }
}
