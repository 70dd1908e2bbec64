//! StarryOS wireless debugfs crate
//!
//! 把 iwl 驱动状态挂到调试文件系统上：
//! - dbgfs: 有界报告、命令解析、端点注册表、宿主注册面
//! - iwl: 驱动私有状态、协作方接口 (IwlOps)、端点表
//!
//! 驱动锁 (`spin::Mutex<IwlPriv>`) 由这里持有，中断/收发路径与调试文件系统共用。

#![no_std]

extern crate alloc;

pub use dbgfs;
pub use iwl;

use axerrno::{AxError, AxResult};
use dbgfs::{DbgfsResult, HostFs, NodeId, Registry, RegistryState};
use iwl::{IwlCfg, IwlLock, IwlOps, IwlOpsStub, IwlPriv};

/// 调试文件系统上下文：驱动锁 + 端点注册表
pub struct WirelessDbgfs<O: IwlOps> {
    dev: IwlLock<O>,
    registry: Registry<IwlPriv<O>>,
}

impl<O: IwlOps> WirelessDbgfs<O> {
    /// 根目录名取自 `cfg.dbgfs_name`
    pub fn new(cfg: IwlCfg, ops: O) -> Self {
        let registry = iwl::iwl_registry::<O>(&cfg.dbgfs_name);
        Self {
            dev: spin::Mutex::new(IwlPriv::new(cfg, ops)),
            registry,
        }
    }

    /// 从 ini 风格配置文件创建；缺失或非法的值使用默认值，未知 key 或残缺行返回 `InvalidData`
    pub fn from_configfile(file_data: &[u8], ops: O) -> AxResult<Self> {
        let mut cfg = IwlCfg::default();
        iwl::parse_iwl_configfile(file_data, &mut cfg).map_err(|code| {
            log::warn!(target: "wireless", "iwl config rejected ({})", code);
            AxError::InvalidData
        })?;
        Ok(Self::new(cfg, ops))
    }

    /// 在 `parent` 下建整棵目录树；失败时已建节点全部回滚
    pub fn attach(&mut self, host: &mut dyn HostFs, parent: Option<NodeId>) -> AxResult<()> {
        self.registry.register(host, parent, &self.dev).map_err(|e| {
            log::error!(target: "wireless", "{}: debugfs attach failed: {}", self.registry.name(), e);
            AxError::from(e)
        })
    }

    pub fn detach(&mut self, host: &mut dyn HostFs) {
        self.registry.unregister(host);
    }

    pub fn is_attached(&self) -> bool {
        self.registry.state() == RegistryState::Registered
    }

    pub fn registry(&self) -> &Registry<IwlPriv<O>> {
        &self.registry
    }

    /// 读 `目录/名字` 端点，从 `offset` 起复制到 `out`
    pub fn read(&self, path: &str, offset: u64, out: &mut [u8]) -> DbgfsResult<usize> {
        self.registry.read(&self.dev, path, offset, out)
    }

    /// 向 `目录/名字` 端点写一条命令，返回消耗的字节数
    pub fn write(&self, path: &str, input: &[u8]) -> DbgfsResult<usize> {
        self.registry.write(&self.dev, path, input)
    }

    /// 宿主文件操作形式：成功返回字节数，失败返回负 errno
    pub fn file_read(&self, path: &str, offset: u64, out: &mut [u8]) -> isize {
        match self.read(path, offset, out) {
            Ok(n) => n as isize,
            Err(e) => e.errno() as isize,
        }
    }

    pub fn file_write(&self, path: &str, input: &[u8]) -> isize {
        match self.write(path, input) {
            Ok(n) => n as isize,
            Err(e) => e.errno() as isize,
        }
    }

    /// 在驱动锁内访问私有状态（中断/收发路径用）
    pub fn with_priv<R>(&self, f: impl FnOnce(&mut IwlPriv<O>) -> R) -> R {
        let mut guard = self.dev.lock();
        f(&mut guard)
    }
}

/// 使用占位协作方的初始化（无硬件时可用）
///
/// 状态与端点齐全，所有硬件动作由 `IwlOpsStub` 记录而不执行，
/// 片上内存与寄存器读出 0。接上真实总线后改为 `WirelessDbgfs<RealOps>`。
pub fn wireless_dbgfs_init_stub() -> WirelessDbgfs<IwlOpsStub> {
    log::info!(target: "wireless", "wireless: init stub debugfs (IwlOpsStub)");
    WirelessDbgfs::new(IwlCfg::default(), IwlOpsStub::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec::Vec;
    use dbgfs::{DbgfsError, MemFs, Mode};
    use iwl::{OpsCall, STATUS_GEO_CONFIGURED};

    /// 第 `fail_at` 次创建节点时失败
    struct FlakyFs {
        inner: MemFs,
        creates: usize,
        fail_at: usize,
    }

    impl FlakyFs {
        fn new(fail_at: usize) -> Self {
            Self {
                inner: MemFs::new(),
                creates: 0,
                fail_at,
            }
        }

        fn tick(&mut self) -> AxResult<()> {
            self.creates += 1;
            if self.creates == self.fail_at {
                return Err(AxError::NoMemory);
            }
            Ok(())
        }
    }

    impl HostFs for FlakyFs {
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

    fn read_all(d: &WirelessDbgfs<IwlOpsStub>, path: &str, chunk: usize) -> String {
        let mut out = Vec::new();
        let mut buf = alloc::vec![0u8; chunk];
        let mut off = 0u64;
        loop {
            let n = d.read(path, off, &mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
            off += n as u64;
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn attach_builds_tree() {
        let mut fs = MemFs::new();
        let mut d = wireless_dbgfs_init_stub();
        d.attach(&mut fs, None).unwrap();
        assert!(d.is_attached());
        // 根目录 + 3 个子目录 + 38 个端点（txfifo_flush、bt_traffic、ucode_bt_stats 不在此型号上）
        assert_eq!(fs.len(), 1 + 3 + 38);
        let nvm = fs.lookup("iwlagn/data/nvm").unwrap();
        assert_eq!(fs.node(nvm).map(|n| n.mode), Some(Mode::READ));
        let csr = fs.lookup("iwlagn/debug/csr").unwrap();
        assert_eq!(fs.node(csr).map(|n| n.mode), Some(Mode::WRITE));
        assert!(fs.lookup("iwlagn/debug/txfifo_flush").is_none());
        assert!(fs.lookup("iwlagn/debug/ucode_bt_stats").is_none());
        assert!(fs.lookup("iwlagn/debug/reply_tx_error").is_some());

        d.attach(&mut fs, None).unwrap();
        assert_eq!(fs.len(), 1 + 3 + 38);

        d.detach(&mut fs);
        d.detach(&mut fs);
        assert!(fs.is_empty());
        assert!(!d.is_attached());
        assert_eq!(d.read("data/status", 0, &mut [0u8; 8]), Err(DbgfsError::NotFound));
    }

    #[test]
    fn variant_endpoints_follow_hardware() {
        let ops = IwlOpsStub {
            txfifo_flush_supported: true,
            ..Default::default()
        };
        let mut d = WirelessDbgfs::new(IwlCfg::default(), ops);
        d.with_priv(|p| p.bt = Some(Default::default()));
        let mut fs = MemFs::new();
        d.attach(&mut fs, None).unwrap();
        assert_eq!(fs.len(), 1 + 3 + 41);
        assert!(fs.lookup("iwlagn/debug/ucode_bt_stats").is_some());
        assert_eq!(d.write("debug/txfifo_flush", b"1\n"), Ok(2));
        assert_eq!(read_all(&d, "debug/bt_traffic", 64), "BT coex disabled\n");
    }

    #[test]
    fn failed_attach_rolls_back() {
        for fail_at in [1, 2, 4, 5, 20, 42] {
            let mut fs = FlakyFs::new(fail_at);
            let mut d = wireless_dbgfs_init_stub();
            assert_eq!(d.attach(&mut fs, None), Err(AxError::NoMemory));
            assert!(fs.inner.is_empty(), "leftover nodes when failing at {}", fail_at);
            assert!(!d.is_attached());
        }
    }

    #[test]
    fn missed_beacon_commands() {
        let mut fs = MemFs::new();
        let mut d = wireless_dbgfs_init_stub();
        d.attach(&mut fs, None).unwrap();

        assert_eq!(d.write("debug/missed_beacon", b"5"), Ok(1));
        assert_eq!(read_all(&d, "debug/missed_beacon", 16), "5\n");
        assert_eq!(d.write("debug/missed_beacon", b"2\n"), Ok(2));
        assert_eq!(d.write("debug/missed_beacon", b"999999"), Ok(6));
        assert_eq!(read_all(&d, "debug/missed_beacon", 16), "5\n");
        d.write("debug/missed_beacon", b"3").unwrap();
        assert_eq!(d.write("debug/missed_beacon", b"abc"), Err(DbgfsError::ParseError));
        assert_eq!(d.with_priv(|p| p.missed_beacon_threshold), 3);
        assert_eq!(d.file_write("debug/missed_beacon", b"abc"), -22);
    }

    #[test]
    fn chunked_reads_concatenate() {
        let mut fs = MemFs::new();
        let mut d = wireless_dbgfs_init_stub();
        d.attach(&mut fs, None).unwrap();
        let whole = read_all(&d, "data/status", 4096);
        assert_eq!(whole.lines().count(), 16);
        for chunk in [1, 7, 64] {
            assert_eq!(read_all(&d, "data/status", chunk), whole);
        }
        let mut buf = [0u8; 16];
        assert_eq!(d.read("data/status", whole.len() as u64, &mut buf), Ok(0));
        assert_eq!(d.read("data/status", u64::MAX, &mut buf), Ok(0));
    }

    #[test]
    fn dispatch_errors() {
        let mut fs = MemFs::new();
        let mut d = wireless_dbgfs_init_stub();
        d.attach(&mut fs, None).unwrap();
        let mut buf = [0u8; 32];
        assert_eq!(d.read("debug/csr", 0, &mut buf), Err(DbgfsError::UnsupportedOperation));
        assert_eq!(d.write("data/nvm", b"1"), Err(DbgfsError::UnsupportedOperation));
        assert_eq!(d.read("data/nope", 0, &mut buf), Err(DbgfsError::NotFound));
        assert_eq!(d.file_read("data/channels", 0, &mut buf), -11);
        d.with_priv(|p| p.status.set(STATUS_GEO_CONFIGURED));
        assert_eq!(d.file_read("data/channels", 0, &mut buf), 0);
    }

    #[test]
    fn driver_paths_share_the_lock() {
        let mut fs = MemFs::new();
        let mut d = wireless_dbgfs_init_stub();
        d.attach(&mut fs, None).unwrap();
        d.with_priv(|p| {
            p.log_rx_frame(&[0x08, 0x00, 0, 0, 0, 0]);
            p.isr_stats.count_rx(0x1c);
        });
        assert!(read_all(&d, "debug/rx_statistics", 100).ends_with("Data:\n\tcnt: 1\n\tbytes: 6\n"));
        d.write("debug/clear_traffic_statistics", b"1").unwrap();
        d.write("data/interrupt", b"0").unwrap();
        d.write("debug/csr", b"0").unwrap();
        d.with_priv(|p| {
            assert_eq!(p.rx_stats.data_cnt, 0);
            assert_eq!(p.isr_stats.rx, 0);
            assert_eq!(p.ops.calls, alloc::vec![OpsCall::DumpCsr]);
        });
    }

    #[test]
    fn config_names_the_root() {
        let mut fs = MemFs::new();
        let mut d =
            WirelessDbgfs::from_configfile(b"DBGFS_NAME=iwl5000\nMAX_STATIONS=4\n", IwlOpsStub::default()).unwrap();
        d.attach(&mut fs, None).unwrap();
        assert!(fs.lookup("iwl5000/rf/disable_sensitivity").is_some());
        assert_eq!(d.registry().name(), "iwl5000");
        assert_eq!(d.with_priv(|p| p.stations.capacity()), 4);
    }

    #[test]
    fn bad_config_is_rejected() {
        let unknown = WirelessDbgfs::from_configfile(b"DBGFS_NAME=iwl5000\nTX_ANT=3\n", IwlOpsStub::default());
        assert_eq!(unknown.err(), Some(AxError::InvalidData));
        let broken = WirelessDbgfs::from_configfile(b"MAX_STATIONS\n", IwlOpsStub::default());
        assert_eq!(broken.err(), Some(AxError::InvalidData));
    }
}
