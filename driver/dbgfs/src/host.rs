//! 宿主注册面
//!
//! 目录/文件节点的创建与删除由宿主（内核的虚拟文件系统）提供，这里只定义接口。
//! [`MemFs`] 是一个内存实现，用于无宿主环境与测试。

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use axerrno::{AxError, AxResult};

use crate::endpoint::Mode;

/// 宿主分配的节点句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeId(pub u32);

pub trait HostFs {
    fn create_dir(&mut self, name: &str, parent: Option<NodeId>) -> AxResult<NodeId>;
    fn create_file(&mut self, name: &str, mode: Mode, parent: NodeId) -> AxResult<NodeId>;
    /// 删除节点及其全部子节点
    fn remove_recursive(&mut self, node: NodeId);
}

#[derive(Debug, Clone)]
pub struct MemNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub mode: Mode,
    pub is_dir: bool,
}

/// 内存中的节点树
#[derive(Debug, Default)]
pub struct MemFs {
    nodes: BTreeMap<NodeId, MemNode>,
    next_id: u32,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&MemNode> {
        self.nodes.get(&id)
    }

    /// 按 `a/b/c` 路径查找节点
    pub fn lookup(&self, path: &str) -> Option<NodeId> {
        let mut cur: Option<NodeId> = None;
        for part in path.split('/').filter(|p| !p.is_empty()) {
            cur = Some(self.child(cur, part)?);
        }
        cur
    }

    fn child(&self, parent: Option<NodeId>, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.parent == parent && n.name == name)
            .map(|(id, _)| *id)
    }

    fn insert(&mut self, name: &str, parent: Option<NodeId>, mode: Mode, is_dir: bool) -> AxResult<NodeId> {
        if let Some(p) = parent {
            match self.nodes.get(&p) {
                Some(n) if n.is_dir => {}
                Some(_) => return Err(AxError::NotADirectory),
                None => return Err(AxError::NotFound),
            }
        }
        if self.child(parent, name).is_some() {
            return Err(AxError::AlreadyExists);
        }
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            MemNode {
                name: String::from(name),
                parent,
                mode,
                is_dir,
            },
        );
        Ok(id)
    }
}

impl HostFs for MemFs {
    fn create_dir(&mut self, name: &str, parent: Option<NodeId>) -> AxResult<NodeId> {
        self.insert(name, parent, Mode::DIR, true)
    }

    fn create_file(&mut self, name: &str, mode: Mode, parent: NodeId) -> AxResult<NodeId> {
        self.insert(name, Some(parent), mode, false)
    }

    fn remove_recursive(&mut self, node: NodeId) {
        let mut pending: Vec<NodeId> = alloc::vec![node];
        while let Some(id) = pending.pop() {
            if self.nodes.remove(&id).is_none() {
                continue;
            }
            pending.extend(
                self.nodes
                    .iter()
                    .filter(|(_, n)| n.parent == Some(id))
                    .map(|(child, _)| *child),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_and_recursive_remove() {
        let mut fs = MemFs::new();
        let root = fs.create_dir("iwlagn", None).unwrap();
        let debug = fs.create_dir("debug", Some(root)).unwrap();
        let file = fs.create_file("missed_beacon", Mode::WRITE, debug).unwrap();
        let other = fs.create_dir("phy0", None).unwrap();
        assert_eq!(fs.lookup("iwlagn/debug/missed_beacon"), Some(file));
        assert_eq!(fs.node(file).unwrap().mode, Mode::WRITE);

        fs.remove_recursive(root);
        assert_eq!(fs.len(), 1);
        assert_eq!(fs.lookup("phy0"), Some(other));
        assert_eq!(fs.lookup("iwlagn"), None);
    }

    #[test]
    fn duplicate_and_bad_parent() {
        let mut fs = MemFs::new();
        let root = fs.create_dir("iwlagn", None).unwrap();
        assert_eq!(fs.create_dir("iwlagn", None), Err(AxError::AlreadyExists));
        let f = fs.create_file("status", Mode::READ, root).unwrap();
        assert_eq!(fs.create_file("x", Mode::READ, f), Err(AxError::NotADirectory));
        assert_eq!(fs.create_file("x", Mode::READ, NodeId(99)), Err(AxError::NotFound));
    }
}
