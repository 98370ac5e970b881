#[macro_use]
extern crate nom;

pub mod cpu;
pub mod debugger;
pub mod image;
pub mod instructions;
pub mod memory;
pub mod stack;

use crate::cpu::Cpu;
use crate::debugger::frontends::terminal::TerminalDebugger;
use crate::debugger::{Debugger, DebuggerFrontend};
use crate::image::{Image, ImageError};
use crate::memory::NodeMemMap;
use enum_dispatch::enum_dispatch;

use std::path::Path;
use thiserror::Error;

pub use crate::instructions::{Op, MNEMONICS};

/// What the run loop should do after a step. The current opcode set only
/// ever continues; the other variants are how future opcodes would request
/// debugger entry or a clean halt.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Continue,
    Break,
    Exit,
}

/// Terminal mode switching, implemented by the host. Both operations are
/// idempotent: running mode is non-blocking with echo off, debug mode is
/// blocking with echo on.
pub trait TermSwitch {
    fn run_mode(&mut self);
    fn dbg_mode(&mut self);
}

#[enum_dispatch]
pub trait NodeOps {
    fn consume(self) -> (Cpu, NodeMemMap);

    fn cpu(&mut self) -> &mut Cpu;
    fn mem(&mut self) -> &mut NodeMemMap;

    /// Perform the run loop's initial fetch if the instruction word is
    /// empty, so the first decode sees a real word.
    fn prime(&mut self);
    fn step_cpu(&mut self) -> Action;
}

#[enum_dispatch]
pub trait NodeDebugger {
    fn debugger(&mut self) -> Option<&mut DebuggerFrontend>;
}

/// The plain machine: cpu plus memory, no debugger in the way.
struct DefaultNode {
    cpu: Cpu,
    mem_map: NodeMemMap,
}

impl DefaultNode {
    fn new(cpu: Cpu, mem_map: NodeMemMap) -> DefaultNode {
        DefaultNode { cpu, mem_map }
    }
}

impl Default for DefaultNode {
    fn default() -> DefaultNode {
        DefaultNode {
            cpu: Cpu::new(),
            mem_map: NodeMemMap::default(),
        }
    }
}

impl NodeOps for DefaultNode {
    fn consume(self) -> (Cpu, NodeMemMap) {
        (self.cpu, self.mem_map)
    }

    fn cpu(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    fn mem(&mut self) -> &mut NodeMemMap {
        &mut self.mem_map
    }

    fn prime(&mut self) {
        self.cpu.prime(&self.mem_map);
    }

    #[inline]
    fn step_cpu(&mut self) -> Action {
        self.cpu.step(&mut self.mem_map)
    }
}

impl NodeDebugger for DefaultNode {
    fn debugger(&mut self) -> Option<&mut DebuggerFrontend> {
        None
    }
}

#[enum_dispatch(NodeOps, NodeDebugger)]
enum NodeImpl {
    DefaultNode,
    DebuggerFrontend,
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// One F18A-style node: the machine behind either the plain bus or the
/// attached debugger, plus the attach/detach bookkeeping.
pub struct Node {
    bus: NodeImpl,

    pub is_debugger_attached: bool,
}

impl Default for Node {
    fn default() -> Node {
        Node::new()
    }
}

impl Node {
    /// A freshly reset node with zeroed memory.
    pub fn new() -> Node {
        let cpu = Cpu::new();
        let mem_map = NodeMemMap::default();

        Node {
            bus: DefaultNode::new(cpu, mem_map).into(),
            is_debugger_attached: false,
        }
    }

    /// A reset node booted from a core image file.
    pub fn load_core(path: &Path) -> Result<Node, CoreError> {
        let image = Image::load(path)?;
        let mem_map = NodeMemMap::new(&image);
        let cpu = Cpu::new();

        Ok(Node {
            bus: DefaultNode::new(cpu, mem_map).into(),
            is_debugger_attached: false,
        })
    }

    pub fn prime(&mut self) {
        self.bus.prime();
    }

    #[inline]
    pub fn step(&mut self) -> Action {
        self.bus.step_cpu()
    }

    pub fn cpu(&mut self) -> &mut Cpu {
        self.bus.cpu()
    }

    pub fn mem(&mut self) -> &mut NodeMemMap {
        self.bus.mem()
    }

    /// Enter the interactive debugger, attaching it first if this is the
    /// first entry. Returns true if the operator asked to resume running.
    pub fn debug(&mut self, term: &mut dyn TermSwitch) -> bool {
        self.attach_debugger().break_into(term)
    }

    pub fn attach_debugger(&mut self) -> &mut DebuggerFrontend {
        if !self.is_debugger_attached {
            let dummy = self.get_dummy_node();
            let (cpu, mem_map) = std::mem::replace(&mut self.bus, dummy).consume();
            let new_bus = DebuggerFrontend::from(TerminalDebugger::new(cpu, mem_map));

            self.bus = new_bus.into();
            self.is_debugger_attached = true;
        }

        self.bus.debugger().unwrap()
    }

    pub fn detach_debugger(&mut self) {
        if self.is_debugger_attached {
            let dummy = self.get_dummy_node();
            let (cpu, mem_map) = std::mem::replace(&mut self.bus, dummy).consume();
            let new_bus = DefaultNode::new(cpu, mem_map);

            self.bus = new_bus.into();
            self.is_debugger_attached = false;
        }
    }

    fn get_dummy_node(&mut self) -> NodeImpl {
        let dummy = DefaultNode::default();
        dummy.into()
    }
}
