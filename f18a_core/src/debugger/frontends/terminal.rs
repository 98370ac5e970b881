//! Line-oriented terminal debugger. Owns the machine while attached and
//! drives it one instruction at a time from a ` * ` prompt on stdin.

use crate::cpu::Cpu;
use crate::debugger::command::Command;
use crate::debugger::Debugger;
use crate::memory::{NodeMemMap, ADDR_MASK};
use crate::stack::{RSTACK_WORDS, STACK_WORDS};
use crate::{Action, NodeOps, TermSwitch};

use std::io::{self, Write};

const HELP: &str = "  help, ?: show this message
  continue: resume running
  step [n]: execute a single instruction (or n instructions)
  dump: display the state of the cpu
  print addr [len]: display memory contents in hex
      (addr is hex, len decimal)
  exit, quit: exit emulator
unambiguous abbreviations are recognized (e.g., s for step or con for continue).";

pub struct TerminalDebugger {
    cpu: Cpu,
    mem_map: NodeMemMap,
}

impl TerminalDebugger {
    pub fn new(cpu: Cpu, mem_map: NodeMemMap) -> TerminalDebugger {
        TerminalDebugger { cpu, mem_map }
    }

    fn dump_header(&self) {
        println!("p   r     t     s     a     b   io    i     @ opcode");
        println!("--- ----- ----- ----- ----- --- ----- ----- - --------");
    }

    fn dump_state(&self) {
        let op = self.cpu.decode_op();
        println!(
            "{:03x} {:05x} {:05x} {:05x} {:05x} {:03x} {:05x} {:05x} {} {:03x} {}",
            self.cpu.p,
            self.cpu.ret.r,
            self.cpu.data.t,
            self.cpu.data.s,
            self.cpu.a,
            self.cpu.b,
            self.mem_map.io,
            self.cpu.i,
            self.cpu.slot,
            op as u8,
            op.mnemonic()
        );

        print!("   stack: [{}]", self.cpu.data.sp());
        for i in 0..STACK_WORDS {
            print!(" {:05x}", self.cpu.data.frame(i));
        }
        println!();

        print!("  rstack: [{}]", self.cpu.ret.rsp());
        for i in 0..RSTACK_WORDS {
            print!(" {:05x}", self.cpu.ret.frame(i));
        }
        println!();
    }

    /// Memory dump: rows of up to eight words aligned on 8-word
    /// boundaries, absent addresses shown as blanks.
    fn dump_mem(&self, addr: u32, len: u32) {
        let mut addr = addr;
        let mut len = len;
        while len > 0 && addr <= ADDR_MASK {
            let base = addr & !7;
            print!("\n{:02x}:", base);
            let pad = (addr % 8) as usize;
            print!("{:width$}", "", width = 5 * pad);
            loop {
                if self.mem_map.present(addr) {
                    print!(" {:05x}", self.mem_map.load(addr));
                } else {
                    print!("      ");
                }
                len -= 1;
                addr += 1;
                if len == 0 || addr % 8 == 0 {
                    break;
                }
            }
        }
        println!();
    }
}

impl NodeOps for TerminalDebugger {
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

impl Debugger for TerminalDebugger {
    fn break_into(&mut self, term: &mut dyn TermSwitch) -> bool {
        println!("entering emulator debugger: enter 'h' for help.");
        self.dump_header();
        self.dump_state();

        loop {
            print!(" * ");
            io::stdout().flush().unwrap();

            let mut line = String::new();
            match io::stdin().read_line(&mut line) {
                Ok(0) | Err(_) => return false,
                Ok(_) => {}
            }
            if line.split_whitespace().next().is_none() {
                continue;
            }

            match Command::parse(&line) {
                Ok(Command::Help) => println!("{}", HELP),
                Ok(Command::Continue) => return true,
                Ok(Command::Step(steps)) => {
                    for _ in 0..steps {
                        term.run_mode();
                        self.step_cpu();
                        term.dbg_mode();
                        self.dump_state();
                    }
                }
                Ok(Command::Dump) => {
                    self.dump_header();
                    self.dump_state();
                }
                Ok(Command::PrintMem { addr, len }) => self.dump_mem(addr, len),
                Ok(Command::Quit) => return false,
                Err(msg) => println!("{}", msg),
            }
        }
    }
}
